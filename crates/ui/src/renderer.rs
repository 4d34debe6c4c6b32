use cone_viewer_protocol::{Point, RenderCommand, TextAlign};
use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};

use crate::theme::{self, ThemeMode};

fn to_pos(p: Point, offset: Pos2) -> Pos2 {
    Pos2::new(p.x as f32 + offset.x, p.y as f32 + offset.y)
}

fn to_rect(r: cone_viewer_protocol::Rect, offset: Pos2) -> Rect {
    Rect::from_min_size(
        Pos2::new(r.x as f32 + offset.x, r.y as f32 + offset.y),
        egui::vec2(r.w as f32, r.h as f32),
    )
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area. Text
/// positions are baselines, as in the SVG output.
pub fn render_commands(
    painter: &mut egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    let mut clip_stack: Vec<Rect> = Vec::new();

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let egui_rect = to_rect(*rect, offset);
                if egui_rect.width() < 0.5 || egui_rect.height() < 0.5 {
                    continue;
                }
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }
                painter.rect_filled(egui_rect, CornerRadius::ZERO, theme::resolve(*color, mode));
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        CornerRadius::ZERO,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                border_color,
            } => {
                let stroke = border_color.map_or(Stroke::NONE, |bc| {
                    Stroke::new(0.5, theme::resolve(bc, mode))
                });
                painter.circle(
                    to_pos(*center, offset),
                    *radius as f32,
                    theme::resolve(*color, mode),
                    stroke,
                );
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                bold,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_BOTTOM,
                    TextAlign::Center => Align2::CENTER_BOTTOM,
                    TextAlign::Right => Align2::RIGHT_BOTTOM,
                };
                // egui anchors on the galley box; nudge so `position` reads
                // as a baseline.
                let pos = to_pos(*position, offset) + egui::vec2(0.0, size * 0.25);
                let text_color = theme::resolve(*color, mode);
                painter.text(pos, anchor, text.as_str(), FontId::proportional(size), text_color);
                if *bold {
                    // Faux bold: egui's default fonts ship a single weight.
                    painter.text(
                        pos + egui::vec2(0.5, 0.0),
                        anchor,
                        text.as_str(),
                        FontId::proportional(size),
                        text_color,
                    );
                }
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_pos(*from, offset), to_pos(*to, offset)],
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                );
            }

            RenderCommand::SetClip { rect } => {
                clip_stack.push(painter.clip_rect());
                let intersected = painter.clip_rect().intersect(to_rect(*rect, offset));
                painter.set_clip_rect(intersected);
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    painter.set_clip_rect(prev);
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups carry no visual effect in egui
            }
        }
    }

    if let Some(outer) = clip_stack.first() {
        painter.set_clip_rect(*outer);
    }
}
