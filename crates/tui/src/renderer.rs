use cone_viewer_protocol::{RenderCommand, TextAlign, ThemeToken, Viewport};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Viewport units per terminal cell. Cells are about twice as tall as they
/// are wide, so equal-aspect plots stay round.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::ConeL => Color::Red,
        ThemeToken::ConeM => Color::Green,
        ThemeToken::ConeS => Color::Blue,
        ThemeToken::ConeUnclassified => Color::Gray,
        ThemeToken::MarkerOutline => Color::Black,
        ThemeToken::Background => Color::Black,
        ThemeToken::Surface => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::PlotBackground => Color::Black,
        ThemeToken::PlotBorder => Color::DarkGray,
        ThemeToken::GridLine => Color::Rgb(40, 40, 40),
        ThemeToken::AxisText => Color::Gray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::ErrorText => Color::LightRed,
        ThemeToken::OverlayBackground => Color::Rgb(30, 30, 30),
        ThemeToken::OverlayBorder => Color::DarkGray,
        ThemeToken::ScaleBar => Color::White,
        ThemeToken::NavButton => Color::Black,
        ThemeToken::NavButtonActive => Color::Blue,
        ThemeToken::NavButtonText => Color::Gray,
        ThemeToken::NavButtonTextActive => Color::White,
    }
}

/// The render viewport matching a terminal area.
pub fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(
        f64::from(area.width) * CELL_WIDTH,
        f64::from(area.height) * CELL_HEIGHT,
    )
}

struct CellMap {
    area: Rect,
    clip: Option<(u16, u16, u16, u16)>,
}

impl CellMap {
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x / CELL_WIDTH).floor();
        let row = (y / CELL_HEIGHT).floor();
        if col < 0.0
            || row < 0.0
            || col >= f64::from(self.area.width)
            || row >= f64::from(self.area.height)
        {
            return None;
        }
        let (col, row) = (col as u16, row as u16);
        if let Some((x0, y0, x1, y1)) = self.clip
            && (col < x0 || col >= x1 || row < y0 || row >= y1)
        {
            return None;
        }
        Some((self.area.x + col, self.area.y + row))
    }

    fn set_clip(&mut self, rect: cone_viewer_protocol::Rect) {
        let x0 = (rect.x / CELL_WIDTH).floor().max(0.0) as u16;
        let y0 = (rect.y / CELL_HEIGHT).floor().max(0.0) as u16;
        let x1 = (rect.right() / CELL_WIDTH).ceil().max(0.0) as u16;
        let y1 = (rect.bottom() / CELL_HEIGHT).ceil().max(0.0) as u16;
        self.clip = Some((x0, y0, x1, y1));
    }
}

/// Paint render commands into `buf` within `area`, one viewport cell per
/// terminal cell. Markers become dots, text is written as-is, and filled
/// rectangles only show for the active navigation button.
pub fn paint(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    let mut map = CellMap { area, clip: None };

    for cmd in commands {
        match cmd {
            RenderCommand::DrawCircle { center, color, .. } => {
                if let Some(pos) = map.cell(center.x, center.y) {
                    buf[pos].set_char('●').set_fg(theme_to_color(*color));
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as f64 * CELL_WIDTH;
                let start = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - len / 2.0,
                    TextAlign::Right => position.x - len,
                };
                // `position` is a baseline; the glyphs sit in the cell above.
                let y = position.y - CELL_HEIGHT / 2.0;
                for (i, ch) in text.chars().enumerate() {
                    let x = start + i as f64 * CELL_WIDTH + CELL_WIDTH / 2.0;
                    if let Some(pos) = map.cell(x, y) {
                        buf[pos].set_char(ch).set_fg(theme_to_color(*color));
                    }
                }
            }

            RenderCommand::DrawRect { rect, color, .. } => {
                if *color != ThemeToken::NavButtonActive {
                    continue;
                }
                let mut y = rect.y + CELL_HEIGHT / 2.0;
                while y < rect.bottom() {
                    let mut x = rect.x + CELL_WIDTH / 2.0;
                    while x < rect.right() {
                        if let Some(pos) = map.cell(x, y) {
                            buf[pos].set_bg(theme_to_color(*color));
                        }
                        x += CELL_WIDTH;
                    }
                    y += CELL_HEIGHT;
                }
            }

            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                // Grid lines would swamp a terminal-sized plot.
                if *color == ThemeToken::GridLine {
                    continue;
                }
                let (ch, steps) = if (from.y - to.y).abs() < f64::EPSILON {
                    ('─', ((to.x - from.x).abs() / CELL_WIDTH).ceil())
                } else if (from.x - to.x).abs() < f64::EPSILON {
                    ('│', ((to.y - from.y).abs() / CELL_HEIGHT).ceil())
                } else {
                    continue;
                };
                let steps = steps.max(1.0) as usize;
                for i in 0..=steps {
                    let t = i as f64 / steps as f64;
                    let x = from.x + (to.x - from.x) * t;
                    let y = from.y + (to.y - from.y) * t;
                    if let Some(pos) = map.cell(x, y) {
                        buf[pos].set_char(ch).set_fg(theme_to_color(*color));
                    }
                }
            }

            RenderCommand::SetClip { rect } => map.set_clip(*rect),
            RenderCommand::ClearClip => map.clip = None,
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use cone_viewer_protocol::Point;

    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn markers_land_in_cells_with_cone_colors() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        paint(
            &mut buf,
            area,
            &[RenderCommand::DrawCircle {
                center: Point::new(20.0, 40.0),
                radius: 4.5,
                color: ThemeToken::ConeM,
                border_color: None,
            }],
        );
        assert_eq!(buf[(2, 2)].symbol(), "●");
        assert_eq!(buf[(2, 2)].fg, Color::Green);
    }

    #[test]
    fn centered_text_and_clip() {
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        paint(
            &mut buf,
            area,
            &[
                RenderCommand::text(
                    Point::new(48.0, 16.0),
                    "abcd",
                    ThemeToken::TextPrimary,
                    12.0,
                    TextAlign::Center,
                ),
                RenderCommand::SetClip {
                    rect: cone_viewer_protocol::Rect::new(0.0, 16.0, 16.0, 16.0),
                },
                RenderCommand::DrawCircle {
                    center: Point::new(80.0, 24.0),
                    radius: 4.0,
                    color: ThemeToken::ConeL,
                    border_color: None,
                },
                RenderCommand::ClearClip,
            ],
        );
        assert_eq!(row(&buf, 0).trim(), "abcd");
        assert_eq!(row(&buf, 1).trim(), "", "clipped marker is not drawn");
    }

    #[test]
    fn viewport_matches_cells() {
        let vp = viewport_for(Rect::new(0, 0, 80, 24));
        assert_eq!(vp.width, 640.0);
        assert_eq!(vp.height, 384.0);
    }
}
