//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use cone_viewer_protocol::{RenderCommand, TextAlign, ThemeToken};

use crate::model::cone_color;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, dark),
    );

    let mut clip_count = 0usize;
    let mut clip_open = false;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => {
                let fill = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="2""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, dark));
                }
                svg.push('>');
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                border_color,
            } => {
                let _ = write!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}" fill="{}""#,
                    center.x,
                    center.y,
                    resolve_color(*color, dark),
                );
                if let Some(border) = border_color {
                    let _ = write!(
                        svg,
                        r#" stroke="{}" stroke-width="0.5""#,
                        resolve_color(*border, dark)
                    );
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
                bold,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let weight = if *bold { r#" font-weight="600""# } else { "" };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}"{weight}>{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                );
            }
            RenderCommand::SetClip { rect } => {
                if clip_open {
                    svg.push_str("</g>");
                }
                clip_count += 1;
                let _ = write!(
                    svg,
                    r#"<clipPath id="clip{clip_count}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clip_count})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                clip_open = true;
            }
            RenderCommand::ClearClip => {
                if clip_open {
                    svg.push_str("</g>");
                    clip_open = false;
                }
            }
            // Groups carry no styling.
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
    if clip_open {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> String {
    if let Some(c) = cone_color(token) {
        return c.to_hex();
    }
    let hex = if dark {
        match token {
            ThemeToken::Background => "#121212",
            ThemeToken::Surface | ThemeToken::PlotBackground => "#1e1e1e",
            ThemeToken::Border | ThemeToken::PlotBorder | ThemeToken::OverlayBorder => "#303030",
            ThemeToken::GridLine => "#2c2c2c",
            ThemeToken::AxisText | ThemeToken::TextPrimary | ThemeToken::ScaleBar => "#ececec",
            ThemeToken::TextSecondary | ThemeToken::TextMuted => "#9e9e9e",
            ThemeToken::ErrorText => "#ef5350",
            ThemeToken::OverlayBackground => "#262626",
            ThemeToken::MarkerOutline => "#000000",
            ThemeToken::NavButton => "#2a2a2a",
            ThemeToken::NavButtonActive => "#448aff",
            ThemeToken::NavButtonText => "#cfcfcf",
            ThemeToken::NavButtonTextActive => "#ffffff",
            _ => "#616161",
        }
    } else {
        match token {
            ThemeToken::Background => "#f8f9fa",
            ThemeToken::Surface | ThemeToken::PlotBackground => "#ffffff",
            ThemeToken::Border | ThemeToken::PlotBorder | ThemeToken::OverlayBorder => "#dee2e6",
            ThemeToken::GridLine => "#eceff1",
            ThemeToken::AxisText | ThemeToken::TextPrimary | ThemeToken::ScaleBar => "#1a1a2e",
            ThemeToken::TextSecondary | ThemeToken::TextMuted => "#666677",
            ThemeToken::ErrorText => "#c62828",
            ThemeToken::OverlayBackground => "#f7f1f1",
            ThemeToken::MarkerOutline => "#d0d0d0",
            ThemeToken::NavButton => "#f1f3f5",
            ThemeToken::NavButtonActive => "#1a1a2e",
            ThemeToken::NavButtonText => "#1a1a2e",
            ThemeToken::NavButtonTextActive => "#ffffff",
            _ => "#999999",
        }
    };
    hex.to_string()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cone_viewer_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::DrawRect {
                rect: Rect::new(10.0, 20.0, 100.0, 18.0),
                color: ThemeToken::Surface,
                border_color: Some(ThemeToken::Border),
                label: Some("panel".into()),
            },
            RenderCommand::DrawCircle {
                center: Point::new(5.0, 5.0),
                radius: 4.5,
                color: ThemeToken::ConeL,
                border_color: None,
            },
        ];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("panel"));
        assert!(svg.contains(r##"fill="#ff0000""##));
    }

    #[test]
    fn cone_colors_ignore_theme() {
        let light = resolve_color(ThemeToken::ConeM, false);
        let dark = resolve_color(ThemeToken::ConeM, true);
        assert_eq!(light, "#008000");
        assert_eq!(light, dark);
        assert_ne!(
            resolve_color(ThemeToken::Surface, false),
            resolve_color(ThemeToken::Surface, true)
        );
    }

    #[test]
    fn text_alignment_and_escaping() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "L/M <ratio> & more".into(),
            color: ThemeToken::TextPrimary,
            font_size: 12.0,
            align: TextAlign::Right,
            bold: true,
        }];
        let svg = render_svg(&commands, 100.0, 100.0, false);
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(r#"font-weight="600""#));
        assert!(svg.contains("L/M &lt;ratio&gt; &amp; more"));
    }

    #[test]
    fn clip_groups_are_balanced() {
        let commands = vec![
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
            RenderCommand::ClearClip,
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
        ];
        let svg = render_svg(&commands, 10.0, 10.0, false);
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
        assert!(svg.contains("clip2"));
    }
}
