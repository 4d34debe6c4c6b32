use cone_viewer_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport};

const FONT_SIZE: f64 = 14.0;

/// A bordered card with one centered message, used for loading, error and
/// empty states.
pub fn render_placeholder(viewport: &Viewport, message: &str, is_error: bool) -> Vec<RenderCommand> {
    let bounds = viewport.bounds();
    let center = bounds.center();
    vec![
        RenderCommand::BeginGroup {
            id: SharedStr::from("placeholder"),
            label: None,
        },
        RenderCommand::DrawRect {
            rect: bounds,
            color: ThemeToken::Surface,
            border_color: Some(ThemeToken::Border),
            label: None,
        },
        RenderCommand::text(
            Point::new(center.x, center.y + FONT_SIZE / 3.0),
            message,
            if is_error {
                ThemeToken::ErrorText
            } else {
                ThemeToken::TextSecondary
            },
            FONT_SIZE,
            TextAlign::Center,
        ),
        RenderCommand::EndGroup,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_placeholder_uses_error_color() {
        let cmds = render_placeholder(&Viewport::new(200.0, 100.0), "Error loading 0-5°: HTTP 500", true);
        let text = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawText { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        });
        assert_eq!(text, Some(("Error loading 0-5°: HTTP 500", ThemeToken::ErrorText)));
    }
}
