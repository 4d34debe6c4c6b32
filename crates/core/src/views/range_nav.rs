use cone_viewer_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

const BUTTON_HEIGHT: f64 = 26.0;
const BUTTON_GAP: f64 = 6.0;
const BUTTON_PADDING: f64 = 10.0;
const CHAR_WIDTH: f64 = 7.0;
const FONT_SIZE: f64 = 12.0;

/// What clicking a navigation button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Prev,
    Next,
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavButton {
    pub rect: Rect,
    pub target: NavTarget,
    pub label: SharedStr,
}

fn button_width(label: &str) -> f64 {
    label.chars().count() as f64 * CHAR_WIDTH + 2.0 * BUTTON_PADDING
}

/// Lay out `‹`, one button per range label, and `›`, wrapping onto new
/// rows when `area` is too narrow.
pub fn layout_range_nav(labels: &[SharedStr], area: Rect) -> Vec<NavButton> {
    if labels.is_empty() {
        return Vec::new();
    }
    let items = std::iter::once((NavTarget::Prev, SharedStr::from("‹")))
        .chain(
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| (NavTarget::Index(i), l.clone())),
        )
        .chain(std::iter::once((NavTarget::Next, SharedStr::from("›"))));

    let mut out = Vec::with_capacity(labels.len() + 2);
    let (mut x, mut y) = (area.x, area.y);
    for (target, label) in items {
        let w = button_width(&label);
        if x > area.x && x + w > area.right() {
            x = area.x;
            y += BUTTON_HEIGHT + BUTTON_GAP;
        }
        out.push(NavButton {
            rect: Rect::new(x, y, w, BUTTON_HEIGHT),
            target,
            label,
        });
        x += w + BUTTON_GAP;
    }
    out
}

/// Total height the laid-out buttons occupy.
pub fn nav_height(buttons: &[NavButton]) -> f64 {
    let top = buttons.iter().map(|b| b.rect.y).fold(f64::INFINITY, f64::min);
    let bottom = buttons
        .iter()
        .map(|b| b.rect.bottom())
        .fold(f64::NEG_INFINITY, f64::max);
    if top.is_finite() { bottom - top } else { 0.0 }
}

pub fn hit_test(buttons: &[NavButton], point: Point) -> Option<NavTarget> {
    buttons
        .iter()
        .find(|b| {
            point.x >= b.rect.x
                && point.x <= b.rect.right()
                && point.y >= b.rect.y
                && point.y <= b.rect.bottom()
        })
        .map(|b| b.target)
}

pub fn render_range_nav(buttons: &[NavButton], selected: usize) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(buttons.len() * 2 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("range-nav"),
        label: None,
    });
    for b in buttons {
        let active = b.target == NavTarget::Index(selected);
        commands.push(RenderCommand::DrawRect {
            rect: b.rect,
            color: if active {
                ThemeToken::NavButtonActive
            } else {
                ThemeToken::NavButton
            },
            border_color: Some(ThemeToken::Border),
            label: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(b.rect.center().x, b.rect.center().y + FONT_SIZE / 3.0),
            text: b.label.clone(),
            color: if active {
                ThemeToken::NavButtonTextActive
            } else {
                ThemeToken::NavButtonText
            },
            font_size: FONT_SIZE,
            align: TextAlign::Center,
            bold: active,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<SharedStr> {
        vec!["0-5°".into(), "5-10°".into(), "10-15°".into()]
    }

    #[test]
    fn prev_and_next_wrap_the_ranges() {
        let buttons = layout_range_nav(&labels(), Rect::new(0.0, 0.0, 800.0, 100.0));
        let targets: Vec<NavTarget> = buttons.iter().map(|b| b.target).collect();
        assert_eq!(
            targets,
            [
                NavTarget::Prev,
                NavTarget::Index(0),
                NavTarget::Index(1),
                NavTarget::Index(2),
                NavTarget::Next
            ]
        );
        assert_eq!(nav_height(&buttons), BUTTON_HEIGHT);
    }

    #[test]
    fn narrow_area_wraps_rows() {
        let buttons = layout_range_nav(&labels(), Rect::new(0.0, 0.0, 120.0, 100.0));
        assert!(nav_height(&buttons) > BUTTON_HEIGHT);
    }

    #[test]
    fn hit_test_finds_button() {
        let buttons = layout_range_nav(&labels(), Rect::new(0.0, 0.0, 800.0, 100.0));
        let second = buttons[2].rect.center();
        assert_eq!(hit_test(&buttons, second), Some(NavTarget::Index(1)));
        assert_eq!(hit_test(&buttons, Point::new(-5.0, -5.0)), None);
    }

    #[test]
    fn selected_button_is_highlighted() {
        let buttons = layout_range_nav(&labels(), Rect::new(0.0, 0.0, 800.0, 100.0));
        let cmds = render_range_nav(&buttons, 1);
        let active = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawRect { color: ThemeToken::NavButtonActive, .. }))
            .count();
        assert_eq!(active, 1);
    }
}
