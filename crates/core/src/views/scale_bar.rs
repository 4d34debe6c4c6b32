use cone_viewer_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use super::layout::PlotFrame;

/// Physical length the bar represents.
pub const SCALE_BAR_MICRONS: f64 = 100.0;

const BAR_THICKNESS: f64 = 3.0;
const BOTTOM_OFFSET: f64 = 20.0;
const PADDING: f64 = 8.0;
const FONT_SIZE: f64 = 11.0;

/// A 100 µm bar centered along the bottom of the plot, drawn to the
/// frame's scale.
pub fn render_scale_bar(frame: &PlotFrame) -> Vec<RenderCommand> {
    let area = frame.area();
    let length = SCALE_BAR_MICRONS * frame.scale();
    if !length.is_finite() || length <= 0.0 {
        return Vec::new();
    }
    let label = format!("{SCALE_BAR_MICRONS:.0} μm");
    let box_w = length + 2.0 * PADDING;
    let box_h = BAR_THICKNESS + FONT_SIZE + 3.0 * PADDING;
    let cx = area.center().x;
    let top = area.bottom() - BOTTOM_OFFSET - box_h;
    let bar_y = top + PADDING;

    vec![
        RenderCommand::BeginGroup {
            id: SharedStr::from("scale-bar"),
            label: Some(SharedStr::from(label.as_str())),
        },
        RenderCommand::DrawRect {
            rect: Rect::new(cx - box_w / 2.0, top, box_w, box_h),
            color: ThemeToken::OverlayBackground,
            border_color: Some(ThemeToken::OverlayBorder),
            label: None,
        },
        RenderCommand::DrawRect {
            rect: Rect::new(cx - length / 2.0, bar_y, length, BAR_THICKNESS),
            color: ThemeToken::ScaleBar,
            border_color: None,
            label: None,
        },
        RenderCommand::DrawText {
            position: Point::new(cx, bar_y + BAR_THICKNESS + PADDING + FONT_SIZE * 0.8),
            text: SharedStr::from(label),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
            bold: true,
        },
        RenderCommand::EndGroup,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AxisRange;

    #[test]
    fn bar_length_follows_scale() {
        let Some(frame) = PlotFrame::fit(
            Rect::new(0.0, 0.0, 500.0, 500.0),
            AxisRange { min: 0.0, max: 250.0 },
            AxisRange { min: 0.0, max: 250.0 },
        ) else {
            unreachable!("valid frame");
        };
        let cmds = render_scale_bar(&frame);
        let bar = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                color: ThemeToken::ScaleBar,
                ..
            } => Some(*rect),
            _ => None,
        });
        assert_eq!(bar.map(|r| r.w), Some(200.0));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawText { text, .. } if text == "100 μm"
        )));
    }
}
