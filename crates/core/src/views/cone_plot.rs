use cone_viewer_protocol::{
    Metadata, PlotData, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use super::layout::{PlotFrame, format_tick};
use super::overlay::{SummaryPanel, render_summary_panel};
use super::placeholder::render_placeholder;
use crate::model::{axis_ranges, group_by_cone_type};

const MARGIN_LEFT: f64 = 50.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TITLE_FONT_SIZE: f64 = 16.0;
const TICK_FONT_SIZE: f64 = 10.0;
const AXIS_TITLE_FONT_SIZE: f64 = 12.0;

pub const NO_DATA_TEXT: &str = "No data to display";

/// How a scatter is dressed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub title: String,
    /// Tick labels and axis titles. Sub-plots hide them.
    pub axis_labels: bool,
    pub marker_radius: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            title: "Cone Positions".to_string(),
            axis_labels: true,
            marker_radius: 4.5,
        }
    }
}

/// Pixel rectangle the scatter occupies inside `viewport`.
pub fn plot_area(viewport: &Viewport) -> Rect {
    Rect::new(
        viewport.x + MARGIN_LEFT,
        viewport.y + MARGIN_TOP,
        (viewport.width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0),
        (viewport.height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0),
    )
}

/// Render the scatter, one group per cone type in first-appearance order.
///
/// Returns the frame used so callers can place overlays in data units.
/// `None` when there is nothing to plot or no room to plot it.
pub fn render_scatter(
    data: &PlotData,
    viewport: &Viewport,
    style: &PlotStyle,
) -> Option<(Vec<RenderCommand>, PlotFrame)> {
    if data.is_empty() {
        return None;
    }
    let (xr, yr) = axis_ranges(data)?;
    let frame = PlotFrame::fit(plot_area(viewport), xr, yr)?;
    let area = frame.area();
    let series = group_by_cone_type(data);

    let mut commands = Vec::with_capacity(data.len() + 64);

    commands.push(RenderCommand::DrawRect {
        rect: viewport.bounds(),
        color: ThemeToken::Surface,
        border_color: Some(ThemeToken::Border),
        label: None,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(viewport.x + viewport.width / 2.0, viewport.y + MARGIN_TOP * 0.65),
        text: SharedStr::from(style.title.as_str()),
        color: ThemeToken::TextPrimary,
        font_size: TITLE_FONT_SIZE,
        align: TextAlign::Center,
        bold: true,
    });
    commands.push(RenderCommand::DrawRect {
        rect: area,
        color: ThemeToken::PlotBackground,
        border_color: Some(ThemeToken::PlotBorder),
        label: None,
    });

    // Grid
    for x in frame.x_ticks() {
        let p = frame.to_screen(x, 0.0);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(p.x, area.y),
            to: Point::new(p.x, area.bottom()),
            color: ThemeToken::GridLine,
            width: 0.5,
        });
        if style.axis_labels {
            commands.push(RenderCommand::text(
                Point::new(p.x, area.bottom() + TICK_FONT_SIZE + 4.0),
                format_tick(x),
                ThemeToken::AxisText,
                TICK_FONT_SIZE,
                TextAlign::Center,
            ));
        }
    }
    for y in frame.y_ticks() {
        let p = frame.to_screen(0.0, y);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(area.x, p.y),
            to: Point::new(area.right(), p.y),
            color: ThemeToken::GridLine,
            width: 0.5,
        });
        if style.axis_labels {
            commands.push(RenderCommand::text(
                Point::new(area.x - 6.0, p.y + TICK_FONT_SIZE / 3.0),
                format_tick(y),
                ThemeToken::AxisText,
                TICK_FONT_SIZE,
                TextAlign::Right,
            ));
        }
    }
    if style.axis_labels {
        commands.push(RenderCommand::text(
            Point::new(area.center().x, area.bottom() + MARGIN_BOTTOM - 12.0),
            "X (microns)",
            ThemeToken::AxisText,
            AXIS_TITLE_FONT_SIZE,
            TextAlign::Center,
        ));
        commands.push(RenderCommand::text(
            Point::new(viewport.x + 4.0, area.y - 8.0),
            "Y (microns)",
            ThemeToken::AxisText,
            AXIS_TITLE_FONT_SIZE,
            TextAlign::Left,
        ));
    }

    commands.push(RenderCommand::SetClip { rect: area });
    for s in &series {
        commands.push(RenderCommand::BeginGroup {
            id: SharedStr::from(format!("series-{}", s.cone_type)),
            label: Some(s.cone_type.clone()),
        });
        for (x, y) in s.points(data) {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            commands.push(RenderCommand::DrawCircle {
                center: frame.to_screen(x, y),
                radius: style.marker_radius,
                color: s.color,
                border_color: Some(ThemeToken::MarkerOutline),
            });
        }
        commands.push(RenderCommand::EndGroup);
    }
    commands.push(RenderCommand::ClearClip);

    Some((commands, frame))
}

/// The single-dataset plot with its summary overlay.
///
/// Zero points renders only the "no data" placeholder. The overlay is
/// drawn only when metadata is available.
pub fn render_cone_plot(
    data: &PlotData,
    metadata: Option<&Metadata>,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    let Some((mut commands, frame)) = render_scatter(data, viewport, &PlotStyle::default()) else {
        return render_placeholder(viewport, NO_DATA_TEXT, false);
    };
    if let Some(metadata) = metadata {
        let panel = SummaryPanel::for_cone_plot(data, metadata);
        commands.extend(render_summary_panel(&panel, frame.area()));
    }
    commands
}
