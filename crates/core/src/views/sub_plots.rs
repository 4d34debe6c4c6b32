use cone_viewer_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport};

use super::cone_plot::{PlotStyle, render_scatter};
use super::overlay::{SummaryPanel, render_summary_panel};
use super::placeholder::render_placeholder;
use super::range_nav::{NavButton, layout_range_nav, nav_height, render_range_nav};
use super::scale_bar::render_scale_bar;
use crate::state::{SubPlotData, SubPlotsState};

const HEADER_HEIGHT: f64 = 28.0;
const HEADER_FONT_SIZE: f64 = 13.0;
const SECTION_GAP: f64 = 10.0;
const MARKER_RADIUS: f64 = 4.0;

/// Where each part of the sub-plots page goes.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPlotsLayout {
    pub header: Rect,
    pub nav: Vec<NavButton>,
    pub plot: Viewport,
}

/// Header line, navigation row, and the selected sub-plot below them.
pub fn layout_sub_plots(state: &SubPlotsState, viewport: &Viewport) -> SubPlotsLayout {
    let header = Rect::new(viewport.x, viewport.y, viewport.width, HEADER_HEIGHT);
    let labels: Vec<SharedStr> = state.plots().iter().map(|p| p.range.label.clone()).collect();
    let nav_area = Rect::new(
        viewport.x,
        header.bottom() + SECTION_GAP,
        viewport.width,
        viewport.height,
    );
    let nav = layout_range_nav(&labels, nav_area);
    let top = nav_area.y + nav_height(&nav) + SECTION_GAP;
    let plot = Viewport {
        x: viewport.x,
        y: top,
        width: viewport.width,
        height: (viewport.y + viewport.height - top).max(0.0),
        dpr: viewport.dpr,
    };
    SubPlotsLayout { header, nav, plot }
}

/// One range's plot, or its loading, error or empty placeholder.
pub fn render_sub_plot(plot: &SubPlotData, viewport: &Viewport) -> Vec<RenderCommand> {
    let label = &plot.range.label;
    if plot.loading {
        return render_placeholder(viewport, &format!("Loading {label}..."), false);
    }
    if let Some(error) = &plot.error {
        return render_placeholder(viewport, &format!("Error loading {label}: {error}"), true);
    }
    let Some(data) = plot.data.as_ref().filter(|d| !d.is_empty()) else {
        return render_placeholder(viewport, &format!("No data for {label}"), false);
    };
    let style = PlotStyle {
        title: format!("Cone Positions - {label}"),
        axis_labels: false,
        marker_radius: MARKER_RADIUS,
    };
    let Some((mut commands, frame)) = render_scatter(data, viewport, &style) else {
        return render_placeholder(viewport, &format!("No data for {label}"), false);
    };
    commands.extend(render_scale_bar(&frame));
    if let Some(metadata) = &plot.metadata {
        let panel = SummaryPanel::for_sub_plot(&plot.range, data, metadata);
        commands.extend(render_summary_panel(&panel, frame.area()));
    }
    commands
}

/// The whole multi-range page.
pub fn render_sub_plots(state: &SubPlotsState, viewport: &Viewport) -> Vec<RenderCommand> {
    if let Some(status) = state.status_text() {
        return render_placeholder(viewport, status, false);
    }
    let layout = layout_sub_plots(state, viewport);
    let baseline = layout.header.y + HEADER_HEIGHT / 2.0 + HEADER_FONT_SIZE / 3.0;

    let mut commands = vec![
        RenderCommand::text(
            Point::new(layout.header.x, baseline),
            state.count_text(),
            ThemeToken::TextSecondary,
            HEADER_FONT_SIZE,
            TextAlign::Left,
        ),
        RenderCommand::DrawText {
            position: Point::new(layout.header.right(), baseline),
            text: SharedStr::from(state.viewing_text()),
            color: ThemeToken::TextPrimary,
            font_size: HEADER_FONT_SIZE,
            align: TextAlign::Right,
            bold: true,
        },
    ];
    commands.extend(render_range_nav(&layout.nav, state.selected_index()));
    if let Some(plot) = state.selected_plot() {
        commands.extend(render_sub_plot(plot, &layout.plot));
    }
    commands
}
