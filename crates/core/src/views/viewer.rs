use cone_viewer_protocol::{RenderCommand, Viewport};

use super::cone_plot::render_cone_plot;
use super::placeholder::render_placeholder;
use super::sub_plots::render_sub_plots;
use crate::state::{FilterMode, SingleView, SubPlotsState, ViewerState};

pub const SELECT_PROMPT: &str = "Select a subject, meridian and cone types";

/// The single-dataset composition, including its loading and error states.
pub fn render_single_view(view: &SingleView, viewport: &Viewport) -> Vec<RenderCommand> {
    if view.loading {
        return render_placeholder(viewport, "Loading cone data...", false);
    }
    if let Some(error) = &view.error {
        return render_placeholder(viewport, &format!("Error loading cone data: {error}"), true);
    }
    match &view.data {
        Some(data) => render_cone_plot(data, view.metadata.as_ref(), viewport),
        None => render_placeholder(viewport, SELECT_PROMPT, false),
    }
}

/// Whatever the root is currently showing.
pub fn render_viewer(
    viewer: &ViewerState,
    sub_plots: &SubPlotsState,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    match viewer.mode() {
        FilterMode::Single => render_single_view(viewer.single(), viewport),
        FilterMode::MultiRange => render_sub_plots(sub_plots, viewport),
    }
}
