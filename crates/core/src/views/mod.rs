//! View transforms: state and data in, `Vec<RenderCommand>` out.

pub mod cone_plot;
pub mod layout;
pub mod overlay;
pub mod placeholder;
pub mod range_nav;
pub mod scale_bar;
pub mod sub_plots;
pub mod viewer;

pub use cone_plot::{NO_DATA_TEXT, PlotStyle, plot_area, render_cone_plot, render_scatter};
pub use layout::PlotFrame;
pub use overlay::{PanelRow, PanelSection, SummaryPanel, render_summary_panel};
pub use placeholder::render_placeholder;
pub use range_nav::{NavButton, NavTarget, hit_test, layout_range_nav, render_range_nav};
pub use scale_bar::{SCALE_BAR_MICRONS, render_scale_bar};
pub use sub_plots::{SubPlotsLayout, layout_sub_plots, render_sub_plot, render_sub_plots};
pub use viewer::{SELECT_PROMPT, render_single_view, render_viewer};
