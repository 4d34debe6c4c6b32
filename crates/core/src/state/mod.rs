//! Viewer state machines.
//!
//! Each machine owns one component's state. Mutators return what the caller
//! should fetch next (tagged with a [`Generation`]) and completion methods
//! take that generation back, dropping results that belong to a selection
//! the user has since moved away from.

pub mod filter_bar;
pub mod generation;
pub mod range_selector;
pub mod sub_plots;
pub mod viewer;

pub use filter_bar::{FilterBarState, FilterMode, PatientList};
pub use generation::{Generation, GenerationCounter};
pub use range_selector::{RangeFetch, RangeSelectorState};
pub use sub_plots::{RangeJob, SubPlotData, SubPlotQuery, SubPlotsPhase, SubPlotsState};
pub use viewer::{DownloadRequest, SingleView, ViewMode, ViewerAction, ViewerState};
