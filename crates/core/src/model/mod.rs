pub mod cone_type;
pub mod display_id;
pub mod filters;
pub mod range_selection;
pub mod series;

pub use cone_type::{CONE_TYPES, ConeType, MERIDIANS, cone_color, cone_token};
pub use display_id::DisplayId;
pub use filters::{FilterError, Filters};
pub use range_selection::RangeSelection;
pub use series::{AXIS_MARGIN, AxisRange, ConeSeries, axis_ranges, group_by_cone_type};
