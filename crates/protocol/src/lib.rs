pub mod commands;
pub mod mosaic;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use mosaic::{
    EccentricityRange, Eye, Metadata, Patient, PlotData, PlotDataError, RangesResponse,
    UNCLASSIFIED,
};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect, Viewport};
