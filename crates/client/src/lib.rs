//! Backend access for cone-viewer.
//!
//! [`HttpConeApi`] talks to the cone-mosaic service; [`controller`] drives
//! the core state machines from its results and [`ViewerSession`] wires the
//! two together on a tokio runtime for the front-ends.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod session;

pub use api::{ConeApi, CsvExport, HttpConeApi};
pub use config::{ClientConfig, ExportBackend};
pub use error::{ApiError, ConfigError};
pub use session::ViewerSession;
