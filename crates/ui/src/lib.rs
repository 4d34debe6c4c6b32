//! Desktop viewer: egui panels around the core render pipeline.

mod app;
mod panels;
mod renderer;
mod theme;

pub use app::ConeViewerApp;
