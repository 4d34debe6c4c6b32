//! Pure, synchronous half of cone-viewer.
//!
//! Nothing here performs I/O: the client crate fetches data and feeds it
//! into the [`state`] machines, and front-ends turn [`views`] output into
//! pixels (or into SVG via [`svg`]).

pub mod export;
pub mod model;
pub mod state;
pub mod svg;
pub mod views;
