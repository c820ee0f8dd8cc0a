//! Paint model shared by the raster backend and the recorder.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - blend modes and color filters
//! - the per-draw `Paint` descriptor
//!
//! Geometry types remain in `coords`.

mod blend;
mod color;
mod filter;
#[allow(clippy::module_inception)]
mod paint;

pub use blend::{BlendMode, UnknownBlendMode};
pub use color::Color;
pub use filter::ColorFilter;
pub use paint::{Paint, Style};
