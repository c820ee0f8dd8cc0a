//! CPU raster backend.
//!
//! `Surface` owns a `Pixmap`; `RasterCanvas` implements [`Canvas`](crate::Canvas)
//! on top of it with aliased point sampling, a clip stack and offscreen
//! layers.

mod canvas;
mod error;
mod pixmap;
mod region;
mod surface;

pub use canvas::RasterCanvas;
pub use error::RasterError;
pub use pixmap::{Pixmap, PremulRgba8};
pub use surface::{Surface, SurfaceConfig};

/// Largest accepted surface edge, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;
