//! Easel engine crate.
//!
//! This crate owns the drawing model (geometry, paint), the CPU raster
//! backend, and the picture recorder used to export draws as SKP JSON.

pub mod coords;
pub mod paint;
pub mod raster;
pub mod scene;

pub mod draws;
pub mod logging;

mod canvas;

pub use canvas::{Canvas, ClipOp};
