//! Coordinate and geometry types shared by the canvas backends.
//!
//! Canonical space:
//! - canvas units, one unit per device pixel under the identity matrix
//! - origin top-left
//! - +X right, +Y down
//!
//! Pixel `(x, y)` is sampled at its center `(x + 0.5, y + 0.5)`.

mod corner_radii;
mod matrix;
mod path;
mod rect;
mod shape;
mod vec2;

pub use corner_radii::{CornerRadii, RRect};
pub use matrix::Matrix;
pub use path::{nearest_on_segment, Contour, FillType, FlatPath, Path, Verb};
pub use rect::Rect;
pub use shape::Shape;
pub use vec2::Vec2;
