//! Picture recording.
//!
//! Responsibilities:
//! - capture canvas calls as a flat [`DrawCmd`] stream
//! - replay a recorded [`Picture`] onto any [`Canvas`](crate::Canvas)
//! - export pictures in the SKP JSON command format

mod cmd;
mod json;
mod picture;
mod recorder;

pub use cmd::DrawCmd;
pub use json::{matrix_json, paint_json, path_json, rrect_json};
pub use picture::Picture;
pub use recorder::PictureRecorder;
