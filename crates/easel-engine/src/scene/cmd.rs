use crate::canvas::ClipOp;
use crate::coords::{Matrix, Shape};
use crate::paint::Paint;

/// One recorded canvas call.
///
/// Provided canvas helpers (`translate`, `clip_rect`, `draw_oval`, ...) are
/// recorded in their reduced form, so the stream only holds the operations
/// every canvas must implement.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    SaveLayer(Option<Paint>),
    Restore,
    Concat(Matrix),
    SetMatrix(Matrix),
    Clip { shape: Shape, op: ClipOp },
    DrawPaint(Paint),
    Draw { shape: Shape, paint: Paint },
}

impl DrawCmd {
    /// SKP command name (`"DrawRect"`, `"ClipPath"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            DrawCmd::Save => "Save",
            DrawCmd::SaveLayer(_) => "SaveLayer",
            DrawCmd::Restore => "Restore",
            DrawCmd::Concat(_) => "Concat44",
            DrawCmd::SetMatrix(_) => "SetM44",
            DrawCmd::Clip { shape, .. } => match shape {
                Shape::Rect(_) => "ClipRect",
                Shape::Oval(_) | Shape::RRect(_) => "ClipRRect",
                Shape::Path(_) => "ClipPath",
            },
            DrawCmd::DrawPaint(_) => "DrawPaint",
            DrawCmd::Draw { shape, .. } => match shape {
                Shape::Rect(_) => "DrawRect",
                Shape::Oval(_) => "DrawOval",
                Shape::RRect(_) => "DrawRRect",
                Shape::Path(_) => "DrawPath",
            },
        }
    }
}
