use crate::canvas::{Canvas, ClipOp};
use crate::coords::{Matrix, Shape};
use crate::paint::Paint;

use super::{DrawCmd, Picture};

/// A [`Canvas`] that records calls instead of drawing them.
///
/// Only the matrix is tracked, so `total_matrix` answers like a real canvas.
/// Clips and layers are recorded as-is.
#[derive(Debug, Default)]
pub struct PictureRecorder {
    commands: Vec<DrawCmd>,
    saved: Vec<Matrix>,
    matrix: Matrix,
}

impl PictureRecorder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Closes any open saves and returns the picture.
    pub fn finish(mut self) -> Picture {
        if !self.saved.is_empty() {
            log::debug!("closing {} open saves at end of recording", self.saved.len());
            self.restore_to_count(1);
        }
        Picture::new(self.commands)
    }
}

impl Canvas for PictureRecorder {
    fn save(&mut self) -> usize {
        let count = self.save_count();
        self.saved.push(self.matrix);
        self.commands.push(DrawCmd::Save);
        count
    }

    fn save_layer(&mut self, paint: Option<&Paint>) -> usize {
        let count = self.save_count();
        self.saved.push(self.matrix);
        self.commands.push(DrawCmd::SaveLayer(paint.cloned()));
        count
    }

    fn restore(&mut self) {
        let Some(matrix) = self.saved.pop() else {
            log::warn!("restore called without a matching save; ignored");
            return;
        };
        self.matrix = matrix;
        self.commands.push(DrawCmd::Restore);
    }

    fn save_count(&self) -> usize {
        self.saved.len() + 1
    }

    fn concat(&mut self, matrix: &Matrix) {
        self.matrix = self.matrix.concat(matrix);
        self.commands.push(DrawCmd::Concat(*matrix));
    }

    fn set_matrix(&mut self, matrix: &Matrix) {
        self.matrix = *matrix;
        self.commands.push(DrawCmd::SetMatrix(*matrix));
    }

    fn total_matrix(&self) -> Matrix {
        self.matrix
    }

    fn clip_shape(&mut self, shape: &Shape, op: ClipOp) {
        self.commands.push(DrawCmd::Clip { shape: shape.clone(), op });
    }

    fn draw_paint(&mut self, paint: &Paint) {
        self.commands.push(DrawCmd::DrawPaint(paint.clone()));
    }

    fn draw_shape(&mut self, shape: &Shape, paint: &Paint) {
        self.commands.push(DrawCmd::Draw { shape: shape.clone(), paint: paint.clone() });
    }
}
