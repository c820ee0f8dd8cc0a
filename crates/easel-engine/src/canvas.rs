use crate::coords::{Matrix, Path, RRect, Rect, Shape};
use crate::paint::{BlendMode, Color, Paint};

/// How a clip shape combines with the current clip.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ClipOp {
    #[default]
    Intersect,
    Difference,
}

impl ClipOp {
    /// Name used in SKP JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ClipOp::Intersect => "intersect",
            ClipOp::Difference => "difference",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "intersect" => Some(ClipOp::Intersect),
            "difference" => Some(ClipOp::Difference),
            _ => None,
        }
    }
}

/// Drawing contract shared by the raster canvas and the picture recorder.
///
/// State model:
/// - a stack of (matrix, clip) entries; `save` pushes, `restore` pops
/// - `save_layer` additionally starts an offscreen layer, composited with the
///   layer paint when the matching `restore` runs
/// - geometry is given in local space and mapped through the current matrix
///
/// Draw calls never fail. Degenerate geometry draws nothing.
pub trait Canvas {
    /// Pushes the matrix and clip. Returns the save count before the push.
    fn save(&mut self) -> usize;

    /// Like [`save`](Self::save), and redirects drawing to a new layer.
    /// `None` composites the layer with a default paint.
    fn save_layer(&mut self, paint: Option<&Paint>) -> usize;

    /// Pops the most recent save. Ignored when nothing is saved.
    fn restore(&mut self);

    /// Number of saves in effect, starting at 1.
    fn save_count(&self) -> usize;

    /// Pre-multiplies the current matrix by `matrix`.
    fn concat(&mut self, matrix: &Matrix);

    fn set_matrix(&mut self, matrix: &Matrix);

    fn total_matrix(&self) -> Matrix;

    fn clip_shape(&mut self, shape: &Shape, op: ClipOp);

    /// Fills the whole clip with `paint`.
    fn draw_paint(&mut self, paint: &Paint);

    fn draw_shape(&mut self, shape: &Shape, paint: &Paint);

    // ── provided ──────────────────────────────────────────────────────────

    fn restore_to_count(&mut self, count: usize) {
        while self.save_count() > count.max(1) {
            self.restore();
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.concat(&Matrix::translate(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.concat(&Matrix::scale(sx, sy));
    }

    fn reset_matrix(&mut self) {
        self.set_matrix(&Matrix::identity());
    }

    fn clip_rect(&mut self, rect: Rect, op: ClipOp) {
        self.clip_shape(&Shape::Rect(rect), op);
    }

    fn clip_rrect(&mut self, rrect: RRect, op: ClipOp) {
        self.clip_shape(&Shape::RRect(rrect), op);
    }

    fn clip_path(&mut self, path: &Path, op: ClipOp) {
        self.clip_shape(&Shape::Path(path.clone()), op);
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.draw_shape(&Shape::Rect(rect), paint);
    }

    fn draw_oval(&mut self, oval: Rect, paint: &Paint) {
        self.draw_shape(&Shape::Oval(oval), paint);
    }

    fn draw_rrect(&mut self, rrect: RRect, paint: &Paint) {
        self.draw_shape(&Shape::RRect(rrect), paint);
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        self.draw_shape(&Shape::Path(path.clone()), paint);
    }

    /// Replaces every pixel inside the clip with `color`.
    fn clear(&mut self, color: Color) {
        let mut paint = Paint::solid(color);
        paint.set_blend_mode(BlendMode::Src);
        self.draw_paint(&paint);
    }
}
