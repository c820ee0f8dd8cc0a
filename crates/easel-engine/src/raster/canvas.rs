use crate::canvas::{Canvas, ClipOp};
use crate::coords::{Matrix, Rect, Shape, Vec2};
use crate::paint::{BlendMode, Color, Paint, Style};

use super::region::{painted_bounds, Region};
use super::{Pixmap, PremulRgba8};

/// One clip operation, kept in the space it was recorded in.
#[derive(Debug, Clone)]
struct ClipElement {
    region: Region,
    /// Device → local mapping current when the clip was applied.
    inverse: Matrix,
    op: ClipOp,
    /// Device bounds for intersect clips of bounded shapes.
    device_bounds: Option<Rect>,
}

impl ClipElement {
    #[inline]
    fn allows(&self, p: Vec2) -> bool {
        let inside = self
            .inverse
            .try_map_point(p)
            .is_some_and(|local| self.region.contains(local));
        match self.op {
            ClipOp::Intersect => inside,
            ClipOp::Difference => !inside,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    matrix: Matrix,
    clips: Vec<ClipElement>,
    /// Set when this save level was opened by `save_layer`.
    layer_paint: Option<Paint>,
    /// The clip of this level matches nothing; draws are skipped.
    clip_empty: bool,
}

/// Half-open pixel rectangle `[x0, x1) × [y0, y1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelBounds {
    fn full(pm: &Pixmap) -> Self {
        Self { x0: 0, y0: 0, x1: pm.width(), y1: pm.height() }
    }

    fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Pixels whose centers may fall inside `r`.
    fn clamp_rect(self, r: Rect) -> Self {
        let r = r.normalized();
        let lo = |v: f32, min: u32, max: u32| (v.floor().max(min as f32) as u32).min(max);
        let hi = |v: f32, min: u32, max: u32| (v.ceil().max(min as f32) as u32).min(max);
        Self {
            x0: lo(r.left(), self.x0, self.x1),
            y0: lo(r.top(), self.y0, self.y1),
            x1: hi(r.right(), self.x0, self.x1),
            y1: hi(r.bottom(), self.y0, self.y1),
        }
    }
}

/// CPU canvas drawing into a borrowed [`Pixmap`].
///
/// Rasterization is aliased: a pixel is covered when its center, mapped into
/// local space, is inside the geometry and passes every clip element.
pub struct RasterCanvas<'a> {
    base: &'a mut Pixmap,
    /// Offscreen targets opened by `save_layer`, innermost last.
    layers: Vec<Pixmap>,
    saved: Vec<State>,
    state: State,
}

impl<'a> RasterCanvas<'a> {
    pub fn new(base: &'a mut Pixmap) -> Self {
        Self { base, layers: Vec::new(), saved: Vec::new(), state: State::default() }
    }

    fn clip_bounds(&self) -> PixelBounds {
        let mut bounds = PixelBounds::full(self.base);
        for clip in &self.state.clips {
            if let Some(b) = clip.device_bounds {
                bounds = bounds.clamp_rect(b);
            }
        }
        bounds
    }

    /// Blends `src` into every pixel of `bounds` that `covered` accepts and
    /// the current clip allows.
    fn paint_pixels(&mut self, bounds: PixelBounds, src: Color, mode: BlendMode, covered: impl Fn(Vec2) -> bool) {
        if bounds.is_empty() || self.state.clip_empty {
            return;
        }
        let clips = &self.state.clips;
        let target = match self.layers.last_mut() {
            Some(layer) => layer,
            None => &mut *self.base,
        };
        let width = target.width() as usize;
        let pixels = target.pixels_mut();

        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !clips.iter().all(|c| c.allows(p)) || !covered(p) {
                    continue;
                }
                let px = &mut pixels[y as usize * width + x as usize];
                *px = PremulRgba8::from_color(mode.blend(src, px.to_color()));
            }
        }
    }

    /// Zero-width strokes are one device pixel wide under any matrix.
    fn draw_hairline(&mut self, shape: &Shape, paint: &Paint) {
        let Some((region, device)) = Region::hairline(shape, &self.state.matrix) else {
            log::debug!("hairline skipped: outline is empty or does not map to device space");
            return;
        };
        let bounds = self.clip_bounds().clamp_rect(device);
        self.paint_pixels(bounds, paint.source_color(), paint.blend_mode(), |p| region.contains(p));
    }

    /// Composites a finished offscreen layer onto the current target.
    fn composite_layer(&mut self, layer: Pixmap, paint: &Paint) {
        if self.state.clip_empty {
            return;
        }
        let bounds = self.clip_bounds();
        let alpha = paint.color().a;
        let filter = paint.color_filter();
        let mode = paint.blend_mode();

        let clips = &self.state.clips;
        let target = match self.layers.last_mut() {
            Some(parent) => parent,
            None => &mut *self.base,
        };
        let width = target.width() as usize;
        let dst = target.pixels_mut();
        let src = layer.pixels();

        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let i = y as usize * width + x as usize;
                if mode == BlendMode::SrcOver && src[i].a == 0 {
                    continue;
                }
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !clips.iter().all(|c| c.allows(p)) {
                    continue;
                }
                let s = filter.apply(src[i].to_color().scale_alpha(alpha));
                dst[i] = PremulRgba8::from_color(mode.blend(s, dst[i].to_color()));
            }
        }
    }
}

impl Drop for RasterCanvas<'_> {
    /// Flushes layers still open so their content reaches the pixmap.
    fn drop(&mut self) {
        if self.save_count() > 1 {
            log::debug!("canvas dropped with {} open saves", self.save_count() - 1);
            self.restore_to_count(1);
        }
    }
}

impl Canvas for RasterCanvas<'_> {
    fn save(&mut self) -> usize {
        let count = self.save_count();
        let mut next = self.state.clone();
        next.layer_paint = None;
        self.saved.push(std::mem::replace(&mut self.state, next));
        count
    }

    fn save_layer(&mut self, paint: Option<&Paint>) -> usize {
        let count = self.save();
        self.state.layer_paint = Some(paint.cloned().unwrap_or_default());
        self.layers.push(self.base.blank_like());
        count
    }

    fn restore(&mut self) {
        let Some(parent) = self.saved.pop() else {
            log::warn!("restore called without a matching save; ignored");
            return;
        };
        let closing = std::mem::replace(&mut self.state, parent);
        if let Some(paint) = closing.layer_paint {
            if let Some(layer) = self.layers.pop() {
                self.composite_layer(layer, &paint);
            }
        }
    }

    fn save_count(&self) -> usize {
        self.saved.len() + 1
    }

    fn concat(&mut self, matrix: &Matrix) {
        self.state.matrix = self.state.matrix.concat(matrix);
    }

    fn set_matrix(&mut self, matrix: &Matrix) {
        self.state.matrix = *matrix;
    }

    fn total_matrix(&self) -> Matrix {
        self.state.matrix
    }

    fn clip_shape(&mut self, shape: &Shape, op: ClipOp) {
        let Some(inverse) = self.state.matrix.invert() else {
            // A singular matrix collapses the clip shape to nothing.
            if op == ClipOp::Intersect {
                self.state.clip_empty = true;
            }
            return;
        };
        let device_bounds = match op {
            ClipOp::Intersect if !shape.is_inverse() => {
                match shape.bounds().and_then(|b| self.state.matrix.map_rect_bounds(b)) {
                    Some(b) => Some(b),
                    None => {
                        self.state.clip_empty = true;
                        return;
                    }
                }
            }
            _ => None,
        };
        if device_bounds.is_some_and(|b| self.clip_bounds().clamp_rect(b).is_empty()) {
            self.state.clip_empty = true;
        }
        self.state.clips.push(ClipElement { region: Region::fill(shape), inverse, op, device_bounds });
    }

    fn draw_paint(&mut self, paint: &Paint) {
        let bounds = self.clip_bounds();
        self.paint_pixels(bounds, paint.source_color(), paint.blend_mode(), |_| true);
    }

    fn draw_shape(&mut self, shape: &Shape, paint: &Paint) {
        if paint.style() == Style::Stroke && paint.stroke_width() <= 0.0 {
            self.draw_hairline(shape, paint);
            return;
        }
        let matrix = self.state.matrix;
        let Some(inverse) = matrix.invert() else {
            log::debug!("draw skipped: current matrix is not invertible");
            return;
        };

        let clip = self.clip_bounds();
        let bounds = match painted_bounds(shape, paint) {
            Some(local) => match matrix.map_rect_bounds(local) {
                Some(device) => clip.clamp_rect(device),
                None => clip,
            },
            None if shape.is_inverse() => clip,
            None => return,
        };

        let region = Region::painted(shape, paint);
        self.paint_pixels(bounds, paint.source_color(), paint.blend_mode(), |p| {
            inverse.try_map_point(p).is_some_and(|local| region.contains(local))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CornerRadii, Path, RRect};
    use crate::paint::ColorFilter;

    const RED: PremulRgba8 = PremulRgba8::new(255, 0, 0, 255);
    const BLUE: PremulRgba8 = PremulRgba8::new(0, 0, 255, 255);
    const WHITE: PremulRgba8 = PremulRgba8::new(255, 255, 255, 255);
    const CLEAR: PremulRgba8 = PremulRgba8::TRANSPARENT;

    fn pixmap() -> Pixmap {
        Pixmap::new(64, 64).unwrap()
    }

    fn px(pm: &Pixmap, x: u32, y: u32) -> PremulRgba8 {
        pm.pixel(x, y).unwrap()
    }

    // ── fills ─────────────────────────────────────────────────────────────

    #[test]
    fn rect_fill_covers_pixel_centers_only() {
        let mut pm = pixmap();
        RasterCanvas::new(&mut pm).draw_rect(Rect::from_ltrb(10.0, 10.0, 20.0, 20.0), &Paint::solid(Color::RED));
        assert_eq!(px(&pm, 10, 10), RED);
        assert_eq!(px(&pm, 19, 19), RED);
        assert_eq!(px(&pm, 20, 20), CLEAR);
        assert_eq!(px(&pm, 9, 15), CLEAR);
    }

    #[test]
    fn rect_partly_off_surface_is_clamped() {
        let mut pm = pixmap();
        RasterCanvas::new(&mut pm).draw_rect(Rect::from_ltrb(-10.0, 60.0, 5.0, 100.0), &Paint::solid(Color::RED));
        assert_eq!(px(&pm, 0, 63), RED);
        assert_eq!(px(&pm, 5, 63), CLEAR);
    }

    #[test]
    fn empty_rect_draws_nothing() {
        let mut pm = pixmap();
        RasterCanvas::new(&mut pm).draw_rect(Rect::from_ltrb(10.0, 10.0, 10.0, 30.0), &Paint::solid(Color::RED));
        assert!(pm.pixels().iter().all(|p| *p == CLEAR));
    }

    #[test]
    fn translucent_fill_blends_over_background() {
        let mut pm = pixmap();
        pm.fill(Color::WHITE);
        let mut paint = Paint::solid(Color::BLUE);
        paint.set_alpha(0.5);
        RasterCanvas::new(&mut pm).draw_rect(Rect::from_ltrb(0.0, 0.0, 4.0, 4.0), &paint);
        assert_eq!(px(&pm, 1, 1), PremulRgba8::new(128, 128, 255, 255));
    }

    #[test]
    fn draw_paint_fills_clip() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.clip_rect(Rect::from_ltrb(0.0, 0.0, 8.0, 8.0), ClipOp::Intersect);
        canvas.draw_paint(&Paint::solid(Color::BLUE));
        drop(canvas);
        assert_eq!(px(&pm, 7, 7), BLUE);
        assert_eq!(px(&pm, 8, 8), CLEAR);
    }

    #[test]
    fn clear_replaces_pixels() {
        let mut pm = pixmap();
        pm.fill(Color::RED);
        RasterCanvas::new(&mut pm).clear(Color::TRANSPARENT);
        assert_eq!(px(&pm, 3, 3), CLEAR);
    }

    // ── matrix ────────────────────────────────────────────────────────────

    #[test]
    fn translate_and_scale_move_geometry() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.translate(10.0, 10.0);
        canvas.scale(2.0, 2.0);
        canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 5.0, 5.0), &Paint::solid(Color::RED));
        drop(canvas);
        assert_eq!(px(&pm, 10, 10), RED);
        assert_eq!(px(&pm, 19, 19), RED);
        assert_eq!(px(&pm, 20, 20), CLEAR);
        assert_eq!(px(&pm, 9, 9), CLEAR);
    }

    #[test]
    fn singular_matrix_skips_draws() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.scale(0.0, 1.0);
        canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 64.0, 64.0), &Paint::solid(Color::RED));
        drop(canvas);
        assert!(pm.pixels().iter().all(|p| *p == CLEAR));
    }

    // ── save / restore / clip ─────────────────────────────────────────────

    #[test]
    fn restore_pops_matrix_and_clip() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        assert_eq!(canvas.save(), 1);
        canvas.translate(30.0, 0.0);
        canvas.clip_rect(Rect::from_ltrb(0.0, 0.0, 2.0, 2.0), ClipOp::Intersect);
        assert_eq!(canvas.save_count(), 2);
        canvas.restore();
        assert!(canvas.total_matrix().is_identity());
        canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 4.0, 4.0), &Paint::solid(Color::RED));
        drop(canvas);
        assert_eq!(px(&pm, 3, 3), RED);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.restore();
        assert_eq!(canvas.save_count(), 1);
    }

    #[test]
    fn difference_clip_cuts_a_hole() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.clip_rect(Rect::from_ltrb(4.0, 4.0, 8.0, 8.0), ClipOp::Difference);
        canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 12.0, 12.0), &Paint::solid(Color::RED));
        drop(canvas);
        assert_eq!(px(&pm, 2, 2), RED);
        assert_eq!(px(&pm, 5, 5), CLEAR);
    }

    #[test]
    fn clip_is_captured_in_its_own_matrix() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.translate(20.0, 20.0);
        canvas.clip_rect(Rect::from_ltrb(0.0, 0.0, 10.0, 10.0), ClipOp::Intersect);
        canvas.reset_matrix();
        canvas.draw_paint(&Paint::solid(Color::RED));
        drop(canvas);
        assert_eq!(px(&pm, 20, 20), RED);
        assert_eq!(px(&pm, 29, 29), RED);
        assert_eq!(px(&pm, 5, 5), CLEAR);
    }

    #[test]
    fn disjoint_intersect_clips_match_nothing() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.clip_rect(Rect::from_ltrb(0.0, 0.0, 5.0, 5.0), ClipOp::Intersect);
        canvas.clip_rect(Rect::from_ltrb(10.0, 10.0, 20.0, 20.0), ClipOp::Intersect);
        canvas.draw_paint(&Paint::solid(Color::RED));
        drop(canvas);
        assert!(pm.pixels().iter().all(|p| *p == CLEAR));
    }

    #[test]
    fn rrect_clip_rounds_corners() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        let rr = RRect::new(Rect::from_ltrb(0.0, 0.0, 40.0, 40.0), CornerRadii::all(10.0));
        canvas.clip_rrect(rr, ClipOp::Intersect);
        canvas.draw_paint(&Paint::solid(Color::RED));
        drop(canvas);
        assert_eq!(px(&pm, 0, 0), CLEAR);
        assert_eq!(px(&pm, 20, 20), RED);
    }

    // ── layers ────────────────────────────────────────────────────────────

    #[test]
    fn save_layer_applies_alpha_on_restore() {
        let mut pm = pixmap();
        pm.fill(Color::WHITE);
        let mut canvas = RasterCanvas::new(&mut pm);
        let mut layer = Paint::new();
        layer.set_alpha(0.5);
        canvas.save_layer(Some(&layer));
        canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 4.0, 4.0), &Paint::solid(Color::BLUE));
        canvas.draw_rect(Rect::from_ltrb(2.0, 0.0, 6.0, 4.0), &Paint::solid(Color::BLUE));
        canvas.restore();
        drop(canvas);
        // Overlap is not double-blended: the layer is flattened first.
        assert_eq!(px(&pm, 3, 1), px(&pm, 1, 1));
        assert_eq!(px(&pm, 1, 1), PremulRgba8::new(128, 128, 255, 255));
        assert_eq!(px(&pm, 10, 10), WHITE);
    }

    #[test]
    fn luma_layer_turns_content_into_mask() {
        let mut pm = pixmap();
        let mut canvas = RasterCanvas::new(&mut pm);
        let mut layer = Paint::new();
        layer.set_color_filter(ColorFilter::Luma);
        canvas.save_layer(Some(&layer));
        canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 4.0, 4.0), &Paint::solid(Color::WHITE));
        canvas.restore();
        drop(canvas);
        assert_eq!(px(&pm, 1, 1), PremulRgba8::new(0, 0, 0, 255));
    }

    // ── strokes / paths ───────────────────────────────────────────────────

    #[test]
    fn stroked_rect_leaves_interior() {
        let mut pm = pixmap();
        let mut paint = Paint::solid(Color::RED);
        paint.set_style(crate::paint::Style::Stroke).set_stroke_width(2.0);
        RasterCanvas::new(&mut pm).draw_rect(Rect::from_ltrb(10.0, 10.0, 30.0, 30.0), &paint);
        assert_eq!(px(&pm, 9, 20), RED);
        assert_eq!(px(&pm, 10, 20), RED);
        assert_eq!(px(&pm, 20, 20), CLEAR);
    }

    #[test]
    fn hairline_stays_one_pixel_under_scale() {
        let mut pm = pixmap();
        let mut paint = Paint::solid(Color::RED);
        paint.set_style(Style::Stroke);
        let mut canvas = RasterCanvas::new(&mut pm);
        canvas.scale(8.0, 8.0);
        canvas.draw_rect(Rect::from_ltrb(2.0, 2.0, 6.0, 6.0), &paint);
        drop(canvas);

        let row: Vec<u32> = (0..64).filter(|&x| px(&pm, x, 32) == RED).collect();
        assert_eq!(row, vec![16, 48]);
        let column: Vec<u32> = (0..64).filter(|&y| px(&pm, 32, y) == RED).collect();
        assert_eq!(column, vec![16, 48]);
    }

    #[test]
    fn triangle_path_fill() {
        let mut pm = pixmap();
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(40.0, 0.0).line_to(0.0, 40.0).close();
        RasterCanvas::new(&mut pm).draw_path(&path, &Paint::solid(Color::RED));
        assert_eq!(px(&pm, 5, 5), RED);
        assert_eq!(px(&pm, 35, 35), CLEAR);
    }
}
