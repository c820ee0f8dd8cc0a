use easel_engine::coords::{CornerRadii, Matrix, RRect, Rect, Shape, Vec2};
use easel_engine::paint::{self as ep, Color};
use easel_engine::{Canvas, ClipOp};

use crate::ast::{Fill, Filter, Geometry, Layer, Paint, Style, Transform};
use crate::compiler::PathTable;
use crate::error::RenderError;

/// Replays a λSkia layer onto a canvas.
///
/// Every `Draw` runs in its own save: the clip chain is rebuilt element by
/// element under the matrix each element was recorded with, then the draw's
/// own matrix is set. All of these are applied after the canvas matrix in
/// effect on entry, so a caller can place the picture with `translate` or
/// `scale`. The canvas is left at the save count it had on entry.
pub fn render(layer: &Layer, paths: &PathTable, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
    let count = canvas.save_count();
    let base = canvas.total_matrix();
    let result = Renderer { paths, base, canvas: &mut *canvas }.layer(layer);
    canvas.restore_to_count(count);
    result
}

struct Renderer<'a> {
    paths: &'a PathTable,
    /// Canvas matrix on entry.
    base: Matrix,
    canvas: &'a mut dyn Canvas,
}

impl Renderer<'_> {
    fn layer(&mut self, layer: &Layer) -> Result<(), RenderError> {
        for node in layer.spine() {
            match node {
                Layer::Empty => {}
                Layer::SaveLayer { top, paint, .. } => {
                    let paint = self.paint(paint)?;
                    self.canvas.save_layer(Some(&paint));
                    self.layer(top)?;
                    self.canvas.restore();
                }
                Layer::Draw { shape, paint, clip, transform, .. } => {
                    let engine_paint = self.paint(paint)?;
                    self.canvas.save();
                    let drawn = self.clip(clip, paint.index).and_then(|()| {
                        self.canvas.set_matrix(&self.base.concat(&matrix(transform)));
                        self.draw(shape, &engine_paint, paint.index)
                    });
                    self.canvas.restore();
                    drawn?;
                }
            }
        }
        Ok(())
    }

    fn paint(&self, paint: &Paint) -> Result<ep::Paint, RenderError> {
        let color = match paint.fill {
            Fill::Color { a, r, g, b } => Color::from_straight(r, g, b, a),
            Fill::LinearGradient { .. } => return Err(unsupported("linear gradient", paint)),
            Fill::RadialGradient { .. } => return Err(unsupported("radial gradient", paint)),
        };
        let mut out = ep::Paint::solid(color);
        out.set_blend_mode(paint.blend_mode);
        if let Style::Stroke(width) = paint.style {
            out.set_style(ep::Style::Stroke).set_stroke_width(width);
        }
        if paint.color_filter == Filter::Luma {
            out.set_color_filter(ep::ColorFilter::Luma);
        }
        Ok(out)
    }

    /// Rebuilds a clip chain `op(op(..(Full, g1).., gn-1), gn)` oldest first.
    fn clip(&mut self, clip: &Geometry, index: usize) -> Result<(), RenderError> {
        let mut chain = Vec::new();
        let mut cur = clip;
        loop {
            let (op, rest, g) = match cur {
                Geometry::Full => break,
                Geometry::Intersect(rest, g) => (ClipOp::Intersect, rest, g),
                Geometry::Difference(rest, g) => (ClipOp::Difference, rest, g),
                _ => return Err(RenderError::Unsupported { what: "clip chain", paint_index: index }),
            };
            chain.push((op, &**g));
            cur = &**rest;
        }

        for (op, g) in chain.into_iter().rev() {
            let (g, m) = match g {
                Geometry::Transformed(inner, t) => (&**inner, self.base.concat(&matrix(t))),
                other => (other, self.base),
            };
            self.canvas.set_matrix(&m);
            match g {
                Geometry::Full if op == ClipOp::Intersect => {}
                Geometry::Full => self.canvas.clip_rect(Rect::default(), ClipOp::Intersect),
                g => {
                    let shape = self.shape(g, index)?;
                    self.canvas.clip_shape(&shape, op);
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, shape: &Geometry, paint: &ep::Paint, index: usize) -> Result<(), RenderError> {
        match shape {
            Geometry::Full => self.canvas.draw_paint(paint),
            g => {
                let shape = self.shape(g, index)?;
                self.canvas.draw_shape(&shape, paint);
            }
        }
        Ok(())
    }

    fn shape(&self, g: &Geometry, index: usize) -> Result<Shape, RenderError> {
        let fail = |what| RenderError::Unsupported { what, paint_index: index };
        Ok(match g {
            Geometry::Rect([l, t, r, b]) => Shape::Rect(Rect::from_ltrb(*l, *t, *r, *b)),
            Geometry::Oval([l, t, r, b]) => Shape::Oval(Rect::from_ltrb(*l, *t, *r, *b)),
            Geometry::RRect(v) => {
                let corner = |k: usize| Vec2::new(v[4 + 2 * k], v[5 + 2 * k]);
                let radii = CornerRadii::new(corner(0), corner(1), corner(2), corner(3));
                Shape::RRect(RRect::new(Rect::from_ltrb(v[0], v[1], v[2], v[3]), radii))
            }
            Geometry::Path { index: path } => {
                Shape::Path(self.paths.get(path).cloned().ok_or(RenderError::MissingPath(*path))?)
            }
            Geometry::TextBlob { .. } => return Err(fail("text blob")),
            Geometry::ImageRect(_) => return Err(fail("image rect")),
            Geometry::Full
            | Geometry::Intersect(..)
            | Geometry::Difference(..)
            | Geometry::Transformed(..) => return Err(fail("compound geometry")),
        })
    }
}

fn matrix(t: &Transform) -> Matrix {
    Matrix::from_m44(&t.0)
}

fn unsupported(what: &'static str, paint: &Paint) -> RenderError {
    RenderError::Unsupported { what, paint_index: paint.index }
}

#[cfg(test)]
mod tests {
    use easel_engine::raster::{PremulRgba8, Surface};

    use super::*;

    const RED: PremulRgba8 = PremulRgba8::new(255, 0, 0, 255);

    fn red() -> Paint {
        Paint { fill: Fill::from_argb([255, 255, 0, 0]), ..Paint::black(0) }
    }

    fn draw(shape: Geometry, clip: Geometry, transform: Transform) -> Layer {
        Layer::Draw { bottom: Box::new(Layer::Empty), shape, paint: red(), clip, transform }
    }

    fn rendered(layer: &Layer) -> Surface {
        let mut surface = Surface::new(64, 64).unwrap();
        render(layer, &PathTable::new(), &mut surface.canvas()).unwrap();
        surface
    }

    #[test]
    fn full_geometry_fills_the_clip() {
        let clip = Geometry::Intersect(Box::new(Geometry::Full), Box::new(Geometry::Rect([8.0, 8.0, 16.0, 16.0])));
        let surface = rendered(&draw(Geometry::Full, clip, Transform::IDENTITY));
        assert_eq!(surface.pixmap().pixel(10, 10), Some(RED));
        assert_eq!(surface.pixmap().pixel(20, 20), Some(PremulRgba8::TRANSPARENT));
    }

    #[test]
    fn transformed_clip_uses_its_own_matrix() {
        let shift = Transform([1.0, 0.0, 0.0, 20.0, 0.0, 1.0, 0.0, 20.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let clip = Geometry::Intersect(
            Box::new(Geometry::Full),
            Box::new(Geometry::Transformed(Box::new(Geometry::Rect([0.0, 0.0, 10.0, 10.0])), shift)),
        );
        let surface = rendered(&draw(Geometry::Full, clip, Transform::IDENTITY));
        assert_eq!(surface.pixmap().pixel(25, 25), Some(RED));
        assert_eq!(surface.pixmap().pixel(5, 5), Some(PremulRgba8::TRANSPARENT));
    }

    #[test]
    fn entry_matrix_places_the_picture() {
        let clip = Geometry::Intersect(Box::new(Geometry::Full), Box::new(Geometry::Rect([0.0, 0.0, 4.0, 4.0])));
        let layer = draw(Geometry::Rect([0.0, 0.0, 8.0, 8.0]), clip, Transform::IDENTITY);

        let mut surface = Surface::new(64, 64).unwrap();
        let mut canvas = surface.canvas();
        canvas.translate(10.0, 10.0);
        render(&layer, &PathTable::new(), &mut canvas).unwrap();
        assert_eq!(canvas.total_matrix(), Matrix::translate(10.0, 10.0));
        drop(canvas);

        let pm = surface.pixmap();
        assert_eq!(pm.pixel(11, 11), Some(RED));
        assert_eq!(pm.pixel(1, 1), Some(PremulRgba8::TRANSPARENT));
        // The clip moved with the picture.
        assert_eq!(pm.pixel(15, 15), Some(PremulRgba8::TRANSPARENT));
    }

    #[test]
    fn difference_with_full_clips_everything() {
        let clip = Geometry::Difference(Box::new(Geometry::Full), Box::new(Geometry::Full));
        let surface = rendered(&draw(Geometry::Rect([0.0, 0.0, 64.0, 64.0]), clip, Transform::IDENTITY));
        assert!(surface.pixmap().pixels().iter().all(|p| *p == PremulRgba8::TRANSPARENT));
    }

    #[test]
    fn failed_render_leaves_save_count_unchanged() {
        let mut gradient = red();
        gradient.fill = Fill::LinearGradient { is_opaque: true };
        let layer = Layer::Draw {
            bottom: Box::new(draw(Geometry::Full, Geometry::Full, Transform::IDENTITY)),
            shape: Geometry::Full,
            paint: gradient,
            clip: Geometry::Full,
            transform: Transform::IDENTITY,
        };

        let mut surface = Surface::new(8, 8).unwrap();
        let mut canvas = surface.canvas();
        canvas.save();
        let err = render(&layer, &PathTable::new(), &mut canvas).unwrap_err();
        assert_eq!(err, RenderError::Unsupported { what: "linear gradient", paint_index: 0 });
        assert_eq!(canvas.save_count(), 2);
        drop(canvas);
        assert_eq!(surface.pixmap().pixel(4, 4), Some(RED));
    }
}
