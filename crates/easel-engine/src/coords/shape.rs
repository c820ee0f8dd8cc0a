use std::f32::consts::FRAC_1_SQRT_2;

use super::{Path, RRect, Rect};

/// Geometry accepted by canvas draw and clip calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    /// Ellipse inscribed in the rectangle.
    Oval(Rect),
    RRect(RRect),
    Path(Path),
}

impl Shape {
    /// Local-space bounds. `None` for an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Shape::Rect(r) | Shape::Oval(r) => Some(r.normalized()),
            Shape::RRect(rr) => Some(rr.rect.normalized()),
            Shape::Path(p) => p.bounds(),
        }
    }

    /// The outline as a path. Oval and rounded corners become quarter conics.
    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        match self {
            Shape::Rect(r) => {
                let [l, t, r, b] = r.normalized().ltrb();
                path.move_to(l, t).line_to(r, t).line_to(r, b).line_to(l, b).close();
            }
            Shape::Oval(r) => {
                let [l, t, r, b] = r.normalized().ltrb();
                let c = (l + r) * 0.5;
                let m = (t + b) * 0.5;
                let w = FRAC_1_SQRT_2;
                path.move_to(r, m)
                    .conic_to(r, b, c, b, w)
                    .conic_to(l, b, l, m, w)
                    .conic_to(l, t, c, t, w)
                    .conic_to(r, t, r, m, w)
                    .close();
            }
            Shape::RRect(rr) => {
                let [l, t, r, b] = rr.rect.normalized().ltrb();
                let radii = rr.resolved_radii();
                let (ul, ur, lr, ll) = (radii.upper_left, radii.upper_right, radii.lower_right, radii.lower_left);
                let w = FRAC_1_SQRT_2;
                path.move_to(l + ul.x, t)
                    .line_to(r - ur.x, t)
                    .conic_to(r, t, r, t + ur.y, w)
                    .line_to(r, b - lr.y)
                    .conic_to(r, b, r - lr.x, b, w)
                    .line_to(l + ll.x, b)
                    .conic_to(l, b, l, b - ll.y, w)
                    .line_to(l, t + ul.y)
                    .conic_to(l, t, l + ul.x, t, w)
                    .close();
            }
            Shape::Path(p) => return p.clone(),
        }
        path
    }

    /// True when the shape covers area outside its bounds.
    pub fn is_inverse(&self) -> bool {
        matches!(self, Shape::Path(p) if p.fill_type().is_inverse())
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

impl From<RRect> for Shape {
    fn from(rr: RRect) -> Self {
        Shape::RRect(rr)
    }
}

impl From<Path> for Shape {
    fn from(p: Path) -> Self {
        Shape::Path(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CornerRadii, Vec2};

    #[test]
    fn rect_outline_is_a_closed_square() {
        let flat = Shape::Rect(Rect::from_ltrb(0.0, 0.0, 4.0, 2.0)).to_path().flatten();
        assert_eq!(flat.contours.len(), 1);
        assert!(flat.contours[0].closed);
        assert_eq!(flat.contours[0].points.len(), 4);
    }

    #[test]
    fn oval_outline_stays_on_the_ellipse() {
        let flat = Shape::Oval(Rect::from_ltrb(0.0, 0.0, 20.0, 10.0)).to_path().flatten();
        for p in &flat.contours[0].points {
            let (dx, dy) = ((p.x - 10.0) / 10.0, (p.y - 5.0) / 5.0);
            assert!((dx * dx + dy * dy - 1.0).abs() < 1e-4, "{p:?}");
        }
    }

    #[test]
    fn rrect_outline_cuts_the_corners() {
        let rr = RRect::new(Rect::from_ltrb(0.0, 0.0, 40.0, 40.0), CornerRadii::all(10.0));
        let flat = Shape::RRect(rr).to_path().flatten();
        assert!(flat.distance_to_outline(Vec2::new(0.0, 0.0)) > 2.0);
        assert!(flat.distance_to_outline(Vec2::new(20.0, 0.0)) < 1e-5);
    }
}
