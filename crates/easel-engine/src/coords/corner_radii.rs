use super::{Rect, Vec2};

/// Per-corner elliptical radii for a rounded rectangle.
///
/// Corner order follows Skia: upper-left, upper-right, lower-right, lower-left.
/// Negative components are treated as zero.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub upper_left: Vec2,
    pub upper_right: Vec2,
    pub lower_right: Vec2,
    pub lower_left: Vec2,
}

impl CornerRadii {
    #[inline]
    pub const fn new(upper_left: Vec2, upper_right: Vec2, lower_right: Vec2, lower_left: Vec2) -> Self {
        Self { upper_left, upper_right, lower_right, lower_left }
    }

    /// Uniform circular radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        let v = Vec2::new(r, r);
        Self::new(v, v, v, v)
    }

    /// No rounding.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        [self.upper_left, self.upper_right, self.lower_right, self.lower_left]
    }

    #[inline]
    pub fn from_corners(c: [Vec2; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    fn map(self, f: impl Fn(Vec2) -> Vec2) -> Self {
        let [a, b, c, d] = self.corners();
        Self::new(f(a), f(b), f(c), f(d))
    }
}

/// Rounded rectangle: bounds plus corner radii.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RRect {
    pub rect: Rect,
    pub radii: CornerRadii,
}

impl RRect {
    #[inline]
    pub const fn new(rect: Rect, radii: CornerRadii) -> Self {
        Self { rect, radii }
    }

    /// Radii clamped to non-negative values and scaled down uniformly so that
    /// adjacent radii never sum past the side they share.
    pub fn resolved_radii(&self) -> CornerRadii {
        let r = self.rect.normalized();
        let radii = self.radii.map(|v| Vec2::new(v.x.max(0.0), v.y.max(0.0)));
        let [ul, ur, lr, ll] = radii.corners();

        let mut scale = 1.0f32;
        let mut fit = |side: f32, a: f32, b: f32| {
            if a + b > side && a + b > 0.0 {
                scale = scale.min(side / (a + b));
            }
        };
        fit(r.size.x, ul.x, ur.x);
        fit(r.size.x, ll.x, lr.x);
        fit(r.size.y, ul.y, ll.y);
        fit(r.size.y, ur.y, lr.y);

        if scale < 1.0 { radii.map(|v| v * scale) } else { radii }
    }

    /// Grows the bounds by `d` and every rounded corner by `d`. Square corners
    /// stay square.
    pub fn outset(&self, d: f32) -> RRect {
        let grow = |v: f32| if v > 0.0 { (v + d).max(0.0) } else { 0.0 };
        RRect::new(
            self.rect.outset(d),
            self.resolved_radii().map(|v| Vec2::new(grow(v.x), grow(v.y))),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let r = self.rect.normalized();
        if !r.contains(p) {
            return false;
        }
        let radii = self.resolved_radii();

        let centers = [
            (radii.upper_left, Vec2::new(r.left() + radii.upper_left.x, r.top() + radii.upper_left.y)),
            (radii.upper_right, Vec2::new(r.right() - radii.upper_right.x, r.top() + radii.upper_right.y)),
            (radii.lower_right, Vec2::new(r.right() - radii.lower_right.x, r.bottom() - radii.lower_right.y)),
            (radii.lower_left, Vec2::new(r.left() + radii.lower_left.x, r.bottom() - radii.lower_left.y)),
        ];

        for (i, (rad, c)) in centers.iter().enumerate() {
            if rad.x <= 0.0 || rad.y <= 0.0 {
                continue;
            }
            let in_corner = match i {
                0 => p.x < c.x && p.y < c.y,
                1 => p.x > c.x && p.y < c.y,
                2 => p.x > c.x && p.y > c.y,
                _ => p.x < c.x && p.y > c.y,
            };
            if in_corner {
                let dx = (p.x - c.x) / rad.x;
                let dy = (p.y - c.y) / rad.y;
                return dx * dx + dy * dy <= 1.0;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rrect(r: f32) -> RRect {
        RRect::new(Rect::from_ltrb(0.0, 0.0, 100.0, 50.0), CornerRadii::all(r))
    }

    #[test]
    fn corners_are_cut() {
        let rr = rrect(20.0);
        assert!(!rr.contains(Vec2::new(1.0, 1.0)));
        assert!(!rr.contains(Vec2::new(99.0, 49.0)));
        assert!(rr.contains(Vec2::new(20.0, 1.0)));
        assert!(rr.contains(Vec2::new(50.0, 25.0)));
    }

    #[test]
    fn zero_radii_behave_like_rect() {
        let rr = rrect(0.0);
        assert!(rr.contains(Vec2::new(0.5, 0.5)));
        assert!(rr.contains(Vec2::new(99.5, 49.5)));
    }

    #[test]
    fn oversized_radii_are_scaled() {
        let radii = rrect(100.0).resolved_radii();
        // 50-high side fits two radii of 25.
        assert_eq!(radii.upper_left, Vec2::new(25.0, 25.0));
    }

    #[test]
    fn outset_grows_round_corners_only() {
        let rr = RRect::new(
            Rect::from_ltrb(0.0, 0.0, 10.0, 10.0),
            CornerRadii::new(Vec2::new(2.0, 2.0), Vec2::zero(), Vec2::zero(), Vec2::zero()),
        );
        let out = rr.outset(1.0);
        assert_eq!(out.rect.ltrb(), [-1.0, -1.0, 11.0, 11.0]);
        assert_eq!(out.radii.upper_left, Vec2::new(3.0, 3.0));
        assert_eq!(out.radii.upper_right, Vec2::zero());
    }
}
