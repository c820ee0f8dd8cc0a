use super::Vec2;

/// Axis-aligned rectangle (top-left origin, +Y down).
///
/// Stored as origin + size. Skia-style code builds it from edges with
/// [`Rect::from_ltrb`]; a negative size is legal and is resolved by
/// [`Rect::normalized`] before rasterization.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Builds a rectangle from its four edges. Edges are not sorted.
    #[inline]
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn left(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    /// `[left, top, right, bottom]`, the order used by SKP JSON `coords`.
    #[inline]
    pub fn ltrb(self) -> [f32; 4] {
        [self.left(), self.top(), self.right(), self.bottom()]
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x * 0.5, self.origin.y + self.size.y * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let (l, r) = if self.size.x < 0.0 {
            (self.right(), self.left())
        } else {
            (self.left(), self.right())
        };
        let (t, b) = if self.size.y < 0.0 {
            (self.bottom(), self.top())
        } else {
            (self.top(), self.bottom())
        };
        Rect::from_ltrb(l, t, r, b)
    }

    /// Grows every edge outward by `d`; a negative `d` insets.
    ///
    /// Insetting past the center yields an empty rectangle.
    #[inline]
    pub fn outset(self, d: f32) -> Self {
        let r = self.normalized();
        let w = (r.size.x + 2.0 * d).max(0.0);
        let h = (r.size.y + 2.0 * d).max(0.0);
        let c = r.center();
        Rect::new(c.x - w * 0.5, c.y - h * 0.5, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.left() && p.y >= r.top() && p.x < r.right() && p.y < r.bottom()
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.left().max(b.left());
        let y0 = a.top().max(b.top());
        let x1 = a.right().min(b.right());
        let y1 = a.bottom().min(b.bottom());

        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            None
        } else {
            Some(Rect::from_ltrb(x0, y0, x1, y1))
        }
    }

    /// Smallest rectangle containing every point of `points`.
    pub fn bounding(points: &[Vec2]) -> Option<Rect> {
        let first = points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Rect::from_ltrb(x0, y0, x1, y1))
    }
}
