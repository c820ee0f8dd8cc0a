use super::{Rect, Vec2};

/// 3×3 projective transform, row major:
///
/// ```text
/// | sx kx tx |
/// | ky sy ty |
/// | p0 p1 p2 |
/// ```
///
/// Points are column vectors, so `a.concat(&b)` maps through `b` first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub m: [f32; 9],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    #[inline]
    pub const fn identity() -> Self {
        Self { m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0] }
    }

    #[inline]
    pub const fn translate(dx: f32, dy: f32) -> Self {
        Self { m: [1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0] }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self { m: [sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0] }
    }

    /// Projects a row-major 4×4 matrix onto the z = 0 plane by dropping its
    /// third row and column.
    pub fn from_m44(m: &[f32; 16]) -> Self {
        Self { m: [m[0], m[1], m[3], m[4], m[5], m[7], m[12], m[13], m[15]] }
    }

    /// Embeds this matrix into a row-major 4×4 with an identity z axis.
    pub fn to_m44(&self) -> [f32; 16] {
        let m = &self.m;
        [
            m[0], m[1], 0.0, m[2],
            m[3], m[4], 0.0, m[5],
            0.0, 0.0, 1.0, 0.0,
            m[6], m[7], 0.0, m[8],
        ]
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }

    /// Returns `self × other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        let a = &self.m;
        let b = &other.m;
        let mut out = [0.0f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = (0..3).map(|k| a[row * 3 + k] * b[k * 3 + col]).sum();
            }
        }
        Matrix { m: out }
    }

    /// Returns the inverse, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Matrix> {
        let [a, b, c, d, e, f, g, h, i] = self.m;

        let co_a = e * i - f * h;
        let co_b = -(d * i - f * g);
        let co_c = d * h - e * g;
        let det = a * co_a + b * co_b + c * co_c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        let out = [
            co_a * inv,
            -(b * i - c * h) * inv,
            (b * f - c * e) * inv,
            co_b * inv,
            (a * i - c * g) * inv,
            -(a * f - c * d) * inv,
            co_c * inv,
            -(a * h - b * g) * inv,
            (a * e - b * d) * inv,
        ];
        out.iter().all(|v| v.is_finite()).then_some(Matrix { m: out })
    }

    /// Maps a point. Returns `None` when the point lands at or behind the
    /// projection plane.
    #[inline]
    pub fn try_map_point(&self, p: Vec2) -> Option<Vec2> {
        let m = &self.m;
        let x = m[0] * p.x + m[1] * p.y + m[2];
        let y = m[3] * p.x + m[4] * p.y + m[5];
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if w <= 0.0 {
            return None;
        }
        if w == 1.0 {
            Some(Vec2::new(x, y))
        } else {
            Some(Vec2::new(x / w, y / w))
        }
    }

    /// Bounding box of `rect` after mapping its four corners.
    pub fn map_rect_bounds(&self, rect: Rect) -> Option<Rect> {
        let r = rect.normalized();
        let corners = [
            Vec2::new(r.left(), r.top()),
            Vec2::new(r.right(), r.top()),
            Vec2::new(r.right(), r.bottom()),
            Vec2::new(r.left(), r.bottom()),
        ];
        let mut mapped = [Vec2::zero(); 4];
        for (dst, src) in mapped.iter_mut().zip(corners) {
            *dst = self.try_map_point(src)?;
        }
        Rect::bounding(&mapped)
    }
}
