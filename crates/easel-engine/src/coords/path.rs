use super::{Rect, Vec2};

/// Segments per curve when flattening.
const CURVE_SEGMENTS: usize = 16;

/// How the interior of a path is decided.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillType {
    #[default]
    Winding,
    EvenOdd,
    InverseWinding,
    InverseEvenOdd,
}

impl FillType {
    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, FillType::InverseWinding | FillType::InverseEvenOdd)
    }

    /// Name used in SKP JSON (`"winding"`, `"evenOdd"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FillType::Winding => "winding",
            FillType::EvenOdd => "evenOdd",
            FillType::InverseWinding => "inverseWinding",
            FillType::InverseEvenOdd => "inverseEvenOdd",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "winding" => FillType::Winding,
            "evenOdd" => FillType::EvenOdd,
            "inverseWinding" => FillType::InverseWinding,
            "inverseEvenOdd" => FillType::InverseEvenOdd,
            _ => return None,
        })
    }
}

/// A single path verb with its points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Verb {
    Move(Vec2),
    Line(Vec2),
    Quad(Vec2, Vec2),
    Conic(Vec2, Vec2, f32),
    Cubic(Vec2, Vec2, Vec2),
    Close,
}

/// Open or closed contours built from move/line/curve verbs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    verbs: Vec<Verb>,
    fill_type: FillType,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    #[inline]
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    #[inline]
    pub fn set_fill_type(&mut self, fill_type: FillType) -> &mut Self {
        self.fill_type = fill_type;
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.verbs.push(Verb::Move(Vec2::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.verbs.push(Verb::Line(Vec2::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        self.verbs.push(Verb::Quad(Vec2::new(x1, y1), Vec2::new(x2, y2)));
        self
    }

    pub fn conic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, w: f32) -> &mut Self {
        self.verbs.push(Verb::Conic(Vec2::new(x1, y1), Vec2::new(x2, y2), w));
        self
    }

    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> &mut Self {
        self.verbs
            .push(Verb::Cubic(Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x3, y3)));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.verbs.push(Verb::Close);
        self
    }

    /// Control-point bounds. Curves never leave their control hull, so this
    /// always contains the flattened outline.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = Vec::new();
        for verb in &self.verbs {
            match *verb {
                Verb::Move(p) | Verb::Line(p) => points.push(p),
                Verb::Quad(a, b) | Verb::Conic(a, b, _) => points.extend([a, b]),
                Verb::Cubic(a, b, c) => points.extend([a, b, c]),
                Verb::Close => {}
            }
        }
        Rect::bounding(&points)
    }

    /// Flattens curves into polylines, one per contour.
    pub fn flatten(&self) -> FlatPath {
        let mut contours: Vec<Contour> = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        let mut closed = false;

        let mut finish = |points: &mut Vec<Vec2>, closed: bool| {
            if !points.is_empty() {
                contours.push(Contour { points: std::mem::take(points), closed });
            }
        };

        for verb in &self.verbs {
            // A curve or line with no preceding move starts at the origin.
            let last = current.last().copied().unwrap_or_default();
            match *verb {
                Verb::Move(p) => {
                    if current.len() > 1 {
                        finish(&mut current, closed);
                    }
                    current.clear();
                    closed = false;
                    current.push(p);
                }
                Verb::Line(p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.push(p);
                }
                Verb::Quad(c, p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.extend((1..=CURVE_SEGMENTS).map(|i| {
                        let t = i as f32 / CURVE_SEGMENTS as f32;
                        last.lerp(c, t).lerp(c.lerp(p, t), t)
                    }));
                }
                Verb::Conic(c, p, w) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.extend((1..=CURVE_SEGMENTS).map(|i| {
                        let t = i as f32 / CURVE_SEGMENTS as f32;
                        let (a, b, d) = ((1.0 - t) * (1.0 - t), 2.0 * w * t * (1.0 - t), t * t);
                        (last * a + c * b + p * d) / (a + b + d)
                    }));
                }
                Verb::Cubic(c1, c2, p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.extend((1..=CURVE_SEGMENTS).map(|i| {
                        let t = i as f32 / CURVE_SEGMENTS as f32;
                        let ab = last.lerp(c1, t);
                        let bc = c1.lerp(c2, t);
                        let cd = c2.lerp(p, t);
                        ab.lerp(bc, t).lerp(bc.lerp(cd, t), t)
                    }));
                }
                Verb::Close => {
                    let start = current.first().copied();
                    finish(&mut current, true);
                    closed = false;
                    // Drawing after close continues from the contour start.
                    if let Some(start) = start {
                        current.push(start);
                    }
                }
            }
        }
        if current.len() > 1 {
            finish(&mut current, closed);
        }

        FlatPath { contours, fill_type: self.fill_type }
    }
}

/// One flattened contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

/// A path reduced to polylines, ready for point queries.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPath {
    pub contours: Vec<Contour>,
    pub fill_type: FillType,
}

impl FlatPath {
    /// Fill containment. Every contour is treated as closed.
    pub fn contains(&self, p: Vec2) -> bool {
        let mut winding = 0i32;
        for contour in &self.contours {
            let pts = &contour.points;
            for (i, &a) in pts.iter().enumerate() {
                let b = pts[(i + 1) % pts.len()];
                if a.y <= p.y {
                    if b.y > p.y && cross(a, b, p) > 0.0 {
                        winding += 1;
                    }
                } else if b.y <= p.y && cross(a, b, p) < 0.0 {
                    winding -= 1;
                }
            }
        }
        let inside = match self.fill_type {
            FillType::Winding | FillType::InverseWinding => winding != 0,
            FillType::EvenOdd | FillType::InverseEvenOdd => winding % 2 != 0,
        };
        inside != self.fill_type.is_inverse()
    }

    /// Outline segments. Closed contours include their closing edge; a
    /// single-point contour yields one zero-length segment.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.contours.iter().flat_map(|contour| {
            let pts = &contour.points;
            let edges = match pts.len() {
                0 => 0,
                1 => 1,
                n if contour.closed => n,
                n => n - 1,
            };
            (0..edges).map(move |i| (pts[i], pts[(i + 1) % pts.len()]))
        })
    }

    /// Bounds of every flattened point.
    pub fn bounds(&self) -> Option<Rect> {
        let points: Vec<Vec2> = self.contours.iter().flat_map(|c| c.points.iter().copied()).collect();
        Rect::bounding(&points)
    }

    /// Shortest distance from `p` to the outline.
    pub fn distance_to_outline(&self, p: Vec2) -> f32 {
        self.segments()
            .map(|(a, b)| (p - nearest_on_segment(a, b, p)).length_squared())
            .fold(f32::INFINITY, f32::min)
            .sqrt()
    }
}

#[inline]
fn cross(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

/// Point of segment `ab` closest to `p`.
pub fn nearest_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len = ab.length_squared();
    let t = if len > 0.0 { ((p - a).dot(ab) / len).clamp(0.0, 1.0) } else { 0.0 };
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(l: f32, t: f32, r: f32, b: f32) -> Path {
        let mut path = Path::new();
        path.move_to(l, t).line_to(r, t).line_to(r, b).line_to(l, b).close();
        path
    }

    #[test]
    fn square_contains_interior_only() {
        let flat = square(0.0, 0.0, 10.0, 10.0).flatten();
        assert!(flat.contains(Vec2::new(5.0, 5.0)));
        assert!(!flat.contains(Vec2::new(15.0, 5.0)));
        assert!(!flat.contains(Vec2::new(5.0, -1.0)));
    }

    #[test]
    fn even_odd_punches_a_hole() {
        let mut path = square(0.0, 0.0, 30.0, 30.0);
        path.move_to(10.0, 10.0)
            .line_to(20.0, 10.0)
            .line_to(20.0, 20.0)
            .line_to(10.0, 20.0)
            .close();

        assert!(path.flatten().contains(Vec2::new(15.0, 15.0)));
        path.set_fill_type(FillType::EvenOdd);
        let flat = path.flatten();
        assert!(!flat.contains(Vec2::new(15.0, 15.0)));
        assert!(flat.contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn inverse_fill_flips_containment() {
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        path.set_fill_type(FillType::InverseWinding);
        let flat = path.flatten();
        assert!(!flat.contains(Vec2::new(5.0, 5.0)));
        assert!(flat.contains(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn curves_flatten_to_their_end_point() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).quad_to(10.0, 0.0, 10.0, 10.0).cubic_to(10.0, 20.0, 0.0, 20.0, 0.0, 10.0);
        let flat = path.flatten();
        assert_eq!(flat.contours.len(), 1);
        let pts = &flat.contours[0].points;
        assert_eq!(pts.len(), 1 + 2 * CURVE_SEGMENTS);
        assert_eq!(*pts.last().unwrap(), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn outline_distance() {
        let flat = square(0.0, 0.0, 10.0, 10.0).flatten();
        assert!((flat.distance_to_outline(Vec2::new(5.0, 2.0)) - 2.0).abs() < 1e-5);
        assert!((flat.distance_to_outline(Vec2::new(-3.0, 5.0)) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn open_contour_has_no_closing_segment() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0);
        assert_eq!(path.flatten().segments().count(), 2);
        assert_eq!(square(0.0, 0.0, 10.0, 10.0).flatten().segments().count(), 4);
    }

    #[test]
    fn flattened_bounds() {
        let b = square(2.0, 3.0, 10.0, 12.0).flatten().bounds().unwrap();
        assert_eq!(b.ltrb(), [2.0, 3.0, 10.0, 12.0]);
    }

    #[test]
    fn fill_type_names() {
        assert_eq!(FillType::from_name("evenOdd"), Some(FillType::EvenOdd));
        assert_eq!(FillType::InverseWinding.as_str(), "inverseWinding");
        assert_eq!(FillType::from_name("bogus"), None);
    }
}
