//! Shapes prepared for per-pixel containment queries.

use crate::coords::{nearest_on_segment, FlatPath, Matrix, RRect, Rect, Shape, Vec2};
use crate::paint::{Paint, Style};

/// Half width of a hairline, in device pixels.
const HAIRLINE_HALF_WIDTH: f32 = 0.5;

/// Local-space point set, ready for `contains` in the pixel loop.
#[derive(Debug, Clone)]
pub(crate) enum Region {
    Rect(Rect),
    Oval(Rect),
    RRect(RRect),
    Path(FlatPath),
    /// Points inside `outer` and not inside `inner`.
    Ring(Box<Region>, Box<Region>),
    /// Points within `half_width` of the path outline.
    Outline(FlatPath, f32),
    /// Device-space outline one pixel wide.
    Hairline(FlatPath),
}

impl Region {
    /// Prepares `shape` as a fill.
    pub(crate) fn fill(shape: &Shape) -> Region {
        match shape {
            Shape::Rect(r) => Region::Rect(r.normalized()),
            Shape::Oval(r) => Region::Oval(r.normalized()),
            Shape::RRect(rr) => Region::RRect(*rr),
            Shape::Path(p) => Region::Path(p.flatten()),
        }
    }

    /// Prepares `shape` as painted by `paint`, honoring its style.
    pub(crate) fn painted(shape: &Shape, paint: &Paint) -> Region {
        if paint.style() == Style::Fill {
            return Region::fill(shape);
        }
        let h = stroke_half_width(paint);
        match shape {
            Shape::Rect(r) => ring(Region::Rect(r.outset(h)), Region::Rect(r.outset(-h))),
            Shape::Oval(r) => ring(Region::Oval(r.outset(h)), Region::Oval(r.outset(-h))),
            Shape::RRect(rr) => ring(Region::RRect(rr.outset(h)), Region::RRect(rr.outset(-h))),
            Shape::Path(p) => Region::Outline(p.flatten(), h),
        }
    }

    /// Zero-width stroke of `shape`, mapped to device space by `matrix`.
    /// Returns the region with its device bounds, or `None` when the outline
    /// is empty or does not map.
    pub(crate) fn hairline(shape: &Shape, matrix: &Matrix) -> Option<(Region, Rect)> {
        let mut flat = shape.to_path().flatten();
        for point in flat.contours.iter_mut().flat_map(|c| c.points.iter_mut()) {
            *point = matrix.try_map_point(*point)?;
        }
        let bounds = flat.bounds()?.outset(HAIRLINE_HALF_WIDTH);
        Some((Region::Hairline(flat), bounds))
    }

    pub(crate) fn contains(&self, p: Vec2) -> bool {
        match self {
            Region::Rect(r) => r.contains(p),
            Region::Oval(r) => oval_contains(*r, p),
            Region::RRect(rr) => rr.contains(p),
            Region::Path(fp) => fp.contains(p),
            Region::Ring(outer, inner) => outer.contains(p) && !inner.contains(p),
            Region::Outline(fp, h) => fp.distance_to_outline(p) <= *h,
            Region::Hairline(fp) => hairline_covers(fp, p),
        }
    }
}

/// Local bounds of `shape` as painted, or `None` when it is unbounded
/// (inverse fills) or empty.
pub(crate) fn painted_bounds(shape: &Shape, paint: &Paint) -> Option<Rect> {
    if shape.is_inverse() && paint.style() == Style::Fill {
        return None;
    }
    let b = shape.bounds()?;
    Some(match paint.style() {
        Style::Fill => b,
        Style::Stroke => b.outset(stroke_half_width(paint)),
    })
}

fn stroke_half_width(paint: &Paint) -> f32 {
    paint.stroke_width() * 0.5
}

/// A pixel is on the hairline when the outline passes within half a pixel of
/// its center. A segment exactly half a pixel away counts only on the pixel's
/// top or left edge, so an outline on a pixel boundary covers one column.
fn hairline_covers(fp: &FlatPath, p: Vec2) -> bool {
    let limit = HAIRLINE_HALF_WIDTH * HAIRLINE_HALF_WIDTH;
    fp.segments().any(|(a, b)| {
        let q = nearest_on_segment(a, b, p);
        let d = (p - q).length_squared();
        d < limit || (d == limit && q.x <= p.x && q.y <= p.y)
    })
}

fn ring(outer: Region, inner: Region) -> Region {
    Region::Ring(Box::new(outer), Box::new(inner))
}

fn oval_contains(r: Rect, p: Vec2) -> bool {
    let rx = r.size.x * 0.5;
    let ry = r.size.y * 0.5;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let c = r.center();
    let dx = (p.x - c.x) / rx;
    let dy = (p.y - c.y) / ry;
    dx * dx + dy * dy <= 1.0
}
