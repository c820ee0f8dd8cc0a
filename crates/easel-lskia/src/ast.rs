use std::fmt::{self, Write as _};
use std::mem;

use easel_engine::paint::BlendMode;

// ── Layer ─────────────────────────────────────────────────────────────────

/// A picture as a chain of layer operations over [`Layer::Empty`].
///
/// The `bottom` chain grows by one node per draw; walks along it are loops.
#[derive(Default)]
pub enum Layer {
    /// No pixels.
    #[default]
    Empty,
    /// `top` composited onto `bottom` with `paint`.
    SaveLayer { bottom: Box<Layer>, top: Box<Layer>, paint: Paint },
    /// `shape` drawn onto `bottom` with `paint`, inside `clip`, under `transform`.
    Draw {
        bottom: Box<Layer>,
        shape: Geometry,
        paint: Paint,
        clip: Geometry,
        transform: Transform,
    },
}

impl Layer {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Layer::Empty)
    }

    /// The layer this one draws onto, if any.
    pub fn bottom(&self) -> Option<&Layer> {
        match self {
            Layer::Empty => None,
            Layer::SaveLayer { bottom, .. } | Layer::Draw { bottom, .. } => Some(bottom),
        }
    }

    /// Non-empty nodes of the bottom chain, bottom-most first.
    pub fn spine(&self) -> Vec<&Layer> {
        let mut nodes = Vec::new();
        let mut cur = self;
        while let Some(bottom) = cur.bottom() {
            nodes.push(cur);
            cur = bottom;
        }
        nodes.reverse();
        nodes
    }

    /// Number of `Draw` nodes, counting those inside save layers.
    pub fn draw_count(&self) -> usize {
        self.spine()
            .into_iter()
            .map(|node| match node {
                Layer::SaveLayer { top, .. } => top.draw_count(),
                _ => 1,
            })
            .sum()
    }

    /// egglog term form.
    pub fn sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        let spine = self.spine();
        for node in spine.iter().rev() {
            match node {
                Layer::Empty => {}
                Layer::SaveLayer { .. } => out.push_str("(SaveLayer "),
                Layer::Draw { .. } => out.push_str("(Draw "),
            }
        }
        out.push_str("(Empty)");
        for node in spine {
            match node {
                Layer::Empty => {}
                Layer::SaveLayer { top, paint, .. } => {
                    out.push(' ');
                    top.write_sexp(out);
                    out.push(' ');
                    paint.write_sexp(out);
                    out.push(')');
                }
                Layer::Draw { shape, paint, clip, transform, .. } => {
                    out.push(' ');
                    shape.write_sexp(out);
                    out.push(' ');
                    paint.write_sexp(out);
                    out.push(' ');
                    clip.write_sexp(out);
                    out.push(' ');
                    transform.write_sexp(out);
                    out.push(')');
                }
            }
        }
    }

    /// Detaches the layer this one draws onto, leaving `Empty` in its place.
    fn take_bottom(&mut self) -> Option<Layer> {
        match self {
            Layer::Empty => None,
            Layer::SaveLayer { bottom, .. } | Layer::Draw { bottom, .. } => Some(mem::take(&mut **bottom)),
        }
    }

    /// This node alone, over `bottom`.
    fn with_bottom(&self, bottom: Layer) -> Layer {
        match self {
            Layer::Empty => Layer::Empty,
            Layer::SaveLayer { top, paint, .. } => Layer::SaveLayer {
                bottom: Box::new(bottom),
                top: top.clone(),
                paint: paint.clone(),
            },
            Layer::Draw { shape, paint, clip, transform, .. } => Layer::Draw {
                bottom: Box::new(bottom),
                shape: shape.clone(),
                paint: paint.clone(),
                clip: clip.clone(),
                transform: *transform,
            },
        }
    }

    /// Indented human-readable form, one node per line.
    pub fn pretty(&self) -> String {
        let mut lines = Vec::new();
        self.pretty_lines(0, &mut lines);
        let mut out = String::new();
        for (depth, line) in lines {
            let _ = writeln!(out, "{}{}", "  ".repeat(depth), line);
        }
        out
    }

    fn pretty_lines(&self, depth: usize, lines: &mut Vec<(usize, String)>) {
        let spine = self.spine();
        if spine.is_empty() {
            lines.push((depth, "Empty()".into()));
            return;
        }
        for node in spine {
            match node {
                Layer::Empty => {}
                Layer::SaveLayer { top, paint, .. } => {
                    lines.push((depth, format!("SaveLayer {paint}:")));
                    top.pretty_lines(depth + 1, lines);
                }
                Layer::Draw { shape, paint, clip, transform, .. } => {
                    lines.push((depth, format!("Draw {shape}")));
                    lines.push((depth + 1, format!("with {paint}")));
                    lines.push((depth + 1, format!("in {clip}")));
                    lines.push((depth + 1, format!("@ {transform}")));
                }
            }
        }
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        let mut next = self.take_bottom();
        while let Some(mut layer) = next {
            next = layer.take_bottom();
        }
    }
}

impl Clone for Layer {
    fn clone(&self) -> Self {
        self.spine().into_iter().fold(Layer::Empty, |bottom, node| node.with_bottom(bottom))
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.spine(), other.spine());
        a.len() == b.len()
            && a.iter().zip(&b).all(|(x, y)| match (*x, *y) {
                (
                    Layer::SaveLayer { top: t1, paint: p1, .. },
                    Layer::SaveLayer { top: t2, paint: p2, .. },
                ) => p1 == p2 && t1 == t2,
                (
                    Layer::Draw { shape: s1, paint: p1, clip: c1, transform: m1, .. },
                    Layer::Draw { shape: s2, paint: p2, clip: c2, transform: m2, .. },
                ) => s1 == s2 && p1 == p2 && c1 == c2 && m1 == m2,
                _ => false,
            })
    }
}

/// Lists the spine bottom-most first instead of nesting.
impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spine = self.spine();
        if spine.is_empty() {
            return f.write_str("Empty");
        }
        let mut list = f.debug_list();
        for node in spine {
            match node {
                Layer::Empty => {}
                Layer::SaveLayer { top, paint, .. } => {
                    list.entry(&format_args!("SaveLayer {{ top: {top:?}, paint: {paint:?} }}"));
                }
                Layer::Draw { shape, paint, clip, transform, .. } => {
                    list.entry(&format_args!(
                        "Draw {{ shape: {shape:?}, paint: {paint:?}, clip: {clip:?}, transform: {transform:?} }}"
                    ));
                }
            }
        }
        list.finish()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Geometry {
    /// The whole clip. Used by `DrawPaint`.
    #[default]
    Full,
    Rect([f32; 4]),
    Oval([f32; 4]),
    /// `l t r b` then the four corner radii `ul ur lr ll`, x before y.
    RRect([f32; 12]),
    /// A path stored in the side table under the command index.
    Path { index: usize },
    TextBlob { x: f32, y: f32, bounds: [f32; 4] },
    ImageRect([f32; 4]),
    Intersect(Box<Geometry>, Box<Geometry>),
    Difference(Box<Geometry>, Box<Geometry>),
    /// Geometry given under a transform other than the draw's own.
    Transformed(Box<Geometry>, Transform),
}

impl Geometry {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Geometry::Full => out.push_str("(Full)"),
            Geometry::Rect(v) => write_node(out, "Rect", v),
            Geometry::Oval(v) => write_node(out, "Oval", v),
            Geometry::RRect(v) => write_node(out, "RRect", v),
            Geometry::Path { index } => {
                let _ = write!(out, "(Path {index})");
            }
            Geometry::TextBlob { x, y, bounds } => {
                let mut v = vec![*x, *y];
                v.extend_from_slice(bounds);
                write_node(out, "TextBlob", &v);
            }
            Geometry::ImageRect(v) => write_node(out, "ImageRect", v),
            Geometry::Intersect(a, b) | Geometry::Difference(a, b) => {
                let name = if matches!(self, Geometry::Intersect(..)) { "Intersect" } else { "Difference" };
                let _ = write!(out, "({name} ");
                a.write_sexp(out);
                out.push(' ');
                b.write_sexp(out);
                out.push(')');
            }
            Geometry::Transformed(g, m) => {
                out.push_str("(Transformed ");
                g.write_sexp(out);
                out.push(' ');
                m.write_sexp(out);
                out.push(')');
            }
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Full => f.write_str("Full()"),
            Geometry::Rect(v) => write!(f, "Rect({})", join(v)),
            Geometry::Oval(v) => write!(f, "Oval({})", join(v)),
            Geometry::RRect(v) => write!(f, "RRect({})", join(v)),
            Geometry::Path { index } => write!(f, "Path({index})"),
            Geometry::TextBlob { x, y, bounds } => {
                write!(f, "TextBlob({}, {}, {})", float(*x), float(*y), join(bounds))
            }
            Geometry::ImageRect(v) => write!(f, "ImageRect({})", join(v)),
            Geometry::Intersect(a, b) => write!(f, "{a} ∩ {b}"),
            Geometry::Difference(a, b) => write!(f, "{a} / {b}"),
            Geometry::Transformed(g, m) => write!(f, "({g} @ {m})"),
        }
    }
}

// ── Paint ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fill {
    /// Straight-alpha channels in [0, 1].
    Color { a: f32, r: f32, g: f32, b: f32 },
    LinearGradient { is_opaque: bool },
    RadialGradient { is_opaque: bool },
}

impl Fill {
    pub const BLACK: Fill = Fill::Color { a: 1.0, r: 0.0, g: 0.0, b: 0.0 };

    /// Channels from Skia's `[a, r, g, b]` bytes.
    pub fn from_argb(argb: [u8; 4]) -> Self {
        let [a, r, g, b] = argb.map(|v| v as f32 / 255.0);
        Fill::Color { a, r, g, b }
    }

    pub fn is_opaque(&self) -> bool {
        match *self {
            Fill::Color { a, .. } => a >= 1.0,
            Fill::LinearGradient { is_opaque } | Fill::RadialGradient { is_opaque } => is_opaque,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum Style {
    #[default]
    Solid,
    /// Stroke of the given width; 0 is a hairline.
    Stroke(f32),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Filter {
    #[default]
    Id,
    Luma,
}

impl Filter {
    pub fn name(self) -> &'static str {
        match self {
            Filter::Id => "IdFilter",
            Filter::Luma => "LumaFilter",
        }
    }
}

/// How a geometry is filled and blended.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: Fill,
    pub blend_mode: BlendMode,
    pub style: Style,
    pub color_filter: Filter,
    /// Index of the SKP command this paint came from.
    pub index: usize,
}

impl Paint {
    /// Opaque black, SrcOver, solid fill, no filter.
    pub fn black(index: usize) -> Self {
        Self {
            fill: Fill::BLACK,
            blend_mode: BlendMode::SrcOver,
            style: Style::Solid,
            color_filter: Filter::Id,
            index,
        }
    }

    fn write_sexp(&self, out: &mut String) {
        out.push_str("(Paint ");
        match self.fill {
            Fill::Color { a, r, g, b } => write_node(out, "Color", &[a, r, g, b]),
            Fill::LinearGradient { is_opaque } => {
                let _ = write!(out, "(LinearGradient {is_opaque})");
            }
            Fill::RadialGradient { is_opaque } => {
                let _ = write!(out, "(RadialGradient {is_opaque})");
            }
        }
        let _ = write!(out, " ({}) ", self.blend_mode.name());
        match self.style {
            Style::Solid => out.push_str("(Solid)"),
            Style::Stroke(w) => {
                let _ = write!(out, "(Stroke {})", float(w));
            }
        }
        let _ = write!(out, " ({}) {})", self.color_filter.name(), self.index);
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Paint(")?;
        match self.fill {
            Fill::Color { a, r, g, b } => {
                let byte = |v: f32| (v * 255.0).round() as u8;
                write!(f, "Color({}, {}, {}, {})", byte(a), byte(r), byte(g), byte(b))?;
            }
            Fill::LinearGradient { .. } => f.write_str("LinearGradient")?,
            Fill::RadialGradient { .. } => f.write_str("RadialGradient")?,
        }
        write!(f, ", {}, ", self.blend_mode.name())?;
        match self.style {
            Style::Solid => f.write_str("Solid")?,
            Style::Stroke(w) => write!(f, "Stroke({})", float(w))?,
        }
        write!(f, ", {})", self.color_filter.name())
    }
}

// ── Transform ─────────────────────────────────────────────────────────────

/// Row-major 4×4 matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform(pub [f32; 16]);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `self × other`.
    pub fn concat(&self, other: &Transform) -> Transform {
        let (a, b) = (&self.0, &other.0);
        let mut out = [0.0f32; 16];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    out[i * 4 + j] += a[i * 4 + k] * b[k * 4 + j];
                }
            }
        }
        Transform(out)
    }

    fn write_sexp(&self, out: &mut String) {
        write_node(out, "Matrix", &self.0);
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mat[{}]", join(&self.0))
    }
}

// ── float formatting ──────────────────────────────────────────────────────

/// Decimal form that always carries a decimal point (`1.0`, `0.25`, `-3.0`).
pub fn float(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn join(values: &[f32]) -> String {
    values.iter().map(|v| float(*v)).collect::<Vec<_>>().join(", ")
}

fn write_node(out: &mut String, name: &str, values: &[f32]) {
    out.push('(');
    out.push_str(name);
    for v in values {
        out.push(' ');
        out.push_str(&float(*v));
    }
    out.push(')');
}
