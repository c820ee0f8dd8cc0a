use std::collections::BTreeMap;
use std::mem;
use std::str::FromStr;

use easel_engine::ClipOp;
use easel_engine::coords::{FillType, Path};
use easel_engine::paint::BlendMode;
use serde_json::{Map, Value};

use crate::ast::{Fill, Filter, Geometry, Layer, Paint, Style, Transform};
use crate::error::CompileError;

/// Paths referenced by `Geometry::Path`, keyed by command index.
pub type PathTable = BTreeMap<usize, Path>;

/// Paint keys the compiler understands. Anything else is an error.
const PAINT_KEYS: [&str; 11] = [
    "colorfilter",
    "shader",
    "color",
    "blendMode",
    "antiAlias",
    "dither",
    "strokeWidth",
    "style",
    "cap",
    "strokeJoin",
    "strokeMiter",
];

/// Keys accepted but with no λSkia counterpart.
const IGNORED_PAINT_KEYS: [&str; 5] = ["antiAlias", "dither", "cap", "strokeJoin", "strokeMiter"];

/// Output of a successful compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub layer: Layer,
    pub paths: PathTable,
    /// Notes about input that was accepted but not fully represented.
    pub warnings: Vec<String>,
}

type Res<T> = Result<T, String>;

/// Compiles an SKP JSON document (`{"commands": [...]}`) into λSkia.
pub fn compile(skp: &Value) -> Result<Compiled, CompileError> {
    let commands = skp
        .get("commands")
        .and_then(Value::as_array)
        .ok_or_else(|| CompileError::global("missing \"commands\" array"))?;
    compile_commands(commands)
}

/// Compiles a list of SKP commands into λSkia.
pub fn compile_commands(commands: &[Value]) -> Result<Compiled, CompileError> {
    let mut compiler = Compiler::default();
    for (i, data) in commands.iter().enumerate() {
        compiler.command(i, data).map_err(|msg| CompileError::at(i, msg))?;
    }
    compiler.finish()
}

// ── state machine ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct State {
    clip: Geometry,
    transform: Transform,
    layer: Layer,
    /// Set when this level was opened by `SaveLayer`.
    save_layer: Option<Paint>,
}

#[derive(Debug, Default)]
struct Compiler {
    saved: Vec<State>,
    state: State,
    paths: PathTable,
    warnings: Vec<String>,
}

impl Compiler {
    fn command(&mut self, i: usize, data: &Value) -> Res<()> {
        let name = data.get("command").and_then(Value::as_str).ok_or("missing command name")?;
        log::debug!("command {i}: {name}");

        match name {
            "Save" => {
                // The child continues the current layer; restore hands it back.
                let layer = mem::take(&mut self.state.layer);
                self.push(layer, None);
            }
            "SaveLayer" => {
                let paint = self.paint(i, data.get("paint"))?;
                self.push(Layer::Empty, Some(paint));
            }
            "Restore" => {
                let parent = self.saved.pop().ok_or("Restore without a matching Save")?;
                let closing = mem::replace(&mut self.state, parent);
                self.state.layer = match closing.save_layer {
                    Some(paint) => Layer::SaveLayer {
                        bottom: Box::new(mem::take(&mut self.state.layer)),
                        top: Box::new(closing.layer),
                        paint,
                    },
                    None => closing.layer,
                };
            }
            "DrawPaint" => self.draw(i, data, Geometry::Full)?,
            "DrawRect" => self.draw(i, data, Geometry::Rect(ltrb(field(data, "coords")?)?))?,
            "DrawOval" => self.draw(i, data, Geometry::Oval(ltrb(field(data, "coords")?)?))?,
            "DrawRRect" => self.draw(i, data, Geometry::RRect(rrect(field(data, "coords")?)?))?,
            "DrawPath" => {
                self.paths.insert(i, path_from_json(field(data, "path")?)?);
                self.draw(i, data, Geometry::Path { index: i })?;
            }
            "DrawTextBlob" => {
                let x = number(field(data, "x")?)?;
                let y = number(field(data, "y")?)?;
                let bounds = ltrb(field(data, "bounds")?)?;
                self.draw(i, data, Geometry::TextBlob { x, y, bounds })?;
            }
            "DrawImageRect" => self.draw(i, data, Geometry::ImageRect(ltrb(field(data, "dst")?)?))?,
            "ClipRect" => self.clip(data, Geometry::Rect(ltrb(field(data, "coords")?)?))?,
            "ClipRRect" => self.clip(data, Geometry::RRect(rrect(field(data, "coords")?)?))?,
            "ClipPath" => {
                self.paths.insert(i, path_from_json(field(data, "path")?)?);
                self.clip(data, Geometry::Path { index: i })?;
            }
            "Concat44" => {
                let m = matrix(field(data, "matrix")?)?;
                self.state.transform = self.state.transform.concat(&m);
            }
            "SetM44" => {
                self.state.transform = matrix(field(data, "matrix")?)?;
            }
            other => return Err(format!("unsupported command {other:?}")),
        }
        Ok(())
    }

    fn push(&mut self, layer: Layer, save_layer: Option<Paint>) {
        let child = State {
            clip: self.state.clip.clone(),
            transform: self.state.transform,
            layer,
            save_layer,
        };
        self.saved.push(mem::replace(&mut self.state, child));
    }

    fn draw(&mut self, i: usize, data: &Value, shape: Geometry) -> Res<()> {
        let paint = self.paint(i, data.get("paint"))?;
        let bottom = mem::take(&mut self.state.layer);
        self.state.layer = Layer::Draw {
            bottom: Box::new(bottom),
            shape,
            paint,
            clip: self.state.clip.clone(),
            transform: self.state.transform,
        };
        Ok(())
    }

    fn clip(&mut self, data: &Value, shape: Geometry) -> Res<()> {
        let op = field(data, "op")?
            .as_str()
            .and_then(ClipOp::from_name)
            .ok_or("clip op must be \"intersect\" or \"difference\"")?;
        let shape = if self.state.transform.is_identity() {
            shape
        } else {
            Geometry::Transformed(Box::new(shape), self.state.transform)
        };
        let current = Box::new(mem::take(&mut self.state.clip));
        self.state.clip = match op {
            ClipOp::Intersect => Geometry::Intersect(current, Box::new(shape)),
            ClipOp::Difference => Geometry::Difference(current, Box::new(shape)),
        };
        Ok(())
    }

    fn paint(&mut self, i: usize, json: Option<&Value>) -> Res<Paint> {
        let Some(json) = json else {
            return Ok(Paint::black(i));
        };
        let json = json.as_object().ok_or("paint must be an object")?;
        for key in json.keys() {
            if !PAINT_KEYS.contains(&key.as_str()) {
                return Err(format!("unsupported paint key {key:?}"));
            }
            if IGNORED_PAINT_KEYS.contains(&key.as_str()) {
                self.warnings.push(format!("command {i}: paint key {key:?} ignored"));
            }
        }

        let mut fill = match json.get("color") {
            Some(color) => Fill::from_argb(argb(color)?),
            None => Fill::BLACK,
        };
        if let Some(shader) = json.get("shader") {
            fill = shader_fill(shader)?;
            self.warnings.push(format!("command {i}: gradient stops reduced to opacity"));
        }

        let style = match json.get("style").map(|s| s.as_str().ok_or("style must be a string")).transpose()? {
            None | Some("fill") => Style::Solid,
            Some("stroke") => {
                let width = json.get("strokeWidth").map(number).transpose()?.unwrap_or(0.0);
                Style::Stroke(width)
            }
            Some(other) => return Err(format!("unsupported style {other:?}")),
        };

        let color_filter = match json.get("colorfilter") {
            None => Filter::Id,
            Some(filter) => color_filter(filter)?,
        };

        let blend_mode = match json.get("blendMode") {
            None => BlendMode::SrcOver,
            Some(mode) => {
                let name = mode.as_str().ok_or("blendMode must be a string")?;
                BlendMode::from_str(name).map_err(|e| e.to_string())?
            }
        };

        Ok(Paint { fill, blend_mode, style, color_filter, index: i })
    }

    fn finish(self) -> Result<Compiled, CompileError> {
        if !self.saved.is_empty() {
            return Err(CompileError::global(format!(
                "unbalanced Save/SaveLayer: {} left open",
                self.saved.len()
            )));
        }
        Ok(Compiled { layer: self.state.layer, paths: self.paths, warnings: self.warnings })
    }
}

// ── JSON readers ──────────────────────────────────────────────────────────

fn field<'v>(data: &'v Value, key: &str) -> Res<&'v Value> {
    data.get(key).ok_or_else(|| format!("missing {key:?}"))
}

fn number(v: &Value) -> Res<f32> {
    let n = v.as_f64().ok_or_else(|| format!("expected a number, got {v}"))? as f32;
    if n.is_finite() { Ok(n) } else { Err(format!("non-finite number {v}")) }
}

fn numbers<const N: usize>(v: &Value) -> Res<[f32; N]> {
    let items = v.as_array().ok_or_else(|| format!("expected an array, got {v}"))?;
    if items.len() != N {
        return Err(format!("expected {N} numbers, got {}", items.len()));
    }
    let mut out = [0.0; N];
    for (dst, item) in out.iter_mut().zip(items) {
        *dst = number(item)?;
    }
    Ok(out)
}

fn ltrb(v: &Value) -> Res<[f32; 4]> {
    numbers(v)
}

/// `[[l, t, r, b], [ulx, uly], [urx, ury], [lrx, lry], [llx, lly]]`
fn rrect(v: &Value) -> Res<[f32; 12]> {
    let parts = v.as_array().filter(|a| a.len() == 5).ok_or("rrect coords must hold a rect and four radii")?;
    let mut out = [0.0; 12];
    out[..4].copy_from_slice(&ltrb(&parts[0])?);
    for (k, corner) in parts[1..].iter().enumerate() {
        let [x, y] = numbers(corner)?;
        out[4 + 2 * k] = x;
        out[5 + 2 * k] = y;
    }
    Ok(out)
}

/// Four rows of four.
fn matrix(v: &Value) -> Res<Transform> {
    let rows = v.as_array().filter(|r| r.len() == 4).ok_or("matrix must have 4 rows")?;
    let mut m = [0.0; 16];
    for (r, row) in rows.iter().enumerate() {
        m[r * 4..r * 4 + 4].copy_from_slice(&numbers::<4>(row)?);
    }
    Ok(Transform(m))
}

fn argb(v: &Value) -> Res<[u8; 4]> {
    let items = v.as_array().filter(|a| a.len() == 4).ok_or("color must be [a, r, g, b]")?;
    let mut out = [0u8; 4];
    for (dst, item) in out.iter_mut().zip(items) {
        *dst = item
            .as_u64()
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(|| format!("color channel out of range: {item}"))?;
    }
    Ok(out)
}

fn shader_fill(shader: &Value) -> Res<Fill> {
    let values = shader.get("values").and_then(Value::as_object).ok_or("shader has no values")?;
    let opaque = |inner: &Value| -> Res<bool> {
        let stops = inner.get("01_colorArray").and_then(Value::as_array).ok_or("gradient has no colors")?;
        Ok(stops.iter().all(|stop| stop.get(0).and_then(Value::as_f64) == Some(1.0)))
    };
    if let Some(inner) = values.get("01_SkLinearGradient") {
        Ok(Fill::LinearGradient { is_opaque: opaque(inner)? })
    } else if let Some(inner) = values.get("01_SkRadialGradient") {
        Ok(Fill::RadialGradient { is_opaque: opaque(inner)? })
    } else {
        Err("unsupported shader".into())
    }
}

fn color_filter(filter: &Value) -> Res<Filter> {
    let name = filter.get("name").and_then(Value::as_str).ok_or("color filter has no name")?;
    if name != "SkRuntimeColorFilter" {
        return Err(format!("unsupported color filter {name:?}"));
    }
    let source = filter
        .get("values")
        .and_then(|v| v.get("01_string"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if source.contains("sk_luma") {
        Ok(Filter::Luma)
    } else {
        Err("runtime color filter is not a luma filter".into())
    }
}

/// Rebuilds a path from its SKP form (`{"fillType", "verbs"}`).
pub fn path_from_json(v: &Value) -> Result<Path, String> {
    let fill_type = match v.get("fillType") {
        None => FillType::Winding,
        Some(name) => name
            .as_str()
            .and_then(FillType::from_name)
            .ok_or_else(|| format!("unknown fillType {name}"))?,
    };
    let verbs = v.get("verbs").and_then(Value::as_array).ok_or("path has no verbs")?;

    let mut path = Path::new();
    path.set_fill_type(fill_type);
    for verb in verbs {
        match verb {
            Value::String(s) if s == "close" => {
                path.close();
            }
            Value::Object(map) => add_verb(&mut path, map)?,
            other => return Err(format!("unknown verb {other}")),
        }
    }
    Ok(path)
}

fn add_verb(path: &mut Path, map: &Map<String, Value>) -> Res<()> {
    let (key, pts) = map.iter().next().ok_or("empty verb")?;
    let pts_of = |n: usize| -> Res<Vec<[f32; 2]>> {
        let items = pts.as_array().ok_or("verb points must be an array")?;
        items.iter().take(n).map(numbers::<2>).collect()
    };
    match key.as_str() {
        "move" => {
            let [x, y] = numbers(pts)?;
            path.move_to(x, y);
        }
        "line" => {
            let [x, y] = numbers(pts)?;
            path.line_to(x, y);
        }
        "quad" => match pts_of(2)?.as_slice() {
            &[[x1, y1], [x2, y2]] => {
                path.quad_to(x1, y1, x2, y2);
            }
            _ => return Err("quad needs 2 points".into()),
        },
        "conic" => {
            let w = pts.get(2).ok_or("conic needs a weight").and_then(|w| number(w).map_err(|_| "bad conic weight"))?;
            match pts_of(2)?.as_slice() {
                &[[x1, y1], [x2, y2]] => {
                    path.conic_to(x1, y1, x2, y2, w);
                }
                _ => return Err("conic needs 2 points".into()),
            }
        }
        "cubic" => match pts_of(3)?.as_slice() {
            &[[x1, y1], [x2, y2], [x3, y3]] => {
                path.cubic_to(x1, y1, x2, y2, x3, y3);
            }
            _ => return Err("cubic needs 3 points".into()),
        },
        other => return Err(format!("unknown verb {other:?}")),
    }
    Ok(())
}
