use serde_json::{json, Map, Value};

use crate::coords::{Matrix, Path, RRect, Rect, Verb};
use crate::paint::{BlendMode, ColorFilter, Paint, Style};

/// SkSL source of the luma runtime color filter, as Skia serializes it.
const LUMA_SKSL: &str = "half4 main(half4 color) { return sk_luma(color.rgb).000r; }";

pub(crate) fn rect_json(r: Rect) -> Value {
    json!(r.ltrb())
}

/// `[[l, t, r, b], [ulx, uly], [urx, ury], [lrx, lry], [llx, lly]]`
pub fn rrect_json(rr: &RRect) -> Value {
    let mut coords = vec![rect_json(rr.rect)];
    coords.extend(rr.radii.corners().iter().map(|c| json!([c.x, c.y])));
    Value::Array(coords)
}

/// Row-major 4×4, one array per row.
pub fn matrix_json(m: &Matrix) -> Value {
    let m44 = m.to_m44();
    Value::Array(m44.chunks(4).map(|row| json!(row)).collect())
}

/// `{"fillType": .., "verbs": [{"move": [x, y]}, .., "close"]}`
pub fn path_json(path: &Path) -> Value {
    let pt = |p: crate::coords::Vec2| json!([p.x, p.y]);
    let verbs: Vec<Value> = path
        .verbs()
        .iter()
        .map(|verb| match *verb {
            Verb::Move(p) => json!({ "move": pt(p) }),
            Verb::Line(p) => json!({ "line": pt(p) }),
            Verb::Quad(c, p) => json!({ "quad": [pt(c), pt(p)] }),
            Verb::Conic(c, p, w) => json!({ "conic": [pt(c), pt(p), w] }),
            Verb::Cubic(c1, c2, p) => json!({ "cubic": [pt(c1), pt(c2), pt(p)] }),
            Verb::Close => json!("close"),
        })
        .collect();
    json!({ "fillType": path.fill_type().as_str(), "verbs": verbs })
}

/// Paint object in SKP form. Attributes at their default value are omitted,
/// except `color`, which is always present.
pub fn paint_json(paint: &Paint) -> Value {
    let mut out = Map::new();
    out.insert("color".into(), json!(paint.color().to_argb()));

    if paint.style() == Style::Stroke {
        out.insert("style".into(), json!("stroke"));
        out.insert("strokeWidth".into(), json!(paint.stroke_width()));
    }
    if paint.blend_mode() != BlendMode::SrcOver {
        out.insert("blendMode".into(), json!(paint.blend_mode().name()));
    }
    if paint.anti_alias() {
        out.insert("antiAlias".into(), json!(true));
    }
    if paint.color_filter() == ColorFilter::Luma {
        out.insert(
            "colorfilter".into(),
            json!({
                "name": "SkRuntimeColorFilter",
                "data": 0,
                "values": {
                    "00_int": 0,
                    "01_string": LUMA_SKSL,
                    "02_byteArray": [],
                    "03_int": 0,
                },
            }),
        );
    }
    Value::Object(out)
}
