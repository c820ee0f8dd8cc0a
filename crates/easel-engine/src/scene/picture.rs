use serde_json::{json, Map, Value};

use crate::canvas::Canvas;
use crate::coords::{CornerRadii, RRect, Shape};

use super::json::{matrix_json, paint_json, path_json, rect_json, rrect_json};
use super::DrawCmd;

/// An immutable, balanced list of recorded canvas calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picture {
    commands: Vec<DrawCmd>,
}

impl Picture {
    pub(crate) fn new(commands: Vec<DrawCmd>) -> Self {
        Self { commands }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays every command onto `canvas`, restoring to the entry save
    /// count afterwards.
    pub fn playback(&self, canvas: &mut dyn Canvas) {
        let count = canvas.save_count();
        for cmd in &self.commands {
            match cmd {
                DrawCmd::Save => {
                    canvas.save();
                }
                DrawCmd::SaveLayer(paint) => {
                    canvas.save_layer(paint.as_ref());
                }
                DrawCmd::Restore => {
                    if canvas.save_count() > count {
                        canvas.restore();
                    }
                }
                DrawCmd::Concat(m) => canvas.concat(m),
                DrawCmd::SetMatrix(m) => canvas.set_matrix(m),
                DrawCmd::Clip { shape, op } => canvas.clip_shape(shape, *op),
                DrawCmd::DrawPaint(paint) => canvas.draw_paint(paint),
                DrawCmd::Draw { shape, paint } => canvas.draw_shape(shape, paint),
            }
        }
        canvas.restore_to_count(count);
    }

    /// SKP JSON: `{"version": 1, "commands": [..]}` with one object per
    /// command, in the layout the Skia debugger writes.
    pub fn to_skp_json(&self) -> Value {
        let commands: Vec<Value> = self.commands.iter().map(command_json).collect();
        json!({ "version": 1, "commands": commands })
    }
}

fn command_json(cmd: &DrawCmd) -> Value {
    let mut out = Map::new();
    out.insert("command".into(), json!(cmd.name()));
    out.insert("visible".into(), json!(true));

    match cmd {
        DrawCmd::Save | DrawCmd::Restore => {}
        DrawCmd::SaveLayer(paint) => {
            if let Some(paint) = paint {
                out.insert("paint".into(), paint_json(paint));
            }
        }
        DrawCmd::Concat(m) | DrawCmd::SetMatrix(m) => {
            out.insert("matrix".into(), matrix_json(m));
        }
        DrawCmd::Clip { shape, op } => {
            insert_shape(&mut out, shape, true);
            out.insert("op".into(), json!(op.as_str()));
        }
        DrawCmd::DrawPaint(paint) => {
            out.insert("paint".into(), paint_json(paint));
        }
        DrawCmd::Draw { shape, paint } => {
            insert_shape(&mut out, shape, false);
            out.insert("paint".into(), paint_json(paint));
        }
    }
    Value::Object(out)
}

fn insert_shape(out: &mut Map<String, Value>, shape: &Shape, clip: bool) {
    match shape {
        Shape::Rect(r) => {
            out.insert("coords".into(), rect_json(*r));
        }
        Shape::Oval(r) if clip => {
            // SKP has no oval clip; an rrect with half-size radii is the same ellipse.
            let r = r.normalized();
            let h = r.size * 0.5;
            out.insert("coords".into(), rrect_json(&RRect::new(r, CornerRadii::new(h, h, h, h))));
        }
        Shape::Oval(r) => {
            out.insert("coords".into(), rect_json(*r));
        }
        Shape::RRect(rr) => {
            out.insert("coords".into(), rrect_json(rr));
        }
        Shape::Path(p) => {
            out.insert("path".into(), path_json(p));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Path, Rect};
    use crate::paint::{Color, Paint};
    use crate::scene::PictureRecorder;
    use crate::ClipOp;

    fn simple() -> Picture {
        let mut rec = PictureRecorder::new();
        rec.save();
        rec.translate(4.0, 0.0);
        rec.clip_rect(Rect::from_ltrb(0.0, 0.0, 8.0, 8.0), ClipOp::Intersect);
        rec.draw_rect(Rect::from_ltrb(1.0, 2.0, 3.0, 4.0), &Paint::solid(Color::RED));
        rec.restore();
        rec.finish()
    }

    // ── export ────────────────────────────────────────────────────────────

    #[test]
    fn commands_are_named_in_order() {
        let v = simple().to_skp_json();
        let names: Vec<&str> = v["commands"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["command"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Save", "Concat44", "ClipRect", "DrawRect", "Restore"]);
    }

    #[test]
    fn draw_rect_layout() {
        let v = simple().to_skp_json();
        let draw = &v["commands"][3];
        assert_eq!(draw["coords"], json!([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(draw["paint"]["color"], json!([255, 255, 0, 0]));
        assert_eq!(v["commands"][2]["op"], "intersect");
    }

    #[test]
    fn oval_clip_becomes_rrect() {
        let mut rec = PictureRecorder::new();
        rec.clip_shape(&Shape::Oval(Rect::from_ltrb(0.0, 0.0, 10.0, 4.0)), ClipOp::Intersect);
        let v = rec.finish().to_skp_json();
        assert_eq!(v["commands"][0]["command"], "ClipRRect");
        assert_eq!(v["commands"][0]["coords"][1], json!([5.0, 2.0]));
    }

    #[test]
    fn path_draw_carries_path() {
        let mut rec = PictureRecorder::new();
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(1.0, 1.0);
        rec.draw_path(&path, &Paint::new());
        let v = rec.finish().to_skp_json();
        assert_eq!(v["commands"][0]["path"]["fillType"], "winding");
        assert_eq!(v["commands"][0]["path"]["verbs"].as_array().unwrap().len(), 2);
    }

    // ── playback ──────────────────────────────────────────────────────────

    #[test]
    fn playback_into_recorder_is_identity() {
        let picture = simple();
        let mut rec = PictureRecorder::new();
        picture.playback(&mut rec);
        assert_eq!(rec.finish(), picture);
    }
}
