//! Structural checks on SKP JSON, run before compilation to report the
//! first command that falls outside the supported subset.

use std::str::FromStr;

use easel_engine::paint::BlendMode;
use serde_json::{Map, Value};

use crate::error::VerifyError;

type Res = Result<(), String>;

/// Verifies every command of an SKP JSON document.
pub fn verify(skp: &Value) -> Result<(), VerifyError> {
    let commands = skp.get("commands").and_then(Value::as_array).ok_or_else(|| VerifyError {
        index: 0,
        command: "?".into(),
        reason: "missing \"commands\" array".into(),
    })?;
    for (index, command) in commands.iter().enumerate() {
        verify_command(command).map_err(|reason| VerifyError {
            index,
            command: command.get("command").and_then(Value::as_str).unwrap_or("?").to_string(),
            reason,
        })?;
    }
    Ok(())
}

fn require(command: &Value, keys: &[&str]) -> Res {
    for key in keys {
        if command.get(key).is_none() {
            return Err(format!("missing {key:?}"));
        }
    }
    Ok(())
}

fn verify_command(command: &Value) -> Res {
    let name = command.get("command").and_then(Value::as_str).ok_or("missing command name")?;
    match name {
        "DrawPaint" => require(command, &["paint"])?,
        "DrawRect" | "DrawRRect" | "DrawOval" => require(command, &["coords", "paint"])?,
        "DrawPath" => {
            require(command, &["path", "paint"])?;
            verify_path(&command["path"])?;
        }
        "DrawTextBlob" => require(command, &["x", "y", "runs", "paint"])?,
        "DrawImageRect" => require(command, &["image", "src", "dst", "sampling", "paint"])?,
        "DrawDRRect" => require(command, &["outer", "inner", "paint"])?,
        "DrawPoints" => {
            require(command, &["mode", "points", "paint"])?;
            if command["mode"] != "lines" {
                return Err(format!("unsupported points mode {}", command["mode"]));
            }
        }
        "Save" | "Restore" | "SaveLayer" => {}
        "Concat44" | "SetM44" => require(command, &["matrix"])?,
        "ClipRect" | "ClipRRect" => {
            require(command, &["coords", "op"])?;
            verify_clip_op(&command["op"])?;
        }
        "ClipPath" => {
            require(command, &["path", "op"])?;
            verify_path(&command["path"])?;
            verify_clip_op(&command["op"])?;
        }
        other => return Err(format!("unknown command {other:?}")),
    }
    match command.get("paint") {
        Some(paint) => verify_paint(paint),
        None => Ok(()),
    }
}

fn verify_clip_op(op: &Value) -> Res {
    match op.as_str() {
        Some("intersect" | "difference") => Ok(()),
        _ => Err(format!("unknown clip op {op}")),
    }
}

fn verify_paint(paint: &Value) -> Res {
    let paint = paint.as_object().ok_or("paint must be an object")?;
    for (key, value) in paint {
        match key.as_str() {
            "color" | "strokeWidth" | "strokeMiter" | "dither" | "antiAlias" | "imagefilter" => {}
            "blendMode" => {
                let name = value.as_str().ok_or("blendMode must be a string")?;
                BlendMode::from_str(name).map_err(|e| e.to_string())?;
            }
            "blur" => {
                let blur = value.as_object().ok_or("blur must be an object")?;
                if !blur.contains_key("sigma") {
                    return Err("blur has no sigma".into());
                }
                if blur.get("style").and_then(Value::as_str) != Some("normal") {
                    return Err(format!("unknown blur style {}", blur.get("style").unwrap_or(&Value::Null)));
                }
            }
            "style" => one_of(value, "draw style", &["fill", "stroke"])?,
            "cap" => one_of(value, "stroke cap", &["butt", "round", "square"])?,
            "strokeJoin" => one_of(value, "stroke join", &["miter", "round", "bevel"])?,
            "shader" => verify_shader(value)?,
            "colorfilter" => verify_color_filter(value)?,
            "dashing" => {
                if value.get("intervals").is_none() || value.get("phase").is_none() {
                    return Err("dashing needs intervals and phase".into());
                }
            }
            other => return Err(format!("unknown paint attribute {other:?}")),
        }
    }
    Ok(())
}

fn one_of(value: &Value, what: &str, allowed: &[&str]) -> Res {
    match value.as_str() {
        Some(s) if allowed.contains(&s) => Ok(()),
        _ => Err(format!("unknown {what} {value}")),
    }
}

fn named(value: &Value, what: &str) -> Result<(String, Map<String, Value>), String> {
    let obj = value.as_object().ok_or_else(|| format!("{what} must be an object"))?;
    for key in ["name", "data", "values"] {
        if !obj.contains_key(key) {
            return Err(format!("{what} has no {key:?}"));
        }
    }
    let name = obj["name"].as_str().ok_or_else(|| format!("{what} name must be a string"))?;
    let values = obj["values"].as_object().cloned().unwrap_or_default();
    Ok((name.to_string(), values))
}

fn verify_color_filter(filter: &Value) -> Res {
    let (name, values) = named(filter, "color filter")?;
    let needed: &[&str] = match name.as_str() {
        "SkBlendModeColorFilter" => &["00_color", "01_uint"],
        "SkRuntimeColorFilter" => &["00_int", "01_string", "02_byteArray", "03_int"],
        other => return Err(format!("unknown color filter {other:?}")),
    };
    match needed.iter().find(|k| !values.contains_key(**k)) {
        Some(k) => Err(format!("{name} has no {k:?}")),
        None => Ok(()),
    }
}

fn verify_shader(shader: &Value) -> Res {
    let (name, values) = named(shader, "shader")?;
    if name != "SkLocalMatrixShader" {
        return Err(format!("unknown outer shader {name:?}"));
    }
    for (key, value) in &values {
        if key == "00_matrix" {
            continue;
        }
        match key.strip_prefix("01_") {
            Some(inner) => verify_inner_shader(inner, value)?,
            None => return Err(format!("unknown SkLocalMatrixShader key {key:?}")),
        }
    }
    Ok(())
}

fn verify_inner_shader(name: &str, shader: &Value) -> Res {
    let has = |k: &str| shader.get(k).is_some();
    // Optional color-space and position arrays shift the later indices.
    let shift = usize::from(has("02_byteArray"));
    let shift = shift + usize::from(has(format!("{:02}_scalarArray", 2 + shift).as_str()));
    let at = |i: usize, kind: &str| format!("{:02}_{kind}", i + shift);

    let needed: Vec<String> = match name {
        "SkLinearGradient" => vec!["00_uint".into(), "01_colorArray".into(), at(2, "point"), at(3, "point")],
        "SkRadialGradient" => vec!["00_uint".into(), "01_colorArray".into(), at(2, "point"), at(3, "scalar")],
        "SkPictureShader" => vec!["00_int".into(), "01_int".into(), "02_rect".into(), "03_int".into()],
        "SkImageShader" => ["00_uint", "01_uint", "02_sampling", "03_image", "04_bool"].map(String::from).to_vec(),
        other => return Err(format!("unknown shader {other:?}")),
    };
    match needed.iter().find(|k| !has(k.as_str())) {
        Some(k) => Err(format!("{name} has no {k:?}")),
        None => Ok(()),
    }
}

fn verify_path(path: &Value) -> Res {
    let fill = path.get("fillType").and_then(Value::as_str);
    if !matches!(fill, Some("winding" | "evenOdd" | "inverseWinding" | "inverseEvenOdd")) {
        return Err(format!("unknown fill type {}", path.get("fillType").unwrap_or(&Value::Null)));
    }
    let verbs = path.get("verbs").and_then(Value::as_array).ok_or("path has no verbs")?;
    for verb in verbs {
        match verb {
            Value::Object(map) => {
                for key in map.keys() {
                    if !matches!(key.as_str(), "move" | "line" | "quad" | "conic" | "cubic") {
                        return Err(format!("unknown verb {key:?}"));
                    }
                }
            }
            Value::String(s) if s == "close" => {}
            other => return Err(format!("unknown verb {other}")),
        }
    }
    Ok(())
}
