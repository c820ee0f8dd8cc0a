use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use easel_engine::draws::{self, UNIT_DRAWS};
use easel_engine::paint::Color;
use easel_engine::raster::{Surface, SurfaceConfig};
use easel_engine::scene::PictureRecorder;
use easel_lskia::{Layer, PathTable};
use serde_json::Value;

/// Parses `#rrggbb` or `#rrggbbaa` into a color.
pub fn parse_color(s: &str) -> Result<Color, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected #rrggbb or #rrggbbaa, got {s:?}"));
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(Color::from_argb(a, byte(0)?, byte(2)?, byte(4)?))
}

pub fn list() {
    for unit in UNIT_DRAWS {
        println!("{}", unit.name);
    }
}

pub fn draw(name: &str, output: &Path, config: SurfaceConfig) -> Result<()> {
    let unit = draws::find(name).ok_or_else(|| anyhow!("unknown unit draw {name:?}; see `easel list`"))?;
    let mut surface = Surface::from_config(config)?;
    (unit.draw)(&mut surface.canvas());
    surface.save_png(output).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

pub fn units(dir: &Path, config: SurfaceConfig) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for unit in UNIT_DRAWS {
        let mut surface = Surface::from_config(config)?;
        (unit.draw)(&mut surface.canvas());
        let png = dir.join(format!("unit__{}.png", unit.name));
        surface.save_png(&png).with_context(|| format!("writing {}", png.display()))?;

        let mut recorder = PictureRecorder::new();
        (unit.draw)(&mut recorder);
        let json = serde_json::to_string_pretty(&recorder.finish().to_skp_json())?;
        let path = dir.join(format!("unit__{}.json", unit.name));
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    log::info!("wrote {} unit draws to {}", UNIT_DRAWS.len(), dir.display());
    Ok(())
}

pub fn verify(input: &Path) -> Result<()> {
    let skp = read_json(input)?;
    easel_lskia::verify(&skp)?;
    let count = skp["commands"].as_array().map_or(0, Vec::len);
    println!("{}: ok ({count} commands)", input.display());
    Ok(())
}

pub fn compile(input: &Path, output: Option<&Path>) -> Result<()> {
    let compiled = compile_json(input)?;
    let term = format!("(let test {})", compiled.layer.sexp());
    match output {
        Some(path) => {
            fs::write(path, term + "\n").with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{term}"),
    }
    Ok(())
}

pub fn print(input: &Path) -> Result<()> {
    let (layer, _) = load(input)?;
    print!("{}", layer.pretty());
    Ok(())
}

pub fn render(input: &Path, output: &Path, config: SurfaceConfig) -> Result<()> {
    let (layer, paths) = load(input)?;
    let mut surface = Surface::from_config(config)?;
    easel_lskia::render(&layer, &paths, &mut surface.canvas())
        .with_context(|| format!("rendering {}", input.display()))?;
    surface.save_png(output).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

// ── input ─────────────────────────────────────────────────────────────────

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn compile_json(path: &Path) -> Result<easel_lskia::Compiled> {
    let skp = read_json(path)?;
    let compiled = easel_lskia::compile(&skp).with_context(|| format!("compiling {}", path.display()))?;
    for warning in &compiled.warnings {
        log::warn!("{warning}");
    }
    Ok(compiled)
}

/// SKP JSON (`.json`) is compiled; anything else is read as a λSkia term.
/// Terms carry no path table, so they cannot render `Path` geometry.
fn load(path: &Path) -> Result<(Layer, PathTable)> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let compiled = compile_json(path)?;
        return Ok((compiled.layer, compiled.paths));
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let layer = easel_lskia::parse_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok((layer, PathTable::new()))
}
