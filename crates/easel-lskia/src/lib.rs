//! **λSkia**: a small functional IR for Skia pictures.
//!
//! A picture is a chain of `Draw` and `SaveLayer` nodes over `Empty`. Each
//! draw carries its own clip and transform, so the save/restore structure of
//! the source picture is compiled away.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Layer`, `Geometry`, `Paint`, `Fill`, `Transform`; s-expression and pretty printers |
//! | [`compiler`] | SKP JSON → λSkia (`compile`, `Compiled`, `PathTable`) |
//! | [`verify`] | structural checks on SKP JSON |
//! | [`lexer`], [`parser`] | s-expression reader (`parse_str`) |
//! | [`render`] | λSkia → any [`easel_engine::Canvas`] |
//! | [`error`] | `ParseError`, `CompileError`, `VerifyError`, `RenderError` |
//!
//! # Quick start
//!
//! ```rust
//! use easel_engine::Canvas;
//! use easel_engine::coords::Rect;
//! use easel_engine::paint::{Color, Paint};
//! use easel_engine::scene::PictureRecorder;
//!
//! let mut rec = PictureRecorder::new();
//! rec.draw_rect(Rect::from_ltrb(20.0, 20.0, 100.0, 100.0), &Paint::solid(Color::RED));
//! let skp = rec.finish().to_skp_json();
//!
//! let compiled = easel_lskia::compile(&skp).unwrap();
//! assert!(compiled.layer.sexp().starts_with("(Draw (Empty) (Rect 20.0 20.0 100.0 100.0)"));
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod verify;

pub use ast::Layer;
pub use compiler::{compile, compile_commands, Compiled, PathTable};
pub use error::{CompileError, ParseError, RenderError, VerifyError};
pub use parser::parse_str;
pub use render::render;
pub use verify::verify;


#[cfg(test)]
mod round_trip_tests {
    use easel_engine::draws::UNIT_DRAWS;
    use easel_engine::raster::Surface;
    use easel_engine::scene::PictureRecorder;

    use super::*;

    fn compiled(draw: fn(&mut dyn easel_engine::Canvas)) -> Compiled {
        let mut rec = PictureRecorder::new();
        draw(&mut rec);
        let skp = rec.finish().to_skp_json();
        verify(&skp).unwrap();
        compile(&skp).unwrap()
    }

    #[test]
    fn unit_draws_render_identically_after_compilation() {
        for unit in UNIT_DRAWS {
            let mut direct = Surface::new(512, 512).unwrap();
            (unit.draw)(&mut direct.canvas());

            let out = compiled(unit.draw);
            let mut replayed = Surface::new(512, 512).unwrap();
            render(&out.layer, &out.paths, &mut replayed.canvas()).unwrap();

            assert!(direct.pixmap().pixels() == replayed.pixmap().pixels(), "{} differs", unit.name);
        }
    }

    #[test]
    fn sexp_reads_back_unchanged() {
        for unit in UNIT_DRAWS {
            let layer = compiled(unit.draw).layer;
            assert_eq!(parse_str(&layer.sexp()).unwrap(), layer, "{}", unit.name);
            assert_eq!(parse_str(&format!("(let test {})", layer.sexp())).unwrap(), layer);
        }
    }

    #[test]
    fn simple_draw_is_a_single_red_rect() {
        let out = compiled(easel_engine::draws::simple_draw);
        assert_eq!(out.layer.draw_count(), 1);
        assert!(out.layer.sexp().contains("(Rect 20.0 20.0 100.0 100.0) (Paint (Color 1.0 1.0 0.0 0.0)"));
    }

    #[test]
    fn layer_alpha_keeps_its_save_layer() {
        let out = compiled(easel_engine::draws::layer_alpha);
        assert!(matches!(out.layer, Layer::SaveLayer { .. }));
        assert_eq!(out.layer.draw_count(), 2);
    }

    #[test]
    fn gradients_are_not_renderable() {
        let skp = serde_json::json!({ "commands": [{
            "command": "DrawPaint",
            "paint": { "shader": { "name": "SkLocalMatrixShader", "values": {
                "01_SkRadialGradient": { "01_colorArray": [[1.0, 0.0, 0.0, 0.0]] }
            }}},
        }]});
        let out = compile(&skp).unwrap();
        let mut surface = Surface::new(8, 8).unwrap();
        let err = render(&out.layer, &out.paths, &mut surface.canvas()).unwrap_err();
        assert!(matches!(err, RenderError::Unsupported { what: "radial gradient", paint_index: 0 }));
    }

    #[test]
    fn missing_path_is_reported() {
        let layer = parse_str(
            "(Draw (Empty) (Path 4) (Paint (Color 1.0 0.0 0.0 0.0) (SrcOver) (Solid) (IdFilter) 4) (Full) \
             (Matrix 1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 1.0))",
        )
        .unwrap();
        let mut surface = Surface::new(8, 8).unwrap();
        let err = render(&layer, &PathTable::new(), &mut surface.canvas()).unwrap_err();
        assert_eq!(err, RenderError::MissingPath(4));
    }

    #[test]
    fn hundred_thousand_draws_survive_every_stage() {
        const DRAWS: usize = 100_000;
        let commands: Vec<serde_json::Value> = (0..DRAWS)
            .map(|i| {
                serde_json::json!({
                    "command": "DrawRect",
                    "coords": [0, 0, 4, 4],
                    "paint": { "color": [255, i % 256, 0, 0] },
                })
            })
            .collect();
        let skp = serde_json::json!({ "commands": commands });
        verify(&skp).unwrap();
        let out = compile(&skp).unwrap();
        assert_eq!(out.layer.draw_count(), DRAWS);

        let back = parse_str(&format!("(let test {})", out.layer.sexp())).unwrap();
        assert!(back == out.layer);
        let copy = back.clone();
        drop(back);

        let mut surface = Surface::new(8, 8).unwrap();
        render(&copy, &out.paths, &mut surface.canvas()).unwrap();
        let last = ((DRAWS - 1) % 256) as u8;
        assert_eq!(surface.pixmap().pixel(1, 1), Some(easel_engine::raster::PremulRgba8::new(last, 0, 0, 255)));
        assert_eq!(surface.pixmap().pixel(5, 5), Some(easel_engine::raster::PremulRgba8::TRANSPARENT));
        drop(copy);
        drop(out);
    }
}
