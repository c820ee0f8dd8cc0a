//! Named unit draws.
//!
//! Each entry draws a small fixed scene through the [`Canvas`] contract. The
//! registry is the shared fixture for the raster backend, the SKP exporter,
//! and the λSkia round trip.

use crate::canvas::{Canvas, ClipOp};
use crate::coords::{CornerRadii, Path, RRect, Rect};
use crate::paint::{Color, Paint, Style};

/// A registered draw function.
#[derive(Debug, Copy, Clone)]
pub struct UnitDraw {
    pub name: &'static str,
    pub draw: fn(&mut dyn Canvas),
}

/// Every unit draw, ordered by name.
pub const UNIT_DRAWS: &[UnitDraw] = &[
    UnitDraw { name: "000_simpleDraw", draw: simple_draw },
    UnitDraw { name: "001_clipRect", draw: clip_rect },
    UnitDraw { name: "002_translatedOval", draw: translated_oval },
    UnitDraw { name: "003_layerAlpha", draw: layer_alpha },
    UnitDraw { name: "004_strokedRRect", draw: stroked_rrect },
    UnitDraw { name: "005_differenceClipPath", draw: difference_clip_path },
];

/// Looks a unit draw up by its registered name.
pub fn find(name: &str) -> Option<&'static UnitDraw> {
    UNIT_DRAWS.iter().find(|d| d.name == name)
}

/// Fills the rectangle (20, 20)–(100, 100) with opaque red.
pub fn simple_draw(canvas: &mut dyn Canvas) {
    let mut paint = Paint::default();
    paint.set_color(Color::RED);
    canvas.draw_rect(Rect::from_ltrb(20.0, 20.0, 100.0, 100.0), &paint);
}

pub fn clip_rect(canvas: &mut dyn Canvas) {
    canvas.save();
    canvas.clip_rect(Rect::from_ltrb(40.0, 40.0, 200.0, 160.0), ClipOp::Intersect);
    canvas.draw_paint(&Paint::solid(Color::from_argb(255, 0, 128, 255)));
    canvas.draw_rect(Rect::from_ltrb(100.0, 100.0, 300.0, 300.0), &Paint::solid(Color::RED));
    canvas.restore();
}

pub fn translated_oval(canvas: &mut dyn Canvas) {
    canvas.save();
    canvas.translate(50.0, 60.0);
    canvas.scale(2.0, 1.0);
    canvas.draw_oval(Rect::from_ltrb(0.0, 0.0, 100.0, 80.0), &Paint::solid(Color::GREEN));
    canvas.restore();
}

pub fn layer_alpha(canvas: &mut dyn Canvas) {
    let mut layer = Paint::new();
    layer.set_color(Color::from_argb(128, 0, 0, 0));

    canvas.save_layer(Some(&layer));
    canvas.draw_rect(Rect::from_ltrb(40.0, 40.0, 200.0, 200.0), &Paint::solid(Color::RED));
    canvas.draw_rect(Rect::from_ltrb(120.0, 120.0, 280.0, 280.0), &Paint::solid(Color::BLUE));
    canvas.restore();
}

pub fn stroked_rrect(canvas: &mut dyn Canvas) {
    let mut paint = Paint::solid(Color::from_argb(255, 20, 120, 40));
    paint.set_style(Style::Stroke).set_stroke_width(8.0);
    let rrect = RRect::new(Rect::from_ltrb(60.0, 60.0, 300.0, 220.0), CornerRadii::all(24.0));
    canvas.draw_rrect(rrect, &paint);
}

pub fn difference_clip_path(canvas: &mut dyn Canvas) {
    let mut hole = Path::new();
    hole.move_to(128.0, 32.0).line_to(224.0, 224.0).line_to(32.0, 224.0).close();

    canvas.save();
    canvas.clip_path(&hole, ClipOp::Difference);
    canvas.draw_rect(Rect::from_ltrb(0.0, 0.0, 256.0, 256.0), &Paint::solid(Color::BLUE));
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{PremulRgba8, Surface, SurfaceConfig};

    const RED: PremulRgba8 = PremulRgba8::new(255, 0, 0, 255);
    const WHITE: PremulRgba8 = PremulRgba8::new(255, 255, 255, 255);

    fn render(draw: fn(&mut dyn Canvas), background: Color) -> Surface {
        let config = SurfaceConfig { background, ..SurfaceConfig::default() };
        let mut surface = Surface::from_config(config).unwrap();
        draw(&mut surface.canvas());
        surface
    }

    // ── simple draw ───────────────────────────────────────────────────────

    #[test]
    fn simple_draw_fills_exactly_the_rect() {
        let surface = render(simple_draw, Color::WHITE);
        let pm = surface.pixmap();
        for y in 0..pm.height() {
            for x in 0..pm.width() {
                let inside = (20..100).contains(&x) && (20..100).contains(&y);
                let expected = if inside { RED } else { WHITE };
                assert_eq!(pm.pixel(x, y).unwrap(), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn simple_draw_on_transparent_surface() {
        let surface = render(simple_draw, Color::TRANSPARENT);
        let pm = surface.pixmap();
        assert_eq!(pm.pixel(20, 20).unwrap(), RED);
        assert_eq!(pm.pixel(99, 99).unwrap(), RED);
        assert_eq!(pm.pixel(100, 50).unwrap(), PremulRgba8::TRANSPARENT);
        assert_eq!(pm.pixel(19, 50).unwrap(), PremulRgba8::TRANSPARENT);
    }

    #[test]
    fn simple_draw_on_small_canvas_is_clamped() {
        let config = SurfaceConfig { width: 50, height: 50, background: Color::TRANSPARENT };
        let mut surface = Surface::from_config(config).unwrap();
        simple_draw(&mut surface.canvas());
        assert_eq!(surface.pixmap().pixel(49, 49).unwrap(), RED);
        assert_eq!(surface.pixmap().pixel(19, 19).unwrap(), PremulRgba8::TRANSPARENT);
    }

    // ── registry ──────────────────────────────────────────────────────────

    #[test]
    fn registry_names_are_sorted_and_unique() {
        let names: Vec<&str> = UNIT_DRAWS.iter().map(|d| d.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find("000_simpleDraw").map(|d| d.name), Some("000_simpleDraw"));
        assert!(find("999_missing").is_none());
    }

    #[test]
    fn every_draw_changes_the_surface() {
        for unit in UNIT_DRAWS {
            let surface = render(unit.draw, Color::WHITE);
            let touched = surface.pixmap().pixels().iter().any(|p| *p != WHITE);
            assert!(touched, "{} drew nothing", unit.name);
        }
    }

    // ── other draws ───────────────────────────────────────────────────────

    #[test]
    fn clip_rect_confines_both_draws() {
        let surface = render(clip_rect, Color::WHITE);
        let pm = surface.pixmap();
        assert_eq!(pm.pixel(150, 150).unwrap(), RED);
        assert_eq!(pm.pixel(50, 50).unwrap(), PremulRgba8::new(0, 128, 255, 255));
        assert_eq!(pm.pixel(250, 250).unwrap(), WHITE);
        assert_eq!(pm.pixel(39, 39).unwrap(), WHITE);
    }

    #[test]
    fn translated_oval_is_stretched() {
        let surface = render(translated_oval, Color::TRANSPARENT);
        let pm = surface.pixmap();
        // Center at (150, 100), radii (100, 40).
        assert_eq!(pm.pixel(150, 100).unwrap(), PremulRgba8::new(0, 255, 0, 255));
        assert_eq!(pm.pixel(245, 100).unwrap(), PremulRgba8::new(0, 255, 0, 255));
        assert_eq!(pm.pixel(150, 145).unwrap(), PremulRgba8::TRANSPARENT);
        assert_eq!(pm.pixel(55, 65).unwrap(), PremulRgba8::TRANSPARENT);
    }

    #[test]
    fn layer_alpha_flattens_overlap() {
        let surface = render(layer_alpha, Color::TRANSPARENT);
        let pm = surface.pixmap();
        let red = pm.pixel(60, 60).unwrap();
        let overlap = pm.pixel(150, 150).unwrap();
        assert_eq!(red.a, 128);
        assert_eq!(overlap.a, 128);
        assert_eq!(overlap.r, 0);
        assert!(overlap.b > 0);
    }

    #[test]
    fn stroked_rrect_leaves_interior_empty() {
        let surface = render(stroked_rrect, Color::TRANSPARENT);
        let pm = surface.pixmap();
        assert_eq!(pm.pixel(180, 60).unwrap().a, 255);
        assert_eq!(pm.pixel(180, 140).unwrap(), PremulRgba8::TRANSPARENT);
        assert_eq!(pm.pixel(58, 58).unwrap(), PremulRgba8::TRANSPARENT);
    }

    #[test]
    fn difference_clip_path_cuts_a_triangle() {
        let surface = render(difference_clip_path, Color::WHITE);
        let pm = surface.pixmap();
        assert_eq!(pm.pixel(10, 10).unwrap(), PremulRgba8::new(0, 0, 255, 255));
        assert_eq!(pm.pixel(128, 150).unwrap(), WHITE);
        assert_eq!(pm.pixel(300, 300).unwrap(), WHITE);
    }
}
