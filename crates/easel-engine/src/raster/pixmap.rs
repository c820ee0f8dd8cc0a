use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

use super::{RasterError, MAX_DIMENSION};

/// One premultiplied RGBA8 pixel, laid out as four bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
pub struct PremulRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PremulRgba8 {
    pub const TRANSPARENT: PremulRgba8 = PremulRgba8 { r: 0, g: 0, b: 0, a: 0 };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantizes a premultiplied color, rounding to nearest.
    #[inline]
    pub fn from_color(c: Color) -> Self {
        let c = c.clamped();
        let q = |v: f32| (v * 255.0).round() as u8;
        Self { r: q(c.r), g: q(c.g), b: q(c.b), a: q(c.a) }
    }

    #[inline]
    pub fn to_color(self) -> Color {
        Color::from_premul(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }

    /// Straight-alpha bytes `[r, g, b, a]`.
    #[inline]
    pub fn unpremultiply(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = self.a as u32;
        let un = |v: u8| ((v as u32 * 255 + a / 2) / a).min(255) as u8;
        [un(self.r), un(self.g), un(self.b), self.a]
    }
}

/// Row-major premultiplied pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<PremulRgba8>,
}

impl Pixmap {
    /// Allocates a transparent pixmap.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![PremulRgba8::TRANSPARENT; width as usize * height as usize],
        })
    }

    /// Same size as `self`, every pixel transparent.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: vec![PremulRgba8::TRANSPARENT; self.pixels.len()],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[PremulRgba8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [PremulRgba8] {
        &mut self.pixels
    }

    /// Raw premultiplied RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(PremulRgba8::from_color(color));
    }

    /// Straight-alpha RGBA bytes, as stored in PNG files.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.unpremultiply()).collect()
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixels[y as usize * self.width as usize + x as usize].unpremultiply())
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        let path = path.as_ref();
        self.to_rgba_image().save_with_format(path, image::ImageFormat::Png)?;
        log::info!("wrote {}x{} png to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_transparent() {
        let pm = Pixmap::new(4, 3).unwrap();
        assert_eq!(pm.pixels().len(), 12);
        assert!(pm.pixels().iter().all(|p| *p == PremulRgba8::TRANSPARENT));
        assert_eq!(pm.as_bytes().len(), 48);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(Pixmap::new(0, 10), Err(RasterError::InvalidSize { width: 0, height: 10 })));
        assert!(Pixmap::new(MAX_DIMENSION + 1, 1).is_err());
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let pm = Pixmap::new(2, 2).unwrap();
        assert!(pm.pixel(1, 1).is_some());
        assert!(pm.pixel(2, 0).is_none());
    }

    #[test]
    fn unpremultiply_half_red() {
        let px = PremulRgba8::from_color(Color::RED.with_alpha(0.5));
        assert_eq!(px, PremulRgba8::new(128, 0, 0, 128));
        assert_eq!(px.unpremultiply(), [255, 0, 0, 128]);
    }

    #[test]
    fn rgba_export_matches_fill() {
        let mut pm = Pixmap::new(2, 1).unwrap();
        pm.fill(Color::BLUE);
        assert_eq!(pm.to_rgba8(), vec![0, 0, 255, 255, 0, 0, 255, 255]);
        assert_eq!(pm.to_rgba_image().get_pixel(1, 0).0, [0, 0, 255, 255]);
    }
}
