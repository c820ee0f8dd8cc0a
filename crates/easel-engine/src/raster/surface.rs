use std::path::Path;

use crate::paint::Color;

use super::{Pixmap, RasterCanvas, RasterError};

/// Surface creation parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    /// Initial fill of every pixel.
    pub background: Color,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { width: 512, height: 512, background: Color::TRANSPARENT }
    }
}

/// An owned pixmap plus the means to draw into it.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::from_config(SurfaceConfig { width, height, ..SurfaceConfig::default() })
    }

    pub fn from_config(config: SurfaceConfig) -> Result<Self, RasterError> {
        let mut pixmap = Pixmap::new(config.width, config.height)?;
        if config.background != Color::TRANSPARENT {
            pixmap.fill(config.background);
        }
        log::debug!("surface {}x{} created", config.width, config.height);
        Ok(Self { pixmap })
    }

    /// A fresh canvas with an identity matrix and no clip.
    ///
    /// Unbalanced saves are resolved when the canvas is dropped.
    pub fn canvas(&mut self) -> RasterCanvas<'_> {
        RasterCanvas::new(&mut self.pixmap)
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        self.pixmap.save_png(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PremulRgba8;

    #[test]
    fn background_fills_every_pixel() {
        let config = SurfaceConfig { width: 3, height: 2, background: Color::WHITE };
        let surface = Surface::from_config(config).unwrap();
        assert!(surface.pixmap().pixels().iter().all(|p| *p == PremulRgba8::new(255, 255, 255, 255)));
    }

    #[test]
    fn default_config_is_transparent_512() {
        let surface = Surface::from_config(SurfaceConfig::default()).unwrap();
        assert_eq!((surface.pixmap().width(), surface.pixmap().height()), (512, 512));
        assert_eq!(surface.pixmap().pixel(0, 0), Some(PremulRgba8::TRANSPARENT));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(Surface::new(0, 10).is_err());
    }
}
