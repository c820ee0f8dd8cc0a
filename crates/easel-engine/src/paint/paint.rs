use crate::paint::{BlendMode, Color, ColorFilter};

/// Whether geometry is filled or outlined.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Style {
    #[default]
    Fill,
    Stroke,
}

/// Styling for a single draw call.
///
/// A default paint is opaque black, filled, `SrcOver`, no color filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    color: Color,
    style: Style,
    /// Stroke width in local units. `0` is a hairline (one device pixel).
    stroke_width: f32,
    blend_mode: BlendMode,
    color_filter: ColorFilter,
    anti_alias: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: Style::Fill,
            stroke_width: 0.0,
            blend_mode: BlendMode::SrcOver,
            color_filter: ColorFilter::Identity,
            anti_alias: false,
        }
    }
}

impl Paint {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid fill paint of `color`.
    #[inline]
    pub fn solid(color: Color) -> Self {
        Self { color, ..Self::default() }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Replaces the straight alpha, keeping the hue.
    #[inline]
    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.color = self.color.with_alpha(alpha);
        self
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    #[inline]
    pub fn set_style(&mut self, style: Style) -> &mut Self {
        self.style = style;
        self
    }

    #[inline]
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Negative widths are ignored.
    #[inline]
    pub fn set_stroke_width(&mut self, width: f32) -> &mut Self {
        if width >= 0.0 {
            self.stroke_width = width;
        }
        self
    }

    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    #[inline]
    pub fn set_blend_mode(&mut self, mode: BlendMode) -> &mut Self {
        self.blend_mode = mode;
        self
    }

    #[inline]
    pub fn color_filter(&self) -> ColorFilter {
        self.color_filter
    }

    #[inline]
    pub fn set_color_filter(&mut self, filter: ColorFilter) -> &mut Self {
        self.color_filter = filter;
        self
    }

    #[inline]
    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    #[inline]
    pub fn set_anti_alias(&mut self, aa: bool) -> &mut Self {
        self.anti_alias = aa;
        self
    }

    /// Source color after the color filter, as it enters blending.
    #[inline]
    pub fn source_color(&self) -> Color {
        self.color_filter.apply(self.color)
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.color.is_opaque()
            && self.color_filter == ColorFilter::Identity
            && matches!(self.blend_mode, BlendMode::SrcOver | BlendMode::Src)
    }
}
