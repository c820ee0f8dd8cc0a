use super::Color;

/// Rec. 709 luma weights.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Per-pixel color transform applied to the source before blending.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ColorFilter {
    #[default]
    Identity,
    /// Writes the luma of the (premultiplied) input into alpha and zeroes rgb.
    /// Used to turn content into a mask.
    Luma,
}

impl ColorFilter {
    #[inline]
    pub fn apply(self, c: Color) -> Color {
        match self {
            ColorFilter::Identity => c,
            ColorFilter::Luma => {
                let luma = LUMA[0] * c.r + LUMA[1] * c.g + LUMA[2] * c.b;
                Color::from_premul(0.0, 0.0, 0.0, luma.clamp(0.0, 1.0))
            }
        }
    }
}
