use std::fmt;
use std::str::FromStr;

use super::Color;

/// Porter-Duff and separable blend modes, named as in Skia.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    Clear,
    Src,
    Dst,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcATop,
    DstATop,
    Xor,
    Plus,
    Modulate,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Multiply,
}

const NAMES: [(BlendMode, &str); 19] = [
    (BlendMode::Clear, "Clear"),
    (BlendMode::Src, "Src"),
    (BlendMode::Dst, "Dst"),
    (BlendMode::SrcOver, "SrcOver"),
    (BlendMode::DstOver, "DstOver"),
    (BlendMode::SrcIn, "SrcIn"),
    (BlendMode::DstIn, "DstIn"),
    (BlendMode::SrcOut, "SrcOut"),
    (BlendMode::DstOut, "DstOut"),
    (BlendMode::SrcATop, "SrcATop"),
    (BlendMode::DstATop, "DstATop"),
    (BlendMode::Xor, "Xor"),
    (BlendMode::Plus, "Plus"),
    (BlendMode::Modulate, "Modulate"),
    (BlendMode::Screen, "Screen"),
    (BlendMode::Overlay, "Overlay"),
    (BlendMode::Darken, "Darken"),
    (BlendMode::Lighten, "Lighten"),
    (BlendMode::Multiply, "Multiply"),
];

impl BlendMode {
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(mode, _)| *mode == self)
            .map_or("SrcOver", |(_, name)| name)
    }

    /// Blends premultiplied `src` onto premultiplied `dst`.
    pub fn blend(self, src: Color, dst: Color) -> Color {
        let (s, d) = (src, dst);
        let (sa, da) = (s.a, d.a);

        // Porter-Duff: result = s * fs + d * fd.
        let porter_duff = |fs: f32, fd: f32| {
            Color::from_premul(
                s.r * fs + d.r * fd,
                s.g * fs + d.g * fd,
                s.b * fs + d.b * fd,
                sa * fs + da * fd,
            )
        };
        // Separable: per-channel `f(sc, dc)`, alpha = sa + da - sa * da.
        let separable = |f: &dyn Fn(f32, f32) -> f32| {
            Color::from_premul(f(s.r, d.r), f(s.g, d.g), f(s.b, d.b), sa + da - sa * da)
        };

        let out = match self {
            BlendMode::Clear => Color::TRANSPARENT,
            BlendMode::Src => s,
            BlendMode::Dst => d,
            BlendMode::SrcOver => porter_duff(1.0, 1.0 - sa),
            BlendMode::DstOver => porter_duff(1.0 - da, 1.0),
            BlendMode::SrcIn => porter_duff(da, 0.0),
            BlendMode::DstIn => porter_duff(0.0, sa),
            BlendMode::SrcOut => porter_duff(1.0 - da, 0.0),
            BlendMode::DstOut => porter_duff(0.0, 1.0 - sa),
            BlendMode::SrcATop => porter_duff(da, 1.0 - sa),
            BlendMode::DstATop => porter_duff(1.0 - da, sa),
            BlendMode::Xor => porter_duff(1.0 - da, 1.0 - sa),
            BlendMode::Plus => Color::from_premul(
                (s.r + d.r).min(1.0),
                (s.g + d.g).min(1.0),
                (s.b + d.b).min(1.0),
                (sa + da).min(1.0),
            ),
            BlendMode::Modulate => Color::from_premul(s.r * d.r, s.g * d.g, s.b * d.b, sa * da),
            BlendMode::Screen => separable(&|sc, dc| sc + dc - sc * dc),
            BlendMode::Overlay => separable(&|sc, dc| {
                let tail = sc * (1.0 - da) + dc * (1.0 - sa);
                if 2.0 * dc <= da {
                    2.0 * sc * dc + tail
                } else {
                    sa * da - 2.0 * (da - dc) * (sa - sc) + tail
                }
            }),
            BlendMode::Darken => separable(&|sc, dc| sc + dc - (sc * da).max(dc * sa)),
            BlendMode::Lighten => separable(&|sc, dc| sc + dc - (sc * da).min(dc * sa)),
            BlendMode::Multiply => {
                separable(&|sc, dc| sc * (1.0 - da) + dc * (1.0 - sa) + sc * dc)
            }
        };
        out.clamped()
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A blend mode name that is not one of [`BlendMode`]'s variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlendMode(pub String);

impl fmt::Display for UnknownBlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported blend mode {:?}", self.0)
    }
}

impl std::error::Error for UnknownBlendMode {}

impl FromStr for BlendMode {
    type Err = UnknownBlendMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(mode, _)| *mode)
            .ok_or_else(|| UnknownBlendMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_BLUE: Color = Color::from_premul(0.0, 0.0, 0.5, 0.5);

    #[test]
    fn src_over_opaque_replaces() {
        assert_eq!(BlendMode::SrcOver.blend(Color::RED, Color::WHITE), Color::RED);
    }

    #[test]
    fn src_over_translucent_mixes() {
        let out = BlendMode::SrcOver.blend(HALF_BLUE, Color::RED);
        assert_eq!(out, Color::from_premul(0.5, 0.0, 0.5, 1.0));
    }

    #[test]
    fn dst_in_keeps_destination_under_source_alpha() {
        let out = BlendMode::DstIn.blend(HALF_BLUE, Color::RED);
        assert_eq!(out, Color::from_premul(0.5, 0.0, 0.0, 0.5));
    }

    #[test]
    fn clear_and_src_ignore_destination() {
        assert_eq!(BlendMode::Clear.blend(Color::RED, Color::WHITE), Color::TRANSPARENT);
        assert_eq!(BlendMode::Src.blend(HALF_BLUE, Color::WHITE), HALF_BLUE);
    }

    #[test]
    fn multiply_white_is_identity() {
        assert_eq!(BlendMode::Multiply.blend(Color::RED, Color::WHITE), Color::RED);
    }

    #[test]
    fn plus_saturates() {
        assert_eq!(BlendMode::Plus.blend(Color::WHITE, Color::RED), Color::WHITE);
    }

    #[test]
    fn names_parse_back() {
        for (mode, name) in NAMES {
            assert_eq!(name.parse::<BlendMode>(), Ok(mode));
            assert_eq!(mode.to_string(), name);
        }
        assert!("SoftLight".parse::<BlendMode>().is_err());
    }
}
