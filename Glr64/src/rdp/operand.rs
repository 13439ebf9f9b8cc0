//! Combiner and blender input sources

use std::fmt;

use serde::{Serialize, Serializer};

/// Flat color standing in for inputs that are not emulated.
pub const PLACEHOLDER_RGBA: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// Every input the combiner and blender muxes can select.
///
/// Serializes as its display name so stored pipelines stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operand {
    Zero,
    One,
    CombinedColor,
    CombinedAlpha,
    Texel0Color,
    Texel0Alpha,
    Texel1Color,
    Texel1Alpha,
    PrimitiveColor,
    PrimitiveAlpha,
    ShadeColor,
    ShadeAlpha,
    EnvColor,
    EnvAlpha,
    BlendColor,
    FogColor,
    FogAlpha,
    /// Shade alpha reinterpreted as fog level when fog is enabled.
    FogLevel,
    FramebufferColor,
    FramebufferAlpha,
    /// Blender weight `1 - a`.
    OneMinusA,
    Unimplemented(Placeholder),
}

/// Inputs that are approximated by [`PLACEHOLDER_RGBA`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    Noise,
    KeyCenter,
    KeyScale,
    ConvertK4,
    ConvertK5,
    LodFraction,
    PrimitiveLodFraction,
}

/// Per-vertex color layers a pipeline can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ColorLayer {
    Shade,
    Primitive,
    Env,
    Blend,
    Fog,
}

impl ColorLayer {
    pub const ALL: [ColorLayer; 5] = [
        ColorLayer::Shade,
        ColorLayer::Primitive,
        ColorLayer::Env,
        ColorLayer::Blend,
        ColorLayer::Fog,
    ];

    /// Attribute name used on the mesh, e.g. `"Shade Color"`.
    pub fn layer_name(self) -> &'static str {
        match self {
            ColorLayer::Shade => "Shade Color",
            ColorLayer::Primitive => "Primitive Color",
            ColorLayer::Env => "Env Color",
            ColorLayer::Blend => "Blend Color",
            ColorLayer::Fog => "Fog Color",
        }
    }
}

impl Operand {
    pub fn is_framebuffer(self) -> bool {
        matches!(self, Operand::FramebufferColor | Operand::FramebufferAlpha)
    }

    /// Texture unit sampled by this operand.
    pub fn texture_unit(self) -> Option<usize> {
        match self {
            Operand::Texel0Color | Operand::Texel0Alpha => Some(0),
            Operand::Texel1Color | Operand::Texel1Alpha => Some(1),
            _ => None,
        }
    }

    /// Vertex color layer read by this operand.
    pub fn color_layer(self) -> Option<ColorLayer> {
        match self {
            Operand::ShadeColor | Operand::ShadeAlpha => Some(ColorLayer::Shade),
            Operand::PrimitiveColor | Operand::PrimitiveAlpha => Some(ColorLayer::Primitive),
            Operand::EnvColor | Operand::EnvAlpha => Some(ColorLayer::Env),
            Operand::BlendColor => Some(ColorLayer::Blend),
            Operand::FogColor | Operand::FogAlpha => Some(ColorLayer::Fog),
            _ => None,
        }
    }

    pub fn placeholder(self) -> Option<Placeholder> {
        match self {
            Operand::Unimplemented(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Placeholder::Noise => "Noise",
            Placeholder::KeyCenter => "Key Center",
            Placeholder::KeyScale => "Key Scale",
            Placeholder::ConvertK4 => "Convert K4",
            Placeholder::ConvertK5 => "Convert K5",
            Placeholder::LodFraction => "LOD Fraction",
            Placeholder::PrimitiveLodFraction => "Primitive LOD Fraction",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operand::Zero => "0",
            Operand::One => "1",
            Operand::CombinedColor => "Combined Color",
            Operand::CombinedAlpha => "Combined Alpha",
            Operand::Texel0Color => "Texel 0 Color",
            Operand::Texel0Alpha => "Texel 0 Alpha",
            Operand::Texel1Color => "Texel 1 Color",
            Operand::Texel1Alpha => "Texel 1 Alpha",
            Operand::PrimitiveColor => "Primitive Color",
            Operand::PrimitiveAlpha => "Primitive Alpha",
            Operand::ShadeColor => "Shade Color",
            Operand::ShadeAlpha => "Shade Alpha",
            Operand::EnvColor => "Env Color",
            Operand::EnvAlpha => "Env Alpha",
            Operand::BlendColor => "Blend Color",
            Operand::FogColor => "Fog Color",
            Operand::FogAlpha => "Fog Alpha",
            Operand::FogLevel => "Fog Level",
            Operand::FramebufferColor => "Framebuffer Color",
            Operand::FramebufferAlpha => "Framebuffer Alpha",
            Operand::OneMinusA => "One Minus A",
            Operand::Unimplemented(p) => return p.fmt(f),
        };
        f.write_str(name)
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(Operand::Zero.to_string(), "0");
        assert_eq!(Operand::Texel1Alpha.to_string(), "Texel 1 Alpha");
        assert_eq!(
            Operand::Unimplemented(Placeholder::PrimitiveLodFraction).to_string(),
            "Primitive LOD Fraction"
        );
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&[Operand::FogLevel, Operand::OneMinusA]).unwrap();
        assert_eq!(json, r#"["Fog Level","One Minus A"]"#);
    }

    #[test]
    fn test_sources() {
        assert_eq!(Operand::Texel1Color.texture_unit(), Some(1));
        assert_eq!(Operand::EnvAlpha.color_layer(), Some(ColorLayer::Env));
        assert_eq!(Operand::FogLevel.color_layer(), None);
        assert!(Operand::FramebufferAlpha.is_framebuffer());
    }
}
