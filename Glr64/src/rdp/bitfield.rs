//! Raw RDP register fields to symbolic values

use std::fmt;

use serde::Serialize;

/// Extract `width` bits starting at `shift`.
pub(crate) fn field(value: u64, shift: u32, width: u32) -> u8 {
    ((value >> shift) & ((1 << width) - 1)) as u8
}

/// Texture filter selected by other-mode bits 44..45.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextureFilter {
    /// `TF_POINT`
    Closest,
    /// `TF_AVERAGE` and `TF_BILERP` (3-sample bilinear, approximated)
    Linear,
}

impl TextureFilter {
    pub fn from_other_mode(other_mode: u64) -> Self {
        match field(other_mode, 44, 2) {
            0 => TextureFilter::Closest,
            _ => TextureFilter::Linear,
        }
    }
}

impl fmt::Display for TextureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureFilter::Closest => write!(f, "Closest"),
            TextureFilter::Linear => write!(f, "Linear"),
        }
    }
}

/// Per-axis tile addressing flags (bit 0 = mirror, bit 1 = clamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextureWrap {
    Repeat,
    Mirror,
    Clamp,
}

impl TextureWrap {
    pub const MIRROR_BIT: u8 = 0x1;
    pub const CLAMP_BIT: u8 = 0x2;

    pub fn from_raw(wrap: u8) -> Self {
        match wrap {
            0 => TextureWrap::Repeat,
            1 => TextureWrap::Mirror,
            _ => TextureWrap::Clamp,
        }
    }
}

impl fmt::Display for TextureWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureWrap::Repeat => write!(f, "Repeat"),
            TextureWrap::Mirror => write!(f, "Mirror"),
            TextureWrap::Clamp => write!(f, "Clamp"),
        }
    }
}

/// RDP cycle type, other-mode bits 52..53. Copy and fill modes never run
/// the second combiner or blender cycle, so they count as one-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CycleType {
    OneCycle,
    TwoCycle,
}

impl CycleType {
    pub fn from_other_mode(other_mode: u64) -> Self {
        if field(other_mode, 52, 2) == 1 {
            CycleType::TwoCycle
        } else {
            CycleType::OneCycle
        }
    }
}

/// Microcode IDs of the F3DEX2 family, which moved `G_CULL_BACK`.
const F3DEX2_FAMILY: [u32; 7] = [
    2,  // F3DEX2
    5,  // L3DEX2
    7,  // S2DEX2
    13, // F3DEX2CBFD
    17, // F3DZEX2OOT
    18, // F3DZEX2MM
    21, // F3DEX2ACCLAIM
];

/// `G_CULL_BACK` for F3D/F3DEX. Other microcodes are assumed to follow it.
const G_CULL_BACK_F3D: u32 = 0x2000;
/// `G_CULL_BACK` for F3DEX2.
const G_CULL_BACK_F3DEX2: u32 = 0x400;

/// Geometry-mode mask selecting back face culling for a microcode.
pub fn cull_back_mask(microcode: u32) -> u32 {
    if F3DEX2_FAMILY.contains(&microcode) {
        G_CULL_BACK_F3DEX2
    } else {
        G_CULL_BACK_F3D
    }
}

pub fn backface_culling(geometry_mode: u32, microcode: u32) -> bool {
    geometry_mode & cull_back_mask(microcode) != 0
}
