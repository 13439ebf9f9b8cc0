//! Blender mux decoding
//!
//! The blender computes `(p * a + m * b) / (a + b)` per cycle, where `p` and
//! `m` are colors and `a` and `b` are weights. Its selectors live in the low
//! half of the other-mode register.

use serde::Serialize;

use super::bitfield::field;
use super::operand::Operand;

use Operand::{
    CombinedAlpha, CombinedColor, BlendColor, FogAlpha, FogColor, FramebufferAlpha,
    FramebufferColor, One, OneMinusA, ShadeAlpha, Zero,
};

/// Shared by the `p` and `m` inputs.
const PM_TABLE: [Operand; 4] = [CombinedColor, FramebufferColor, BlendColor, FogColor];
const A_TABLE: [Operand; 4] = [CombinedAlpha, FogAlpha, ShadeAlpha, Zero];
const B_TABLE: [Operand; 4] = [OneMinusA, FramebufferAlpha, One, Zero];

/// `Output = (p * a + m * b) / (a + b)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlenderFormula {
    pub p: Operand,
    pub a: Operand,
    pub m: Operand,
    pub b: Operand,
}

impl BlenderFormula {
    pub const fn new(p: Operand, a: Operand, m: Operand, b: Operand) -> Self {
        Self { p, a, m, b }
    }

    pub fn operands(&self) -> [Operand; 4] {
        [self.p, self.a, self.m, self.b]
    }

    /// Whether the formula reads the framebuffer anywhere.
    pub fn reads_framebuffer(&self) -> bool {
        self.operands().iter().any(|op| op.is_framebuffer())
    }

    pub(crate) fn map(self, f: impl Fn(Operand) -> Operand) -> Self {
        Self::new(f(self.p), f(self.a), f(self.m), f(self.b))
    }
}

/// Decode both blender cycles from the other-mode register.
///
/// Every 2-bit selector indexes a four-entry table, so this cannot fail.
pub fn decode_blender(other_mode: u64) -> (BlenderFormula, BlenderFormula) {
    let pm = |shift| PM_TABLE[field(other_mode, shift, 2) as usize];
    let a = |shift| A_TABLE[field(other_mode, shift, 2) as usize];
    let b = |shift| B_TABLE[field(other_mode, shift, 2) as usize];

    let cycle1 = BlenderFormula::new(pm(30), a(26), pm(22), b(18));
    let cycle2 = BlenderFormula::new(pm(28), a(24), pm(20), b(16));

    (cycle1, cycle2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pack(cycle1: [u64; 4], cycle2: [u64; 4]) -> u64 {
        let [p1, a1, m1, b1] = cycle1;
        let [p2, a2, m2, b2] = cycle2;
        (p1 << 30) | (p2 << 28) | (a1 << 26) | (a2 << 24)
            | (m1 << 22) | (m2 << 20) | (b1 << 18) | (b2 << 16)
    }

    #[test]
    fn test_decode_standard_translucent() {
        // G_RM_XLU_SURF: combined * combined alpha over framebuffer * (1 - a)
        let (cycle1, _) = decode_blender(pack([0, 0, 1, 0], [0, 0, 0, 0]));
        assert_eq!(
            cycle1,
            BlenderFormula::new(CombinedColor, CombinedAlpha, FramebufferColor, OneMinusA)
        );
        assert!(cycle1.reads_framebuffer());
    }

    #[test]
    fn test_decode_fog_shade_second_cycle() {
        let (cycle1, cycle2) = decode_blender(pack([3, 2, 0, 0], [2, 3, 3, 3]));
        assert_eq!(cycle1.operands(), [FogColor, ShadeAlpha, CombinedColor, OneMinusA]);
        assert_eq!(cycle2.operands(), [BlendColor, Zero, FogColor, Zero]);
        assert!(!cycle2.reads_framebuffer());
    }

    #[test]
    fn test_ignores_unrelated_bits() {
        let noise = 0xFFFF_FFFF_0000_FFFF;
        let (cycle1, cycle2) = decode_blender(noise);
        assert_eq!(cycle1.operands(), [CombinedColor, CombinedAlpha, CombinedColor, OneMinusA]);
        assert_eq!(cycle2, cycle1);
    }
}
