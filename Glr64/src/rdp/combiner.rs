//! Color combiner mux decoding
//!
//! The combiner evaluates `(a - b) * c + d` separately for RGB and alpha,
//! once per cycle. The 64-bit mux selects all 16 inputs.

use serde::Serialize;

use super::bitfield::field;
use super::operand::{Operand, Placeholder};
use crate::error::{Error, Result};

use Operand::{
    CombinedAlpha, CombinedColor, EnvAlpha, EnvColor, One, PrimitiveAlpha, PrimitiveColor,
    ShadeAlpha, ShadeColor, Texel0Alpha, Texel0Color, Texel1Alpha, Texel1Color, Zero,
};

const RGB_A_TABLE: [Operand; 8] = [
    CombinedColor, Texel0Color, Texel1Color, PrimitiveColor,
    ShadeColor, EnvColor, One, Operand::Unimplemented(Placeholder::Noise),
];

const RGB_B_TABLE: [Operand; 8] = [
    CombinedColor, Texel0Color, Texel1Color, PrimitiveColor,
    ShadeColor, EnvColor,
    Operand::Unimplemented(Placeholder::KeyCenter),
    Operand::Unimplemented(Placeholder::ConvertK4),
];

const RGB_C_TABLE: [Operand; 16] = [
    CombinedColor, Texel0Color, Texel1Color, PrimitiveColor,
    ShadeColor, EnvColor, Operand::Unimplemented(Placeholder::KeyScale), CombinedAlpha,
    Texel0Alpha, Texel1Alpha, PrimitiveAlpha, ShadeAlpha,
    EnvAlpha,
    Operand::Unimplemented(Placeholder::LodFraction),
    Operand::Unimplemented(Placeholder::PrimitiveLodFraction),
    Operand::Unimplemented(Placeholder::ConvertK5),
];

const RGB_D_TABLE: [Operand; 8] = [
    CombinedColor, Texel0Color, Texel1Color, PrimitiveColor,
    ShadeColor, EnvColor, One, Zero,
];

const ALPHA_ABD_TABLE: [Operand; 8] = [
    CombinedAlpha, Texel0Alpha, Texel1Alpha, PrimitiveAlpha,
    ShadeAlpha, EnvAlpha, One, Zero,
];

const ALPHA_C_TABLE: [Operand; 8] = [
    Operand::Unimplemented(Placeholder::LodFraction), Texel0Alpha, Texel1Alpha, PrimitiveAlpha,
    ShadeAlpha, EnvAlpha, Operand::Unimplemented(Placeholder::PrimitiveLodFraction), Zero,
];

/// `Output = (a - b) * c + d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CombinerFormula {
    pub a: Operand,
    pub b: Operand,
    pub c: Operand,
    pub d: Operand,
}

impl CombinerFormula {
    pub const fn new(a: Operand, b: Operand, c: Operand, d: Operand) -> Self {
        Self { a, b, c, d }
    }

    pub fn operands(&self) -> [Operand; 4] {
        [self.a, self.b, self.c, self.d]
    }

    pub(crate) fn map(self, f: impl Fn(Operand) -> Operand) -> Self {
        Self::new(f(self.a), f(self.b), f(self.c), f(self.d))
    }
}

/// RGB and alpha equations of one combiner cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CombinerCycle {
    pub color: CombinerFormula,
    pub alpha: CombinerFormula,
}

impl CombinerCycle {
    /// Second cycle that just forwards the first cycle's output.
    pub const PASS_THROUGH: CombinerCycle = CombinerCycle {
        color: CombinerFormula::new(Zero, Zero, Zero, CombinedColor),
        alpha: CombinerFormula::new(Zero, Zero, Zero, CombinedAlpha),
    };

    /// The eight inputs in `(a, b, c, d)` RGB then alpha order.
    pub fn operands(&self) -> [Operand; 8] {
        let [a, b, c, d] = self.color.operands();
        let [aa, ba, ca, da] = self.alpha.operands();
        [a, b, c, d, aa, ba, ca, da]
    }

    pub fn is_pass_through(&self) -> bool {
        *self == Self::PASS_THROUGH
    }

    pub(crate) fn map(self, f: impl Fn(Operand) -> Operand + Copy) -> Self {
        Self {
            color: self.color.map(f),
            alpha: self.alpha.map(f),
        }
    }
}

/// Unknown RGB selectors read as the constant 0.
fn rgb_operand(table: &[Operand], index: u8) -> Operand {
    table.get(index as usize).copied().unwrap_or(Zero)
}

/// Alpha selectors are fully covered; a miss means a corrupt mux.
fn alpha_operand(table: &[Operand], name: &'static str, index: u8) -> Result<Operand> {
    table
        .get(index as usize)
        .copied()
        .ok_or(Error::UnmappedOperand { table: name, index })
}

fn decode_rgb(a: u8, b: u8, c: u8, d: u8) -> CombinerFormula {
    CombinerFormula::new(
        rgb_operand(&RGB_A_TABLE, a),
        rgb_operand(&RGB_B_TABLE, b),
        rgb_operand(&RGB_C_TABLE, c),
        rgb_operand(&RGB_D_TABLE, d),
    )
}

fn decode_alpha(a: u8, b: u8, c: u8, d: u8) -> Result<CombinerFormula> {
    Ok(CombinerFormula::new(
        alpha_operand(&ALPHA_ABD_TABLE, "alpha A", a)?,
        alpha_operand(&ALPHA_ABD_TABLE, "alpha B", b)?,
        alpha_operand(&ALPHA_C_TABLE, "alpha C", c)?,
        alpha_operand(&ALPHA_ABD_TABLE, "alpha D", d)?,
    ))
}

/// Decode the 64-bit combiner mux into both cycles.
///
/// Both cycles are always decoded; whether the second one is used depends
/// on the cycle type in the other-mode register.
pub fn decode_combiner(mux: u64) -> Result<(CombinerCycle, CombinerCycle)> {
    let a_rgb1 = field(mux, 52, 4);
    let c_rgb1 = field(mux, 47, 5);
    let a_a1 = field(mux, 44, 3);
    let c_a1 = field(mux, 41, 3);
    let a_rgb2 = field(mux, 37, 4);
    let c_rgb2 = field(mux, 32, 5);
    let b_rgb1 = field(mux, 28, 4);
    let b_rgb2 = field(mux, 24, 4);
    let a_a2 = field(mux, 21, 3);
    let c_a2 = field(mux, 18, 3);
    let d_rgb1 = field(mux, 15, 3);
    let b_a1 = field(mux, 12, 3);
    let d_a1 = field(mux, 9, 3);
    let d_rgb2 = field(mux, 6, 3);
    let b_a2 = field(mux, 3, 3);
    let d_a2 = field(mux, 0, 3);

    let cycle1 = CombinerCycle {
        color: decode_rgb(a_rgb1, b_rgb1, c_rgb1, d_rgb1),
        alpha: decode_alpha(a_a1, b_a1, c_a1, d_a1)?,
    };
    let cycle2 = CombinerCycle {
        color: decode_rgb(a_rgb2, b_rgb2, c_rgb2, d_rgb2),
        alpha: decode_alpha(a_a2, b_a2, c_a2, d_a2)?,
    };

    Ok((cycle1, cycle2))
}
