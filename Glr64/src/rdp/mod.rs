//! RDP pipeline emulation
//!
//! Turns the raw combiner mux, other-mode and geometry-mode registers into
//! symbolic formulas, and decides how each of them can be realized by a
//! regular shading backend.

pub mod bitfield;
pub mod blender;
pub mod classify;
pub mod combiner;
pub mod formula;
pub mod operand;
pub mod wrap;

use serde::Serialize;

pub use bitfield::{CycleType, TextureFilter, TextureWrap, backface_culling, cull_back_mask};
pub use blender::{BlenderFormula, decode_blender};
pub use classify::{AlphaMode, BlenderPlan, BlenderStage, CombinerStage, CombinerStages};
pub use combiner::{CombinerCycle, CombinerFormula, decode_combiner};
pub use formula::{show_blender_formula, show_combiner_formula};
pub use operand::{ColorLayer, Operand, PLACEHOLDER_RGBA, Placeholder};
pub use wrap::{AxisBounds, AxisOps, WrapMode, WrapOp, WrapPlan};

use crate::error::Result;
use crate::formats::glr::G_FOG;

/// Formulas in effect for one RDP state.
///
/// The second cycles are only present in two-cycle mode, and the second
/// combiner cycle is dropped again if it just forwards the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RdpFormulas {
    pub combiner1: CombinerCycle,
    pub combiner2: Option<CombinerCycle>,
    pub blender1: BlenderFormula,
    pub blender2: Option<BlenderFormula>,
}

impl RdpFormulas {
    /// Every operand read by any present formula.
    pub fn operands(&self) -> impl Iterator<Item = Operand> + '_ {
        let combiners = std::iter::once(&self.combiner1)
            .chain(self.combiner2.as_ref())
            .flat_map(CombinerCycle::operands);
        let blenders = std::iter::once(&self.blender1)
            .chain(self.blender2.as_ref())
            .flat_map(BlenderFormula::operands);
        combiners.chain(blenders)
    }

    pub fn combiner_stages(&self) -> Vec<CombinerStages> {
        std::iter::once(&self.combiner1)
            .chain(self.combiner2.as_ref())
            .map(CombinerStages::from)
            .collect()
    }

    pub fn blender_plan(&self) -> BlenderPlan {
        BlenderPlan::new(self.blender1, self.blender2)
    }
}

/// Decode the formulas of one RDP state.
///
/// With fog enabled in the geometry mode, the hardware feeds the fog level
/// where shade alpha is selected, so `Shade Alpha` becomes `Fog Level` in
/// all four formulas.
pub fn decode_rdp_state(
    combiner_mux: u64,
    other_mode: u64,
    geometry_mode: u32,
) -> Result<RdpFormulas> {
    let (mut combiner1, mut combiner2) = decode_combiner(combiner_mux)?;
    let (mut blender1, mut blender2) = decode_blender(other_mode);

    if geometry_mode & G_FOG != 0 {
        let fog = |op: Operand| match op {
            Operand::ShadeAlpha => Operand::FogLevel,
            other => other,
        };
        combiner1 = combiner1.map(fog);
        combiner2 = combiner2.map(fog);
        blender1 = blender1.map(fog);
        blender2 = blender2.map(fog);
    }

    let two_cycle = CycleType::from_other_mode(other_mode) == CycleType::TwoCycle;

    Ok(RdpFormulas {
        combiner1,
        combiner2: (two_cycle && !combiner2.is_pass_through()).then_some(combiner2),
        blender1,
        blender2: two_cycle.then_some(blender2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_CYCLE: u64 = 1 << 52;
    // cycle 1: (T0 - 0) * shade + 0, alpha (0 - 0) * 0 + shade alpha
    // cycle 2: pass-through
    const MUX: u64 = (1 << 52) | (15 << 37) | (31 << 32) | (8 << 28) | (15 << 24) | (7 << 44)
        | (7 << 41) | (4 << 47) | (7 << 21) | (7 << 18) | (7 << 15) | (7 << 12) | (4 << 9)
        | (7 << 3);

    #[test]
    fn test_one_cycle_drops_second_cycles() {
        let formulas = decode_rdp_state(MUX, 0, 0).unwrap();
        assert_eq!(formulas.combiner2, None);
        assert_eq!(formulas.blender2, None);
        assert_eq!(formulas.combiner1.color.a, Operand::Texel0Color);
        assert_eq!(formulas.combiner1.alpha.d, Operand::ShadeAlpha);
    }

    #[test]
    fn test_two_cycle_pass_through_is_suppressed() {
        let formulas = decode_rdp_state(MUX, TWO_CYCLE, 0).unwrap();
        assert_eq!(formulas.combiner2, None);
        assert!(formulas.blender2.is_some());
    }

    #[test]
    fn test_two_cycle_keeps_real_second_cycle() {
        // cycle 2 RGB D = shade instead of combined
        let mux = MUX | (4 << 6);
        let formulas = decode_rdp_state(mux, TWO_CYCLE, 0).unwrap();
        let cycle2 = formulas.combiner2.unwrap();
        assert_eq!(cycle2.color.d, Operand::ShadeColor);
        assert_eq!(formulas.combiner_stages().len(), 2);
    }

    #[test]
    fn test_fog_replaces_shade_alpha_everywhere() {
        // blender cycle 1: fog color * shade alpha + combined * (1 - a)
        let other_mode = TWO_CYCLE | (3 << 30) | (2 << 26) | (2 << 24);
        let formulas = decode_rdp_state(MUX, other_mode, G_FOG).unwrap();

        assert_eq!(formulas.combiner1.alpha.d, Operand::FogLevel);
        assert_eq!(formulas.blender1.a, Operand::FogLevel);
        assert_eq!(formulas.blender2.unwrap().a, Operand::FogLevel);
        assert!(formulas.operands().all(|op| op != Operand::ShadeAlpha));
    }
}
