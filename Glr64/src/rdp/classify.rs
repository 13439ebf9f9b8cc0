//! Realization strategy for decoded formulas
//!
//! Decides, per formula, what a shading backend actually has to build:
//! nothing but a passthrough, a single lerp, the general formula, or an
//! alpha-blended output because the blender wants to read the framebuffer.

use serde::Serialize;

use super::blender::BlenderFormula;
use super::combiner::{CombinerCycle, CombinerFormula};
use super::operand::Operand;

/// How one combiner equation (RGB or alpha) is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CombinerStage {
    /// `c` is 0, so the output is just `d`.
    PassThrough(Operand),
    FullFormula(CombinerFormula),
}

impl CombinerStage {
    pub fn classify(formula: CombinerFormula) -> Self {
        if formula.c == Operand::Zero {
            CombinerStage::PassThrough(formula.d)
        } else {
            CombinerStage::FullFormula(formula)
        }
    }

    /// Inputs the stage actually reads.
    pub fn inputs(&self) -> Vec<Operand> {
        match self {
            CombinerStage::PassThrough(d) => vec![*d],
            CombinerStage::FullFormula(f) => f.operands().to_vec(),
        }
    }
}

/// Both equations of one combiner cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CombinerStages {
    pub color: CombinerStage,
    pub alpha: CombinerStage,
}

impl From<&CombinerCycle> for CombinerStages {
    fn from(cycle: &CombinerCycle) -> Self {
        Self {
            color: CombinerStage::classify(cycle.color),
            alpha: CombinerStage::classify(cycle.alpha),
        }
    }
}

/// How one blender cycle is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlenderStage {
    /// `b` is `1 - a`, so the formula is `lerp(from, to, factor)`.
    SimpleLerp {
        from: Operand,
        to: Operand,
        factor: Operand,
    },
    FullFormula(BlenderFormula),
    /// Reads the framebuffer; realized by alpha blending the combined color
    /// over whatever is behind the surface.
    AlphaBlendFallback(BlenderFormula),
}

impl BlenderStage {
    pub fn classify(formula: BlenderFormula) -> Self {
        let BlenderFormula { p, a, m, b } = formula;
        if b == Operand::OneMinusA && !p.is_framebuffer() && !m.is_framebuffer() {
            BlenderStage::SimpleLerp {
                from: m,
                to: p,
                factor: a,
            }
        } else if formula.reads_framebuffer() {
            BlenderStage::AlphaBlendFallback(formula)
        } else {
            BlenderStage::FullFormula(formula)
        }
    }

    pub fn inputs(&self) -> Vec<Operand> {
        match self {
            BlenderStage::SimpleLerp { from, to, factor } => vec![*from, *to, *factor],
            BlenderStage::FullFormula(f) | BlenderStage::AlphaBlendFallback(f) => {
                f.operands().to_vec()
            }
        }
    }
}

/// Blender stages in evaluation order.
///
/// Evaluation stops at the first framebuffer read: the output is composited
/// by the target's own alpha blending from then on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BlenderPlan {
    pub stages: Vec<BlenderStage>,
    pub translucent: bool,
}

impl BlenderPlan {
    pub fn new(blender1: BlenderFormula, blender2: Option<BlenderFormula>) -> Self {
        let mut stages = Vec::with_capacity(2);
        let mut translucent = false;

        for formula in std::iter::once(blender1).chain(blender2) {
            let stage = BlenderStage::classify(formula);
            stages.push(stage);
            if matches!(stage, BlenderStage::AlphaBlendFallback(_)) {
                translucent = true;
                break;
            }
        }

        Self { stages, translucent }
    }

    pub fn alpha_mode(&self, show_alpha: bool) -> AlphaMode {
        if self.translucent && show_alpha {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        }
    }
}

/// Compositing requested from the shading backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Blend,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use Operand::*;

    #[test]
    fn test_zero_multiplier_is_pass_through() {
        let stage = CombinerStage::classify(CombinerFormula::new(Texel0Color, ShadeColor, Zero, EnvColor));
        assert_eq!(stage, CombinerStage::PassThrough(EnvColor));
        assert_eq!(stage.inputs(), vec![EnvColor]);

        let full = CombinerFormula::new(Texel0Color, Zero, ShadeColor, Zero);
        assert_eq!(CombinerStage::classify(full), CombinerStage::FullFormula(full));
    }

    #[test]
    fn test_simple_lerp() {
        let fog = BlenderFormula::new(FogColor, ShadeAlpha, CombinedColor, OneMinusA);
        assert_eq!(
            BlenderStage::classify(fog),
            BlenderStage::SimpleLerp { from: CombinedColor, to: FogColor, factor: ShadeAlpha }
        );
    }

    #[test]
    fn test_framebuffer_read_falls_back_and_stops() {
        let xlu = BlenderFormula::new(CombinedColor, CombinedAlpha, FramebufferColor, OneMinusA);
        let fog = BlenderFormula::new(FogColor, ShadeAlpha, CombinedColor, OneMinusA);

        let plan = BlenderPlan::new(xlu, Some(fog));
        assert_eq!(plan.stages, vec![BlenderStage::AlphaBlendFallback(xlu)]);
        assert!(plan.translucent);
        assert_eq!(plan.alpha_mode(true), AlphaMode::Blend);
        assert_eq!(plan.alpha_mode(false), AlphaMode::Opaque);
    }

    #[test]
    fn test_lerp_then_framebuffer_read() {
        let fog = BlenderFormula::new(FogColor, ShadeAlpha, CombinedColor, OneMinusA);
        let xlu = BlenderFormula::new(CombinedColor, CombinedAlpha, FramebufferColor, OneMinusA);

        let plan = BlenderPlan::new(fog, Some(xlu));
        assert_eq!(
            plan.stages,
            vec![
                BlenderStage::SimpleLerp { from: CombinedColor, to: FogColor, factor: ShadeAlpha },
                BlenderStage::AlphaBlendFallback(xlu),
            ]
        );
        assert!(plan.translucent);
        assert_eq!(plan.alpha_mode(true), AlphaMode::Blend);
    }

    #[test]
    fn test_framebuffer_alpha_weight_is_translucent() {
        let formula = BlenderFormula::new(CombinedColor, CombinedAlpha, BlendColor, FramebufferAlpha);
        let plan = BlenderPlan::new(formula, None);
        assert!(plan.translucent);
    }

    #[test]
    fn test_opaque_full_formula() {
        let formula = BlenderFormula::new(CombinedColor, Zero, BlendColor, One);
        let plan = BlenderPlan::new(formula, None);
        assert_eq!(plan.stages, vec![BlenderStage::FullFormula(formula)]);
        assert!(!plan.translucent);
    }
}
