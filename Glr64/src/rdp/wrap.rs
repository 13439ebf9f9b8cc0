//! Texture wrap resolution
//!
//! An RDP tile can clamp and wrap at boundaries that are not the image edge
//! and mirror on every other period. Samplers only know repeat, mirrored
//! repeat and clamp-to-edge at the image edge, so each axis either maps to one
//! of those or gets explicit coordinate math ahead of an edge-clamped sample.
//!
//! Boundaries are measured in texture extents: `1.0` is the image edge, `3.0`
//! is three image widths out.

use serde::Serialize;

use super::bitfield::TextureWrap;

/// Native sampler addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WrapMode {
    Repeat,
    Mirror,
    /// Clamp to edge.
    Extend,
}

/// Clamp and wrap boundaries of one texture axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisBounds {
    pub clamp: Option<f32>,
    pub wrap: Option<f32>,
    pub mirror: bool,
}

impl AxisBounds {
    /// Non-positive boundaries mean "no boundary".
    pub fn new(clamp: Option<f32>, wrap: Option<f32>, mirror: bool) -> Self {
        let positive = |b: Option<f32>| b.filter(|&v| v > 0.0);
        Self {
            clamp: positive(clamp),
            wrap: positive(wrap),
            mirror,
        }
    }

    /// Bounds implied by the raw tile flags. The capture only records the
    /// flags, so both boundaries sit on the image edge.
    pub fn from_wrap_flags(flags: u8) -> Self {
        let clamp = flags & TextureWrap::CLAMP_BIT != 0;
        Self::new(
            clamp.then_some(1.0),
            Some(1.0),
            flags & TextureWrap::MIRROR_BIT != 0,
        )
    }

    /// The native mode this axis reduces to, if any.
    pub fn native_mode(&self) -> Option<WrapMode> {
        match (self.clamp, self.wrap) {
            (Some(c), w) if c == 1.0 && w.is_none_or(|w| w >= 1.0) => Some(WrapMode::Extend),
            (None, Some(w)) if w == 1.0 => Some(if self.mirror {
                WrapMode::Mirror
            } else {
                WrapMode::Repeat
            }),
            (None, None) => Some(WrapMode::Extend),
            _ => None,
        }
    }
}

/// Periodic part of the per-axis math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum WrapOp {
    /// `x mod period`
    Modulo(f32),
    /// Triangle wave rising over `[0, period]` and falling back over the next.
    PingPong(f32),
}

impl WrapOp {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            WrapOp::Modulo(period) => x.rem_euclid(period),
            WrapOp::PingPong(period) => {
                let t = x.rem_euclid(2.0 * period);
                if t > period { 2.0 * period - t } else { t }
            }
        }
    }
}

/// Explicit coordinate math for one axis: clamp to `[0, clamp]`, then wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisOps {
    pub clamp: Option<f32>,
    pub wrap: Option<WrapOp>,
}

impl AxisOps {
    fn from_native(mode: WrapMode) -> Self {
        let wrap = match mode {
            WrapMode::Repeat => Some(WrapOp::Modulo(1.0)),
            WrapMode::Mirror => Some(WrapOp::PingPong(1.0)),
            WrapMode::Extend => None,
        };
        Self { clamp: None, wrap }
    }

    fn from_bounds(bounds: &AxisBounds) -> Self {
        let wrap = bounds.wrap.map(|period| {
            if bounds.mirror {
                WrapOp::PingPong(period)
            } else {
                WrapOp::Modulo(period)
            }
        });
        Self {
            clamp: bounds.clamp,
            wrap,
        }
    }

    pub fn apply(&self, x: f32) -> f32 {
        let clamped = match self.clamp {
            Some(max) => x.clamp(0.0, max),
            None => x,
        };
        match self.wrap {
            Some(op) => op.apply(clamped),
            None => clamped,
        }
    }
}

/// How a texture's coordinates are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum WrapPlan {
    /// Both axes share a native mode.
    Sampler(WrapMode),
    /// Coordinate math per axis, sampled with [`WrapMode::Extend`].
    PerAxis { s: AxisOps, t: AxisOps },
}

impl WrapPlan {
    pub fn resolve(s: &AxisBounds, t: &AxisBounds) -> Self {
        match (s.native_mode(), t.native_mode()) {
            (Some(ms), Some(mt)) if ms == mt => WrapPlan::Sampler(ms),
            (ns, nt) => WrapPlan::PerAxis {
                s: ns.map_or_else(|| AxisOps::from_bounds(s), AxisOps::from_native),
                t: nt.map_or_else(|| AxisOps::from_bounds(t), AxisOps::from_native),
            },
        }
    }

    /// Addressing mode the sampler itself is set to.
    pub fn sampler_mode(&self) -> WrapMode {
        match self {
            WrapPlan::Sampler(mode) => *mode,
            WrapPlan::PerAxis { .. } => WrapMode::Extend,
        }
    }

    /// Map a vertex UV through the per-axis math.
    ///
    /// Vertex V grows from the bottom edge while the math counts texel rows
    /// from the top, so V is flipped around it.
    pub fn apply(&self, [u, v]: [f32; 2]) -> [f32; 2] {
        match self {
            WrapPlan::Sampler(_) => [u, v],
            WrapPlan::PerAxis { s, t } => [s.apply(u), 1.0 - t.apply(1.0 - v)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Texel hit by the center of texel `i` on a `size`-wide texture after
    /// the axis math, with edge clamping at sample time.
    fn sampled_texels(ops: &AxisOps, size: usize, count: usize) -> Vec<usize> {
        (0..count)
            .map(|i| {
                let u = (i as f32 + 0.5) / size as f32;
                let x = ops.apply(u) * size as f32;
                (x.floor().max(0.0) as usize).min(size - 1)
            })
            .collect()
    }

    #[test]
    fn test_clamped_mirror_sequence() {
        // Four texels mirrored each period, clamped after three periods.
        // The clamp runs first, then the mirrored wrap.
        let bounds = AxisBounds::new(Some(3.0), Some(1.0), true);
        assert_eq!(bounds.native_mode(), None);

        let ops = AxisOps::from_bounds(&bounds);
        assert_eq!(
            sampled_texels(&ops, 4, 16),
            vec![0, 1, 2, 3, 3, 2, 1, 0, 0, 1, 2, 3, 3, 3, 3, 3]
        );
    }

    #[test]
    fn test_clamp_applies_before_wrap() {
        // Coordinates in texels: clamp at 3, wrap every 8, no mirroring.
        // Clamping first pins everything past 3 at 3, so the wrap at 8
        // never folds anything back.
        let ops = AxisOps::from_bounds(&AxisBounds::new(Some(3.0), Some(8.0), false));
        let texels: Vec<f32> = (0..16u8).map(|x| ops.apply(f32::from(x))).collect();
        assert_eq!(
            texels,
            vec![0.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0]
        );

        // Mirroring inside the clamp folds back before the clamp is reached
        let mirrored = AxisOps::from_bounds(&AxisBounds::new(Some(6.0), Some(3.0), true));
        let texels: Vec<f32> = (0..8u8).map(|x| mirrored.apply(f32::from(x))).collect();
        assert_eq!(texels, vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_native_modes() {
        assert_eq!(AxisBounds::new(Some(1.0), None, false).native_mode(), Some(WrapMode::Extend));
        assert_eq!(AxisBounds::new(Some(1.0), Some(4.0), true).native_mode(), Some(WrapMode::Extend));
        assert_eq!(AxisBounds::new(None, Some(1.0), false).native_mode(), Some(WrapMode::Repeat));
        assert_eq!(AxisBounds::new(None, Some(1.0), true).native_mode(), Some(WrapMode::Mirror));
        assert_eq!(AxisBounds::new(None, None, true).native_mode(), Some(WrapMode::Extend));
        assert_eq!(AxisBounds::new(Some(0.0), Some(0.0), false).native_mode(), Some(WrapMode::Extend));
        assert_eq!(AxisBounds::new(None, Some(2.0), false).native_mode(), None);
        assert_eq!(AxisBounds::new(Some(1.0), Some(0.5), false).native_mode(), None);
    }

    #[test]
    fn test_flags_to_plan() {
        let repeat = AxisBounds::from_wrap_flags(0);
        let mirror = AxisBounds::from_wrap_flags(1);
        let clamp = AxisBounds::from_wrap_flags(2);
        let clamp_mirror = AxisBounds::from_wrap_flags(3);

        assert_eq!(WrapPlan::resolve(&repeat, &repeat), WrapPlan::Sampler(WrapMode::Repeat));
        assert_eq!(WrapPlan::resolve(&mirror, &mirror), WrapPlan::Sampler(WrapMode::Mirror));
        assert_eq!(WrapPlan::resolve(&clamp, &clamp_mirror), WrapPlan::Sampler(WrapMode::Extend));

        let mixed = WrapPlan::resolve(&repeat, &clamp);
        assert_eq!(
            mixed,
            WrapPlan::PerAxis {
                s: AxisOps { clamp: None, wrap: Some(WrapOp::Modulo(1.0)) },
                t: AxisOps::default(),
            }
        );
        assert_eq!(mixed.sampler_mode(), WrapMode::Extend);
    }

    #[test]
    fn test_per_axis_flips_v() {
        let plan = WrapPlan::resolve(&AxisBounds::from_wrap_flags(2), &AxisBounds::from_wrap_flags(1));
        // U is left alone, V mirrors around the bottom edge
        let [u, v] = plan.apply([1.25, -0.25]);
        assert_eq!(u, 1.25);
        assert!((v - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ping_pong() {
        let op = WrapOp::PingPong(2.0);
        assert_eq!(op.apply(1.5), 1.5);
        assert_eq!(op.apply(3.0), 1.0);
        assert_eq!(op.apply(-0.5), 0.5);
    }
}
