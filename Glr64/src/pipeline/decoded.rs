//! Resolved per-material pipeline

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::key::{MaterialKey, TextureKey};
use crate::error::Result;
use crate::import::ImportOptions;
use crate::rdp::{
    AlphaMode, AxisBounds, BlenderPlan, ColorLayer, CombinerStages, Operand, Placeholder,
    RdpFormulas, TextureFilter, TextureWrap, WrapPlan, backface_culling, decode_rdp_state,
    show_blender_formula, show_combiner_formula,
};

/// Prefix of content-derived material names.
pub const MATERIAL_NAME_PREFIX: &str = "N64 Shader ";

/// One texture unit as the shading backend should sample it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextureDescriptor {
    /// Content hash naming the image; 0 means nothing is bound.
    pub crc: u64,
    pub filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub bounds_s: AxisBounds,
    pub bounds_t: AxisBounds,
    pub wrap_plan: WrapPlan,
    /// UV layer the unit reads (0 for texture 0, 1 for texture 1).
    pub uv_layer: usize,
}

impl TextureDescriptor {
    pub fn new(unit: usize, key: &TextureKey, filter: TextureFilter) -> Self {
        let bounds_s = AxisBounds::from_wrap_flags(key.wrap_s);
        let bounds_t = AxisBounds::from_wrap_flags(key.wrap_t);
        Self {
            crc: key.crc,
            filter,
            wrap_s: TextureWrap::from_raw(key.wrap_s),
            wrap_t: TextureWrap::from_raw(key.wrap_t),
            bounds_s,
            bounds_t,
            wrap_plan: WrapPlan::resolve(&bounds_s, &bounds_t),
            uv_layer: unit,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.crc != 0
    }

    /// `"<CRC>, <filter>, <wrap>"`, wrap shown as `S x T` when the axes differ.
    pub fn info(&self) -> String {
        let wrap = if self.wrap_s == self.wrap_t {
            self.wrap_s.to_string()
        } else {
            format!("{} x {}", self.wrap_s, self.wrap_t)
        };
        format!("{:016X}, {}, {}", self.crc, self.filter, wrap)
    }
}

/// Readable formulas attached to materials for debugging.
/// Fields of absent cycles are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Annotations {
    pub texture0: String,
    pub texture1: String,
    pub color_combiner1: String,
    pub alpha_combiner1: String,
    pub color_combiner2: String,
    pub alpha_combiner2: String,
    pub blender1: String,
    pub blender2: String,
}

impl Annotations {
    fn new(formulas: &RdpFormulas, textures: &[TextureDescriptor; 2]) -> Self {
        let combiner2 = formulas.combiner2.as_ref();
        Self {
            texture0: textures[0].info(),
            texture1: textures[1].info(),
            color_combiner1: show_combiner_formula(&formulas.combiner1.color),
            alpha_combiner1: show_combiner_formula(&formulas.combiner1.alpha),
            color_combiner2: combiner2.map(|c| show_combiner_formula(&c.color)).unwrap_or_default(),
            alpha_combiner2: combiner2.map(|c| show_combiner_formula(&c.alpha)).unwrap_or_default(),
            blender1: show_blender_formula(&formulas.blender1),
            blender2: formulas.blender2.as_ref().map(show_blender_formula).unwrap_or_default(),
        }
    }

    /// `(label, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("N64 Texture 0", &self.texture0),
            ("N64 Texture 1", &self.texture1),
            ("N64 Color Combiner 1", &self.color_combiner1),
            ("N64 Alpha Combiner 1", &self.alpha_combiner1),
            ("N64 Color Combiner 2", &self.color_combiner2),
            ("N64 Alpha Combiner 2", &self.alpha_combiner2),
            ("N64 Blender 1", &self.blender1),
            ("N64 Blender 2", &self.blender2),
        ]
    }
}

/// Everything a shading backend needs to build one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPipeline {
    pub formulas: RdpFormulas,
    /// Realization of each present combiner cycle.
    pub combiner_stages: Vec<CombinerStages>,
    pub blender: BlenderPlan,
    pub textures: [TextureDescriptor; 2],
    pub cull_backface: bool,
    /// Whether translucent materials should actually be shown as such.
    pub show_alpha: bool,
    pub alpha_mode: AlphaMode,
    pub annotations: Annotations,
}

impl DecodedPipeline {
    /// Resolve the pipeline for one material key.
    pub fn assemble(key: &MaterialKey, microcode: u32, options: &ImportOptions) -> Result<Self> {
        let formulas = decode_rdp_state(key.combiner_mux, key.other_mode, key.geometry_mode)?;

        let filter = TextureFilter::from_other_mode(key.other_mode);
        let textures = [
            TextureDescriptor::new(0, &key.tex0, filter),
            TextureDescriptor::new(1, &key.tex1, filter),
        ];

        let cull_backface =
            backface_culling(key.geometry_mode, microcode) && options.enable_bf_culling;
        let show_alpha = options.enable_mat_transparency;
        let blender = formulas.blender_plan();

        Ok(Self {
            combiner_stages: formulas.combiner_stages(),
            alpha_mode: blender.alpha_mode(show_alpha),
            blender,
            annotations: Annotations::new(&formulas, &textures),
            formulas,
            textures,
            cull_backface,
            show_alpha,
        })
    }

    /// Distinct inputs read by the formulas, in a stable order.
    pub fn inputs(&self) -> BTreeSet<Operand> {
        self.formulas.operands().collect()
    }

    /// Whether any formula samples texture `unit`.
    pub fn samples_texture(&self, unit: usize) -> bool {
        self.inputs().iter().any(|op| op.texture_unit() == Some(unit))
    }

    pub fn color_layers(&self) -> BTreeSet<ColorLayer> {
        self.inputs().iter().filter_map(|op| op.color_layer()).collect()
    }

    pub fn placeholders(&self) -> BTreeSet<Placeholder> {
        self.inputs().iter().filter_map(|op| op.placeholder()).collect()
    }

    pub fn reads_fog_level(&self) -> bool {
        self.inputs().contains(&Operand::FogLevel)
    }

    pub fn is_translucent(&self) -> bool {
        self.blender.translucent
    }

    /// `"N64 Shader <16 hex>"` derived from the pipeline content, so equal
    /// pipelines get equal names across files.
    pub fn content_name(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        let mut name = String::from(MATERIAL_NAME_PREFIX);
        for byte in &digest[..8] {
            let _ = write!(name, "{byte:02x}");
        }
        Ok(name)
    }
}
