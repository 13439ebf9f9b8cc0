//! Image, texture, and material methods for `GlrGltfBuilder`

use indexmap::IndexMap;

use crate::error::Result;
use crate::pipeline::{DecodedPipeline, TextureDescriptor};
use crate::rdp::{AlphaMode, TextureFilter, WrapMode};
use crate::scene::{ShaderGraphBuilder, TextureLoader, TextureSource};

use super::super::types::{
    CLAMP_TO_EDGE, GltfMaterial, GltfPbrMetallicRoughness, GltfSampler, GltfTexture,
    GltfTextureInfo, KHR_MATERIALS_UNLIT, LINEAR, MIRRORED_REPEAT, NEAREST, REPEAT,
};
use super::GlrGltfBuilder;

fn gltf_filter(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Closest => NEAREST,
        TextureFilter::Linear => LINEAR,
    }
}

fn gltf_wrap(mode: WrapMode) -> u32 {
    match mode {
        WrapMode::Repeat => REPEAT,
        WrapMode::Mirror => MIRRORED_REPEAT,
        WrapMode::Extend => CLAMP_TO_EDGE,
    }
}

/// Sampler for a texture unit. Per-axis wrap math has no glTF equivalent,
/// such units sample with edge clamping and keep the plan in the extras.
pub(crate) fn sampler_for(texture: &TextureDescriptor) -> GltfSampler {
    let filter = gltf_filter(texture.filter);
    let wrap = gltf_wrap(texture.wrap_plan.sampler_mode());
    GltfSampler {
        mag_filter: filter,
        min_filter: filter,
        wrap_s: wrap,
        wrap_t: wrap,
    }
}

impl GlrGltfBuilder {
    /// Reuse an image with the same file. Returns the image index.
    fn add_image(&mut self, source: &TextureSource) -> usize {
        let name = TextureSource::file_name(source.crc);
        self.images.insert_full(source.path.clone(), name).0
    }

    fn add_sampler(&mut self, sampler: GltfSampler) -> usize {
        if let Some(idx) = self.samplers.iter().position(|s| *s == sampler) {
            return idx;
        }
        self.samplers.push(sampler);
        self.samplers.len() - 1
    }

    fn add_texture(&mut self, texture: GltfTexture) -> usize {
        if let Some(idx) = self.textures.iter().position(|t| *t == texture) {
            return idx;
        }
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// Texture unit shown as base color: texture 0 if the formulas sample
    /// it and it is bound, else texture 1 under the same conditions.
    fn base_color_unit(pipeline: &DecodedPipeline) -> Option<&TextureDescriptor> {
        pipeline
            .textures
            .iter()
            .find(|t| t.is_bound() && pipeline.samples_texture(t.uv_layer))
    }
}

impl ShaderGraphBuilder for GlrGltfBuilder {
    type Handle = usize;

    fn find_material(&self, name: &str) -> Option<usize> {
        self.material_names.get(name).copied()
    }

    fn build_material(
        &mut self,
        name: &str,
        pipeline: &DecodedPipeline,
        textures: &mut dyn TextureLoader,
    ) -> Result<usize> {
        let base_color_texture = match Self::base_color_unit(pipeline) {
            Some(unit) => textures.resolve(unit.crc).map(|source| {
                let source_idx = self.add_image(&source);
                let sampler_idx = self.add_sampler(sampler_for(unit));
                GltfTextureInfo {
                    index: self.add_texture(GltfTexture {
                        source: source_idx,
                        sampler: Some(sampler_idx),
                    }),
                    tex_coord: (unit.uv_layer != 0).then_some(unit.uv_layer),
                }
            }),
            None => None,
        };

        let mut extras = serde_json::to_value(pipeline)?;
        if let Some(object) = extras.as_object_mut() {
            object.insert("name".to_string(), serde_json::Value::from(name));
        }

        let mut extensions = IndexMap::new();
        extensions.insert(KHR_MATERIALS_UNLIT.to_string(), serde_json::json!({}));

        let idx = self.materials.len();
        self.materials.push(GltfMaterial {
            name: name.to_string(),
            pbr_metallic_roughness: GltfPbrMetallicRoughness {
                base_color_factor: [1.0, 1.0, 1.0, 1.0],
                base_color_texture,
                metallic_factor: 0.0,
                roughness_factor: 1.0,
            },
            alpha_mode: match pipeline.alpha_mode {
                AlphaMode::Opaque => "OPAQUE",
                AlphaMode::Blend => "BLEND",
            }
            .to_string(),
            double_sided: !pipeline.cull_backface,
            extensions,
            extras: Some(extras),
        });
        self.material_names.insert(name.to_string(), idx);

        Ok(idx)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::import::ImportOptions;
    use crate::pipeline::{MaterialKey, TextureKey};
    use pretty_assertions::assert_eq;

    // color = texel 1 color, alpha = texel 1 alpha
    const TEXEL1: u64 = (15 << 52) | (31 << 47) | (7 << 44) | (7 << 41) | (15 << 37)
        | (31 << 32) | (15 << 28) | (15 << 24) | (7 << 21) | (7 << 18) | (2 << 15)
        | (7 << 12) | (2 << 9) | (7 << 3);

    struct FixedLoader;

    impl TextureLoader for FixedLoader {
        fn resolve(&mut self, crc: u64) -> Option<TextureSource> {
            (crc != 0).then(|| TextureSource {
                crc,
                path: PathBuf::from("tex").join(TextureSource::file_name(crc)),
                exists: true,
            })
        }
    }

    fn pipeline(combiner_mux: u64, tex0: u64, tex1: u64) -> DecodedPipeline {
        let key = MaterialKey {
            combiner_mux,
            tex0: TextureKey { crc: tex0, wrap_s: 1, wrap_t: 1 },
            tex1: TextureKey { crc: tex1, wrap_s: 0, wrap_t: 0 },
            ..MaterialKey::default()
        };
        DecodedPipeline::assemble(&key, 2, &ImportOptions::default()).unwrap()
    }

    #[test]
    fn test_texture_one_is_used_when_texture_zero_is_not_sampled() {
        let mut builder = GlrGltfBuilder::new();
        let idx = builder
            .build_material("N64 Shader a", &pipeline(TEXEL1, 0xAA, 0xBB), &mut FixedLoader)
            .unwrap();

        let material = &builder.materials[idx];
        let info = material.pbr_metallic_roughness.base_color_texture.as_ref().unwrap();
        assert_eq!(info.tex_coord, Some(1));
        assert_eq!(builder.images.get_index(0).unwrap().0, &PathBuf::from("tex/00000000000000BB.png"));
        assert_eq!(builder.samplers[0].wrap_s, REPEAT);
        assert_eq!(material.alpha_mode, "OPAQUE");
        assert!(material.extensions.contains_key(KHR_MATERIALS_UNLIT));
        assert_eq!(builder.find_material("N64 Shader a"), Some(idx));
    }

    #[test]
    fn test_untextured_material() {
        let mut builder = GlrGltfBuilder::new();
        builder
            .build_material("N64 Shader b", &pipeline(TEXEL1, 0, 0), &mut FixedLoader)
            .unwrap();
        assert!(builder.materials[0].pbr_metallic_roughness.base_color_texture.is_none());
        assert!(builder.images.is_empty());
        assert_eq!(builder.find_material("N64 Shader c"), None);
    }

    #[test]
    fn test_images_and_samplers_are_shared() {
        let mut builder = GlrGltfBuilder::new();
        builder.build_material("a", &pipeline(TEXEL1, 0, 0xBB), &mut FixedLoader).unwrap();
        builder.build_material("b", &pipeline(TEXEL1, 0x11, 0xBB), &mut FixedLoader).unwrap();
        assert_eq!(builder.images.len(), 1);
        assert_eq!(builder.samplers.len(), 1);
        assert_eq!(builder.textures.len(), 1);
        assert_eq!(builder.materials.len(), 2);
    }

    #[test]
    fn test_mirror_sampler() {
        let texture = pipeline(TEXEL1, 0xAA, 0).textures[0];
        let sampler = sampler_for(&texture);
        assert_eq!(sampler.wrap_s, MIRRORED_REPEAT);
        assert_eq!(sampler.wrap_t, MIRRORED_REPEAT);
        assert_eq!(sampler.mag_filter, NEAREST);
    }
}
