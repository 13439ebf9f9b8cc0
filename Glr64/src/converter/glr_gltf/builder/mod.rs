//! glTF 2.0 document builder for GLR captures.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! One builder can take several captures; materials with the same content
//! name are shared between them.

mod export;
mod material_methods;
mod mesh;
mod vertex_attributes;

use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;

use super::types::{
    GltfAccessor, GltfBufferView, GltfMaterial, GltfMesh, GltfNode, GltfSampler, GltfTexture,
};

/// Builder for constructing glTF documents.
pub struct GlrGltfBuilder {
    pub(crate) buffer: Vec<u8>,
    pub(crate) buffer_views: Vec<GltfBufferView>,
    pub(crate) accessors: Vec<GltfAccessor>,
    pub(crate) meshes: Vec<GltfMesh>,
    pub(crate) nodes: Vec<GltfNode>,
    /// Image file to image name. URIs are resolved against the output
    /// location on export.
    pub(crate) images: IndexMap<PathBuf, String>,
    pub(crate) textures: Vec<GltfTexture>,
    pub(crate) samplers: Vec<GltfSampler>,
    pub(crate) materials: Vec<GltfMaterial>,
    material_names: HashMap<String, usize>,
}

impl GlrGltfBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            buffer_views: Vec::new(),
            accessors: Vec::new(),
            meshes: Vec::new(),
            nodes: Vec::new(),
            images: IndexMap::new(),
            textures: Vec::new(),
            samplers: Vec::new(),
            materials: Vec::new(),
            material_names: HashMap::new(),
        }
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub(crate) fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buffer.len() % alignment)) % alignment;
        self.buffer.extend(std::iter::repeat_n(0u8, padding));
    }
}

impl Default for GlrGltfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneBuilder, SceneMesh};
    use pretty_assertions::assert_eq;

    fn read_f32s(buffer: &[u8], offset: usize, count: usize) -> Vec<f32> {
        buffer[offset..offset + count * 4]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    fn mesh<'a>(faces: &'a [[u32; 3]], face_materials: &'a [usize]) -> SceneMesh<'a> {
        let corners = faces.len() * 3;
        SceneMesh {
            name: "test",
            positions: (0..corners).map(|i| [i as f32, 1.0, 2.0]).collect(),
            uv0: vec![[0.25, 0.25]; corners],
            uv1: vec![[0.0, 0.0]; corners],
            colors: std::array::from_fn(|_| vec![[1.0; 4]; corners]),
            fog_level: None,
            faces,
            face_materials,
        }
    }

    #[test]
    fn test_positions_back_to_y_up_and_uvs_flipped() {
        let faces = [[0, 1, 2]];
        let mut builder = GlrGltfBuilder::new();
        builder.add_mesh(&mesh(&faces, &[0]), &[0]).unwrap();

        let positions = &builder.buffer_views[builder.accessors[0].buffer_view];
        assert_eq!(
            read_f32s(&builder.buffer, positions.byte_offset, 3),
            vec![0.0, 2.0, -1.0]
        );
        assert_eq!(builder.accessors[0].min, Some(vec![0.0, 2.0, -1.0]));
        assert_eq!(builder.accessors[0].max, Some(vec![2.0, 2.0, -1.0]));

        let uv0 = &builder.buffer_views[builder.accessors[1].buffer_view];
        assert_eq!(read_f32s(&builder.buffer, uv0.byte_offset, 2), vec![0.25, 0.75]);
    }

    #[test]
    fn test_one_primitive_per_material() {
        let faces = [[0, 1, 2], [3, 4, 5], [6, 7, 8]];
        let mut builder = GlrGltfBuilder::new();
        builder.add_mesh(&mesh(&faces, &[1, 0, 1]), &[10, 11]).unwrap();

        let primitives = &builder.meshes[0].primitives;
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[0].material, Some(11));
        assert_eq!(primitives[1].material, Some(10));
        let first = primitives[0].indices.unwrap();
        assert_eq!(builder.accessors[first].count, 6);
        assert_eq!(builder.accessors[first].component_type, super::super::types::UNSIGNED_SHORT);
        // positions are shared
        assert_eq!(primitives[0].attributes["POSITION"], primitives[1].attributes["POSITION"]);
    }

    #[test]
    fn test_mesh_extras_name_color_layers() {
        let faces = [[0, 1, 2]];
        let mut builder = GlrGltfBuilder::new();
        builder.add_mesh(&mesh(&faces, &[0]), &[0]).unwrap();

        let extras = builder.meshes[0].extras.as_ref().unwrap();
        assert_eq!(extras["colorLayers"]["COLOR_0"], "Shade Color");
        assert_eq!(extras["colorLayers"]["_PRIMITIVE_COLOR"], "Primitive Color");
        assert_eq!(extras["colorLayers"]["_FOG_COLOR"], "Fog Color");
        assert_eq!(extras["colorLayers"].as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_empty_mesh_adds_bare_node() {
        let mut builder = GlrGltfBuilder::new();
        builder.add_mesh(&mesh(&[], &[]), &[]).unwrap();
        assert_eq!(builder.mesh_count(), 0);
        assert_eq!(builder.nodes.len(), 1);

        let glb = builder.build_glb().unwrap();
        assert_eq!(&glb[..4], b"glTF");
        assert_eq!(u32::from_le_bytes([glb[8], glb[9], glb[10], glb[11]]) as usize, glb.len());
        assert_eq!(glb.len() % 4, 0);
    }
}
