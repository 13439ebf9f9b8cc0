//! Mesh methods for `GlrGltfBuilder`

use indexmap::IndexMap;

use crate::error::Result;
use crate::rdp::ColorLayer;
use crate::scene::{SceneBuilder, SceneMesh};

use super::super::types::{GltfMesh, GltfNode, GltfPrimitive};
use super::GlrGltfBuilder;

/// Vertex attribute name of a color layer. Shade is the standard color set,
/// the others are application specific.
pub(crate) fn color_attribute(layer: ColorLayer) -> &'static str {
    match layer {
        ColorLayer::Shade => "COLOR_0",
        ColorLayer::Primitive => "_PRIMITIVE_COLOR",
        ColorLayer::Env => "_ENV_COLOR",
        ColorLayer::Blend => "_BLEND_COLOR",
        ColorLayer::Fog => "_FOG_COLOR",
    }
}

pub(crate) const FOG_LEVEL_ATTRIBUTE: &str = "_FOG_LEVEL";

impl SceneBuilder for GlrGltfBuilder {
    fn add_mesh(&mut self, mesh: &SceneMesh<'_>, materials: &[usize]) -> Result<()> {
        if mesh.vertex_count() == 0 {
            tracing::debug!("{} has no triangles, adding an empty node", mesh.name);
            self.nodes.push(GltfNode {
                name: Some(mesh.name.to_string()),
                mesh: None,
            });
            return Ok(());
        }

        // Z-up scene coordinates back to glTF's Y-up
        let positions: Vec<[f32; 3]> = mesh.positions.iter().map(|&[x, y, z]| [x, z, -y]).collect();
        // glTF UVs start at the top edge
        let flip = |uvs: &[[f32; 2]]| uvs.iter().map(|&[u, v]| [u, 1.0 - v]).collect::<Vec<_>>();

        let mut attributes = IndexMap::new();
        attributes.insert("POSITION".to_string(), self.add_positions(&positions));
        attributes.insert("TEXCOORD_0".to_string(), self.add_texcoords(&flip(&mesh.uv0)));
        attributes.insert("TEXCOORD_1".to_string(), self.add_texcoords(&flip(&mesh.uv1)));
        let mut color_layers = serde_json::Map::new();
        for layer in ColorLayer::ALL {
            let accessor = self.add_colors(mesh.layer(layer));
            attributes.insert(color_attribute(layer).to_string(), accessor);
            color_layers.insert(color_attribute(layer).to_string(), layer.layer_name().into());
        }
        if let Some(fog_level) = &mesh.fog_level {
            attributes.insert(FOG_LEVEL_ATTRIBUTE.to_string(), self.add_scalars(fog_level));
        }

        // Group faces by material, keeping first-use order
        let mut groups: IndexMap<usize, Vec<u32>> = IndexMap::new();
        for (face, &material) in mesh.faces.iter().zip(mesh.face_materials) {
            groups.entry(material).or_default().extend_from_slice(face);
        }

        let mut primitives = Vec::with_capacity(groups.len());
        for (material, indices) in groups {
            primitives.push(GltfPrimitive {
                attributes: attributes.clone(),
                indices: Some(self.add_indices(&indices)),
                material: materials.get(material).copied(),
            });
        }

        let mesh_idx = self.meshes.len();
        self.meshes.push(GltfMesh {
            name: Some(mesh.name.to_string()),
            primitives,
            extras: Some(serde_json::json!({ "colorLayers": color_layers })),
        });
        self.nodes.push(GltfNode {
            name: Some(mesh.name.to_string()),
            mesh: Some(mesh_idx),
        });

        Ok(())
    }
}
