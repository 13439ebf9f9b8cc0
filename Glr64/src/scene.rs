//! Scene and shader collaborators
//!
//! The decoder never builds host objects itself. A [`SceneBuilder`] receives
//! the flattened mesh and a [`ShaderGraphBuilder`] receives each decoded
//! pipeline; [`build_scene`] drives both from a [`GlrImport`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::formats::glr::TriangleColors;
use crate::import::GlrImport;
use crate::pipeline::DecodedPipeline;
use crate::rdp::ColorLayer;

/// A texture image resolved from its CRC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSource {
    pub crc: u64,
    pub path: PathBuf,
    /// `false` if the file is missing; the path is still usable once the
    /// texture dump is completed.
    pub exists: bool,
}

impl TextureSource {
    /// `<CRC>.png`, as written by texture dumps.
    pub fn file_name(crc: u64) -> String {
        format!("{crc:016X}.png")
    }
}

/// Maps texture CRCs to images.
pub trait TextureLoader {
    /// `None` when no texture is bound (CRC 0).
    fn resolve(&mut self, crc: u64) -> Option<TextureSource>;
}

/// Looks up `<CRC>.png` in one directory.
#[derive(Debug, Clone, Default)]
pub struct DirTextureLoader {
    dir: PathBuf,
    resolved: HashMap<u64, TextureSource>,
}

impl DirTextureLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            resolved: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TextureLoader for DirTextureLoader {
    fn resolve(&mut self, crc: u64) -> Option<TextureSource> {
        if crc == 0 {
            return None;
        }

        let dir = &self.dir;
        let source = self.resolved.entry(crc).or_insert_with(|| {
            let path = dir.join(TextureSource::file_name(crc));
            let exists = path.is_file();
            if !exists {
                tracing::warn!("Texture {} not found, keeping reference", path.display());
            }
            TextureSource { crc, path, exists }
        });
        Some(source.clone())
    }
}

/// Builds one material per pipeline.
pub trait ShaderGraphBuilder {
    /// Opaque material reference handed back to the scene builder.
    type Handle: Clone;

    /// A material previously built under `name`, if any.
    fn find_material(&self, name: &str) -> Option<Self::Handle>;

    fn build_material(
        &mut self,
        name: &str,
        pipeline: &DecodedPipeline,
        textures: &mut dyn TextureLoader,
    ) -> Result<Self::Handle>;
}

/// Receives the decoded geometry.
pub trait SceneBuilder: ShaderGraphBuilder {
    /// `materials[i]` is the material of faces whose index is `i`.
    fn add_mesh(&mut self, mesh: &SceneMesh<'_>, materials: &[Self::Handle]) -> Result<()>;
}

/// Flattened per-corner mesh data.
#[derive(Debug, Clone)]
pub struct SceneMesh<'a> {
    pub name: &'a str,
    pub positions: Vec<[f32; 3]>,
    pub uv0: Vec<[f32; 2]>,
    pub uv1: Vec<[f32; 2]>,
    /// One RGBA layer per [`ColorLayer`], in [`ColorLayer::ALL`] order.
    pub colors: [Vec<[f32; 4]>; 5],
    pub fog_level: Option<Vec<f32>>,
    pub faces: &'a [[u32; 3]],
    pub face_materials: &'a [usize],
}

impl<'a> SceneMesh<'a> {
    pub fn from_import(import: &'a GlrImport) -> Self {
        let mesh = &import.mesh;
        let corner = |pick: fn(&TriangleColors) -> [f32; 4]| {
            mesh.face_colors
                .iter()
                .flat_map(|c| [pick(c); 3])
                .collect::<Vec<_>>()
        };

        Self {
            name: &import.name,
            positions: mesh.vertices.iter().map(|v| v.position).collect(),
            uv0: mesh.vertices.iter().map(|v| v.uv0).collect(),
            uv1: mesh.vertices.iter().map(|v| v.uv1).collect(),
            colors: [
                mesh.vertices.iter().map(|v| v.shade).collect(),
                corner(|c| c.primitive),
                corner(|c| c.env),
                corner(|c| c.blend),
                corner(|c| c.fog),
            ],
            fog_level: import.fog_levels(),
            faces: &mesh.faces,
            face_materials: &mesh.face_materials,
        }
    }

    pub fn layer(&self, layer: ColorLayer) -> &[[f32; 4]] {
        &self.colors[layer as usize]
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Feed one import into a builder.
///
/// Materials are named by content; a name the builder already knows is
/// reused instead of built again, also across imports.
pub fn build_scene<B: SceneBuilder>(import: &GlrImport, builder: &mut B) -> Result<()> {
    let mut loader = DirTextureLoader::new(import.texture_dir.clone().unwrap_or_default());

    let mut handles = Vec::with_capacity(import.pipelines.len());
    for pipeline in &import.pipelines {
        let name = pipeline.content_name()?;
        let handle = match builder.find_material(&name) {
            Some(handle) => handle,
            None => {
                tracing::debug!("Building material {}", name);
                builder.build_material(&name, pipeline, &mut loader)?
            }
        };
        handles.push(handle);
    }

    builder.add_mesh(&SceneMesh::from_import(import), &handles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc_zero_is_unbound() {
        let mut loader = DirTextureLoader::new("textures");
        assert_eq!(loader.resolve(0), None);
    }

    #[test]
    fn test_missing_texture_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("00000000DEADBEEF.png"), b"png").unwrap();

        let mut loader = DirTextureLoader::new(dir.path());
        let found = loader.resolve(0xDEAD_BEEF).unwrap();
        assert!(found.exists);

        let missing = loader.resolve(0x0123_4567_89AB_CDEF).unwrap();
        assert!(!missing.exists);
        assert_eq!(missing.path, dir.path().join("0123456789ABCDEF.png"));
    }
}
