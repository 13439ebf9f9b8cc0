//! Export methods for `GlrGltfBuilder`

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

use super::super::types::{
    GltfAsset, GltfBuffer, GltfDocument, GltfImage, GltfScene, KHR_MATERIALS_UNLIT,
};
use super::GlrGltfBuilder;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

fn to_json(doc: &GltfDocument, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    json.map_err(|e| Error::GltfSerializationFailed {
        message: e.to_string(),
    })
}

/// `path` relative to `base`. Paths on another root are kept as they are.
fn relative_path(path: &Path, base: &Path) -> PathBuf {
    if path.has_root() != base.has_root() {
        return path.to_path_buf();
    }
    let parts: Vec<Component> = path.components().filter(|c| *c != Component::CurDir).collect();
    let base_parts: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let common = parts.iter().zip(&base_parts).take_while(|(a, b)| a == b).count();
    if common == 0 && path.has_root() {
        return path.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    relative.extend(&parts[common..]);
    relative
}

fn percent_encode(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// URI of an image file as seen from `base_dir`. Relative paths become
/// relative references, absolute ones `file:` URIs.
fn image_uri(path: &Path, base_dir: Option<&Path>) -> String {
    let path = match base_dir {
        Some(base) => relative_path(path, base),
        None => path.to_path_buf(),
    };

    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                segments.push(prefix.as_os_str().to_string_lossy().into_owned());
            }
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(part) => segments.push(percent_encode(&part.to_string_lossy())),
            Component::RootDir | Component::CurDir => {}
        }
    }

    let joined = segments.join("/");
    if path.has_root() {
        format!("file:///{joined}")
    } else {
        joined
    }
}

impl GlrGltfBuilder {
    fn build_document(
        self,
        buffer_uri: Option<String>,
        base_dir: Option<&Path>,
    ) -> (GltfDocument, Vec<u8>) {
        let scene_nodes = (0..self.nodes.len()).collect();

        let extensions_used = if self.materials.is_empty() {
            Vec::new()
        } else {
            vec![KHR_MATERIALS_UNLIT.to_string()]
        };

        let buffers = if self.buffer.is_empty() {
            Vec::new()
        } else {
            vec![GltfBuffer {
                byte_length: self.buffer.len(),
                uri: buffer_uri,
            }]
        };

        let images = self
            .images
            .iter()
            .map(|(path, name)| GltfImage {
                uri: image_uri(path, base_dir),
                name: Some(name.clone()),
            })
            .collect();

        let doc = GltfDocument {
            asset: GltfAsset {
                version: "2.0".to_string(),
                generator: Some(format!("Glr64 {}", crate::VERSION)),
            },
            extensions_used,
            scene: 0,
            scenes: vec![GltfScene {
                name: Some("Scene".to_string()),
                nodes: scene_nodes,
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            materials: self.materials,
            textures: self.textures,
            images,
            samplers: self.samplers,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers,
        };

        (doc, self.buffer)
    }

    /// Build GLB data and return as bytes. Image URIs keep the paths the
    /// texture loader returned.
    pub fn build_glb(self) -> Result<Vec<u8>> {
        self.glb_bytes(None)
    }

    fn glb_bytes(self, base_dir: Option<&Path>) -> Result<Vec<u8>> {
        let (doc, buffer) = self.build_document(None, base_dir);
        let json = to_json(&doc, false)?;
        let json_bytes = json.as_bytes();

        let json_padding = (4 - (json_bytes.len() % 4)) % 4;
        let json_chunk_len = json_bytes.len() + json_padding;

        let bin_padding = (4 - (buffer.len() % 4)) % 4;
        let bin_chunk_len = buffer.len() + bin_padding;
        let bin_chunk_total = if buffer.is_empty() { 0 } else { 8 + bin_chunk_len };

        let total_len = 12 + 8 + json_chunk_len + bin_chunk_total;
        let mut output = Vec::with_capacity(total_len);

        output.extend_from_slice(GLB_MAGIC);
        output.extend_from_slice(&GLB_VERSION.to_le_bytes());
        output.extend_from_slice(&(total_len as u32).to_le_bytes());

        output.extend_from_slice(&(json_chunk_len as u32).to_le_bytes());
        output.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        output.extend_from_slice(json_bytes);
        output.extend(std::iter::repeat_n(b' ', json_padding));

        if !buffer.is_empty() {
            output.extend_from_slice(&(bin_chunk_len as u32).to_le_bytes());
            output.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            output.extend_from_slice(&buffer);
            output.extend(std::iter::repeat_n(0u8, bin_padding));
        }

        Ok(output)
    }

    /// Export as a GLB file. Image URIs are relative to its directory.
    pub fn export_glb(self, path: &Path) -> Result<()> {
        let glb_data = self.glb_bytes(path.parent())?;
        let mut file = File::create(path)?;
        file.write_all(&glb_data)?;
        Ok(())
    }

    /// Export as a `.gltf` file next to a `.bin` buffer of the same stem.
    pub fn export_gltf(self, path: &Path) -> Result<()> {
        let bin_filename = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| format!("{s}.bin"))
            .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
        let bin_path = path.with_file_name(&bin_filename);

        let (doc, buffer) = self.build_document(Some(bin_filename), path.parent());

        let json = to_json(&doc, true)?;
        File::create(path)?.write_all(json.as_bytes())?;

        if !buffer.is_empty() {
            File::create(&bin_path)?.write_all(&buffer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_uri_is_relative_to_output() {
        assert_eq!(
            image_uri(Path::new("/data/captures/00AA.png"), Some(Path::new("/data/captures"))),
            "00AA.png"
        );
        assert_eq!(
            image_uri(Path::new("/data/captures/00AA.png"), Some(Path::new("/data/out/glb"))),
            "../../captures/00AA.png"
        );
        assert_eq!(image_uri(Path::new("tex/00AA.png"), Some(Path::new(""))), "tex/00AA.png");
        assert_eq!(image_uri(Path::new("tex/00AA.png"), Some(Path::new("out"))), "../tex/00AA.png");
    }

    #[test]
    fn test_image_uri_is_percent_encoded() {
        assert_eq!(
            image_uri(Path::new("/data/my textures/00AA.png"), Some(Path::new("/data/out"))),
            "../my%20textures/00AA.png"
        );
        assert_eq!(image_uri(Path::new("caf\u{e9}#1/a.png"), None), "caf%C3%A9%231/a.png");
    }

    #[test]
    fn test_image_uri_without_common_root_is_a_file_uri() {
        assert_eq!(
            image_uri(Path::new("/data/my textures/00AA.png"), None),
            "file:///data/my%20textures/00AA.png"
        );
        assert_eq!(
            image_uri(Path::new("/data/00AA.png"), Some(Path::new("relative/out"))),
            "file:///data/00AA.png"
        );
    }
}
