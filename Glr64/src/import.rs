//! GLR import entry points and options
//!
//! [`decode`] is the whole core: header, triangle stream and one resolved
//! pipeline per unique material key. Everything downstream (scene building,
//! glTF export) works from the returned [`GlrImport`].

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::glr::{CrcFilter, FilterMode, GlrHeader, GlrMesh, decode_triangles, read_header};
use crate::pipeline::DecodedPipeline;

/// Filter list token standing for "no texture bound" (CRC 0).
pub const NO_TEXTURE: &str = "NO_TEXTURE";

/// Options controlling a GLR import.
///
/// Can be read from TOML; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Comma separated texture CRCs in hex; `NO_TEXTURE` means CRC 0.
    pub filter_list: String,
    /// Whether `filter_list` names textures to drop or to keep.
    pub filter_mode: FilterMode,
    /// Emit the per-vertex fog level attribute.
    pub enable_fog: bool,
    /// Show translucent materials with alpha blending.
    pub enable_mat_transparency: bool,
    /// Honour the capture's back face culling flag.
    pub enable_bf_culling: bool,
    /// Directory holding `<CRC>.png` textures. Defaults to the capture's
    /// directory when loading from a file.
    pub texture_dir: Option<PathBuf>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            filter_list: String::new(),
            filter_mode: FilterMode::Deny,
            enable_fog: true,
            enable_mat_transparency: true,
            enable_bf_culling: false,
            texture_dir: None,
        }
    }
}

impl ImportOptions {
    /// Create options with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Set the texture CRC filter list.
    #[must_use]
    pub fn with_filter_list(mut self, list: impl Into<String>) -> Self {
        self.filter_list = list.into();
        self
    }

    /// Set whether the filter list is a deny or allow list.
    #[must_use]
    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Set whether to emit fog levels.
    #[must_use]
    pub fn with_fog(mut self, enable: bool) -> Self {
        self.enable_fog = enable;
        self
    }

    /// Set whether translucent materials are shown as such.
    #[must_use]
    pub fn with_transparency(mut self, enable: bool) -> Self {
        self.enable_mat_transparency = enable;
        self
    }

    /// Set whether back face culling is carried over.
    #[must_use]
    pub fn with_backface_culling(mut self, enable: bool) -> Self {
        self.enable_bf_culling = enable;
        self
    }

    /// Set the texture directory.
    #[must_use]
    pub fn with_texture_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.texture_dir = dir;
        self
    }

    /// Validate the filter list and build the triangle filter.
    pub fn crc_filter(&self) -> Result<CrcFilter> {
        Ok(CrcFilter::new(parse_filter_list(&self.filter_list)?, self.filter_mode))
    }
}

/// Parse a comma separated list of hex CRCs.
///
/// Tokens are trimmed and may carry a `0x` prefix. A blank list is empty.
///
/// # Errors
///
/// Returns [`Error::InvalidFilterEntry`] for the first token that is neither
/// hex nor `NO_TEXTURE`, including an empty token between commas.
pub fn parse_filter_list(list: &str) -> Result<HashSet<u64>> {
    let mut crcs = HashSet::new();
    if list.trim().is_empty() {
        return Ok(crcs);
    }

    for token in list.split(',').map(str::trim) {
        let crc = if token == NO_TEXTURE {
            0
        } else {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u64::from_str_radix(digits, 16).map_err(|_| Error::InvalidFilterEntry {
                entry: token.to_string(),
            })?
        };
        crcs.insert(crc);
    }

    Ok(crcs)
}

/// A decoded capture: mesh plus one pipeline per material.
#[derive(Debug, Clone)]
pub struct GlrImport {
    /// `"<rom name> (<file base name>)"`
    pub name: String,
    pub header: GlrHeader,
    pub mesh: GlrMesh,
    /// Parallel to `mesh.materials`.
    pub pipelines: Vec<DecodedPipeline>,
    /// Where `<CRC>.png` textures are looked up.
    pub texture_dir: Option<PathBuf>,
    /// Whether the fog level attribute is wanted.
    pub enable_fog: bool,
}

impl GlrImport {
    /// Per-vertex fog levels, if fog is enabled and any vertex is fogged.
    pub fn fog_levels(&self) -> Option<Vec<f32>> {
        (self.enable_fog && self.mesh.has_fog_levels())
            .then(|| self.mesh.vertices.iter().map(|v| v.fog_level).collect())
    }
}

/// Decode a whole capture held in memory.
///
/// `rom_file_base_name` is the capture's file name without extension and
/// only used for naming.
pub fn decode(bytes: &[u8], rom_file_base_name: &str, options: &ImportOptions) -> Result<GlrImport> {
    decode_reader(Cursor::new(bytes), rom_file_base_name, options)
}

/// Decode a capture from any sequential reader.
///
/// The filter list is validated before any byte is read. On error nothing
/// is returned, not even the triangles decoded so far.
pub fn decode_reader<R: Read>(
    mut reader: R,
    rom_file_base_name: &str,
    options: &ImportOptions,
) -> Result<GlrImport> {
    let filter = options.crc_filter()?;

    let header = read_header(&mut reader)?;
    tracing::debug!(
        "GLR v{}: rom {:?}, {} triangles, microcode {}",
        header.version,
        header.rom_name,
        header.num_triangles,
        header.microcode
    );

    let mesh = decode_triangles(&mut reader, &header, &filter)?;

    let pipelines = mesh
        .materials
        .iter()
        .map(|key| DecodedPipeline::assemble(key, header.microcode, options))
        .collect::<Result<Vec<_>>>()?;

    for pipeline in &pipelines {
        for placeholder in pipeline.placeholders() {
            tracing::warn!("Unimplemented color combiner input: {}", placeholder);
        }
    }

    Ok(GlrImport {
        name: header.object_name(rom_file_base_name),
        header,
        mesh,
        pipelines,
        texture_dir: options.texture_dir.clone(),
        enable_fog: options.enable_fog,
    })
}

/// Decode a capture file. Textures default to the file's directory.
pub fn load_glr(path: &Path, options: &ImportOptions) -> Result<GlrImport> {
    let base_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;

    tracing::debug!("Loading {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    let mut import = decode_reader(reader, base_name, options)?;

    if import.texture_dir.is_none() {
        import.texture_dir = path.parent().map(Path::to_path_buf);
    }
    Ok(import)
}

/// Decode several captures in parallel. Results keep the input order.
pub fn load_many(paths: &[PathBuf], options: &ImportOptions) -> Vec<Result<GlrImport>> {
    paths.par_iter().map(|path| load_glr(path, options)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_list() {
        let crcs = parse_filter_list("ABCD, NO_TEXTURE,0x10").unwrap();
        let expected: HashSet<u64> = [0xABCD, 0, 0x10].into_iter().collect();
        assert_eq!(crcs, expected);

        assert!(parse_filter_list("").unwrap().is_empty());
        assert!(parse_filter_list("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_filter_list_rejects_empty_entries() {
        for list in ["A,,B", "ABCD,", ",ABCD", "A, ,B"] {
            match parse_filter_list(list) {
                Err(Error::InvalidFilterEntry { entry }) => assert_eq!(entry, "", "{list}"),
                other => panic!("{list}: unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_filter_list_rejects_non_hex() {
        match parse_filter_list("ABCD,xyz") {
            Err(Error::InvalidFilterEntry { entry }) => assert_eq!(entry, "xyz"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_filter_fails_before_reading() {
        let options = ImportOptions::new().with_filter_list("not hex");
        // Empty input would otherwise be a truncated header
        assert!(matches!(
            decode(&[], "empty", &options),
            Err(Error::InvalidFilterEntry { .. })
        ));
    }

    #[test]
    fn test_options_from_toml() {
        let options: ImportOptions = toml::from_str(
            r#"
            filter_list = "DEADBEEF"
            filter_mode = "allow"
            enable_fog = false
            "#,
        )
        .unwrap();

        assert_eq!(options.filter_mode, FilterMode::Allow);
        assert!(!options.enable_fog);
        // untouched keys keep their defaults
        assert!(options.enable_mat_transparency);
        assert!(!options.enable_bf_culling);
        assert_eq!(options.texture_dir, None);
    }
}
