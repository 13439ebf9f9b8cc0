//! Triangle stream decoding
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Single linear pass over the triangle records: CRC filtering, axis
//! conversion, fog level derivation and material-key interning all happen
//! while reading, so nothing but the output buffers is kept around.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::record::{RawVertex, RecordCursor, TriangleState};
use super::{G_FOG, GlrHeader, HEADER_SIZE, RecordKind, STATE_RECORD_SIZE, VERTEX_RECORD_SIZE};
use crate::error::Result;
use crate::pipeline::{MaterialKey, MaterialTable};

/// Upper bound for up-front allocation; the declared triangle count is not
/// trusted until the records are actually there.
const MAX_PREALLOCATED_TRIANGLES: usize = 1 << 16;

/// Whether the filter list names textures to drop or textures to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Drop triangles whose texture 0 CRC is listed.
    #[default]
    Deny,
    /// Keep only triangles whose texture 0 CRC is listed.
    Allow,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deny" | "blacklist" => Ok(FilterMode::Deny),
            "allow" | "whitelist" => Ok(FilterMode::Allow),
            _ => Err(format!("Invalid filter mode '{s}'. Valid values: allow, deny")),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Deny => write!(f, "deny"),
            FilterMode::Allow => write!(f, "allow"),
        }
    }
}

/// Texture-0 CRC filter applied to every triangle.
#[derive(Debug, Clone, Default)]
pub struct CrcFilter {
    crcs: HashSet<u64>,
    mode: FilterMode,
}

impl CrcFilter {
    pub fn new(crcs: HashSet<u64>, mode: FilterMode) -> Self {
        Self { crcs, mode }
    }

    /// A deny filter with an empty list; keeps everything.
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// Whether a triangle whose texture 0 has this CRC is dropped.
    /// CRC 0 ("no texture") is filtered like any other value.
    pub fn rejects(&self, crc: u64) -> bool {
        self.crcs.contains(&crc) != (self.mode == FilterMode::Allow)
    }
}

/// One output vertex, already converted to Z-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub shade: [f32; 4],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
    /// Shade alpha when the triangle has fog enabled, else 0.
    pub fog_level: f32,
}

impl Vertex {
    pub fn from_raw(raw: &RawVertex, geometry_mode: u32) -> Self {
        let [x, y, z] = raw.position;
        Self {
            position: [x, -z, y],
            shade: raw.color,
            uv0: raw.uv0,
            uv1: raw.uv1,
            fog_level: if geometry_mode & G_FOG != 0 {
                raw.color[3]
            } else {
                0.0
            },
        }
    }
}

/// Flat per-triangle colors, shared by all three corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TriangleColors {
    pub primitive: [f32; 4],
    pub env: [f32; 4],
    pub blend: [f32; 4],
    pub fog: [f32; 4],
}

impl From<&TriangleState> for TriangleColors {
    fn from(state: &TriangleState) -> Self {
        Self {
            primitive: state.prim_color,
            env: state.env_color,
            blend: state.blend_color,
            fog: state.fog_color,
        }
    }
}

/// Flattened triangle soup with per-face material indices.
///
/// Every face owns three fresh vertices, `faces[i] == [3i, 3i+1, 3i+2]`.
#[derive(Debug, Clone, Default)]
pub struct GlrMesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[u32; 3]>,
    pub face_colors: Vec<TriangleColors>,
    /// Index into `materials` for each face.
    pub face_materials: Vec<usize>,
    /// Unique material keys in first-seen order.
    pub materials: MaterialTable,
    /// Triangles removed by the CRC filter.
    pub dropped_triangles: u32,
}

impl GlrMesh {
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether any vertex carries a non-zero fog level.
    pub fn has_fog_levels(&self) -> bool {
        self.vertices.iter().any(|v| v.fog_level != 0.0)
    }
}

/// Decode `header.num_triangles` records from a stream positioned right
/// after the header.
///
/// # Errors
///
/// Returns [`crate::Error::TruncatedRecord`] if the stream ends inside any
/// record. Nothing decoded so far is returned in that case.
pub fn decode_triangles<R: Read>(
    reader: R,
    header: &GlrHeader,
    filter: &CrcFilter,
) -> Result<GlrMesh> {
    let mut cursor = RecordCursor::new(reader, HEADER_SIZE as u64);
    let capacity = (header.num_triangles as usize).min(MAX_PREALLOCATED_TRIANGLES);

    let mut mesh = GlrMesh {
        vertices: Vec::with_capacity(capacity * 3),
        faces: Vec::with_capacity(capacity),
        face_colors: Vec::with_capacity(capacity),
        face_materials: Vec::with_capacity(capacity),
        ..GlrMesh::default()
    };

    for triangle in 0..header.num_triangles {
        // Vertices precede the state they are shaded with
        let mut corners = [RawVertex::default(); 3];
        for corner in &mut corners {
            let bytes = cursor.read_record::<VERTEX_RECORD_SIZE>(RecordKind::Vertex, triangle)?;
            *corner = RawVertex::parse(&bytes)?;
        }
        let bytes = cursor.read_record::<STATE_RECORD_SIZE>(RecordKind::TriangleState, triangle)?;
        let state = TriangleState::parse(&bytes)?;

        if filter.rejects(state.tex0.crc) {
            mesh.dropped_triangles += 1;
            continue;
        }

        let base = mesh.vertices.len() as u32;
        mesh.vertices
            .extend(corners.iter().map(|raw| Vertex::from_raw(raw, state.geometry_mode)));
        mesh.faces.push([base, base + 1, base + 2]);
        mesh.face_colors.push(TriangleColors::from(&state));

        let key = MaterialKey::from_state(&state);
        let material = mesh.materials.intern(key);
        tracing::trace!("triangle {} -> material {}", triangle, material);
        mesh.face_materials.push(material);
    }

    tracing::debug!(
        "Decoded {} triangles ({} filtered, {} materials) ending at byte {}",
        mesh.faces.len(),
        mesh.dropped_triangles,
        mesh.materials.len(),
        cursor.offset()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_modes() {
        let crcs: HashSet<u64> = [0xABCD].into_iter().collect();

        let deny = CrcFilter::new(crcs.clone(), FilterMode::Deny);
        assert!(deny.rejects(0xABCD));
        assert!(!deny.rejects(0x1234));

        let allow = CrcFilter::new(crcs, FilterMode::Allow);
        assert!(!allow.rejects(0xABCD));
        assert!(allow.rejects(0x1234));
        assert!(allow.rejects(0));

        assert!(!CrcFilter::keep_all().rejects(0));
    }

    #[test]
    fn test_axis_swap_and_fog_level() {
        let raw = RawVertex {
            position: [1.0, 2.0, 3.0],
            color: [0.1, 0.2, 0.3, 0.75],
            uv0: [0.5, 0.25],
            uv1: [1.0, 2.0],
        };

        let fogged = Vertex::from_raw(&raw, G_FOG);
        assert_eq!(fogged.position, [1.0, -3.0, 2.0]);
        assert_eq!(fogged.fog_level, 0.75);

        let plain = Vertex::from_raw(&raw, 0x2000);
        assert_eq!(plain.fog_level, 0.0);
        assert_eq!(plain.shade, raw.color);
    }

    #[test]
    fn test_filter_mode_from_str() {
        assert_eq!("Allow".parse::<FilterMode>(), Ok(FilterMode::Allow));
        assert_eq!("deny".parse::<FilterMode>(), Ok(FilterMode::Deny));
        assert!("maybe".parse::<FilterMode>().is_err());
    }
}
