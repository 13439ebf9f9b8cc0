//! GLR capture format
//!
//! A GLR file is a fixed header followed by `num_triangles` records. Each
//! record is three 44-byte vertices followed by one 132-byte block of RDP
//! state. All values are little-endian.
//!
//! ```text
//! header   magic[6] version:u16 rom_name[20] num_triangles:u32 microcode:u32
//! vertex   x y z r g b a s0 t0 s1 t1                  (11 x f32)
//! state    fog/blend/env/prim RGBA, prim LOD, fog scale/offset, K4/K5,
//!          combiner mux, other mode, geometry mode, texture 0, texture 1
//! ```

mod header;
mod reader;
mod record;

use std::fmt;

pub use header::{GlrHeader, read_header};
pub use reader::{CrcFilter, FilterMode, GlrMesh, TriangleColors, Vertex, decode_triangles};
pub use record::{RawVertex, TextureState, TriangleState};

/// GLR file magic (first 6 bytes)
pub const GLR_MAGIC: [u8; 6] = *b"GL64R\0";

/// The only capture layout this decoder understands.
pub const GLR_VERSION: u16 = 3;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 36;

/// Size of one vertex record.
pub const VERTEX_RECORD_SIZE: usize = 44;

/// Size of one per-triangle RDP state record.
pub const STATE_RECORD_SIZE: usize = 132;

/// Size of one full triangle (3 vertices + state).
pub const TRIANGLE_RECORD_SIZE: usize = 3 * VERTEX_RECORD_SIZE + STATE_RECORD_SIZE;

/// Geometry mode bit enabling fog; shade alpha then carries the fog level.
pub const G_FOG: u32 = 0x10000;

/// Name used when the capture carries no ROM name.
pub const UNKNOWN_ROM_NAME: &str = "Unknown N64 Game";

/// The fixed-size records making up a capture, used to report truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Header,
    Vertex,
    TriangleState,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Header => write!(f, "header"),
            RecordKind::Vertex => write!(f, "vertex"),
            RecordKind::TriangleState => write!(f, "triangle state"),
        }
    }
}
