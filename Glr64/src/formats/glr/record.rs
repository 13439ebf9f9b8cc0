//! Fixed-layout GLR records

use std::io::{Cursor, ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{RecordKind, STATE_RECORD_SIZE, VERTEX_RECORD_SIZE};
use crate::error::{Error, Result};

/// Reads fixed-size records while tracking the absolute byte offset, so a
/// short read can be reported precisely.
pub(super) struct RecordCursor<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> RecordCursor<R> {
    pub(super) fn new(inner: R, offset: u64) -> Self {
        Self { inner, offset }
    }

    pub(super) fn offset(&self) -> u64 {
        self.offset
    }

    pub(super) fn read_record<const N: usize>(
        &mut self,
        record: RecordKind,
        triangle: u32,
    ) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.offset += N as u64;
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(Error::TruncatedRecord {
                record,
                triangle,
                offset: self.offset,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// One triangle corner exactly as stored (Y-up, untransformed).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
}

impl RawVertex {
    /// Parse an 11-float vertex record.
    pub fn parse(bytes: &[u8; VERTEX_RECORD_SIZE]) -> Result<Self> {
        let mut v = [0f32; 11];
        Cursor::new(&bytes[..]).read_f32_into::<LittleEndian>(&mut v)?;
        Ok(Self {
            position: [v[0], v[1], v[2]],
            color: [v[3], v[4], v[5], v[6]],
            uv0: [v[7], v[8]],
            uv1: [v[9], v[10]],
        })
    }
}

/// Texture tile bound to one of the two texture units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureState {
    /// 64-bit content hash of the texture image; 0 means no texture.
    pub crc: u64,
    pub mask_s: u8,
    pub mask_t: u8,
    /// Bit 0 = mirror, bit 1 = clamp.
    pub wrap_s: u8,
    pub wrap_t: u8,
}

impl TextureState {
    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Self {
            crc: cursor.read_u64::<LittleEndian>()?,
            mask_s: cursor.read_u8()?,
            mask_t: cursor.read_u8()?,
            wrap_s: cursor.read_u8()?,
            wrap_t: cursor.read_u8()?,
        })
    }
}

/// RDP state captured for one triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriangleState {
    pub fog_color: [f32; 4],
    pub blend_color: [f32; 4],
    pub env_color: [f32; 4],
    pub prim_color: [f32; 4],
    /// Primitive LOD minimum level and fraction.
    pub prim_lod: [f32; 2],
    pub fog_multiplier: f32,
    pub fog_offset: f32,
    /// Color conversion constants; carried for completeness only.
    pub k4: i32,
    pub k5: i32,
    pub combiner_mux: u64,
    pub other_mode: u64,
    pub geometry_mode: u32,
    pub tex0: TextureState,
    pub tex1: TextureState,
}

impl TriangleState {
    /// Parse a 132-byte state record.
    pub fn parse(bytes: &[u8; STATE_RECORD_SIZE]) -> Result<Self> {
        let mut cursor = Cursor::new(&bytes[..]);

        let mut colors = [0f32; 16];
        cursor.read_f32_into::<LittleEndian>(&mut colors)?;
        let rgba = |i: usize| [colors[i], colors[i + 1], colors[i + 2], colors[i + 3]];

        let prim_lod = [
            cursor.read_f32::<LittleEndian>()?,
            cursor.read_f32::<LittleEndian>()?,
        ];
        let fog_multiplier = cursor.read_f32::<LittleEndian>()?;
        let fog_offset = cursor.read_f32::<LittleEndian>()?;
        let k4 = cursor.read_i32::<LittleEndian>()?;
        let k5 = cursor.read_i32::<LittleEndian>()?;
        let combiner_mux = cursor.read_u64::<LittleEndian>()?;
        let other_mode = cursor.read_u64::<LittleEndian>()?;
        let geometry_mode = cursor.read_u32::<LittleEndian>()?;
        let tex0 = TextureState::read(&mut cursor)?;
        let tex1 = TextureState::read(&mut cursor)?;

        Ok(Self {
            fog_color: rgba(0),
            blend_color: rgba(4),
            env_color: rgba(8),
            prim_color: rgba(12),
            prim_lod,
            fog_multiplier,
            fog_offset,
            k4,
            k5,
            combiner_mux,
            other_mode,
            geometry_mode,
            tex0,
            tex1,
        })
    }
}
