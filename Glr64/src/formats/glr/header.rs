//! GLR file header

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use super::record::RecordCursor;
use super::{GLR_MAGIC, GLR_VERSION, HEADER_SIZE, RecordKind, UNKNOWN_ROM_NAME};
use crate::error::{Error, Result};

/// Length of the NUL-padded ROM name field.
const ROM_NAME_SIZE: usize = 20;

/// Parsed GLR header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlrHeader {
    pub version: u16,
    /// ROM name with NUL padding and surrounding whitespace removed. Empty
    /// if the capture did not record one.
    pub rom_name: String,
    pub num_triangles: u32,
    /// Graphics microcode that produced the capture.
    pub microcode: u32,
}

impl GlrHeader {
    /// Mesh name: `"<rom name> (<file base name>)"`.
    pub fn object_name(&self, file_base_name: &str) -> String {
        let rom = if self.rom_name.is_empty() {
            UNKNOWN_ROM_NAME
        } else {
            self.rom_name.as_str()
        };
        format!("{rom} ({file_base_name})")
    }
}

/// Read and validate the header.
///
/// # Errors
///
/// Returns [`Error::InvalidGlrMagic`] for a foreign file,
/// [`Error::OutdatedGlrVersion`] for versions 1-2,
/// [`Error::UnknownGlrVersion`] for anything else but 3, and
/// [`Error::TruncatedRecord`] if fewer than 36 bytes are available.
pub fn read_header<R: Read>(reader: R) -> Result<GlrHeader> {
    let bytes = RecordCursor::new(reader, 0).read_record::<HEADER_SIZE>(RecordKind::Header, 0)?;
    parse_header(&bytes)
}

pub(super) fn parse_header(bytes: &[u8; HEADER_SIZE]) -> Result<GlrHeader> {
    let mut cursor = Cursor::new(&bytes[..]);

    let mut magic = [0u8; 6];
    cursor.read_exact(&mut magic)?;
    if magic != GLR_MAGIC {
        return Err(Error::InvalidGlrMagic(magic));
    }

    let version = cursor.read_u16::<LittleEndian>()?;
    match version {
        GLR_VERSION => {}
        1..GLR_VERSION => return Err(Error::OutdatedGlrVersion { version }),
        _ => return Err(Error::UnknownGlrVersion { version }),
    }

    let mut rom_name = [0u8; ROM_NAME_SIZE];
    cursor.read_exact(&mut rom_name)?;

    let num_triangles = cursor.read_u32::<LittleEndian>()?;
    let microcode = cursor.read_u32::<LittleEndian>()?;

    Ok(GlrHeader {
        version,
        rom_name: decode_rom_name(&rom_name),
        num_triangles,
        microcode,
    })
}

/// Lossy decode of the fixed ROM name buffer. Invalid sequences become
/// U+FFFD, NULs anywhere in the buffer are dropped.
fn decode_rom_name(raw: &[u8; ROM_NAME_SIZE]) -> String {
    String::from_utf8_lossy(raw)
        .replace('\0', "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(version: u16, rom: &[u8]) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..6].copy_from_slice(&GLR_MAGIC);
        bytes[6..8].copy_from_slice(&version.to_le_bytes());
        bytes[8..8 + rom.len()].copy_from_slice(rom);
        bytes[28..32].copy_from_slice(&7u32.to_le_bytes());
        bytes[32..36].copy_from_slice(&2u32.to_le_bytes());
        bytes
    }

    #[test]
    fn test_parse_valid_header() {
        let header = parse_header(&header_bytes(3, b"SUPER MARIO 64      ")).unwrap();
        assert_eq!(header.version, 3);
        assert_eq!(header.rom_name, "SUPER MARIO 64");
        assert_eq!(header.num_triangles, 7);
        assert_eq!(header.microcode, 2);
    }

    #[test]
    fn test_outdated_versus_unknown_version() {
        for version in [1, 2] {
            assert!(matches!(
                parse_header(&header_bytes(version, b"")),
                Err(Error::OutdatedGlrVersion { version: v }) if v == version
            ));
        }
        for version in [0, 4, 0xFFFF] {
            assert!(matches!(
                parse_header(&header_bytes(version, b"")),
                Err(Error::UnknownGlrVersion { .. })
            ));
        }
    }

    #[test]
    fn test_short_header_is_truncated() {
        let bytes = header_bytes(3, b"");
        match read_header(&bytes[..HEADER_SIZE - 1]) {
            Err(Error::TruncatedRecord { record, triangle, offset }) => {
                assert_eq!(record, RecordKind::Header);
                assert_eq!(triangle, 0);
                assert_eq!(offset, 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(read_header(&bytes[..]).unwrap().num_triangles, 7);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = header_bytes(3, b"");
        bytes[0] = b'X';
        assert!(matches!(parse_header(&bytes), Err(Error::InvalidGlrMagic(_))));
    }

    #[test]
    fn test_rom_name_lossy_decode() {
        let header = parse_header(&header_bytes(3, b"ZELDA\xFF\0\0")).unwrap();
        assert_eq!(header.rom_name, "ZELDA\u{FFFD}");
    }

    #[test]
    fn test_object_name_falls_back_to_unknown_game() {
        let header = parse_header(&header_bytes(3, b"")).unwrap();
        assert_eq!(header.object_name("castle"), "Unknown N64 Game (castle)");
    }
}
