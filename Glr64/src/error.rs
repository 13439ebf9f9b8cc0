//! Error types for `Glr64`
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

use crate::formats::glr::RecordKind;

/// The error type for `Glr64` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== GLR Format Errors ====================
    /// The file is not a GLR capture (missing `GL64R\0` magic).
    #[error("not a valid glr file: expected GL64R magic, found {0:02x?}")]
    InvalidGlrMagic([u8; 6]),

    /// The capture was written by an older ripper that used a different layout.
    #[error("outdated glr file format detected ({version}), supported version is 3")]
    OutdatedGlrVersion {
        /// The version number found in the file.
        version: u16,
    },

    /// The capture declares a version this decoder has never seen.
    #[error("unknown N64 ripper version ({version}) encountered")]
    UnknownGlrVersion {
        /// The version number found in the file.
        version: u16,
    },

    /// The stream ended in the middle of a fixed-size record.
    #[error("truncated {record} record at byte offset {offset} (triangle {triangle})")]
    TruncatedRecord {
        /// Which fixed record was being read.
        record: RecordKind,
        /// Index of the triangle being decoded (0 for the header).
        triangle: u32,
        /// Byte offset at which the record starts.
        offset: u64,
    },

    /// A combiner or blender field selected an index outside its lookup table.
    #[error("unmapped {table} operand index {index}")]
    UnmappedOperand {
        /// Name of the lookup table.
        table: &'static str,
        /// The raw field value.
        index: u8,
    },

    // ==================== Option Errors ====================
    /// A texture CRC filter entry is not a hex number.
    #[error("invalid value in filter list: {entry:?}")]
    InvalidFilterEntry {
        /// The offending token.
        entry: String,
    },

    /// An import option file could not be parsed.
    #[error("invalid import options in {path}: {message}")]
    InvalidConfig {
        /// The option file.
        path: PathBuf,
        /// The parser message.
        message: String,
    },

    // ==================== glTF Export Errors ====================
    /// Failed to serialize glTF JSON.
    #[error("glTF JSON serialization failed: {message}")]
    GltfSerializationFailed {
        /// The serialization error message.
        message: String,
    },

    /// Output path has no usable file name.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error comes from malformed capture data (as opposed to
    /// bad options or I/O).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidGlrMagic(_)
                | Error::OutdatedGlrVersion { .. }
                | Error::UnknownGlrVersion { .. }
                | Error::TruncatedRecord { .. }
                | Error::UnmappedOperand { .. }
        )
    }
}

/// A specialized Result type for `Glr64` operations.
pub type Result<T> = std::result::Result<T, Error>;
