//! Progress reporting for GLR to glTF conversion
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

/// Progress callback type for conversions.
pub type GlrProgressCallback<'a> = &'a (dyn Fn(&GlrProgress) + Sync + Send);

/// Progress information during a conversion.
#[derive(Debug, Clone)]
pub struct GlrProgress {
    pub phase: GlrPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    pub total: usize,
    /// Capture or output being processed, if any
    pub current_file: Option<String>,
}

impl GlrProgress {
    #[must_use]
    pub fn new(phase: GlrPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    #[must_use]
    pub fn with_file(phase: GlrPhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlrPhase {
    /// Decoding captures
    Decoding,
    /// Building materials and meshes
    BuildingDocument,
    /// Writing glTF/GLB output
    WritingOutput,
    Complete,
}

impl GlrPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decoding => "Decoding captures",
            Self::BuildingDocument => "Building document",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}
