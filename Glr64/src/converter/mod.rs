//! Format conversions
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

pub mod glr_gltf;

pub use glr_gltf::{
    GlrGltfBuilder, GlrPhase, GlrProgress, GlrProgressCallback, build_gltf, convert_glr_to_glb,
    convert_glr_to_glb_with_progress, convert_glr_to_gltf, convert_glr_to_gltf_with_progress,
};
