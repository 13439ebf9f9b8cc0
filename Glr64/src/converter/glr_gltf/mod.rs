//! GLR capture to glTF 2.0 export
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Positions are written Y-up, UVs top-down. Each material is unlit with the
//! sampled texture as base color; the full decoded pipeline rides along in
//! the material extras, and the extra color layers as `_`-prefixed vertex
//! attributes.

mod builder;
mod convert;
mod progress;
pub mod types;

pub use builder::GlrGltfBuilder;
pub use convert::{
    build_gltf, convert_glr_to_glb, convert_glr_to_glb_with_progress, convert_glr_to_gltf,
    convert_glr_to_gltf_with_progress,
};
pub use progress::{GlrPhase, GlrProgress, GlrProgressCallback};
