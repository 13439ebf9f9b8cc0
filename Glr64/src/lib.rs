//! # Glr64
//!
//! Decoder for `GLideN64` ripper captures (`.glr`) of the N64 RDP.
//!
//! A capture is a flat list of triangles, each carrying the full RDP state it
//! was drawn with. Decoding yields a triangle mesh plus one material per
//! unique state, with the color combiner and blender reconstructed as
//! symbolic formulas and texture addressing resolved for a regular GPU
//! sampler.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use glr64::prelude::*;
//!
//! let options = ImportOptions::new().with_filter_list("NO_TEXTURE");
//! let import = load_glr(Path::new("capture.glr"), &options)?;
//! println!("{}: {} triangles, {} materials",
//!     import.name, import.mesh.triangle_count(), import.pipelines.len());
//!
//! for pipeline in &import.pipelines {
//!     println!("{}", pipeline.annotations.color_combiner1);
//! }
//! # Ok::<(), glr64::Error>(())
//! ```
//!
//! ### Exporting to glTF
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use glr64::converter::convert_glr_to_glb;
//! use glr64::import::ImportOptions;
//!
//! let inputs = vec![PathBuf::from("a.glr"), PathBuf::from("b.glr")];
//! convert_glr_to_glb(&inputs, Path::new("scene.glb"), &ImportOptions::default())?;
//! # Ok::<(), glr64::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `glr64` command-line binary

pub mod converter;
pub mod error;
pub mod formats;
pub mod import;
pub mod pipeline;
pub mod rdp;
pub mod scene;

pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::glr::{FilterMode, GlrHeader, GlrMesh};
    pub use crate::import::{GlrImport, ImportOptions, decode, load_glr, load_many, parse_filter_list};
    pub use crate::pipeline::{DecodedPipeline, MaterialKey, TextureDescriptor};
    pub use crate::rdp::{AlphaMode, ColorLayer, Operand, WrapMode, WrapPlan};
    pub use crate::scene::{
        DirTextureLoader, SceneBuilder, SceneMesh, ShaderGraphBuilder, TextureLoader,
        TextureSource, build_scene,
    };

    pub use crate::converter;
    pub use crate::converter::{GlrGltfBuilder, convert_glr_to_glb, convert_glr_to_gltf};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
