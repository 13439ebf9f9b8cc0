//! Material identity and resolved pipelines
//!
//! A [`MaterialKey`] is what the triangle stream is deduplicated on. Each
//! unique key is resolved once into a [`DecodedPipeline`], the description
//! handed to a shading backend.

mod decoded;
mod key;

pub use decoded::{Annotations, DecodedPipeline, MATERIAL_NAME_PREFIX, TextureDescriptor};
pub use key::{MaterialKey, MaterialTable, TextureKey};
