//! GLR to glTF/GLB conversion functions.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use super::builder::GlrGltfBuilder;
use super::progress::{GlrPhase, GlrProgress, GlrProgressCallback};
use crate::error::Result;
use crate::import::{GlrImport, ImportOptions, load_many};
use crate::scene::build_scene;

/// Build one glTF document holding all imports. Materials with equal
/// content are shared between them.
pub fn build_gltf(imports: &[GlrImport]) -> Result<GlrGltfBuilder> {
    let mut builder = GlrGltfBuilder::new();
    for import in imports {
        build_scene(import, &mut builder)?;
    }
    tracing::debug!(
        "Built {} meshes with {} materials",
        builder.mesh_count(),
        builder.material_count()
    );
    Ok(builder)
}

fn decode_and_build(
    inputs: &[PathBuf],
    options: &ImportOptions,
    progress: GlrProgressCallback,
) -> Result<GlrGltfBuilder> {
    let total = inputs.len();
    progress(&GlrProgress::new(GlrPhase::Decoding, 0, total));

    let imports = load_many(inputs, options)
        .into_iter()
        .zip(inputs)
        .enumerate()
        .map(|(i, (result, path))| {
            progress(&GlrProgress::with_file(
                GlrPhase::Decoding,
                i + 1,
                total,
                path.display().to_string(),
            ));
            result
        })
        .collect::<Result<Vec<_>>>()?;

    progress(&GlrProgress::new(GlrPhase::BuildingDocument, total, total));
    build_gltf(&imports)
}

/// Convert captures to one GLB file.
pub fn convert_glr_to_glb(inputs: &[PathBuf], output: &Path, options: &ImportOptions) -> Result<()> {
    convert_glr_to_glb_with_progress(inputs, output, options, &|_| {})
}

/// Convert captures to one GLB file with progress callback.
pub fn convert_glr_to_glb_with_progress(
    inputs: &[PathBuf],
    output: &Path,
    options: &ImportOptions,
    progress: GlrProgressCallback,
) -> Result<()> {
    let builder = decode_and_build(inputs, options, progress)?;

    let total = inputs.len();
    progress(&GlrProgress::with_file(
        GlrPhase::WritingOutput,
        total,
        total,
        output.display().to_string(),
    ));
    builder.export_glb(output)?;

    progress(&GlrProgress::new(GlrPhase::Complete, total, total));
    Ok(())
}

/// Convert captures to a `.gltf` plus `.bin` pair.
pub fn convert_glr_to_gltf(inputs: &[PathBuf], output: &Path, options: &ImportOptions) -> Result<()> {
    convert_glr_to_gltf_with_progress(inputs, output, options, &|_| {})
}

/// Convert captures to a `.gltf` plus `.bin` pair with progress callback.
pub fn convert_glr_to_gltf_with_progress(
    inputs: &[PathBuf],
    output: &Path,
    options: &ImportOptions,
    progress: GlrProgressCallback,
) -> Result<()> {
    let builder = decode_and_build(inputs, options, progress)?;

    let total = inputs.len();
    progress(&GlrProgress::with_file(
        GlrPhase::WritingOutput,
        total,
        total,
        output.display().to_string(),
    ));
    builder.export_gltf(output)?;

    progress(&GlrProgress::new(GlrPhase::Complete, total, total));
    Ok(())
}
