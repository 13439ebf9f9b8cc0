//! `glr64 convert`

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::bail;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::cli::progress::{DISK, LOOKING_GLASS, print_done, print_step, simple_bar};
use crate::converter::{
    GlrPhase, GlrProgressCallback, convert_glr_to_glb_with_progress, convert_glr_to_gltf_with_progress,
};
use crate::import::ImportOptions;

fn output_path(dir: Option<&Path>, input: &Path, stem: &str, gltf: bool) -> PathBuf {
    let ext = if gltf { "gltf" } else { "glb" };
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.{ext}"))
}

fn short_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
        .to_string()
}

fn convert(
    inputs: &[PathBuf],
    out: &Path,
    gltf: bool,
    options: &ImportOptions,
    progress: GlrProgressCallback,
) -> crate::Result<()> {
    if gltf {
        convert_glr_to_gltf_with_progress(inputs, out, options, progress)
    } else {
        convert_glr_to_glb_with_progress(inputs, out, options, progress)
    }
}

/// One document for all captures. Any failing capture fails the document.
fn execute_merged(
    files: &[PathBuf],
    out: &Path,
    gltf: bool,
    options: &ImportOptions,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    convert(files, out, gltf, options, &|progress| {
        match progress.phase {
            GlrPhase::Decoding => pb.set_position(progress.current as u64),
            GlrPhase::BuildingDocument | GlrPhase::WritingOutput => {
                pb.set_message(progress.phase.as_str());
            }
            GlrPhase::Complete => pb.set_message("done"),
        }
        if let Some(name) = &progress.current_file {
            pb.set_prefix(short_name(name));
        }
    })?;
    Ok(())
}

/// One document per capture, converted in parallel. Returns the failure count.
fn execute_each(
    files: &[PathBuf],
    output: Option<&Path>,
    gltf: bool,
    options: &ImportOptions,
    pb: &ProgressBar,
) -> usize {
    let failed = AtomicUsize::new(0);
    files.par_iter().for_each(|path| {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("capture");
        let out = output_path(output, path, stem, gltf);
        let result = convert(std::slice::from_ref(path), &out, gltf, options, &|progress| {
            match progress.phase {
                GlrPhase::WritingOutput => {
                    if let Some(name) = &progress.current_file {
                        pb.set_prefix(short_name(name));
                    }
                }
                GlrPhase::Complete => pb.inc(1),
                GlrPhase::Decoding | GlrPhase::BuildingDocument => {}
            }
        });
        if let Err(e) = result {
            let kind = if e.is_format_error() { "malformed capture" } else { "failed" };
            pb.suspend(|| eprintln!("{}: {kind}: {e}", path.display()));
            failed.fetch_add(1, Ordering::SeqCst);
            pb.inc(1);
        }
    });
    failed.into_inner()
}

/// Convert captures into one document each, or into a single merged one.
pub fn execute(
    files: &[PathBuf],
    output: Option<&Path>,
    merge: Option<&str>,
    gltf: bool,
    quiet: bool,
    options: &ImportOptions,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let Some(first) = files.first() else {
        bail!("No input captures");
    };
    if let Some(dir) = output {
        std::fs::create_dir_all(dir)?;
    }

    let pb = simple_bar(files.len() as u64, "Converting", quiet);
    if let Some(stem) = merge {
        let out = output_path(output, first, stem, gltf);
        if !quiet {
            print_step(1, 1, DISK, &format!("Merging {} captures into {}...", files.len(), out.display()));
        }
        let result = execute_merged(files, &out, gltf, options, &pb);
        pb.finish_and_clear();
        result?;
    } else {
        if !quiet {
            print_step(1, 1, LOOKING_GLASS, &format!("Converting {} captures...", files.len()));
        }
        let failed = execute_each(files, output, gltf, options, &pb);
        pb.finish_and_clear();
        if failed > 0 {
            bail!("{failed} of {} captures failed", files.len());
        }
    }

    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let input = Path::new("captures/level1.glr");
        assert_eq!(
            output_path(None, input, "level1", false),
            PathBuf::from("captures/level1.glb")
        );
        assert_eq!(
            output_path(Some(Path::new("out")), input, "scene", true),
            PathBuf::from("out/scene.gltf")
        );
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("captures/level1.glb"), "level1.glb");
        assert_eq!(short_name("level1.glb"), "level1.glb");
    }
}
