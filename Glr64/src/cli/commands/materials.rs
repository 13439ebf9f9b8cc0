//! `glr64 materials`

use std::path::Path;

use indexmap::IndexMap;

use crate::import::{ImportOptions, load_glr};

/// Dump the decoded pipelines as JSON, keyed by material name.
pub fn execute(path: &Path, output: Option<&Path>, options: &ImportOptions) -> anyhow::Result<()> {
    let import = load_glr(path, options)?;

    let mut materials = IndexMap::new();
    for pipeline in &import.pipelines {
        materials.insert(pipeline.content_name()?, pipeline);
    }
    let json = serde_json::to_string_pretty(&materials)?;

    match output {
        Some(out) => {
            std::fs::write(out, json)?;
            println!("Written {} materials to {}", materials.len(), out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
