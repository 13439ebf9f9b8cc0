//! `glr64 inspect`

use std::path::Path;

use crate::import::{ImportOptions, load_glr};

/// Print the header, counts and each material's formulas.
pub fn execute(path: &Path, options: &ImportOptions) -> anyhow::Result<()> {
    let import = load_glr(path, options)?;
    let header = &import.header;

    println!("GLR Capture Information");
    println!("=======================");
    println!("Name:       {}", import.name);
    println!("Version:    {}", header.version);
    println!("Microcode:  {}", header.microcode);
    println!("Triangles:  {} declared, {} kept", header.num_triangles, import.mesh.triangle_count());
    println!("Dropped:    {}", import.mesh.dropped_triangles);
    println!("Fog levels: {}", if import.fog_levels().is_some() { "yes" } else { "no" });
    println!();

    println!("Materials ({}):", import.pipelines.len());
    for pipeline in &import.pipelines {
        println!();
        println!("  {}", pipeline.content_name()?);
        println!("    Alpha mode: {:?}, double sided: {}", pipeline.alpha_mode, !pipeline.cull_backface);
        for (label, value) in pipeline.annotations.entries() {
            if !value.is_empty() {
                println!("    {label:22} {value}");
            }
        }
        let placeholders = pipeline.placeholders();
        if !placeholders.is_empty() {
            let names: Vec<String> = placeholders.iter().map(ToString::to_string).collect();
            println!("    Unimplemented inputs: {}", names.join(", "));
        }
    }

    Ok(())
}
