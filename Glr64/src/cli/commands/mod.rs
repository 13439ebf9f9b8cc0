use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::formats::glr::FilterMode;
use crate::import::ImportOptions;

pub mod convert;
pub mod inspect;
pub mod materials;

/// Import options shared by all commands. Flags override the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ImportArgs {
    /// TOML file with import options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma separated texture CRCs (hex); NO_TEXTURE means untextured
    #[arg(long)]
    filter_list: Option<String>,

    /// Whether the filter list drops (deny) or keeps (allow) triangles
    #[arg(long)]
    filter_mode: Option<FilterMode>,

    /// Don't emit per-vertex fog levels
    #[arg(long)]
    no_fog: bool,

    /// Show translucent materials as opaque
    #[arg(long)]
    no_transparency: bool,

    /// Carry over the capture's back face culling
    #[arg(long)]
    backface_culling: bool,

    /// Directory holding <CRC>.png textures (default: next to each capture)
    #[arg(long)]
    texture_dir: Option<PathBuf>,
}

impl ImportArgs {
    pub fn options(&self) -> crate::Result<ImportOptions> {
        let mut options = match &self.config {
            Some(path) => ImportOptions::from_toml_file(path)?,
            None => ImportOptions::default(),
        };

        if let Some(list) = &self.filter_list {
            options = options.with_filter_list(list.clone());
        }
        if let Some(mode) = self.filter_mode {
            options = options.with_filter_mode(mode);
        }
        if self.no_fog {
            options = options.with_fog(false);
        }
        if self.no_transparency {
            options = options.with_transparency(false);
        }
        if self.backface_culling {
            options = options.with_backface_culling(true);
        }
        if self.texture_dir.is_some() {
            options = options.with_texture_dir(self.texture_dir.clone());
        }

        // Fail on a bad list before touching any capture
        options.crc_filter()?;
        Ok(options)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a capture's header and decoded materials
    Inspect {
        /// Capture file
        file: PathBuf,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Convert captures to glTF/GLB
    Convert {
        /// Capture files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (default: next to each capture)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write all captures into one document with this file stem
        #[arg(long)]
        merge: Option<String>,

        /// Write .gltf + .bin instead of .glb
        #[arg(long)]
        gltf: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Dump decoded materials as JSON
    Materials {
        /// Capture file
        file: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,
    },
}

impl Commands {
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Inspect { file, import } => inspect::execute(&file, &import.options()?),
            Commands::Convert {
                files,
                output,
                merge,
                gltf,
                quiet,
                import,
            } => convert::execute(
                &files,
                output.as_deref(),
                merge.as_deref(),
                gltf,
                quiet,
                &import.options()?,
            ),
            Commands::Materials {
                file,
                output,
                import,
            } => materials::execute(&file, output.as_deref(), &import.options()?),
        }
    }
}
