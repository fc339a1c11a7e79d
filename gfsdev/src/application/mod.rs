pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use gfs_core::error::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Split {
            path,
            chunk_size,
            out_dir,
        } => handlers::handle_split(path, chunk_size, out_dir),
        Commands::Rebuild {
            manifest,
            rebuild_dir,
        } => handlers::handle_rebuild(manifest, rebuild_dir),
        Commands::Clean { root } => handlers::handle_clean(root),
        Commands::Inspect { manifest } => handlers::handle_inspect(manifest),
    }
}
