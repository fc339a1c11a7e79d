use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "gfsdev: split files into fixed-size chunks and rebuild them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a file (or every file under a directory) into .gfs chunks plus a .meta manifest
    Split {
        /// file or directory to split
        path: PathBuf,

        /// fragment size in bytes
        #[arg(long, default_value_t = gfs_core::options::DEFAULT_CHUNK_SIZE,
              value_parser = clap::value_parser!(u64).range(1..))]
        chunk_size: u64,

        /// directory receiving chunks and manifests
        #[arg(long, default_value = gfs_core::options::DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
    },

    /// Rebuild the original file from a .meta manifest
    Rebuild {
        manifest: PathBuf,

        /// where to write the rebuilt file (defaults to the manifest's directory)
        #[arg(long)]
        rebuild_dir: Option<PathBuf>,
    },

    /// Delete every .gfs chunk and .meta manifest under a directory
    Clean {
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Print the chunk map recorded in a .meta manifest
    Inspect { manifest: PathBuf },
}
