use std::path::PathBuf;

use gfs_core::domain::BatchReport;
use gfs_core::error::{GfsError, Result};
use gfs_core::{ChunkOptions, clean, inspect, rebuild, split, split_dir};
use tracing::error;

fn batch_outcome<T>(rep: &BatchReport<T>) -> Result<()> {
    for (path, err) in &rep.failed {
        error!(path = %path.display(), error = %err, "failed");
    }
    if rep.is_clean() {
        Ok(())
    } else {
        Err(GfsError::Batch {
            failed: rep.failed.len(),
            total: rep.failed.len() + rep.done.len(),
        })
    }
}

pub fn handle_split(path: PathBuf, chunk_size: u64, out_dir: PathBuf) -> Result<()> {
    let opts = ChunkOptions {
        chunk_size,
        out_dir,
        ..Default::default()
    };

    if path.is_dir() {
        println!("Chunking all files in directory: {}", path.display());
        let rep = split_dir(&path, &opts)?;
        for r in &rep.done {
            println!(
                "split: {} -> {} ({} chunks)",
                r.source.display(),
                r.manifest.display(),
                r.fragments.len()
            );
        }
        return batch_outcome(&rep);
    }

    let r = split(&path, &opts)?;
    for f in &r.fragments {
        println!("New chunk : {}", f.location.display());
    }
    println!("Master/metadata : {}", r.manifest.display());
    Ok(())
}

pub fn handle_rebuild(manifest: PathBuf, rebuild_dir: Option<PathBuf>) -> Result<()> {
    let opts = ChunkOptions {
        rebuild_dir,
        ..Default::default()
    };
    let r = rebuild(&manifest, &opts)?;
    println!(
        "Rebuild : {} ({} chunks, {} bytes)",
        r.output.display(),
        r.fragments,
        r.bytes
    );
    Ok(())
}

pub fn handle_clean(root: PathBuf) -> Result<()> {
    let rep = clean(&root, &ChunkOptions::default())?;
    for p in &rep.done {
        println!("Deleted: {}", p.display());
    }
    if rep.done.is_empty() && rep.is_clean() {
        println!("No chunks or metadata files found.");
    } else {
        println!("Deleted {}", rep.done.len());
    }
    batch_outcome(&rep)
}

pub fn handle_inspect(manifest: PathBuf) -> Result<()> {
    let (meta, rows) = inspect(&manifest, &ChunkOptions::default())?;
    println!("original={} ext={:?} chunks={}", meta.original, meta.ext, rows.len());
    for r in rows {
        let len = r
            .len
            .map(|l| l.to_string())
            .unwrap_or_else(|| "MISSING".to_string());
        println!(
            "#{:<5} len={:<10} end={:<12} {}",
            r.ordinal, len, r.end_off, r.location
        );
    }
    Ok(())
}
