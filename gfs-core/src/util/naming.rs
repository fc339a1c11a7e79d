use crate::error::{GfsError, Result};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Suffix of `name` starting at its last `.`, or `""` when there is none.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) => &name[i..],
        None => "",
    }
}

/// `name` with [`extension_of`] stripped.
pub fn stem_of(name: &str) -> &str {
    &name[..name.len() - extension_of(name).len()]
}

/// File-name component of `path` as UTF-8.
pub fn file_name_str(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            GfsError::InvalidTarget(format!("no usable file name in {}", path.display()))
        })
}

/// Stat an operation target. A path that does not exist is an invalid
/// target, any other failure stays an I/O error.
pub fn stat_target(path: &Path) -> Result<fs::Metadata> {
    match fs::metadata(path) {
        Ok(md) => Ok(md),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(GfsError::InvalidTarget(
            format!("{} does not exist", path.display()),
        )),
        Err(e) => Err(GfsError::io(path, e)),
    }
}

/// ceil(size / chunk_size). Zero for an empty source.
pub fn fragment_count(size: u64, chunk_size: u64) -> u64 {
    debug_assert!(chunk_size > 0);
    size.div_ceil(chunk_size)
}

/// Byte range covered by fragment `index`: `[i*C, min((i+1)*C, size))`.
pub fn fragment_range(index: u64, chunk_size: u64, size: u64) -> Range<u64> {
    let start = index.saturating_mul(chunk_size).min(size);
    let end = start.saturating_add(chunk_size).min(size);
    start..end
}

/// `<dir>/<stem>_chunk_<index:03>.<suffix>`
pub fn fragment_path(dir: &Path, stem: &str, index: u64, suffix: &str) -> PathBuf {
    dir.join(format!("{stem}_chunk_{index:03}.{suffix}"))
}

/// `<dir>/<stem>.<suffix>`
pub fn manifest_path(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{stem}.{suffix}"))
}

/// Where a rebuild of `manifest` lands: `<dir>/<prefix><manifest stem><ext>`.
/// `dir` falls back to the manifest's own directory.
pub fn rebuild_path(
    manifest: &Path,
    rebuild_dir: Option<&Path>,
    prefix: &str,
    ext: &str,
) -> Result<PathBuf> {
    let stem = manifest
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            GfsError::InvalidTarget(format!("no usable file stem in {}", manifest.display()))
        })?;
    let dir = match rebuild_dir {
        Some(d) => d.to_path_buf(),
        None => manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    Ok(dir.join(format!("{prefix}{stem}{ext}")))
}
