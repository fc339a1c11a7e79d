use crate::container::manifest::Manifest;
use crate::domain::FragmentRow;
use crate::error::{GfsError, Result};
use crate::options::ChunkOptions;
use crate::read::rebuild::check_manifest_target;
use std::fs;
use std::path::Path;

/// Chunk map of a manifest: one row per fragment, in rebuild order, with the
/// size currently on disk. Missing fragments show up as `len: None`.
pub fn inspect(manifest: &Path, opts: &ChunkOptions) -> Result<(Manifest, Vec<FragmentRow>)> {
    check_manifest_target(manifest, opts)?;
    let meta = Manifest::read_from(manifest)?;

    let mut end_off = 0u64;
    let mut rows = Vec::with_capacity(meta.chunks.len());
    for (ordinal, loc) in meta.chunks.iter().enumerate() {
        let len = match fs::metadata(loc) {
            Ok(md) if md.is_file() => Some(md.len()),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(GfsError::io(loc, e)),
        };
        end_off += len.unwrap_or(0);
        rows.push(FragmentRow {
            ordinal,
            location: loc.clone(),
            len,
            end_off,
        });
    }
    Ok((meta, rows))
}
