use crate::domain::BatchReport;
use crate::error::{GfsError, Result};
use crate::options::ChunkOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Delete every fragment and manifest file under `root`, matched by suffix
/// only. Manifest contents are never consulted.
pub fn clean(root: &Path, opts: &ChunkOptions) -> Result<BatchReport<PathBuf>> {
    opts.validate()?;
    if !root.is_dir() {
        return Err(GfsError::InvalidTarget(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut report = BatchReport::default();
    for e in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let e = match e {
            Ok(e) => e,
            Err(err) => {
                let at = err.path().unwrap_or(root).to_path_buf();
                warn!(path = %at.display(), error = %err, "walk failed");
                report.failed.push((at, err.into()));
                continue;
            }
        };
        if !e.file_type().is_file() || !opts.is_artifact(e.path()) {
            continue;
        }
        match fs::remove_file(e.path()) {
            Ok(()) => {
                info!(path = %e.path().display(), "deleted");
                report.done.push(e.into_path());
            }
            Err(err) => {
                warn!(path = %e.path().display(), error = %err, "delete failed");
                report
                    .failed
                    .push((e.path().to_path_buf(), GfsError::io(e.path(), err)));
            }
        }
    }
    Ok(report)
}
