use crate::domain::{BatchReport, SplitReport};
use crate::error::{GfsError, Result};
use crate::options::ChunkOptions;
use crate::split::writer::split;
use crate::util::naming::{file_name_str, manifest_path, stem_of};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Split every regular file under `dir`, in sorted path order.
///
/// Files that already carry the fragment or manifest suffix are skipped, so
/// an output directory nested inside `dir` is never split again. One file
/// failing does not stop the walk; the failure is logged and recorded.
///
/// Files sharing a stem (`a.txt`, `a.bin`, `sub/a.txt`) would write the same
/// fragment and manifest names. Only the first in walk order is split; each
/// later one is recorded as a failure naming the file it collides with.
pub fn split_dir(dir: &Path, opts: &ChunkOptions) -> Result<BatchReport<SplitReport>> {
    opts.validate()?;
    if !dir.is_dir() {
        return Err(GfsError::InvalidTarget(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut report = BatchReport::default();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    for e in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let e = match e {
            Ok(e) => e,
            Err(err) => {
                let at = err.path().unwrap_or(dir).to_path_buf();
                warn!(path = %at.display(), error = %err, "walk failed");
                report.failed.push((at, err.into()));
                continue;
            }
        };
        if !e.file_type().is_file() || opts.is_artifact(e.path()) {
            continue;
        }
        if let Ok(name) = file_name_str(e.path()) {
            let target = manifest_path(&opts.out_dir, stem_of(name), &opts.manifest_suffix);
            if let Some(first) = claimed.get(&target) {
                let err = GfsError::InvalidTarget(format!(
                    "{} collides with {} on {}",
                    e.path().display(),
                    first.display(),
                    target.display()
                ));
                warn!(path = %e.path().display(), error = %err, "skipping colliding file");
                report.failed.push((e.path().to_path_buf(), err));
                continue;
            }
        }
        match split(e.path(), opts) {
            Ok(r) => {
                claimed.insert(r.manifest.clone(), r.source.clone());
                report.done.push(r);
            }
            Err(err) => {
                warn!(path = %e.path().display(), error = %err, "split failed, continuing");
                report.failed.push((e.path().to_path_buf(), err));
            }
        }
    }
    Ok(report)
}
