// gfs_core/src/domain.rs
use std::path::PathBuf;

/// One fragment as written by a split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub index: u64,
    pub offset: u64,
    pub len: u64,
    pub location: PathBuf,
}

#[derive(Clone, Debug)]
pub struct SplitReport {
    pub source: PathBuf,
    pub manifest: PathBuf,
    pub size: u64,
    pub fragments: Vec<Fragment>,
}

#[derive(Clone, Debug)]
pub struct RebuildReport {
    pub manifest: PathBuf,
    pub output: PathBuf,
    pub fragments: usize,
    pub bytes: u64,
}

/// Row of a manifest's chunk map, as reported by `inspect`.
#[derive(Clone, Debug)]
pub struct FragmentRow {
    pub ordinal: usize,
    pub location: String,
    /// `None` when the fragment file is missing.
    pub len: Option<u64>,
    /// Running total up to and including this fragment, over present fragments.
    pub end_off: u64,
}

/// Outcome of walking a directory: what worked, what didn't.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub done: Vec<T>,
    pub failed: Vec<(PathBuf, crate::error::GfsError)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            done: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
