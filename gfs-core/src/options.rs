use crate::error::{GfsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 64 MiB fragments unless told otherwise.
pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024 * 1024;
pub const DEFAULT_OUT_DIR: &str = "chunks";
pub const FRAGMENT_SUFFIX: &str = "gfs";
pub const MANIFEST_SUFFIX: &str = "meta";
pub const REBUILD_PREFIX: &str = "rebuild_";
/// Copy buffer for fragment reads and writes.
pub const IO_BUF_SIZE: usize = 1 << 16;

/// Everything a split, rebuild or clean run needs to know about sizes and
/// on-disk naming. Passed explicitly into every operation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Fragment size in bytes; every fragment but the last is exactly this long.
    pub chunk_size: u64,
    /// Directory receiving fragments and the manifest.
    pub out_dir: PathBuf,
    /// Fragment file extension, without the dot.
    pub fragment_suffix: String,
    /// Manifest file extension, without the dot.
    pub manifest_suffix: String,
    /// Prepended to the rebuilt file name.
    pub rebuild_prefix: String,
    /// Where rebuilt files land. `None` means next to the manifest.
    pub rebuild_dir: Option<PathBuf>,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            fragment_suffix: FRAGMENT_SUFFIX.to_string(),
            manifest_suffix: MANIFEST_SUFFIX.to_string(),
            rebuild_prefix: REBUILD_PREFIX.to_string(),
            rebuild_dir: None,
        }
    }
}

impl ChunkOptions {
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(GfsError::InvalidTarget("chunk size must be at least 1 byte".into()));
        }
        for (what, s) in [
            ("fragment suffix", &self.fragment_suffix),
            ("manifest suffix", &self.manifest_suffix),
        ] {
            if s.is_empty() || s.contains('.') || s.contains(['/', '\\']) {
                return Err(GfsError::InvalidTarget(format!("bad {what}: {s:?}")));
            }
        }
        if self.fragment_suffix == self.manifest_suffix {
            return Err(GfsError::InvalidTarget(
                "fragment and manifest suffixes must differ".into(),
            ));
        }
        if self.rebuild_prefix.is_empty() || self.rebuild_prefix.contains(['/', '\\']) {
            return Err(GfsError::InvalidTarget(format!(
                "bad rebuild prefix: {:?}",
                self.rebuild_prefix
            )));
        }
        Ok(())
    }

    /// True when `path` names a fragment or manifest file by suffix alone.
    pub fn is_artifact(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.fragment_suffix || e == self.manifest_suffix)
    }
}
