use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GfsError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("fragment #{index} missing or unreadable ({}): {source}", .path.display())]
    MissingFragment {
        index: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("{failed} of {total} entries failed")]
    Batch { failed: usize, total: usize },

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl GfsError {
    /// Attach a path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GfsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Extension for tagging `io::Result`s with the path they touched.
pub trait IoContext<T> {
    fn at(self, path: &std::path::Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| GfsError::io(path, e))
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, GfsError>;
