use crate::error::{GfsError, IoContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Reconstruction recipe written next to the fragments.
///
/// The JSON field names (`original`, `ext`, `chunks`) and the order of
/// `chunks` are the on-disk contract. `chunks` is rebuild order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Source file name at split time.
    pub original: String,
    /// Suffix of `original` from its last `.`, possibly empty.
    pub ext: String,
    /// Fragment locations, in split order.
    pub chunks: Vec<String>,
}

impl Manifest {
    pub fn fragment_paths(&self) -> impl Iterator<Item = &Path> {
        self.chunks.iter().map(Path::new)
    }

    /// Pretty JSON, two-space indent, trailing newline.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = serde_json::to_vec_pretty(self)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Parse and shape-check. `origin` only labels errors.
    pub fn decode(bytes: &[u8], origin: &Path) -> Result<Self> {
        let malformed = |reason: String| GfsError::Manifest {
            path: origin.to_path_buf(),
            reason,
        };
        let m: Manifest =
            serde_json::from_slice(bytes).map_err(|e| malformed(format!("decode: {e}")))?;

        if !m.ext.is_empty() && !m.ext.starts_with('.') {
            return Err(malformed(format!("ext {:?} must start with '.'", m.ext)));
        }
        if !m.ext.is_empty() && !m.original.ends_with(&m.ext) {
            return Err(malformed(format!(
                "ext {:?} is not a suffix of original {:?}",
                m.ext, m.original
            )));
        }
        if let Some(i) = m.chunks.iter().position(|c| c.is_empty()) {
            return Err(malformed(format!("chunk #{i} has an empty location")));
        }
        Ok(m)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).at(path)?;
        Self::decode(&bytes, path)
    }

    /// Write via a temp file in the destination directory and rename into
    /// place, so the manifest is either complete or absent.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let buf = self.encode().map_err(|e| GfsError::Manifest {
            path: path.to_path_buf(),
            reason: format!("encode: {e}"),
        })?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).at(dir)?;
        tmp.write_all(&buf).at(tmp.path())?;
        tmp.as_file().sync_all().at(tmp.path())?;
        tmp.persist(path).map_err(|e| GfsError::io(path, e.error))?;
        Ok(())
    }
}
