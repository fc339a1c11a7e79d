use crate::container::manifest::Manifest;
use crate::domain::RebuildReport;
use crate::error::{GfsError, IoContext, Result};
use crate::options::{ChunkOptions, IO_BUF_SIZE};
use crate::util::naming::{rebuild_path, stat_target};

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check that `manifest` names an existing file carrying the manifest suffix.
pub(crate) fn check_manifest_target(manifest: &Path, opts: &ChunkOptions) -> Result<()> {
    let suffix_ok = manifest
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == opts.manifest_suffix);
    if !suffix_ok {
        return Err(GfsError::InvalidTarget(format!(
            "rebuild must be done from a .{} file, got {}",
            opts.manifest_suffix,
            manifest.display()
        )));
    }
    let md = stat_target(manifest)?;
    if !md.is_file() {
        return Err(GfsError::InvalidTarget(format!(
            "{} is not a regular file",
            manifest.display()
        )));
    }
    Ok(())
}

/// Rebuild the original file described by `manifest`.
///
/// Fragments are appended strictly in manifest order. A missing or
/// unreadable fragment aborts the run and leaves the output truncated on
/// disk; the error names the fragment.
pub fn rebuild(manifest: &Path, opts: &ChunkOptions) -> Result<RebuildReport> {
    opts.validate()?;
    check_manifest_target(manifest, opts)?;
    let meta = Manifest::read_from(manifest)?;

    let output = rebuild_path(
        manifest,
        opts.rebuild_dir.as_deref(),
        &opts.rebuild_prefix,
        &meta.ext,
    )?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).at(parent)?;
        }
    }

    let bytes = write_fragments(&meta, &output)?;

    info!(
        manifest = %manifest.display(),
        output = %output.display(),
        fragments = meta.chunks.len(),
        bytes,
        "rebuild complete"
    );

    Ok(RebuildReport {
        manifest: manifest.to_path_buf(),
        output,
        fragments: meta.chunks.len(),
        bytes,
    })
}

fn write_fragments(meta: &Manifest, output: &Path) -> Result<u64> {
    let file = File::create(output).at(output)?;
    let mut out = BufWriter::new(file);
    let mut buf = vec![0u8; IO_BUF_SIZE];
    let mut total = 0u64;

    for (index, loc) in meta.fragment_paths().enumerate() {
        let missing = |source: std::io::Error| GfsError::MissingFragment {
            index,
            path: PathBuf::from(loc),
            source,
        };
        let mut frag = File::open(loc).map_err(missing)?;
        let mut n_frag = 0u64;
        loop {
            let k = frag.read(&mut buf).map_err(missing)?;
            if k == 0 {
                break;
            }
            out.write_all(&buf[..k]).at(output)?;
            n_frag += k as u64;
        }
        debug!(index, path = %loc.display(), len = n_frag, "appended fragment");
        total += n_frag;
    }

    let file = out
        .into_inner()
        .map_err(|e| GfsError::io(output, e.into_error()))?;
    file.sync_all().at(output)?;

    let on_disk = file.metadata().at(output)?.len();
    if on_disk != total {
        return Err(GfsError::io(
            output,
            std::io::Error::other(format!(
                "rebuilt size mismatch: wrote {total} bytes, file has {on_disk}"
            )),
        ));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, name: &str, ext: &str, chunks: &[PathBuf]) -> PathBuf {
        let m = Manifest {
            original: format!("{name}{ext}"),
            ext: ext.to_string(),
            chunks: chunks
                .iter()
                .map(|p| p.to_str().unwrap().to_string())
                .collect(),
        };
        let path = dir.join(format!("{name}.meta"));
        m.write_to(&path).unwrap();
        path
    }

    #[test]
    fn concatenates_in_manifest_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("x_chunk_000.gfs");
        let b = dir.path().join("x_chunk_001.gfs");
        fs::write(&a, b"AA").unwrap();
        fs::write(&b, b"BB").unwrap();

        let man = write_manifest(dir.path(), "x", ".txt", &[b.clone(), a.clone()]);
        let rep = rebuild(&man, &ChunkOptions::default()).unwrap();
        assert_eq!(rep.output, dir.path().join("rebuild_x.txt"));
        assert_eq!(fs::read(&rep.output).unwrap(), b"BBAA");
        assert_eq!(rep.bytes, 4);
        assert_eq!(rep.fragments, 2);
    }

    #[test]
    fn empty_manifest_gives_empty_file() {
        let dir = TempDir::new().unwrap();
        let man = write_manifest(dir.path(), "empty", "", &[]);
        let rep = rebuild(&man, &ChunkOptions::default()).unwrap();
        assert_eq!(rep.output, dir.path().join("rebuild_empty"));
        assert_eq!(fs::metadata(&rep.output).unwrap().len(), 0);
    }

    #[test]
    fn truncates_existing_output() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("y_chunk_000.gfs");
        fs::write(&a, b"new").unwrap();
        fs::write(dir.path().join("rebuild_y.bin"), b"old and much longer").unwrap();

        let man = write_manifest(dir.path(), "y", ".bin", &[a]);
        let rep = rebuild(&man, &ChunkOptions::default()).unwrap();
        assert_eq!(fs::read(rep.output).unwrap(), b"new");
    }

    #[test]
    fn honours_rebuild_dir() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("z_chunk_000.gfs");
        fs::write(&a, b"zz").unwrap();
        let man = write_manifest(dir.path(), "z", ".z", &[a]);

        let opts = ChunkOptions {
            rebuild_dir: Some(dir.path().join("out/nested")),
            ..Default::default()
        };
        let rep = rebuild(&man, &opts).unwrap();
        assert_eq!(rep.output, dir.path().join("out/nested/rebuild_z.z"));
        assert_eq!(fs::read(rep.output).unwrap(), b"zz");
    }

    #[test]
    fn missing_fragment_is_named() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("m_chunk_000.gfs");
        let b = dir.path().join("m_chunk_001.gfs");
        fs::write(&a, b"first").unwrap();

        let man = write_manifest(dir.path(), "m", ".dat", &[a, b.clone()]);
        let err = rebuild(&man, &ChunkOptions::default()).unwrap_err();
        match err {
            GfsError::MissingFragment { index, path, source } => {
                assert_eq!(index, 1);
                assert_eq!(path, b);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {other}"),
        }
        // truncated output stays behind
        assert_eq!(fs::read(dir.path().join("rebuild_m.dat")).unwrap(), b"first");
    }

    #[test]
    fn malformed_manifest_creates_no_output() {
        let dir = TempDir::new().unwrap();
        let man = dir.path().join("bad.meta");
        fs::write(&man, br#"{"original": "bad.txt"}"#).unwrap();

        let err = rebuild(&man, &ChunkOptions::default()).unwrap_err();
        assert!(matches!(err, GfsError::Manifest { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn wrong_target_kind_rejected() {
        let dir = TempDir::new().unwrap();
        let not_meta = dir.path().join("file.txt");
        fs::write(&not_meta, b"{}").unwrap();
        assert!(matches!(
            rebuild(&not_meta, &ChunkOptions::default()),
            Err(GfsError::InvalidTarget(_))
        ));

        let dir_meta = dir.path().join("dir.meta");
        fs::create_dir(&dir_meta).unwrap();
        assert!(matches!(
            rebuild(&dir_meta, &ChunkOptions::default()),
            Err(GfsError::InvalidTarget(_))
        ));

        assert!(matches!(
            rebuild(&dir.path().join("gone.meta"), &ChunkOptions::default()),
            Err(GfsError::InvalidTarget(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
