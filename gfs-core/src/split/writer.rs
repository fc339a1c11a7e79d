use crate::container::manifest::Manifest;
use crate::domain::{Fragment, SplitReport};
use crate::error::{GfsError, IoContext, Result};
use crate::options::{ChunkOptions, IO_BUF_SIZE};
use crate::util::naming::{
    extension_of, file_name_str, fragment_count, fragment_path, fragment_range, manifest_path,
    stat_target, stem_of,
};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Split `src` into `ceil(size / chunk_size)` fragment files under
/// `opts.out_dir`, then write the manifest describing them.
///
/// The manifest is only written once every fragment is on disk. A manifest
/// left by an earlier split of the same stem is removed first, so a failure
/// part way leaves already written fragments behind and no manifest.
pub fn split(src: &Path, opts: &ChunkOptions) -> Result<SplitReport> {
    opts.validate()?;

    let md = stat_target(src)?;
    if !md.is_file() {
        return Err(GfsError::InvalidTarget(format!(
            "{} is not a regular file",
            src.display()
        )));
    }
    let name = file_name_str(src)?;
    let ext = extension_of(name);
    let stem = stem_of(name);
    let size = md.len();

    fs::create_dir_all(&opts.out_dir).at(&opts.out_dir)?;
    let manifest_at = manifest_path(&opts.out_dir, stem, &opts.manifest_suffix);
    remove_stale(&manifest_at)?;

    let mut f = File::open(src).at(src)?;
    let count = fragment_count(size, opts.chunk_size);
    let mut fragments = Vec::with_capacity(usize::try_from(count).unwrap_or(0));
    let mut chunks = Vec::with_capacity(fragments.capacity());
    let mut io_buf = vec![0u8; IO_BUF_SIZE];

    for index in 0..count {
        let range = fragment_range(index, opts.chunk_size, size);
        let location = fragment_path(&opts.out_dir, stem, index, &opts.fragment_suffix);
        let loc_str = location
            .to_str()
            .ok_or_else(|| {
                GfsError::InvalidTarget(format!("non UTF-8 fragment path {}", location.display()))
            })?
            .to_string();

        let len = range.end - range.start;
        {
            let mut out = File::create(&location).at(&location)?;
            copy_exact(&mut f, src, &mut out, &location, len, &mut io_buf)?;
            out.flush().at(&location)?;
        }
        debug!(index, path = %location.display(), len, "wrote fragment");

        chunks.push(loc_str);
        fragments.push(Fragment {
            index,
            offset: range.start,
            len,
            location,
        });
    }

    let manifest = Manifest {
        original: name.to_string(),
        ext: ext.to_string(),
        chunks,
    };
    manifest.write_to(&manifest_at)?;

    info!(
        source = %src.display(),
        manifest = %manifest_at.display(),
        size,
        fragments = fragments.len(),
        "split complete"
    );

    Ok(SplitReport {
        source: src.to_path_buf(),
        manifest: manifest_at,
        size,
        fragments,
    })
}

fn remove_stale(manifest: &Path) -> Result<()> {
    match fs::remove_file(manifest) {
        Ok(()) => {
            debug!(path = %manifest.display(), "removed previous manifest");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GfsError::io(manifest, e)),
    }
}

/// Copy exactly `len` bytes; a short source is an error, not a short fragment.
fn copy_exact(
    src: &mut impl Read,
    src_path: &Path,
    dst: &mut impl Write,
    dst_path: &Path,
    len: u64,
    buf: &mut [u8],
) -> Result<()> {
    let mut left = len;
    while left > 0 {
        let n = buf.len().min(usize::try_from(left).unwrap_or(usize::MAX));
        let k = src.read(&mut buf[..n]).at(src_path)?;
        if k == 0 {
            return Err(GfsError::io(
                src_path,
                std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("source ended {left} bytes early"),
                ),
            ));
        }
        dst.write_all(&buf[..k]).at(dst_path)?;
        left -= k as u64;
    }
    Ok(())
}
