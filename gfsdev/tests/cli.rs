use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use walkdir::WalkDir;

fn gfsdev(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gfsdev"))
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("spawn gfsdev")
}

fn count_with_ext(root: &Path, ext: &str) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|x| x == ext))
        .count()
}

#[test]
fn split_rebuild_clean_with_relative_paths() {
    let dir = TempDir::new().unwrap();
    let cwd = dir.path();
    fs::write(cwd.join("bigfile.txt"), b"ABCDEFGHIJ").unwrap();

    let out = gfsdev(cwd, &["split", "bigfile.txt", "--chunk-size", "4"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("chunks/bigfile_chunk_002.gfs"), "{stdout}");
    assert!(stdout.contains("chunks/bigfile.meta"), "{stdout}");

    let meta = fs::read_to_string(cwd.join("chunks/bigfile.meta")).unwrap();
    assert!(meta.contains("\"chunks/bigfile_chunk_000.gfs\""), "{meta}");

    let out = gfsdev(cwd, &["rebuild", "chunks/bigfile.meta"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read(cwd.join("chunks/rebuild_bigfile.txt")).unwrap(),
        b"ABCDEFGHIJ"
    );

    let out = gfsdev(cwd, &["inspect", "chunks/bigfile.meta"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("chunks=3"), "{stdout}");

    let out = gfsdev(cwd, &["clean"]);
    assert!(out.status.success());
    assert_eq!(count_with_ext(cwd, "gfs"), 0);
    assert_eq!(count_with_ext(cwd, "meta"), 0);
    assert!(cwd.join("bigfile.txt").exists());
    assert!(cwd.join("chunks/rebuild_bigfile.txt").exists());

    let out = gfsdev(cwd, &["clean"]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("No chunks or metadata files found."));
}

#[test]
fn split_directory() {
    let dir = TempDir::new().unwrap();
    let cwd = dir.path();
    fs::create_dir_all(cwd.join("data/nested")).unwrap();
    fs::write(cwd.join("data/one.bin"), vec![1u8; 10]).unwrap();
    fs::write(cwd.join("data/nested/two.bin"), vec![2u8; 3]).unwrap();

    let out = gfsdev(cwd, &["split", "data", "--chunk-size", "5", "--out-dir", "out"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(count_with_ext(&cwd.join("out"), "gfs"), 3);
    assert_eq!(count_with_ext(&cwd.join("out"), "meta"), 2);
}

#[test]
fn rebuild_requires_meta_and_fragments() {
    let dir = TempDir::new().unwrap();
    let cwd = dir.path();
    fs::write(cwd.join("a.txt"), b"hello").unwrap();

    let out = gfsdev(cwd, &["rebuild", "a.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains(".meta"));

    let out = gfsdev(cwd, &["split", "a.txt", "--chunk-size", "2"]);
    assert!(out.status.success());
    fs::remove_file(cwd.join("chunks/a_chunk_001.gfs")).unwrap();

    let out = gfsdev(cwd, &["rebuild", "chunks/a.meta"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("a_chunk_001.gfs"));
}

#[test]
fn zero_chunk_size_is_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();
    let out = gfsdev(dir.path(), &["split", "a", "--chunk-size", "0"]);
    assert!(!out.status.success());
    assert!(!dir.path().join("chunks").exists());
}
