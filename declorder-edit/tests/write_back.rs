//! Guarded write-back tests.

use camino::Utf8PathBuf;
use declorder_edit::{EditError, PreconditionError, sha256_hex, write_guarded};
use std::fs;
use tempfile::TempDir;

fn temp_file(contents: &str) -> (TempDir, Utf8PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(td.path().join("a.go")).expect("utf8 path");
    fs::write(&path, contents).expect("write");
    (td, path)
}

#[test]
fn writes_when_hash_matches() {
    let (_td, path) = temp_file("package p\n");
    let sha = sha256_hex(b"package p\n");
    write_guarded(&path, &sha, "package q\n").expect("write");
    assert_eq!(fs::read_to_string(&path).expect("read"), "package q\n");
}

#[test]
fn refuses_when_file_changed() {
    let (_td, path) = temp_file("package p\n");
    let stale = sha256_hex(b"package old\n");
    let err = write_guarded(&path, &stale, "package q\n").expect_err("mismatch");
    assert!(matches!(
        err,
        EditError::Precondition(PreconditionError::Sha256Mismatch { .. })
    ));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(fs::read_to_string(&path).expect("read"), "package p\n");
}

#[test]
fn refuses_when_file_missing() {
    let (_td, path) = temp_file("package p\n");
    fs::remove_file(&path).expect("remove");
    let err = write_guarded(&path, "00", "package q\n").expect_err("missing");
    assert!(matches!(
        err,
        EditError::Precondition(PreconditionError::FileMissing { .. })
    ));
    assert!(!path.exists());
}
