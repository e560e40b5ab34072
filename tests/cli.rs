//! Command-line tests for the archive-forge binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_zip(dir: &Path, password: Option<&'static str>) -> PathBuf {
    let path = dir.join("vault.zip");
    let mut writer = ZipWriter::new(std::fs::File::create(&path).unwrap());
    let mut options = SimpleFileOptions::default();
    if let Some(password) = password {
        options = options.with_deprecated_encryption(password.as_bytes());
    }
    writer.start_file("secret.txt", options).unwrap();
    writer.write_all(b"launch codes: 0000").unwrap();
    writer.finish().unwrap();
    path
}

fn forge(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("archive-forge").unwrap();
    cmd.current_dir(dir).arg("--quiet");
    cmd
}

#[test]
fn test_help() {
    Command::cargo_bin("archive-forge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dictionary"))
        .stdout(predicate::str::contains("--max-length"));
}

#[test]
fn test_missing_archive_argument() {
    let dir = tempfile::tempdir().unwrap();
    forge(dir.path()).assert().failure();
}

#[test]
fn test_brute_force_finds_password() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), Some("cab"));

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "abc", "--max-length", "3", "--threads", "1"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Password found"))
        .stdout(predicate::str::contains("cab"));

    assert!(dir.path().join("output").join("vault_attack.json").exists());
}

#[test]
fn test_dictionary_writes_password_file() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), Some("Summer"));
    let words = dir.path().join("words.txt");
    std::fs::write(&words, "winter\nSummer\n").unwrap();
    let output = dir.path().join("found.txt");

    forge(dir.path())
        .arg(&archive)
        .arg("--dictionary")
        .arg(&words)
        .arg("--password-file")
        .arg(&output)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Password written"));

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "Summer");
}

#[test]
fn test_not_found_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), Some("xyz"));

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "ab", "--max-length", "2"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Password not found"));
}

#[test]
fn test_unencrypted_archive_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), None);

    forge(dir.path())
        .arg(&archive)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not password protected"));
}

#[test]
fn test_invalid_start_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), Some("ab"));

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "ab", "--start", "xyz"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot start from 'xyz'"));
}

#[test]
fn test_resume_completed_attack() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), Some("bb"));
    let state = dir.path().join("checkpoint.json");

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "ab", "--max-length", "2", "--state"])
        .arg(&state)
        .assert()
        .code(0);

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "ab", "--max-length", "2", "--resume", "--state"])
        .arg(&state)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("already completed"))
        .stdout(predicate::str::contains("bb"));
}

#[test]
fn test_resume_with_other_settings_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), Some("bb"));
    let state = dir.path().join("checkpoint.json");

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "ab", "--max-length", "2", "--state"])
        .arg(&state)
        .assert()
        .code(0);

    forge(dir.path())
        .arg(&archive)
        .args(["--chars", "xy", "--max-length", "2", "--resume", "--state"])
        .arg(&state)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("different attack settings"));
}
