mod common;

use common::{extract_fingerprint, strongex_cmd, write_sample_manual};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn update_extracts_into_new_folder() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    strongex_cmd(&source, &out).arg("--update").assert().success();

    assert_eq!(fs::read(out.join("README,fff")).unwrap(), vec![b'r'; 120]);
    assert_eq!(
        fs::read(out.join("Docs").join("Intro,fff")).unwrap(),
        vec![b'i'; 40]
    );
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn update_removes_objects_not_in_manual() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("Old/Older")).unwrap();
    fs::write(out.join("Old/Older/stale,fff"), "stale").unwrap();
    fs::write(out.join("notes"), "notes").unwrap();

    strongex_cmd(&source, &out).arg("-u").assert().success();

    assert!(!out.join("Old").exists());
    assert!(!out.join("notes").exists());
    assert!(out.join("README,fff").exists());
}

#[test]
fn update_accepts_matching_fingerprint() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    let report = strongex_cmd(&source, &out).output().unwrap();
    let fingerprint = extract_fingerprint(&report.stdout);

    strongex_cmd(&source, &out)
        .arg("--update")
        .arg("--fingerprint")
        .arg(&fingerprint)
        .assert()
        .success();

    assert!(out.join("README,fff").exists());
}

#[test]
fn update_refuses_stale_fingerprint() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    let report = strongex_cmd(&source, &out).output().unwrap();
    let fingerprint = extract_fingerprint(&report.stdout);

    fs::create_dir(&out).unwrap();
    fs::write(out.join("README,fff"), vec![b'r'; 120]).unwrap();

    strongex_cmd(&source, &out)
        .arg("--update")
        .arg("--fingerprint")
        .arg(&fingerprint)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Fingerprint mismatch"));

    assert!(!out.join("Docs").exists());
}

#[test]
fn fingerprint_without_update_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());

    strongex_cmd(&source, &temp.path().join("out"))
        .arg("--fingerprint")
        .arg("abc")
        .assert()
        .code(2);
}

#[test]
fn second_update_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    strongex_cmd(&source, &out).arg("--update").assert().success();

    strongex_cmd(&source, &out)
        .arg("--update")
        .arg("--log-level")
        .arg("info")
        .assert()
        .success()
        .stderr(predicate::str::contains("Update complete, 0 changes made"));
}
