mod common;

use common::{extract_fingerprint, strongex_cmd, write_sample_manual};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn report_lists_objects_missing_from_disc() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    let output = strongex_cmd(&source, &out).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert!(stdout.contains("A  file $.README\n"));
    assert!(stdout.contains("A  dir  $.Docs\n"));
    assert!(stdout.contains("A  file $.Docs.Intro\n"));
    assert!(stdout.contains("1 directory added\n"));
    assert!(stdout.contains("2 files added\n"));
    assert!(!stdout.contains("$\n"));
    assert!(!extract_fingerprint(&output.stdout).is_empty());
    assert!(!out.exists(), "a report must not touch the disc");
}

#[test]
fn report_all_includes_identical_objects() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    strongex_cmd(&source, &out)
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains(".  dir  $\n"));
}

#[test]
fn report_after_update_is_identical() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    strongex_cmd(&source, &out).arg("--update").assert().success();

    strongex_cmd(&source, &out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Manual and disc folder are identical"))
        .stdout(predicate::str::contains("Fingerprint:").not());
}

#[test]
fn report_shows_changes_on_disc() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");
    strongex_cmd(&source, &out).arg("--update").assert().success();

    std::fs::write(out.join("README,fff"), "short").unwrap();
    std::fs::write(out.join("Extra,ffd"), "extra").unwrap();

    strongex_cmd(&source, &out)
        .assert()
        .success()
        .stdout(predicate::str::contains("S  file $.README\n"))
        .stdout(predicate::str::contains("D  file $.Extra\n"))
        .stdout(predicate::str::contains("1 file changed\n"))
        .stdout(predicate::str::contains("1 file deleted\n"));
}

#[test]
fn fingerprint_is_stable_between_runs() {
    let temp = TempDir::new().unwrap();
    let source = write_sample_manual(temp.path());
    let out = temp.path().join("out");

    let first = strongex_cmd(&source, &out).output().unwrap();
    let second = strongex_cmd(&source, &out).arg("--all").output().unwrap();

    assert_eq!(
        extract_fingerprint(&first.stdout),
        extract_fingerprint(&second.stdout)
    );
}
