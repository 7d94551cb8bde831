use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::path::{Path, PathBuf};

#[allow(dead_code)]
#[path = "../../src/util/manual_builder.rs"]
pub mod manual_builder;

use manual_builder::{Object, dir, file};

pub fn strongex_cmd(source: &Path, out: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("strongex");
    cmd.arg("--source").arg(source).arg("--out").arg(out);
    cmd
}

/// A manual holding `README` (120 bytes) and `Docs.Intro` (40 bytes), both
/// text files.
pub fn sample_objects() -> Vec<Object> {
    vec![
        file("README", 0xfff, &[b'r'; 120]),
        dir("Docs", vec![file("Intro", 0xfff, &[b'i'; 40])]),
    ]
}

pub fn write_manual(folder: &Path, bytes: &[u8]) -> PathBuf {
    let path = folder.join("Manual,3d6");
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn write_sample_manual(folder: &Path) -> PathBuf {
    write_manual(folder, &manual_builder::build(sample_objects()))
}

// Each integration test file is compiled as its own crate, and not all of
// them look at fingerprints.
#[allow(dead_code)]
pub fn extract_fingerprint(stdout: &[u8]) -> String {
    let output = std::str::from_utf8(stdout).expect("report stdout should be UTF-8");
    output
        .lines()
        .find_map(|line| line.strip_prefix("Fingerprint: "))
        .expect("fingerprint not found in output")
        .to_string()
}
