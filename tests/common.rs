//! Test utilities for cstyle integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Owned lines from string literals
pub fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(|line| line.to_string()).collect()
}

/// Writes `(relative path, content)` pairs under `root`, creating parents
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Path of a checked-in fixture
pub fn fixture(relative: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}
