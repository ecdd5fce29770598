//! Shared fixtures for the integration tests
//!
//! Small hand-written TEI plays plus helpers for laying them out on disk.

#![allow(dead_code)]

pub mod plays;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use plays::{FLUSH_PLAY, SONG_PLAY, TOY_PLAY, TOY_AGGREGATE_CSV};

/// Write `contents` to `dir/name`, returning the path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture directory");
    }
    std::fs::write(&path, contents).expect("write fixture");
    path
}

/// Every file below `dir`, sorted, as paths relative to `dir`
pub fn files_below(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(dir)
                .ok()
                .map(|p| p.to_string_lossy().to_string())
        })
        .collect();
    files.sort();
    files
}
