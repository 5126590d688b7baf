//! Temporary project trees with controllable mtimes.
//!
//! Oracle semantics are all about modification-time ordering, so tests pin
//! mtimes explicitly (seconds after the epoch) instead of sleeping between
//! writes.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use tempfile::TempDir;

pub struct ProjectTree {
    dir: TempDir,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp project tree"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file (and its parent directories) with the mtime pinned to
    /// `secs` seconds after the epoch.
    pub fn file_with_mtime(&self, rel: &str, secs: u64) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating parent dirs");
        }
        fs::write(&path, rel).expect("writing file");
        self.pin_mtime(&path, secs);
        path
    }

    /// Move an existing file's mtime to `secs` seconds after the epoch.
    pub fn set_mtime(&self, rel: &str, secs: u64) {
        let path = self.dir.path().join(rel);
        self.pin_mtime(&path, secs);
    }

    pub fn remove(&self, rel: &str) {
        let path = self.dir.path().join(rel);
        fs::remove_file(&path).expect("removing file");
    }

    fn pin_mtime(&self, path: &Path, secs: u64) {
        let file = File::options()
            .write(true)
            .open(path)
            .expect("opening file to pin mtime");
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .expect("setting mtime");
    }
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}
