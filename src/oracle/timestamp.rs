// src/oracle/timestamp.rs

//! Modification-time lookups over sets of paths.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::errors::{Result, StalecheckError};
use crate::fs::FileSystem;

/// A path together with its observed modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStamped {
    pub path: PathBuf,
    pub mtime: SystemTime,
}

impl TimeStamped {
    pub fn new(path: impl Into<PathBuf>, mtime: SystemTime) -> Self {
        Self {
            path: path.into(),
            mtime,
        }
    }

    pub fn is_newer_than(&self, other: &TimeStamped) -> bool {
        self.mtime > other.mtime
    }
}

/// Stat every path in order.
///
/// A missing path is a hard error: staleness must never be guessed from an
/// absent file, so the caller sees `MissingInput` with the offending path
/// instead of a silently skewed comparison.
pub fn stamp_all(fs: &dyn FileSystem, paths: &[PathBuf]) -> Result<Vec<TimeStamped>> {
    let mut stamped = Vec::with_capacity(paths.len());
    for path in paths {
        if !fs.exists(path) {
            return Err(StalecheckError::MissingInput(path.clone()));
        }
        let mtime = fs.modified(path)?;
        stamped.push(TimeStamped::new(path.clone(), mtime));
    }
    Ok(stamped)
}

/// Entry with the newest mtime, or `None` for an empty set.
pub fn newest(stamped: &[TimeStamped]) -> Option<&TimeStamped> {
    stamped.iter().max_by_key(|t| t.mtime)
}

/// Entry with the oldest mtime, or `None` for an empty set.
pub fn oldest(stamped: &[TimeStamped]) -> Option<&TimeStamped> {
    stamped.iter().min_by_key(|t| t.mtime)
}
