// src/registry/resolve.rs

//! Resolution of declared patterns into concrete paths.
//!
//! Declared outputs go through `<var>` placeholder expansion first, then
//! glob expansion; input patterns additionally honour exclude sets. All
//! directory traversal goes through the `FileSystem` trait so the logic is
//! testable against a mock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use tracing::debug;

use crate::errors::{Result, StalecheckError};
use crate::fs::FileSystem;

/// Expand `<name>` placeholders in a declared path using the `[vars]` table.
///
/// An unknown variable is a configuration error, not an empty substitution.
pub fn expand_placeholders(raw: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    let re = placeholder_regex()?;

    let mut expanded = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in re.captures_iter(raw) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let name = &caps[1];
        let value = vars.get(name).ok_or_else(|| {
            StalecheckError::ConfigError(format!("unknown variable '<{name}>' in '{raw}'"))
        })?;
        expanded.push_str(&raw[last..whole.start()]);
        expanded.push_str(value);
        last = whole.end();
    }
    expanded.push_str(&raw[last..]);
    Ok(expanded)
}

fn placeholder_regex() -> Result<Regex> {
    Regex::new(r"<(.+?)>")
        .map_err(|e| StalecheckError::ConfigError(format!("placeholder regex: {e}")))
}

/// A pattern is treated as a glob when it contains glob metacharacters;
/// anything else is a literal path.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Resolve declared output patterns into concrete paths under `root`.
///
/// Literal paths are kept verbatim whether or not they exist (the oracle
/// decides what a missing output means); glob patterns contribute the files
/// they currently match. A glob that matches nothing is logged and
/// contributes nothing, which reads as "output files are missing" upstream.
pub fn resolve_outputs(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[String],
    vars: &BTreeMap<String, String>,
) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();

    for raw in patterns {
        let expanded = expand_placeholders(raw, vars)?;
        if is_glob(&expanded) {
            let set = build_globset(std::slice::from_ref(&expanded))?;
            let matched = collect_matching_files(fs, root, &set, None)?;
            if matched.is_empty() {
                debug!(pattern = %expanded, "declared output pattern matched no files");
            }
            outputs.extend(matched);
        } else {
            outputs.push(root.join(expanded));
        }
    }

    outputs.sort();
    outputs.dedup();
    Ok(outputs)
}

/// Resolve input patterns into concrete files under `root`.
///
/// Literal paths are kept verbatim so that a missing input surfaces as an
/// error during evaluation instead of silently dropping out of the
/// comparison; globs contribute the files they match, minus `exclude`.
pub fn resolve_input_patterns(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    let mut literals = Vec::new();
    let mut globs = Vec::new();
    for pattern in patterns {
        if is_glob(pattern) {
            globs.push(pattern.clone());
        } else {
            literals.push(root.join(pattern));
        }
    }

    let mut inputs = literals;
    if !globs.is_empty() {
        let set = build_globset(&globs)?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };
        inputs.extend(collect_matching_files(fs, root, &set, exclude_set.as_ref())?);
    }

    inputs.sort();
    inputs.dedup();
    Ok(inputs)
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|e| {
            StalecheckError::ConfigError(format!("invalid glob pattern '{pat}': {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| StalecheckError::ConfigError(format!("building glob set: {e}")))
}

/// Collect all files under `root` whose root-relative path matches `set`
/// and does not match `exclude`.
fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    set: &GlobSet,
    exclude: Option<&GlobSet>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if set.is_match(&rel_str)
                        && !exclude.is_some_and(|e| e.is_match(&rel_str))
                    {
                        files.push(path);
                    }
                }
            }
        }
    }

    Ok(files)
}
