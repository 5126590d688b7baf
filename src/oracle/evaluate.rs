// src/oracle/evaluate.rs

//! The staleness oracle.
//!
//! A pure decision function: given a target's resolved output and input
//! paths, decide whether the target must be rebuilt and explain why. The
//! only side effect is reading filesystem metadata; repeated calls with no
//! intervening filesystem change yield identical decisions.

use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::oracle::decision::StalenessDecision;
use crate::oracle::timestamp;

/// Concrete paths for one target, after placeholder expansion and glob
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Declared outputs. Literal declared paths are kept whether or not they
    /// exist; glob patterns contribute only the files they matched.
    pub outputs: Vec<PathBuf>,
    /// Input files, including the resolved outputs of `after` dependencies.
    pub inputs: Vec<PathBuf>,
}

/// Decide whether `name` needs rebuilding.
///
/// Decision order: forced build, missing outputs, empty input set, then the
/// newest-input / oldest-output comparison. Comparing against the *oldest*
/// output is deliberate: a single out-of-date output file forces a full
/// rebuild of the target.
pub fn evaluate(
    fs: &dyn FileSystem,
    name: &str,
    paths: &ResolvedPaths,
    force: bool,
) -> Result<StalenessDecision> {
    if force {
        debug!(target = %name, "forced build requested");
        return Ok(StalenessDecision::forced());
    }

    if let Some(missing) = paths.outputs.iter().find(|o| !fs.exists(o)) {
        debug!(
            target = %name,
            output = %missing.display(),
            "declared output not found"
        );
        return Ok(StalenessDecision::outputs_missing());
    }
    if paths.outputs.is_empty() {
        debug!(target = %name, "no declared output exists");
        return Ok(StalenessDecision::outputs_missing());
    }

    if paths.inputs.is_empty() {
        debug!(target = %name, "no tracked inputs; target stays as built");
        return Ok(StalenessDecision::no_inputs());
    }

    let inputs = timestamp::stamp_all(fs, &paths.inputs)?;
    let outputs = timestamp::stamp_all(fs, &paths.outputs)?;

    match (timestamp::newest(&inputs), timestamp::oldest(&outputs)) {
        (Some(input), Some(output)) if input.is_newer_than(output) => {
            debug!(
                target = %name,
                input = %input.path.display(),
                output = %output.path.display(),
                "input is newer than output"
            );
            Ok(StalenessDecision::input_newer(&input.path, &output.path))
        }
        _ => Ok(StalenessDecision::fresh()),
    }
}
