// src/registry/target.rs

//! Target and input-set modelling.

use crate::config::model::{DefaultSection, TargetConfig};

/// Canonical target name type used throughout the registry.
pub type TargetName = String;

/// A named build output with its declared result files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub name: TargetName,
    /// Declared output paths, relative to the project root. Entries may
    /// contain `<var>` placeholders and glob patterns.
    pub outputs: Vec<String>,
    /// The command handed to the action backend when the target is stale.
    pub cmd: String,
    /// Always rebuild, regardless of timestamps.
    pub force: bool,
}

impl BuildTarget {
    pub fn from_config(name: TargetName, cfg: &TargetConfig) -> Self {
        Self {
            name,
            outputs: cfg.outputs.clone(),
            cmd: cfg.cmd.clone(),
            force: cfg.force,
        }
    }
}

/// A single timestamp source in an input set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A literal path or glob pattern, relative to the project root.
    Pattern(String),
    /// The resolved outputs of another target (`after = [...]`).
    TargetOutputs(TargetName),
}

/// Ordered list of timestamp sources gating a target's staleness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSet {
    pub sources: Vec<InputSource>,
    /// Glob patterns removed from the files matched by `Pattern` sources.
    pub exclude: Vec<String>,
}

impl InputSet {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the targets whose outputs feed this input set.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().filter_map(|s| match s {
            InputSource::TargetOutputs(name) => Some(name.as_str()),
            InputSource::Pattern(_) => None,
        })
    }
}

/// Effective input set for a target given the `[default]` section.
///
/// This applies the default + append logic:
///
/// - If `append_default_inputs = true`, the effective pattern list is
///   `target.inputs + default.inputs`.
/// - Else, if `target.inputs` is Some, use only that.
/// - Else, use `default.inputs`.
///
/// Same rules for `exclude`. Targets named in `after` always contribute
/// their outputs, independent of the pattern rules.
pub fn input_set_from_config(cfg: &TargetConfig, defaults: &DefaultSection) -> InputSet {
    let patterns = effective_patterns(
        cfg.inputs.as_ref(),
        &defaults.inputs,
        cfg.append_default_inputs,
    );
    let exclude = effective_patterns(
        cfg.exclude.as_ref(),
        &defaults.exclude,
        cfg.append_default_exclude,
    );

    let mut sources: Vec<InputSource> = patterns.into_iter().map(InputSource::Pattern).collect();
    sources.extend(cfg.after.iter().cloned().map(InputSource::TargetOutputs));

    InputSet { sources, exclude }
}

/// Helper to decide the effective pattern list for a given dimension (inputs or exclude).
fn effective_patterns(
    target_list: Option<&Vec<String>>,
    default_list: &Vec<String>,
    append_default: bool,
) -> Vec<String> {
    match (target_list, append_default) {
        (Some(list), true) => {
            let mut combined = list.clone();
            combined.extend(default_list.iter().cloned());
            combined
        }
        (Some(list), false) => list.clone(),
        (None, _) => default_list.clone(),
    }
}
