// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::OnConflict;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// on_conflict = "reject"
///
/// [vars]
/// outdir = "out/Release"
///
/// [default]
/// inputs = ["src/**/*.cc"]
/// exclude = ["src/**/*.tmp"]
///
/// [target.node]
/// cmd = "make -j4"
/// outputs = ["<outdir>/node"]
/// inputs = ["src/**/*.cc", "common.gypi"]
/// after = ["snapshots"]
/// ```
///
/// All sections except `[target.<name>]` are optional and have reasonable
/// defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Placeholder substitutions from `[vars]`, applied to declared outputs
    /// as `<name>`.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Defaults for `inputs` / `exclude` from `[default]`.
    #[serde(default)]
    pub default: DefaultSection,

    /// All targets from `[target.<name>]`.
    ///
    /// Keys are the *target names* (e.g. `"node"`, `"snapshots"`).
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// Validated configuration.
///
/// Constructed via `TryFrom<RawConfigFile>` (see `config::validate`), which
/// checks dependency references, output declarations and DAG acyclicity.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub vars: BTreeMap<String, String>,
    pub default: DefaultSection,
    pub target: BTreeMap<String, TargetConfig>,
}

impl ConfigFile {
    /// Construct without validation. Only `config::validate` should call
    /// this; everything else goes through `TryFrom<RawConfigFile>`.
    pub fn new_unchecked(
        config: ConfigSection,
        vars: BTreeMap<String, String>,
        default: DefaultSection,
        target: BTreeMap<String, TargetConfig>,
    ) -> Self {
        Self {
            config,
            vars,
            default,
            target,
        }
    }

    pub fn default_section(&self) -> &DefaultSection {
        &self.default
    }

    pub fn targets(&self) -> &BTreeMap<String, TargetConfig> {
        &self.target
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// What to do when a target name is registered twice: `"reject"` or
    /// `"replace"`.
    #[serde(default)]
    pub on_conflict: OnConflict,
}

/// `[default]` section.
///
/// Mirrors examples like:
///
/// ```toml
/// [default]
/// inputs = ["src/**/*.cc", "tools/*.py"]
/// exclude = ["src/**/*.tmp"]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultSection {
    /// Default `inputs` patterns applied to targets that do not override them.
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Default `exclude` patterns applied to targets that do not override them.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// The command to execute when the target is stale.
    pub cmd: String,

    /// Declared output artifacts, relative to the project root.
    ///
    /// Entries may contain `<var>` placeholders (resolved against `[vars]`)
    /// and glob patterns. A target must declare at least one output.
    pub outputs: Vec<String>,

    /// Optional target-local input patterns.
    ///
    /// If `None`, the target uses `default.inputs`.
    #[serde(default)]
    pub inputs: Option<Vec<String>>,

    /// Optional target-local exclude patterns.
    ///
    /// If `None`, the target uses `default.exclude`.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// If true, `default.inputs` is appended to `target.inputs`.
    ///
    /// Otherwise, `target.inputs` replaces `default.inputs`.
    #[serde(default)]
    pub append_default_inputs: bool,

    /// If true, `default.exclude` is appended to `target.exclude`.
    ///
    /// Otherwise, `target.exclude` replaces `default.exclude`.
    #[serde(default)]
    pub append_default_exclude: bool,

    /// Dependency list: the resolved outputs of every target named here join
    /// this target's input set.
    ///
    /// This is the TOML `after = ["A", "B"]` field.
    #[serde(default)]
    pub after: Vec<String>,

    /// Always rebuild this target, regardless of timestamps.
    #[serde(default)]
    pub force: bool,
}
