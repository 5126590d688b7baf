#![allow(dead_code)]

use std::collections::BTreeMap;
use stalecheck::config::{ConfigFile, ConfigSection, DefaultSection, RawConfigFile, TargetConfig};
use stalecheck::types::OnConflict;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                vars: BTreeMap::new(),
                default: DefaultSection::default(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.config.target.insert(name.to_string(), target);
        self
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.config.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_default_input(mut self, pattern: &str) -> Self {
        self.config.default.inputs.push(pattern.to_string());
        self
    }

    pub fn with_default_exclude(mut self, pattern: &str) -> Self {
        self.config.default.exclude.push(pattern.to_string());
        self
    }

    pub fn with_on_conflict(mut self, policy: OnConflict) -> Self {
        self.config.config.on_conflict = policy;
        self
    }

    /// Validated build; panics on invalid configs, which test setup treats
    /// as a bug in the test itself.
    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Raw, unvalidated config for tests that exercise validation errors.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            target: TargetConfig {
                cmd: cmd.to_string(),
                outputs: vec![],
                inputs: None,
                exclude: None,
                append_default_inputs: false,
                append_default_exclude: false,
                after: vec![],
                force: false,
            },
        }
    }

    pub fn output(mut self, path: &str) -> Self {
        self.target.outputs.push(path.to_string());
        self
    }

    pub fn input(mut self, pattern: &str) -> Self {
        let inputs = self.target.inputs.get_or_insert(vec![]);
        inputs.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        let excludes = self.target.exclude.get_or_insert(vec![]);
        excludes.push(pattern.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.target.after.push(dep.to_string());
        self
    }

    pub fn force(mut self, val: bool) -> Self {
        self.target.force = val;
        self
    }

    pub fn append_default_inputs(mut self, val: bool) -> Self {
        self.target.append_default_inputs = val;
        self
    }

    pub fn append_default_exclude(mut self, val: bool) -> Self {
        self.target.append_default_exclude = val;
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}
