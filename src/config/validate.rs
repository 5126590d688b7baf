// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StalecheckError};
use crate::registry::resolve::expand_placeholders;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::StalecheckError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.config,
            raw.vars,
            raw.default,
            raw.target,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_outputs(cfg)?;
    validate_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(StalecheckError::ConfigError(
            "config must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

/// Every target must declare at least one output, placeholders must resolve
/// against `[vars]`, and no output may be declared by more than one target
/// (shared outputs would make independent evaluation racy).
fn validate_outputs(cfg: &RawConfigFile) -> Result<()> {
    let mut declared: BTreeMap<String, &str> = BTreeMap::new();

    for (name, target) in cfg.target.iter() {
        if target.outputs.is_empty() {
            return Err(StalecheckError::ConfigError(format!(
                "target '{}' declares no outputs",
                name
            )));
        }
        if target.cmd.trim().is_empty() {
            return Err(StalecheckError::ConfigError(format!(
                "target '{}' has an empty `cmd`",
                name
            )));
        }

        for raw in target.outputs.iter() {
            let expanded = expand_placeholders(raw, &cfg.vars).map_err(|e| match e {
                StalecheckError::ConfigError(msg) => {
                    StalecheckError::ConfigError(format!("target '{}': {}", name, msg))
                }
                other => other,
            })?;

            if let Some(other) = declared.insert(expanded.clone(), name.as_str()) {
                return Err(StalecheckError::ConfigError(format!(
                    "targets '{}' and '{}' both declare output '{}'",
                    other, name, expanded
                )));
            }
        }
    }

    Ok(())
}

fn validate_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        for dep in target.after.iter() {
            if !cfg.target.contains_key(dep) {
                return Err(StalecheckError::ConfigError(format!(
                    "target '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(StalecheckError::ConfigError(format!(
                    "target '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Build a simple petgraph graph from the targets and their dependencies.
    //
    // Edge direction: dep -> target
    // For:
    //   [target.B]
    //   after = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.target.keys() {
        graph.add_node(name.as_str());
    }

    for (name, target) in cfg.target.iter() {
        for dep in target.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(StalecheckError::DepCycle(format!(
                "cycle detected in target dependencies involving target '{}'",
                node
            )))
        }
    }
}
