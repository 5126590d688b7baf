// src/registry/mod.rs

//! Target registry and pattern resolution.
//!
//! - [`target`] models named build targets and their input sets.
//! - [`resolve`] expands `<var>` placeholders and glob patterns into
//!   concrete paths.
//! - [`TargetRegistry`] (below) is the composition point: the set of
//!   registered targets, each independently evaluable against the staleness
//!   oracle through the driver-facing `evaluate(name, force)` API.
//!
//! Evaluating one target never mutates another's state; there is no caching
//! between targets or between invocations, so parallel evaluation of
//! distinct targets is safe as long as no two targets declare overlapping
//! outputs (which registration rejects).

pub mod resolve;
pub mod target;

pub use target::{input_set_from_config, BuildTarget, InputSet, InputSource, TargetName};

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::config::model::ConfigFile;
use crate::errors::{Result, StalecheckError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::oracle::{self, ResolvedPaths, StalenessDecision};
use crate::types::OnConflict;

/// A target together with its declared input set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisteredTarget {
    target: BuildTarget,
    inputs: InputSet,
}

#[derive(Debug)]
pub struct TargetRegistry {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    vars: BTreeMap<String, String>,
    on_conflict: OnConflict,
    targets: BTreeMap<TargetName, RegisteredTarget>,
}

impl TargetRegistry {
    pub fn new(
        root: impl Into<PathBuf>,
        vars: BTreeMap<String, String>,
        on_conflict: OnConflict,
    ) -> Self {
        Self::with_fs(root, vars, on_conflict, Arc::new(RealFileSystem))
    }

    pub fn with_fs(
        root: impl Into<PathBuf>,
        vars: BTreeMap<String, String>,
        on_conflict: OnConflict,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            fs,
            root: root.into(),
            vars,
            on_conflict,
            targets: BTreeMap::new(),
        }
    }

    /// Build a registry from a validated [`ConfigFile`], registering every
    /// `[target.<name>]` section.
    pub fn from_config(cfg: &ConfigFile, root: impl Into<PathBuf>) -> Result<Self> {
        Self::from_config_with_fs(cfg, root, Arc::new(RealFileSystem))
    }

    pub fn from_config_with_fs(
        cfg: &ConfigFile,
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let mut registry = Self::with_fs(root, cfg.vars.clone(), cfg.config.on_conflict, fs);

        for (name, tc) in cfg.target.iter() {
            let target = BuildTarget::from_config(name.clone(), tc);
            let inputs = input_set_from_config(tc, cfg.default_section());
            registry.register(target, inputs)?;
        }

        Ok(registry)
    }

    /// Add a target definition.
    ///
    /// Rejects targets without declared outputs and output paths already
    /// declared by another target. Duplicate names follow the configured
    /// [`OnConflict`] policy: `Reject` errors on a conflicting redefinition
    /// (an identical one is a no-op), `Replace` keeps the newest.
    ///
    /// [`OnConflict`]: crate::types::OnConflict
    pub fn register(&mut self, target: BuildTarget, inputs: InputSet) -> Result<()> {
        if target.outputs.is_empty() {
            return Err(StalecheckError::ConfigError(format!(
                "target '{}' declares no outputs",
                target.name
            )));
        }

        for (other_name, other) in self.targets.iter() {
            if *other_name == target.name {
                continue;
            }
            for declared in target.outputs.iter() {
                if other.target.outputs.contains(declared) {
                    return Err(StalecheckError::ConfigError(format!(
                        "targets '{}' and '{}' both declare output '{}'",
                        other_name, target.name, declared
                    )));
                }
            }
        }

        if let Some(existing) = self.targets.get(&target.name) {
            match self.on_conflict {
                OnConflict::Reject => {
                    if existing.target == target && existing.inputs == inputs {
                        debug!(
                            target = %target.name,
                            "re-registration with identical definition; ignoring"
                        );
                        return Ok(());
                    }
                    return Err(StalecheckError::ConfigError(format!(
                        "target '{}' is already registered with a conflicting definition",
                        target.name
                    )));
                }
                OnConflict::Replace => {
                    warn!(target = %target.name, "replacing existing target definition");
                }
            }
        }

        debug!(target = %target.name, outputs = ?target.outputs, "registered target");
        self.targets
            .insert(target.name.clone(), RegisteredTarget { target, inputs });
        Ok(())
    }

    /// Decide whether `name` needs rebuilding.
    ///
    /// The per-target `force` flag and the caller's `force` argument are
    /// OR-ed together; force always wins over timestamps.
    pub fn evaluate(&self, name: &str, force: bool) -> Result<StalenessDecision> {
        let reg = self
            .targets
            .get(name)
            .ok_or_else(|| StalecheckError::TargetNotFound(name.to_string()))?;

        let paths = self.resolve_paths(reg)?;
        oracle::evaluate(self.fs.as_ref(), name, &paths, force || reg.target.force)
    }

    /// Evaluate every target in dependency order.
    ///
    /// One target's evaluation error (e.g. a missing input) does not abort
    /// the others; each entry carries its own result.
    pub fn evaluate_all(
        &self,
        force: bool,
    ) -> Result<Vec<(TargetName, Result<StalenessDecision>)>> {
        let order = self.evaluation_order()?;
        Ok(order
            .into_iter()
            .map(|name| {
                let decision = self.evaluate(&name, force);
                (name, decision)
            })
            .collect())
    }

    /// Expand a registered target's declared outputs and inputs into
    /// concrete paths for the oracle.
    fn resolve_paths(&self, reg: &RegisteredTarget) -> Result<ResolvedPaths> {
        let outputs = resolve::resolve_outputs(
            self.fs.as_ref(),
            &self.root,
            &reg.target.outputs,
            &self.vars,
        )?;

        let mut patterns = Vec::new();
        let mut inputs = Vec::new();
        for source in reg.inputs.sources.iter() {
            match source {
                InputSource::Pattern(pattern) => patterns.push(pattern.clone()),
                InputSource::TargetOutputs(dep) => {
                    let dep_reg = self
                        .targets
                        .get(dep)
                        .ok_or_else(|| StalecheckError::TargetNotFound(dep.clone()))?;
                    // A dependency's literal output that is still absent
                    // surfaces as MissingInput during evaluation.
                    inputs.extend(resolve::resolve_outputs(
                        self.fs.as_ref(),
                        &self.root,
                        &dep_reg.target.outputs,
                        &self.vars,
                    )?);
                }
            }
        }

        inputs.extend(resolve::resolve_input_patterns(
            self.fs.as_ref(),
            &self.root,
            &patterns,
            &reg.inputs.exclude,
        )?);
        inputs.sort();
        inputs.dedup();

        Ok(ResolvedPaths { outputs, inputs })
    }

    /// All registered target names in dependency order (dependencies before
    /// dependents).
    pub fn evaluation_order(&self) -> Result<Vec<TargetName>> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.targets.keys() {
            graph.add_node(name.as_str());
        }
        for (name, reg) in self.targets.iter() {
            for dep in reg.inputs.dependencies() {
                graph.add_edge(dep, name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(|s| s.to_string()).collect()),
            Err(cycle) => Err(StalecheckError::DepCycle(format!(
                "cycle detected in target dependencies involving target '{}'",
                cycle.node_id()
            ))),
        }
    }

    /// `name` plus its transitive dependencies, in dependency order.
    pub fn dependency_closure(&self, name: &str) -> Result<Vec<TargetName>> {
        if !self.targets.contains_key(name) {
            return Err(StalecheckError::TargetNotFound(name.to_string()));
        }

        let mut wanted: HashSet<TargetName> = HashSet::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if !wanted.insert(current.clone()) {
                continue;
            }
            if let Some(reg) = self.targets.get(&current) {
                stack.extend(reg.inputs.dependencies().map(|d| d.to_string()));
            }
        }

        let order = self.evaluation_order()?;
        Ok(order.into_iter().filter(|n| wanted.contains(n)).collect())
    }

    /// Direct dependencies of a target (the names in its `after = [...]`).
    pub fn dependencies_of(&self, name: &str) -> Vec<TargetName> {
        self.targets
            .get(name)
            .map(|reg| reg.inputs.dependencies().map(|d| d.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&BuildTarget> {
        self.targets.get(name).map(|reg| &reg.target)
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}
