// src/driver/mod.rs

//! The build driver.
//!
//! Walks targets in dependency order, asks the registry for a staleness
//! decision, and hands stale targets to the action backend. Dependents of a
//! target that failed (or could not be evaluated) are skipped; nothing is
//! retried. The driver owns process-facing policy; the registry and oracle
//! stay pure.

pub mod report;

pub use report::{TargetReport, TargetStatus};

use std::collections::HashSet;

use tracing::{info, warn};

use crate::errors::Result;
use crate::exec::{ActionBackend, BuildAction};
use crate::registry::TargetRegistry;

pub struct Driver<B: ActionBackend> {
    registry: TargetRegistry,
    backend: B,
}

impl<B: ActionBackend> Driver<B> {
    pub fn new(registry: TargetRegistry, backend: B) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Run one pass: evaluate every selected target in dependency order and
    /// rebuild the stale ones.
    ///
    /// With `only = Some(name)`, the pass is restricted to `name` and its
    /// transitive dependencies.
    pub async fn run_once(
        &mut self,
        force: bool,
        only: Option<&str>,
    ) -> Result<Vec<TargetReport>> {
        let order = match only {
            Some(name) => self.registry.dependency_closure(name)?,
            None => self.registry.evaluation_order()?,
        };

        info!(targets = order.len(), "starting build pass");

        // Targets that failed, errored or were skipped; their dependents
        // must not run against unreliable outputs.
        let mut broken: HashSet<String> = HashSet::new();
        let mut reports = Vec::with_capacity(order.len());

        for name in order {
            if self
                .registry
                .dependencies_of(&name)
                .iter()
                .any(|dep| broken.contains(dep))
            {
                warn!(target = %name, "skipping target; a dependency did not build");
                broken.insert(name.clone());
                reports.push(TargetReport::new(
                    name,
                    TargetStatus::Skipped,
                    Some("dependency did not build".to_string()),
                ));
                continue;
            }

            let decision = match self.registry.evaluate(&name, force) {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(target = %name, error = %err, "staleness evaluation failed");
                    broken.insert(name.clone());
                    reports.push(TargetReport::new(
                        name,
                        TargetStatus::EvalError,
                        Some(err.to_string()),
                    ));
                    continue;
                }
            };

            if !decision.needs_build {
                info!(target = %name, "target is up to date");
                reports.push(TargetReport::new(name, TargetStatus::Fresh, decision.reason));
                continue;
            }

            let Some(target) = self.registry.get(&name) else {
                // Evaluation just succeeded for this name, so this should
                // not happen; be defensive rather than panic.
                warn!(target = %name, "target vanished from registry mid-run");
                continue;
            };

            info!(
                target = %name,
                reason = decision.reason.as_deref().unwrap_or(""),
                "rebuilding target"
            );

            let action = BuildAction::for_target(target);
            match self.backend.run_action(action).await {
                Ok(report) if report.success => {
                    reports.push(TargetReport::new(
                        name,
                        TargetStatus::Rebuilt,
                        decision.reason,
                    ));
                }
                Ok(report) => {
                    warn!(
                        target = %name,
                        exit_code = report.exit_code,
                        "build action failed; dependents will be skipped"
                    );
                    broken.insert(name.clone());
                    reports.push(TargetReport::new(
                        name,
                        TargetStatus::Failed(report.exit_code),
                        decision.reason,
                    ));
                }
                Err(err) => {
                    warn!(target = %name, error = %err, "build action error");
                    broken.insert(name.clone());
                    reports.push(TargetReport::new(
                        name,
                        TargetStatus::Failed(-1),
                        Some(err.to_string()),
                    ));
                }
            }
        }

        Ok(reports)
    }
}
