// src/exec/backend.rs

//! Pluggable action backend abstraction.
//!
//! The driver talks to an `ActionBackend` instead of spawning processes
//! directly. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation in [`command`].
//!
//! [`command`]: crate::exec::command

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::registry::BuildTarget;

/// What the driver asks the backend to run for one stale target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildAction {
    pub target: String,
    pub cmd: String,
}

impl BuildAction {
    pub fn for_target(target: &BuildTarget) -> Self {
        Self {
            target: target.name.clone(),
            cmd: target.cmd.clone(),
        }
    }
}

/// Result of running one build action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub success: bool,
    pub exit_code: i32,
    /// Captured stdout of the build command.
    pub output: Vec<u8>,
}

/// Trait abstracting how build actions are executed.
///
/// The implementation is free to:
/// - spawn OS processes (production)
/// - record the action and fabricate a report (tests)
///
/// A failed action is reported, never retried here; retry policy belongs to
/// the caller.
pub trait ActionBackend: Send {
    fn run_action(
        &mut self,
        action: BuildAction,
    ) -> Pin<Box<dyn Future<Output = Result<ActionReport>> + Send + '_>>;
}
