// src/oracle/decision.rs

use std::fmt;
use std::path::Path;

/// Outcome of a single staleness evaluation.
///
/// Produced fresh on every call and discarded after use; never persisted or
/// cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessDecision {
    pub needs_build: bool,
    /// Human-readable explanation, when there is one. A fresh target with
    /// tracked inputs carries no reason.
    pub reason: Option<String>,
}

impl StalenessDecision {
    /// `force` always wins.
    pub fn forced() -> Self {
        Self {
            needs_build: true,
            reason: Some("forced build".to_string()),
        }
    }

    /// No declared output exists, or a literal declared output is absent.
    pub fn outputs_missing() -> Self {
        Self {
            needs_build: true,
            reason: Some("output files are missing".to_string()),
        }
    }

    /// A target with no tracked inputs is never stale once it has outputs.
    pub fn no_inputs() -> Self {
        Self {
            needs_build: false,
            reason: Some("no input files to compare".to_string()),
        }
    }

    /// The newest input beat the oldest output; cite the offending pair.
    pub fn input_newer(input: &Path, output: &Path) -> Self {
        Self {
            needs_build: true,
            reason: Some(format!(
                "{} is newer than {}",
                input.display(),
                output.display()
            )),
        }
    }

    pub fn fresh() -> Self {
        Self {
            needs_build: false,
            reason: None,
        }
    }
}

impl fmt::Display for StalenessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.needs_build { "stale" } else { "up to date" };
        match &self.reason {
            Some(reason) => write!(f, "{label} ({reason})"),
            None => write!(f, "{label}"),
        }
    }
}
