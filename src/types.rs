use std::str::FromStr;
use serde::Deserialize;

/// Behaviour when a target name is registered a second time.
///
/// - `Reject`: a second registration with a conflicting definition is a
///   configuration error (default behaviour). Re-registering an identical
///   definition is accepted as a no-op.
/// - `Replace`: last registration wins; the previous definition is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnConflict {
    Reject,
    Replace,
}

impl Default for OnConflict {
    fn default() -> Self {
        OnConflict::Reject
    }
}

impl FromStr for OnConflict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OnConflict::Reject),
            "replace" => Ok(OnConflict::Replace),
            other => Err(format!(
                "invalid on_conflict: {other} (expected \"reject\" or \"replace\")"
            )),
        }
    }
}
