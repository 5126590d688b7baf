// src/oracle/mod.rs

//! Staleness decisions.
//!
//! - [`decision`] defines the immutable decision type handed back to callers.
//! - [`timestamp`] stats sets of paths and picks newest/oldest entries.
//! - [`evaluate`] is the decision function itself: given a target's resolved
//!   output and input paths, decide whether a rebuild is required and why.
//!
//! Nothing in here writes to the filesystem or caches between calls; two
//! evaluations with no intervening filesystem change return identical
//! decisions.

pub mod decision;
pub mod evaluate;
pub mod timestamp;

pub use decision::StalenessDecision;
pub use evaluate::{evaluate, ResolvedPaths};
pub use timestamp::{newest, oldest, stamp_all, TimeStamped};
