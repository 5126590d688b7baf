// src/exec/mod.rs

//! Build-action execution layer.
//!
//! The actual build step for a stale target is opaque to the rest of the
//! crate: the driver hands a [`BuildAction`] to an [`ActionBackend`] and
//! gets back an [`ActionReport`]. Production uses [`RealActionBackend`],
//! which runs the command through the platform shell with
//! `tokio::process::Command`; tests can substitute a fake backend that
//! records actions and scripts outcomes.

pub mod backend;
pub mod command;

pub use backend::{ActionBackend, ActionReport, BuildAction};
pub use command::RealActionBackend;
