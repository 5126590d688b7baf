// src/lib.rs

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod oracle;
pub mod registry;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::driver::Driver;
use crate::exec::RealActionBackend;
use crate::registry::TargetRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the target registry
/// - staleness evaluation
/// - the action backend for stale targets
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let registry = TargetRegistry::from_config(&cfg, &root)?;

    info!(
        targets = registry.len(),
        root = %root.display(),
        "registry constructed"
    );

    if args.check {
        return run_check(&registry, args.force, args.target.as_deref());
    }

    let mut driver = Driver::new(registry, RealActionBackend::new());
    let reports = driver.run_once(args.force, args.target.as_deref()).await?;

    let mut failed = 0usize;
    for report in &reports {
        match &report.reason {
            Some(reason) => println!("{:<24} {} ({})", report.name, report.status, reason),
            None => println!("{:<24} {}", report.name, report.status),
        }
        if report.status.is_failure() {
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} target(s) failed to build");
    }
    Ok(())
}

/// `--check`: print each target's staleness decision, run nothing.
///
/// Staleness itself is informational here; only evaluation errors fail the
/// process.
fn run_check(registry: &TargetRegistry, force: bool, only: Option<&str>) -> Result<()> {
    let order = match only {
        Some(name) => registry.dependency_closure(name)?,
        None => registry.evaluation_order()?,
    };

    let mut errors = 0usize;
    for name in order {
        match registry.evaluate(&name, force) {
            Ok(decision) => println!("{name:<24} {decision}"),
            Err(err) => {
                println!("{name:<24} error: {err}");
                errors += 1;
            }
        }
    }

    if errors > 0 {
        anyhow::bail!("{errors} target(s) failed to evaluate");
    }
    Ok(())
}

/// Figure out a sensible project root for resolving declared paths.
///
/// - If the config path has a non-empty parent (e.g. "configs/Stalecheck.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Stalecheck.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print targets, outputs, inputs and commands.
fn print_dry_run(cfg: &ConfigFile) {
    println!("stalecheck dry-run");
    println!("  config.on_conflict = {:?}", cfg.config.on_conflict);
    if !cfg.vars.is_empty() {
        println!("  vars: {:?}", cfg.vars);
    }
    println!();

    println!("targets ({}):", cfg.target.len());
    for (name, target) in cfg.target.iter() {
        println!("  - {name}");
        println!("      cmd: {}", target.cmd);
        println!("      outputs: {:?}", target.outputs);
        if let Some(ref inputs) = target.inputs {
            if !inputs.is_empty() {
                println!("      inputs: {:?}", inputs);
            }
        }
        if let Some(ref exclude) = target.exclude {
            if !exclude.is_empty() {
                println!("      exclude: {:?}", exclude);
            }
        }
        if !target.after.is_empty() {
            println!("      after: {:?}", target.after);
        }
        if target.force {
            println!("      force: true");
        }
    }

    debug!("dry-run complete (no evaluation)");
}
