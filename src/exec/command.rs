// src/exec/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::backend::{ActionBackend, ActionReport, BuildAction};

/// Real action backend used in production.
///
/// Runs each build command through the platform shell, captures stdout into
/// the report, and drains stderr to the log so pipe buffers never fill.
#[derive(Debug, Clone, Default)]
pub struct RealActionBackend;

impl RealActionBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ActionBackend for RealActionBackend {
    fn run_action(
        &mut self,
        action: BuildAction,
    ) -> Pin<Box<dyn Future<Output = Result<ActionReport>> + Send + '_>> {
        Box::pin(async move { run_action_inner(action).await })
    }
}

async fn run_action_inner(action: BuildAction) -> Result<ActionReport> {
    info!(target = %action.target, cmd = %action.cmd, "starting build action");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&action.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&action.cmd);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning build action for target '{}'", action.target))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = stderr {
        let target = action.target.clone();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target = %target, "stderr: {}", line);
            }
        });
    }

    // Capture stdout fully; the report carries it back to the caller.
    let mut output = Vec::new();
    if let Some(mut stdout) = stdout {
        stdout
            .read_to_end(&mut output)
            .await
            .with_context(|| format!("reading stdout of target '{}'", action.target))?;
    }

    // Wait for the child to exit.
    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for build action of target '{}'", action.target))?;

    let code = status.code().unwrap_or(-1);

    info!(
        target = %action.target,
        exit_code = code,
        success = status.success(),
        "build action exited"
    );

    Ok(ActionReport {
        success: status.success(),
        exit_code: code,
        output,
    })
}
