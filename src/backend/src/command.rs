//! Running system tools (`nmcli`, `systemctl`).
//!
//! Arguments are never logged here since they may carry passphrases.

use anyhow::{Context, Result, bail};
use std::{ffi::OsStr, fmt::Debug};
use tokio::process::Command;

/// Captured result of a finished tool invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args` and capture its output
pub async fn run<P>(program: P, args: &[&str]) -> Result<CommandOutput>
where
    P: AsRef<OsStr> + Debug,
{
    let output = Command::new(program.as_ref())
        .args(args)
        .env("LC_ALL", "C")
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to spawn {program:?}"))?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Run `program` and fail with its stderr unless it exits successfully
pub async fn run_checked<P>(program: P, args: &[&str]) -> Result<String>
where
    P: AsRef<OsStr> + Debug,
{
    let output = run(&program, args).await?;
    if !output.success {
        bail!("{program:?} failed: {}", output.stderr);
    }
    Ok(output.stdout)
}
