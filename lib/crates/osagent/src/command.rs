//! External command execution.
//!
//! Command lines come from string templates and are split on runs of spaces
//! into a program and its arguments. There is no quoting: an argument that
//! contains a space cannot be expressed. Only stdout is handed back to
//! callers; stderr is captured but never inspected.

use std::process::{Output, Stdio};

use anyhow::Context;
use async_trait::async_trait;

use crate::error::{AgentError, Result};

// ── Runner port ───────────────────────────────────────────────────────────────

/// Abstracts process execution so operations can be exercised without
/// spawning real programs.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process cannot be spawned or waited on.
    /// A non-zero exit status is reported through `Output::status`.
    async fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<Output>;
}

/// Production runner backed by `tokio::process`.
///
/// No timeout is applied: a hung command blocks its caller until it exits.
/// The child is killed if the awaiting future is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<Output> {
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to spawn {program}"))
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Result of a command whose non-zero exit is an expected answer rather than
/// a fault (`grep` with no match, a service status check on a stopped
/// service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exit status zero; carries stdout.
    Completed(Vec<u8>),
    /// The command ran but exited non-zero.
    Declined { code: Option<i32> },
}

// ── Command lines ─────────────────────────────────────────────────────────────

/// Substitute `{name}` placeholders in a command template.
///
/// Unknown placeholders are left untouched; missing values simply vanish
/// from the split argument list when they are empty.
#[must_use]
pub fn render(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |line, (name, value)| {
            line.replace(&format!("{{{name}}}"), value)
        })
}

/// Split a command line into program and arguments on runs of spaces.
///
/// Returns `None` for a blank line.
#[must_use]
pub fn split_command_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.trim().split(' ').filter(|t| !t.is_empty());
    let program = tokens.next()?;
    Some((program, tokens.collect()))
}

async fn execute<R>(runner: &R, line: &str) -> Result<Output>
where
    R: CommandRunner + ?Sized,
{
    let Some((program, args)) = split_command_line(line) else {
        return Err(AgentError::execution(line, "empty command"));
    };
    tracing::debug!(command = line.trim(), "running command");
    runner
        .run(program, &args)
        .await
        .map_err(|e| AgentError::execution(line, format!("{e:#}")))
}

/// Run a command line and return its stdout, treating any non-zero exit as
/// an [`AgentError::Execution`].
pub async fn run_checked<R>(runner: &R, line: &str) -> Result<Vec<u8>>
where
    R: CommandRunner + ?Sized,
{
    let output = execute(runner, line).await?;
    if !output.status.success() {
        return Err(AgentError::execution(line, output.status.to_string()));
    }
    Ok(output.stdout)
}

/// Run a command line whose non-zero exit is a legitimate negative answer.
///
/// Spawn failures still surface as [`AgentError::Execution`].
pub async fn run_probe<R>(runner: &R, line: &str) -> Result<CommandOutcome>
where
    R: CommandRunner + ?Sized,
{
    let output = execute(runner, line).await?;
    if output.status.success() {
        Ok(CommandOutcome::Completed(output.stdout))
    } else {
        tracing::debug!(command = line.trim(), status = %output.status, "command declined");
        Ok(CommandOutcome::Declined {
            code: output.status.code(),
        })
    }
}
