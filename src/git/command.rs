//! Process invocation primitive using [`tokio::process::Command`].
//!
//! Every façade operation shells out to the system `git` binary through
//! [`run_git`]. The child runs with the working tree as its current
//! directory plus explicit `--git-dir`/`--work-tree` arguments, so no
//! state of the calling process is ever touched. `GIT_TERMINAL_PROMPT=0`
//! keeps a misconfigured remote from hanging a request on a credential
//! prompt.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::Result;

/// Outcome of a single git invocation.
///
/// `success` mirrors the process exit code (zero means true). `lines` is
/// the combined stdout+stderr split on newlines, order preserved, with no
/// trailing empty entry.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub success: bool,
    pub lines: Vec<String>,
}

impl CommandResult {
    /// Collapses the output to its first line, for single-line commands
    /// like `rev-parse --abbrev-ref HEAD`.
    pub fn first_line(&self) -> String {
        self.lines.first().map(String::as_str).unwrap_or("").to_string()
    }

    /// Number of output lines, for count-shaped commands.
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// The full output re-joined; used as a failure message.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Spawn one git child process and capture its outcome.
///
/// `config_pairs` become `-c <key>=<value>` arguments ahead of the
/// subcommand, scoped to this single invocation. `extra_env` is injected
/// into the child environment (credential variables, test isolation).
pub async fn run_git(
    work_tree: &Path,
    git_dir: &Path,
    config_pairs: &[String],
    args: &[&str],
    extra_env: &[(String, String)],
) -> Result<CommandResult> {
    let mut cmd = Command::new("git");
    cmd.arg(format!("--git-dir={}", git_dir.display()));
    cmd.arg(format!("--work-tree={}", work_tree.display()));
    for pair in config_pairs {
        cmd.arg("-c").arg(pair);
    }
    cmd.args(args);

    cmd.current_dir(work_tree);
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    for (k, v) in extra_env {
        cmd.env(k, v);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!(subcommand = args.first().copied().unwrap_or(""), "spawning git");

    let output = cmd.output().await?;

    let mut lines = split_lines(&output.stdout);
    lines.extend(split_lines(&output.stderr));

    let result = CommandResult {
        success: output.status.success(),
        lines,
    };

    debug!(
        subcommand = args.first().copied().unwrap_or(""),
        success = result.success,
        lines = result.count(),
        "git finished"
    );

    Ok(result)
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    text.lines().map(str::to_string).collect()
}
