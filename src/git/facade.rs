//! The git command façade.
//!
//! Each public method maps one named operation onto a `git` subcommand
//! invocation and shapes the captured output. The façade holds no
//! repository state: every call re-derives truth from the working tree on
//! disk, and concurrent callers are arbitrated only by git's own index
//! lock. A losing racer sees a command failure, not a queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{instrument, warn};

use crate::config::BridgeConfig;
use crate::error::{AppError, Result};
use crate::git::command::{CommandResult, run_git};
use crate::git::credentials;
use crate::models::{CommitIntent, RepositoryInfo};

pub struct GitFacade {
    work_tree: PathBuf,
    git_dir: PathBuf,
    config: BridgeConfig,
    /// Extra environment for every spawned child. Tests use this to
    /// isolate from global git configuration; empty in production.
    extra_env: Vec<(String, String)>,
}

pub type SharedFacade = Arc<GitFacade>;

impl GitFacade {
    pub fn new<P: AsRef<Path>>(work_tree: P, config: BridgeConfig) -> Self {
        let work_tree = work_tree.as_ref().to_path_buf();
        let git_dir = config
            .git_dir
            .clone()
            .unwrap_or_else(|| work_tree.join(".git"));
        Self {
            work_tree,
            git_dir,
            config,
            extra_env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.extra_env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// The metadata directory must exist on disk right now. Checked per
    /// request, never cached, so a repository created or removed after
    /// startup is picked up without a restart.
    pub fn ensure_repo(&self) -> Result<()> {
        if self.git_dir.is_dir() {
            Ok(())
        } else {
            Err(AppError::NoRepository)
        }
    }

    async fn run(&self, args: &[&str]) -> Result<CommandResult> {
        self.run_with(&[], args).await
    }

    async fn run_with(&self, config_pairs: &[String], args: &[&str]) -> Result<CommandResult> {
        run_git(&self.work_tree, &self.git_dir, config_pairs, args, &self.extra_env).await
    }

    /// Converts a failed result into `AppError::Command`, passing
    /// successes through.
    fn ok(result: CommandResult) -> Result<CommandResult> {
        if result.success {
            Ok(result)
        } else {
            Err(AppError::Command(result.joined()))
        }
    }

    /// Changed-file lines from `status --short --untracked-files=all`,
    /// in git's order.
    pub async fn status(&self) -> Result<Vec<String>> {
        let result = Self::ok(self.run(&["status", "--short", "--untracked-files=all"]).await?)?;
        Ok(result.lines)
    }

    pub async fn current_branch(&self) -> Result<String> {
        let result = Self::ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?)?;
        Ok(result.first_line())
    }

    /// Commits on `branch` not reachable from any remote ref.
    pub async fn count_unpushed(&self, branch: &str) -> Result<usize> {
        let result = Self::ok(self.run(&["log", branch, "--not", "--remotes", "--oneline"]).await?)?;
        Ok(result.count())
    }

    /// Commits on `<remote>/<branch>` not yet in `branch`.
    pub async fn count_unpulled(&self, branch: &str) -> Result<usize> {
        let range = format!("{}..{}/{}", branch, self.config.remote, branch);
        let result = Self::ok(self.run(&["log", &range, "--pretty=oneline"]).await?)?;
        Ok(result.count())
    }

    /// Same command as [`status`](Self::status), collapsed to a count.
    pub async fn count_untracked(&self) -> Result<usize> {
        Ok(self.status().await?.len())
    }

    pub async fn remote_branches(&self) -> Result<Vec<String>> {
        let result = Self::ok(self.run(&["branch", "-r"]).await?)?;
        Ok(result.lines.iter().map(|l| l.trim().to_string()).collect())
    }

    /// Switches to an existing local or trackable branch. Existence is
    /// enforced by git itself; only the name shape is validated here.
    #[instrument(skip(self))]
    pub async fn checkout(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        Self::ok(self.run(&["checkout", branch, "-q"]).await?)?;
        Ok(())
    }

    /// Creates `branch` and switches to it; fails if the name exists.
    #[instrument(skip(self))]
    pub async fn create_branch(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        Self::ok(self.run(&["checkout", "-b", branch]).await?)?;
        Ok(())
    }

    /// Resolves the committing identity from repository configuration.
    /// Fails with the distinct missing-identity error before anything is
    /// staged.
    async fn identity(&self) -> Result<(String, String)> {
        let name = self.run(&["config", "--get", "user.name"]).await?;
        let email = self.run(&["config", "--get", "user.email"]).await?;
        if !name.success
            || !email.success
            || name.first_line().is_empty()
            || email.first_line().is_empty()
        {
            return Err(AppError::MissingIdentity);
        }
        Ok((name.first_line(), email.first_line()))
    }

    /// Stages all changes, then commits them. The identity precondition
    /// runs first so a misconfigured repository is rejected before the
    /// index is touched.
    #[instrument(skip(self, intent))]
    pub async fn stage_and_commit(&self, intent: &CommitIntent) -> Result<()> {
        let (name, email) = self.identity().await?;
        let author = match &intent.author {
            Some(author) => author.clone(),
            None => format_author(&name, &email),
        };
        Self::ok(self.run(&["add", "-A"]).await?)?;
        Self::ok(
            self.run(&["commit", "-m", &intent.message, "--author", &author])
                .await?,
        )?;
        Ok(())
    }

    /// Pushes HEAD to the configured remote. For HTTPS remotes with a
    /// configured credential, the Authorization header is scoped to this
    /// single child process.
    #[instrument(skip(self))]
    pub async fn push(&self) -> Result<()> {
        let url = self.remote_url().await?;
        let config_pairs: Vec<String> = credentials::extra_header(self.config.auth.as_ref(), &url)
            .into_iter()
            .collect();
        Self::ok(
            self.run_with(&config_pairs, &["push", &self.config.remote, "HEAD", "--quiet"])
                .await?,
        )?;
        Ok(())
    }

    /// Pulls `branch` from the configured remote. Conflict policy is
    /// fixed: incoming hunks win (`-Xtheirs`).
    #[instrument(skip(self))]
    pub async fn pull(&self, branch: &str) -> Result<()> {
        Self::ok(
            self.run(&["pull", "-Xtheirs", "--quiet", &self.config.remote, branch])
                .await?,
        )?;
        Ok(())
    }

    /// Rewinds tracked content to `commit` while keeping the prior HEAD's
    /// state as pending modifications. Destructive: untracked files are
    /// cleaned as part of the first step. Each step is checked and the
    /// first failure aborts the sequence.
    #[instrument(skip(self))]
    pub async fn revert(&self, commit: &str) -> Result<()> {
        Self::ok(self.run(&["reset", "--hard", "HEAD"]).await?)?;
        Self::ok(self.run(&["clean", "-f", "-d"]).await?)?;
        Self::ok(self.run(&["reset", "--hard", commit]).await?)?;
        Self::ok(self.run(&["reset", "--soft", "HEAD@{1}"]).await?)?;
        Ok(())
    }

    /// Best-effort fetch from the configured remote; failures are logged
    /// and swallowed so a snapshot never depends on network reachability.
    pub async fn fetch(&self) {
        match self.run(&["fetch", &self.config.remote]).await {
            Ok(result) if !result.success => {
                warn!(output = %result.joined(), "fetch failed");
            }
            Err(err) => warn!(%err, "fetch could not run"),
            Ok(_) => {}
        }
    }

    /// URL of the configured remote; a failure or empty value is the
    /// distinct no-remote error.
    pub async fn remote_url(&self) -> Result<String> {
        let key = format!("remote.{}.url", self.config.remote);
        let result = self.run(&["config", "--get", &key]).await?;
        let url = result.first_line();
        if !result.success || url.is_empty() {
            return Err(AppError::NoRemote);
        }
        Ok(url)
    }

    /// Compare-view URL for the current branch on the remote host.
    pub async fn pull_request_url(&self) -> Result<String> {
        let url = self.remote_url().await?;
        let branch = self.current_branch().await?;
        Ok(compare_url(&url, &branch))
    }

    /// Full snapshot: best-effort fetch, then the current branch and the
    /// three counts. The unpulled count falls back to zero when no
    /// remote-tracking ref exists for the branch.
    #[instrument(skip(self))]
    pub async fn info(&self) -> Result<RepositoryInfo> {
        self.fetch().await;
        let branch = self.current_branch().await?;
        let count_unpushed = self.count_unpushed(&branch).await?;
        let count_untracked = self.count_untracked().await?;
        let count_unpulled = match self.count_unpulled(&branch).await {
            Ok(count) => count,
            Err(AppError::Command(_)) => 0,
            Err(err) => return Err(err),
        };
        Ok(RepositoryInfo {
            branch,
            count_unpulled,
            count_unpushed,
            count_untracked,
        })
    }
}

fn validate_branch_name(branch: &str) -> Result<()> {
    if branch.is_empty() || branch.starts_with('-') {
        return Err(AppError::Command(format!("invalid branch name: {branch:?}")));
    }
    Ok(())
}

fn format_author(name: &str, email: &str) -> String {
    format!("{name} <{email}>")
}

/// Strips a `.git` suffix from the remote URL and appends the fixed
/// compare-view path for `branch`.
fn compare_url(remote_url: &str, branch: &str) -> String {
    let base = remote_url.trim_end_matches(".git").trim_end_matches('/');
    format!("{base}/compare/{branch}")
}
