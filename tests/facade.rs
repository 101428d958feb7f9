//! Integration tests for the git façade against real scratch repositories.
//!
//! Each test builds its own repository in a temp directory with the system
//! git binary, so the tests exercise the same process-invocation path the
//! service uses in production.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use git_bridge::config::BridgeConfig;
use git_bridge::error::AppError;
use git_bridge::git::GitFacade;
use git_bridge::models::CommitIntent;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .status()
        .expect("git binary available");
    assert!(status.success(), "git {args:?} failed in {dir:?}");
}

fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git binary available");
    assert!(output.status.success(), "git {args:?} failed in {dir:?}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
}

fn commit_file(dir: &Path, name: &str, contents: &str, message: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

fn facade(dir: &Path) -> GitFacade {
    GitFacade::new(dir, BridgeConfig::default())
}

/// Adds a bare repository as `origin` and pushes the current branch.
fn add_origin(work: &Path, bare: &Path) {
    git(bare, &["init", "--bare", "-q"]);
    git(work, &["remote", "add", "origin", bare.to_str().unwrap()]);
    git(work, &["push", "-q", "origin", "HEAD"]);
}

#[tokio::test]
async fn ensure_repo_rejects_plain_directory() {
    let dir = TempDir::new().unwrap();
    let err = facade(dir.path()).ensure_repo().unwrap_err();
    assert!(matches!(err, AppError::NoRepository));
}

#[tokio::test]
async fn status_and_untracked_count_agree() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "base.txt", "base", "initial");

    for name in ["one.txt", "two.txt", "three.txt"] {
        std::fs::write(dir.path().join(name), name).unwrap();
    }

    let facade = facade(dir.path());
    let files = facade.status().await.unwrap();
    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|line| line.starts_with("??")));
    assert_eq!(facade.count_untracked().await.unwrap(), 3);
}

#[tokio::test]
async fn checkout_round_trip() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "base.txt", "base", "initial");

    let facade = facade(dir.path());
    let default = facade.current_branch().await.unwrap();

    facade.create_branch("feature-x").await.unwrap();
    assert_eq!(facade.current_branch().await.unwrap(), "feature-x");

    facade.checkout(&default).await.unwrap();
    assert_eq!(facade.current_branch().await.unwrap(), default);

    facade.checkout("feature-x").await.unwrap();
    assert_eq!(facade.current_branch().await.unwrap(), "feature-x");
}

#[tokio::test]
async fn create_branch_rejects_existing_name() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "base.txt", "base", "initial");

    let facade = facade(dir.path());
    facade.create_branch("feature-x").await.unwrap();
    let err = facade.create_branch("feature-x").await.unwrap_err();
    assert!(matches!(err, AppError::Command(_)));
}

#[tokio::test]
async fn checkout_rejects_missing_and_malformed_names() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "base.txt", "base", "initial");

    let facade = facade(dir.path());
    assert!(matches!(
        facade.checkout("no-such-branch").await.unwrap_err(),
        AppError::Command(_)
    ));
    assert!(matches!(facade.checkout("").await.unwrap_err(), AppError::Command(_)));
    assert!(matches!(
        facade.checkout("--force").await.unwrap_err(),
        AppError::Command(_)
    ));
}

#[tokio::test]
async fn commit_without_identity_fails_before_staging() {
    let dir = TempDir::new().unwrap();
    // No user.name/user.email in the repository, and global/system config
    // masked out through the child environment.
    git(dir.path(), &["init", "-q"]);
    std::fs::write(dir.path().join("draft.txt"), "draft").unwrap();

    let facade = GitFacade::new(dir.path(), BridgeConfig::default())
        .with_env("GIT_CONFIG_GLOBAL", "/dev/null")
        .with_env("GIT_CONFIG_NOSYSTEM", "1");

    let intent = CommitIntent {
        message: "should not land".into(),
        author: None,
    };
    let err = facade.stage_and_commit(&intent).await.unwrap_err();
    assert!(matches!(err, AppError::MissingIdentity));

    // Nothing was staged: the file is still untracked.
    let files = facade.status().await.unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("??"));
}

#[tokio::test]
async fn commit_stages_everything_and_records_author() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "base.txt", "base", "initial");
    std::fs::write(dir.path().join("new.txt"), "new").unwrap();

    let facade = facade(dir.path());
    facade
        .stage_and_commit(&CommitIntent {
            message: "add new file".into(),
            author: None,
        })
        .await
        .unwrap();

    assert!(facade.status().await.unwrap().is_empty());
    let author = git_stdout(dir.path(), &["log", "-1", "--pretty=%an <%ae>"]);
    assert_eq!(author, "Test User <test@example.com>");
}

#[tokio::test]
async fn revert_restores_commit_tree_with_prior_head_pending() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "file.txt", "one", "first");
    let first = git_stdout(dir.path(), &["rev-parse", "HEAD"]);
    commit_file(dir.path(), "file.txt", "two", "second");
    let second = git_stdout(dir.path(), &["rev-parse", "HEAD"]);
    std::fs::write(dir.path().join("junk.txt"), "junk").unwrap();

    let facade = facade(dir.path());
    facade.revert(&first).await.unwrap();

    // Tracked content matches the first commit, untracked junk is gone,
    // and HEAD stayed on the second commit with the difference pending.
    assert_eq!(std::fs::read_to_string(dir.path().join("file.txt")).unwrap(), "one");
    assert!(!dir.path().join("junk.txt").exists());
    assert_eq!(git_stdout(dir.path(), &["rev-parse", "HEAD"]), second);
    let pending = facade.status().await.unwrap();
    assert!(pending.iter().any(|line| line.contains("file.txt")));
}

#[tokio::test]
async fn revert_rejects_unknown_commit() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "file.txt", "one", "first");

    let facade = facade(dir.path());
    let err = facade.revert("0000000000000000000000000000000000000000").await.unwrap_err();
    assert!(matches!(err, AppError::Command(_)));
}

#[tokio::test]
async fn pull_without_remote_fails_and_leaves_tree_alone() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "file.txt", "one", "first");

    let facade = facade(dir.path());
    let branch = facade.current_branch().await.unwrap();
    match facade.pull(&branch).await.unwrap_err() {
        AppError::Command(message) => assert!(!message.is_empty()),
        other => panic!("expected command failure, got {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(dir.path().join("file.txt")).unwrap(), "one");
}

#[tokio::test]
async fn pull_fast_forwards_from_remote() {
    let work = TempDir::new().unwrap();
    let bare = TempDir::new().unwrap();
    init_repo(work.path());
    commit_file(work.path(), "file.txt", "one", "first");
    commit_file(work.path(), "file.txt", "two", "second");
    add_origin(work.path(), bare.path());

    // Rewind one commit so the local branch is behind its remote.
    git(work.path(), &["reset", "-q", "--hard", "HEAD~1"]);

    let facade = facade(work.path());
    let branch = facade.current_branch().await.unwrap();
    assert_eq!(facade.count_unpulled(&branch).await.unwrap(), 1);

    facade.pull(&branch).await.unwrap();
    assert_eq!(facade.count_unpulled(&branch).await.unwrap(), 0);
    assert_eq!(std::fs::read_to_string(work.path().join("file.txt")).unwrap(), "two");
}

#[tokio::test]
async fn info_reports_branch_and_counts() {
    let work = TempDir::new().unwrap();
    let bare = TempDir::new().unwrap();
    init_repo(work.path());
    commit_file(work.path(), "file.txt", "one", "first");
    add_origin(work.path(), bare.path());

    commit_file(work.path(), "file.txt", "two", "second");
    commit_file(work.path(), "file.txt", "three", "third");
    for name in ["a.txt", "b.txt", "c.txt"] {
        std::fs::write(work.path().join(name), name).unwrap();
    }

    let facade = facade(work.path());
    let expected_branch = facade.current_branch().await.unwrap();
    let info = facade.info().await.unwrap();
    assert_eq!(info.branch, expected_branch);
    assert_eq!(info.count_unpushed, 2);
    assert_eq!(info.count_untracked, 3);
    assert_eq!(info.count_unpulled, 0);
}

#[tokio::test]
async fn info_tolerates_missing_remote_tracking_branch() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "file.txt", "one", "first");

    // No remote at all: fetch is best-effort and the unpulled count
    // falls back to zero instead of failing the snapshot.
    let info = facade(dir.path()).info().await.unwrap();
    assert_eq!(info.count_unpulled, 0);
    assert_eq!(info.count_untracked, 0);
}

#[tokio::test]
async fn remote_branches_lists_tracking_refs() {
    let work = TempDir::new().unwrap();
    let bare = TempDir::new().unwrap();
    init_repo(work.path());
    commit_file(work.path(), "file.txt", "one", "first");
    add_origin(work.path(), bare.path());

    let facade = facade(work.path());
    let branch = facade.current_branch().await.unwrap();
    let branches = facade.remote_branches().await.unwrap();
    assert!(branches.contains(&format!("origin/{branch}")));
}

#[tokio::test]
async fn push_updates_remote() {
    let work = TempDir::new().unwrap();
    let bare = TempDir::new().unwrap();
    init_repo(work.path());
    commit_file(work.path(), "file.txt", "one", "first");
    add_origin(work.path(), bare.path());
    commit_file(work.path(), "file.txt", "two", "second");

    let facade = facade(work.path());
    let branch = facade.current_branch().await.unwrap();
    assert_eq!(facade.count_unpushed(&branch).await.unwrap(), 1);

    facade.push().await.unwrap();
    assert_eq!(facade.count_unpushed(&branch).await.unwrap(), 0);
}

#[tokio::test]
async fn remote_url_and_pull_request_url() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    commit_file(dir.path(), "file.txt", "one", "first");

    let facade = facade(dir.path());
    assert!(matches!(facade.remote_url().await.unwrap_err(), AppError::NoRemote));
    assert!(matches!(
        facade.pull_request_url().await.unwrap_err(),
        AppError::NoRemote
    ));

    git(
        dir.path(),
        &["remote", "add", "origin", "https://example.com/org/widgets.git"],
    );
    let branch = facade.current_branch().await.unwrap();
    assert_eq!(
        facade.pull_request_url().await.unwrap(),
        format!("https://example.com/org/widgets/compare/{branch}")
    );
}
