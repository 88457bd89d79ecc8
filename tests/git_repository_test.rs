// tests/git_repository_test.rs
use std::fs;
use std::path::Path;

use chrono::{Local, TimeZone};
use git2::{Oid, Repository as Git2Repo};
use git_changelog::changelog::{ChangelogStore, FileChangelogStore};
use git_changelog::cli::{ReleaseArgs, ReleaseOutcome, ReleaseWorkflow};
use git_changelog::config::Config;
use git_changelog::domain::parse_log;
use git_changelog::git::{Git2Repository, Repository};
use tempfile::TempDir;

fn init_repo(dir: &Path) -> Git2Repo {
    let repo = Git2Repo::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Release Bot").unwrap();
        config.set_str("user.email", "release@example.com").unwrap();
    }
    repo.remote("origin", "git@github.com:acme/widgets.git")
        .unwrap();
    repo
}

fn commit_file(repo: &Git2Repo, name: &str, message: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join(name), message).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .unwrap()
}

fn tag_head(repo: &Git2Repo, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.tag_lightweight(name, head.as_object(), false).unwrap();
}

#[test]
fn test_latest_tag_none_without_tags() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit_file(&raw, "a.txt", "chore: initial\n");

    let repo = Git2Repository::from_git2(raw);
    assert_eq!(repo.latest_tag().unwrap(), None);
}

#[test]
fn test_latest_tag_is_nearest_to_head() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit_file(&raw, "a.txt", "chore: initial\n");
    tag_head(&raw, "v1.0.0");
    commit_file(&raw, "b.txt", "feat: second\n");
    tag_head(&raw, "v1.1.0");
    commit_file(&raw, "c.txt", "fix: third\n");

    let repo = Git2Repository::from_git2(raw);
    assert_eq!(repo.latest_tag().unwrap().as_deref(), Some("v1.1.0"));
    assert!(repo.tag_exists("v1.0.0").unwrap());
    assert!(!repo.tag_exists("v9.9.9").unwrap());
}

#[test]
fn test_log_since_tag() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit_file(&raw, "a.txt", "chore: initial\n");
    tag_head(&raw, "v1.0.0");
    let second = commit_file(&raw, "b.txt", "feat: second\n\nLonger body text\n");
    let third = commit_file(&raw, "c.txt", "fix: third\n");

    let repo = Git2Repository::from_git2(raw);
    let commits = parse_log(&repo.log(Some("v1.0.0")).unwrap());

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].hash, third.to_string());
    assert_eq!(commits[0].subject, " third");
    assert_eq!(commits[1].hash, second.to_string());
    assert_eq!(commits[1].subject, " second");
}

#[test]
fn test_log_whole_history() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit_file(&raw, "a.txt", "chore: initial\n");
    commit_file(&raw, "b.txt", "feat: second\n");

    let repo = Git2Repository::from_git2(raw);
    assert_eq!(parse_log(&repo.log(None).unwrap()).len(), 2);
}

#[test]
fn test_log_unknown_tag_is_error() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit_file(&raw, "a.txt", "chore: initial\n");

    let repo = Git2Repository::from_git2(raw);
    assert!(repo.log(Some("v0.0.0")).is_err());
}

#[test]
fn test_remote_url() {
    let dir = TempDir::new().unwrap();
    let repo = Git2Repository::from_git2(init_repo(dir.path()));

    assert_eq!(
        repo.remote_url("origin").unwrap(),
        "git@github.com:acme/widgets.git"
    );
    assert!(repo.remote_url("upstream").is_err());
}

#[test]
fn test_discover_outside_repository() {
    let dir = TempDir::new().unwrap();
    let err = match Git2Repository::discover(dir.path()) {
        Ok(_) => panic!("expected discovery to fail"),
        Err(e) => e,
    };
    assert!(err.is_not_a_repository());
}

#[test]
fn test_full_release_commits_and_tags() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    commit_file(&raw, "a.txt", "chore: initial\n");
    tag_head(&raw, "v1.0.0");
    commit_file(&raw, "b.txt", "feat: add export\n");
    commit_file(&raw, "c.txt", "fix: handle empty rows\n");

    let repo = Git2Repository::discover(dir.path()).unwrap();
    let store = FileChangelogStore::new(repo.workdir().unwrap().join("CHANGELOG.md"));
    let config = Config::default();
    let now = Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();

    let outcome = ReleaseWorkflow::new(&repo, &store, &config)
        .run(&ReleaseArgs::default(), &now)
        .unwrap();
    let plan = match outcome {
        ReleaseOutcome::Released(plan) => plan,
        other => panic!("expected Released, got {:?}", other),
    };
    assert_eq!(plan.tag, "v1.1.0");

    let document = store.read().unwrap();
    assert!(document.starts_with(
        "## [Version v1.1.0](https://github.com/acme/widgets/releases/tag/v1.1.0) (2024-05-01 10:30)\n\n"
    ));
    assert!(document.contains("### Bug Fixes\n\n*  handle empty rows"));
    assert!(document.contains("### Features\n\n*  add export"));

    let raw = Git2Repo::open(dir.path()).unwrap();
    let head = raw.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message().map(str::trim), Some("Update CHANGELOG for v1.1.0"));
    assert!(head.tree().unwrap().get_name("CHANGELOG.md").is_some());

    let tag = raw
        .find_reference("refs/tags/v1.1.0")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert_eq!(tag.message().map(str::trim), Some("Tag for v1.1.0"));
    assert_eq!(tag.target_id(), head.id());

    // The new tag now bounds the next run.
    assert_eq!(repo.latest_tag().unwrap().as_deref(), Some("v1.1.0"));
    let again = ReleaseWorkflow::new(&repo, &store, &config)
        .run(&ReleaseArgs::default(), &now)
        .unwrap();
    assert!(matches!(again, ReleaseOutcome::NothingToRelease { .. }));
}

#[test]
fn test_dry_run_leaves_repository_untouched() {
    let dir = TempDir::new().unwrap();
    let raw = init_repo(dir.path());
    let head_before = commit_file(&raw, "a.txt", "feat: first\n");

    let repo = Git2Repository::from_git2(raw);
    let changelog = dir.path().join("CHANGELOG.md");
    let store = FileChangelogStore::new(changelog.clone());
    let config = Config::default();

    let outcome = ReleaseWorkflow::new(&repo, &store, &config)
        .run(&ReleaseArgs { dry_run: true }, &Local::now())
        .unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Planned(_)));
    assert!(!changelog.exists());
    assert!(!repo.tag_exists("v0.1.0").unwrap());

    let raw = Git2Repo::open(dir.path()).unwrap();
    assert_eq!(raw.head().unwrap().target(), Some(head_before));
}
