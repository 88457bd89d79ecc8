use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ChangelogError, Result};
use crate::git::{format_record, CommitInfo, Repository};

/// Side effect recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    Staged(PathBuf),
    Committed(String),
    Tagged { name: String, message: String },
}

/// Operation a [MockRepository] should fail on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    LatestTag,
    Log,
    RemoteUrl,
    Stage,
    Commit,
    Tag,
}

/// Mock repository for testing without actual git operations
///
/// Commits are held most recent first. A tag points at a commit by hash and
/// bounds the log exactly like a `tag..HEAD` range.
pub struct MockRepository {
    commits: Vec<CommitInfo>,
    tags: Vec<(String, String)>,
    remotes: Vec<(String, String)>,
    failure: Option<MockFailure>,
    actions: Mutex<Vec<MockAction>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            remotes: Vec::new(),
            failure: None,
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Add a commit on top of the existing ones (it becomes HEAD)
    pub fn add_commit(&mut self, info: CommitInfo) {
        self.commits.insert(0, info);
    }

    /// Add a tag pointing at an existing commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.tags.push((name.into(), hash.into()));
    }

    /// Configure a remote URL
    pub fn set_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.push((name.into(), url.into()));
    }

    /// Make one operation return an error
    pub fn fail_on(&mut self, failure: MockFailure) {
        self.failure = Some(failure);
    }

    /// Side effects performed so far, in order
    pub fn actions(&self) -> Vec<MockAction> {
        self.lock_actions().clone()
    }

    fn lock_actions(&self) -> std::sync::MutexGuard<'_, Vec<MockAction>> {
        self.actions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, operation: MockFailure) -> Result<()> {
        if self.failure == Some(operation) {
            return Err(ChangelogError::Git(git2::Error::from_str(&format!(
                "mock failure in {:?}",
                operation
            ))));
        }
        Ok(())
    }

    fn position_of(&self, hash: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.hash == hash)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn latest_tag(&self) -> Result<Option<String>> {
        self.check(MockFailure::LatestTag)?;
        let latest = self
            .tags
            .iter()
            .filter_map(|(name, hash)| self.position_of(hash).map(|pos| (pos, name)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, name)| name.clone());
        Ok(latest)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let recorded = self
            .lock_actions()
            .iter()
            .any(|action| matches!(action, MockAction::Tagged { name: n, .. } if n == name));
        Ok(recorded || self.tags.iter().any(|(n, _)| n == name))
    }

    fn log(&self, since: Option<&str>) -> Result<String> {
        self.check(MockFailure::Log)?;
        let end = match since {
            Some(tag) => {
                let hash = self
                    .tags
                    .iter()
                    .find(|(name, _)| name == tag)
                    .map(|(_, hash)| hash)
                    .ok_or_else(|| ChangelogError::tag(format!("Unknown tag '{}'", tag)))?;
                self.position_of(hash).unwrap_or(self.commits.len())
            }
            None => self.commits.len(),
        };

        Ok(self.commits[..end]
            .iter()
            .map(|c| format_record(&c.hash, &c.message))
            .collect())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.check(MockFailure::RemoteUrl)?;
        self.remotes
            .iter()
            .find(|(name, _)| name == remote)
            .map(|(_, url)| url.clone())
            .ok_or_else(|| ChangelogError::remote(format!("No remote named '{}' found", remote)))
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.check(MockFailure::Stage)?;
        self.lock_actions()
            .push(MockAction::Staged(path.to_path_buf()));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.check(MockFailure::Commit)?;
        self.lock_actions()
            .push(MockAction::Committed(message.to_string()));
        Ok(format!("{:040x}", self.lock_actions().len()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.check(MockFailure::Tag)?;
        self.lock_actions().push(MockAction::Tagged {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
