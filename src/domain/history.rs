use serde::{Deserialize, Serialize};

use super::commit::{Commit, CommitKind};

/// Decides whether Docs and Build commits take part in a release.
///
/// An enabled category is rendered as its own changelog section and counts
/// toward [`History::is_empty`]. Disabled categories are still collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryPolicy {
    #[serde(default)]
    pub docs: bool,

    #[serde(default)]
    pub build: bool,
}

/// Classified commits of one run, bucketed by kind in log order
#[derive(Debug, Clone, Default)]
pub struct History {
    policy: CategoryPolicy,
    features: Vec<Commit>,
    fixes: Vec<Commit>,
    breaks: Vec<Commit>,
    chores: Vec<Commit>,
    docs: Vec<Commit>,
    build: Vec<Commit>,
    invalid: Vec<Commit>,
}

impl History {
    /// Create an empty history with the canonical policy (no Docs, no Build)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CategoryPolicy) -> Self {
        History {
            policy,
            ..Self::default()
        }
    }

    /// Collect commits in the order they are yielded
    pub fn from_commits(policy: CategoryPolicy, commits: impl IntoIterator<Item = Commit>) -> Self {
        let mut history = Self::with_policy(policy);
        for commit in commits {
            history.add(commit);
        }
        history
    }

    /// Append a commit to the bucket of its kind
    pub fn add(&mut self, commit: Commit) {
        let bucket = match commit.kind {
            CommitKind::Feature => &mut self.features,
            CommitKind::Fix => &mut self.fixes,
            CommitKind::Break => &mut self.breaks,
            CommitKind::Chore => &mut self.chores,
            CommitKind::Docs => &mut self.docs,
            CommitKind::Build => &mut self.build,
            CommitKind::Invalid => &mut self.invalid,
        };
        bucket.push(commit);
    }

    /// True when nothing release-worthy was collected.
    ///
    /// Features, fixes, breaks and chores always count. Docs and Build count
    /// only when the policy enables them. Invalid commits never count.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
            && self.fixes.is_empty()
            && self.breaks.is_empty()
            && self.chores.is_empty()
            && (!self.policy.docs || self.docs.is_empty())
            && (!self.policy.build || self.build.is_empty())
    }

    /// Commits of one kind, in log order
    pub fn commits(&self, kind: CommitKind) -> &[Commit] {
        match kind {
            CommitKind::Feature => &self.features,
            CommitKind::Fix => &self.fixes,
            CommitKind::Break => &self.breaks,
            CommitKind::Chore => &self.chores,
            CommitKind::Docs => &self.docs,
            CommitKind::Build => &self.build,
            CommitKind::Invalid => &self.invalid,
        }
    }

    pub fn features(&self) -> &[Commit] {
        &self.features
    }

    pub fn fixes(&self) -> &[Commit] {
        &self.fixes
    }

    pub fn breaks(&self) -> &[Commit] {
        &self.breaks
    }

    pub fn chores(&self) -> &[Commit] {
        &self.chores
    }

    /// Commits that matched no rule; never rendered or versioned
    pub fn invalid(&self) -> &[Commit] {
        &self.invalid
    }

    pub fn policy(&self) -> CategoryPolicy {
        self.policy
    }

    /// Whether a kind takes part in rendering under the current policy
    pub fn is_released(&self, kind: CommitKind) -> bool {
        match kind {
            CommitKind::Feature | CommitKind::Fix | CommitKind::Break | CommitKind::Chore => true,
            CommitKind::Docs => self.policy.docs,
            CommitKind::Build => self.policy.build,
            CommitKind::Invalid => false,
        }
    }
}
