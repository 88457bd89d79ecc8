//! Markdown rendering of a [`History`].

use std::fmt::Write;

use crate::domain::{Commit, CommitKind, History};

/// Number of hash characters shown in a bullet
pub const SHORT_HASH_LEN: usize = 6;

/// Hosting service used when none is configured
pub const DEFAULT_HOST: &str = "https://github.com";

/// Section order and headings. Docs and Build only appear when enabled.
const SECTIONS: &[(CommitKind, &str)] = &[
    (CommitKind::Break, "Breaking Changes"),
    (CommitKind::Fix, "Bug Fixes"),
    (CommitKind::Feature, "Features"),
    (CommitKind::Chore, "Chores"),
    (CommitKind::Docs, "Documentation"),
    (CommitKind::Build, "Build System"),
];

/// Where commit and release pages of a repository live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLinks {
    host: String,
    identity: String,
}

impl RepoLinks {
    /// `host` is a base URL such as "https://github.com"; `identity` is "owner/name"
    pub fn new(host: impl Into<String>, identity: impl Into<String>) -> Self {
        let host = host.into();
        RepoLinks {
            host: host.trim_end_matches('/').to_string(),
            identity: identity.into(),
        }
    }

    pub fn github(identity: impl Into<String>) -> Self {
        Self::new(DEFAULT_HOST, identity)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn commit_url(&self, hash: &str) -> String {
        format!("{}/{}/commit/{}", self.host, self.identity, hash)
    }

    pub fn release_url(&self, tag: &str) -> String {
        format!("{}/{}/releases/tag/{}", self.host, self.identity, tag)
    }
}

/// First [`SHORT_HASH_LEN`] characters of a hash, or all of it when shorter
pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(SHORT_HASH_LEN) {
        Some((end, _)) => &hash[..end],
        None => hash,
    }
}

/// One bullet line, newline included. The subject is written verbatim, so the
/// space after the prefix colon carries through.
pub fn render_commit(commit: &Commit, links: &RepoLinks) -> String {
    format!(
        "* {} ([{}]({}))\n",
        commit.subject,
        short_hash(&commit.hash),
        links.commit_url(&commit.hash)
    )
}

/// Render every non-empty released category as a level-3 section.
///
/// Each section is the heading, a blank line, one bullet per commit in log
/// order, then a blank line. Empty categories produce nothing.
pub fn render(history: &History, links: &RepoLinks) -> String {
    let mut out = String::new();

    for (kind, heading) in SECTIONS {
        if !history.is_released(*kind) {
            continue;
        }
        let commits = history.commits(*kind);
        if commits.is_empty() {
            continue;
        }

        let _ = write!(out, "### {}\n\n", heading);
        for commit in commits {
            out.push_str(&render_commit(commit, links));
        }
        out.push('\n');
    }

    out
}
