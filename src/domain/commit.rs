use std::fmt;

/// Separator written after every record by the log source.
///
/// Chosen so that it cannot plausibly appear inside a real commit message.
pub const RECORD_DELIMITER: &str = "-----DELIMITER-----";

/// Category a commit is assigned to, based on its message prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitKind {
    Feature,
    Fix,
    Break,
    Chore,
    Docs,
    Build,
    Invalid,
}

/// Ordered prefix table. The first matching prefix wins.
const PREFIX_RULES: &[(&str, CommitKind)] = &[
    ("feature", CommitKind::Feature),
    ("feat", CommitKind::Feature),
    ("chore", CommitKind::Chore),
    ("fix", CommitKind::Fix),
    ("break", CommitKind::Break),
    ("docs", CommitKind::Docs),
    ("build", CommitKind::Build),
];

impl CommitKind {
    /// Classify a prefix candidate (the text before the first colon).
    ///
    /// Matching is a case-insensitive prefix test, so `feat`, `Feature` and
    /// `feature(api)` are all features and `fixes` is a fix.
    pub fn from_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim().to_lowercase();
        PREFIX_RULES
            .iter()
            .find(|(rule, _)| prefix.starts_with(rule))
            .map(|(_, kind)| *kind)
            .unwrap_or(CommitKind::Invalid)
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitKind::Feature => "feature",
            CommitKind::Fix => "fix",
            CommitKind::Break => "break",
            CommitKind::Chore => "chore",
            CommitKind::Docs => "docs",
            CommitKind::Build => "build",
            CommitKind::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// One classified change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub kind: CommitKind,
    /// Everything after the first colon of the subject line, untrimmed
    pub subject: String,
}

impl Commit {
    /// Classify one raw record (hash line followed by the full message).
    ///
    /// Returns `None` only when the record has no message at all. A message
    /// whose subject line has no colon or an unknown prefix comes back as
    /// [`CommitKind::Invalid`] with the whole subject line kept for diagnostics.
    pub fn classify(record: &str) -> Option<Self> {
        let mut lines = record.trim().lines();
        let hash = lines.next()?;
        // Remaining lines after the subject are body text and are ignored.
        let subject_line = lines.next()?;

        let commit = match subject_line.split_once(':') {
            Some((prefix, subject)) => Commit {
                hash: hash.to_string(),
                kind: CommitKind::from_prefix(prefix),
                subject: subject.to_string(),
            },
            None => Commit {
                hash: hash.to_string(),
                kind: CommitKind::Invalid,
                subject: subject_line.to_string(),
            },
        };

        Some(commit)
    }

    /// Parse one raw record, rejecting anything that is not a recognised kind
    pub fn parse(record: &str) -> Option<Self> {
        Self::classify(record).filter(|commit| commit.kind != CommitKind::Invalid)
    }

    pub fn is_valid(&self) -> bool {
        self.kind != CommitKind::Invalid
    }
}

/// Split a delimited log into classified commits, keeping log order.
///
/// Empty fragments (such as the one after the final delimiter) are dropped.
/// Invalid commits are kept so the caller can report them.
pub fn parse_log(log: &str) -> Vec<Commit> {
    log.split(RECORD_DELIMITER)
        .filter_map(Commit::classify)
        .collect()
}
