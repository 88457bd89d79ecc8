use std::fmt;

/// Non-fatal conditions found while preparing a release.
/// These are reported to the user but do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Previous tag exists but cannot be parsed, so versioning restarts at 0.0.0
    UnparsableTag { tag: String, reason: String },
    /// Commits whose subject has no recognised prefix were left out
    UnclassifiedCommits { count: usize, first_hash: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(
                    f,
                    "Cannot parse tag '{}': {} (versioning from 0.0.0)",
                    tag, reason
                )
            }
            BoundaryWarning::UnclassifiedCommits { count, first_hash } => {
                let short_hash = first_hash.get(..7).unwrap_or(first_hash);
                write!(
                    f,
                    "Skipped {} commit(s) without a recognised prefix (first: {})",
                    count, short_hash
                )
            }
        }
    }
}
