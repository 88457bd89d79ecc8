//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod history;
pub mod version;

pub use commit::{parse_log, Commit, CommitKind, RECORD_DELIMITER};
pub use history::{CategoryPolicy, History};
pub use version::{next_tag, next_version, Version, VersionBump, DEFAULT_TAG_MARKER};
