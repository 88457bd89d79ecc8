use thiserror::Error;

/// Unified error type for git-changelog operations
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Not in a git repository: {0}")]
    NotARepository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-changelog
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangelogError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ChangelogError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ChangelogError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ChangelogError::Remote(msg.into())
    }

    /// Create a changelog document error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ChangelogError::Changelog(msg.into())
    }

    /// True when the error means no repository was found at all
    pub fn is_not_a_repository(&self) -> bool {
        matches!(self, ChangelogError::NotARepository(_))
    }
}
