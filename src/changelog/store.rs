use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, instrument};

use crate::error::{ChangelogError, Result};

/// Persistence for the changelog document
pub trait ChangelogStore {
    /// Current document content. A missing document reads as empty.
    fn read(&self) -> Result<String>;

    /// Replace the whole document
    fn write(&self, contents: &str) -> Result<()>;

    /// Location of the document, used when staging it
    fn path(&self) -> &Path;
}

/// Changelog stored as a file on disk
#[derive(Debug, Clone)]
pub struct FileChangelogStore {
    path: PathBuf,
}

impl FileChangelogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileChangelogStore { path: path.into() }
    }
}

impl ChangelogStore for FileChangelogStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!(bytes = contents.len(), "read existing changelog");
                Ok(contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no existing changelog, starting empty");
                Ok(String::new())
            }
            Err(e) => Err(ChangelogError::changelog(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    #[instrument(skip(self, contents), fields(path = %self.path.display()))]
    fn write(&self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents).map_err(|e| {
            ChangelogError::changelog(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(bytes = contents.len(), "wrote changelog");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// In-memory changelog for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryChangelogStore {
    path: PathBuf,
    contents: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryChangelogStore {
    /// A store with no document yet
    pub fn new() -> Self {
        MemoryChangelogStore {
            path: PathBuf::from("CHANGELOG.md"),
            ..Self::default()
        }
    }

    /// A store that already holds `contents`
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::new();
        *store.lock_contents() = Some(contents.into());
        store
    }

    /// Current document, `None` when never written
    pub fn contents(&self) -> Option<String> {
        self.lock_contents().clone()
    }

    /// How many times `write` was called
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_contents(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.contents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChangelogStore for MemoryChangelogStore {
    fn read(&self) -> Result<String> {
        Ok(self.lock_contents().clone().unwrap_or_default())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.lock_contents() = Some(contents.to_string());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
