use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::changelog::DEFAULT_HOST;
use crate::domain::{CategoryPolicy, DEFAULT_TAG_MARKER};
use crate::error::{ChangelogError, Result};

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "changelog.toml";

/// Represents the complete configuration for git-changelog.
///
/// Contains the changelog document settings, release naming and messages,
/// and which optional categories take part in a release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub categories: CategoryPolicy,
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

/// Where the changelog lives and how its release headers look
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    /// Document path, relative to the root of the working tree
    #[serde(default = "default_changelog_path")]
    pub path: String,

    /// chrono format string for the release header timestamp
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
            date_format: default_date_format(),
        }
    }
}

fn default_tag_marker() -> char {
    DEFAULT_TAG_MARKER
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_commit_message() -> String {
    "Update CHANGELOG for {tag}".to_string()
}

fn default_tag_message() -> String {
    "Tag for {tag}".to_string()
}

/// Release tag naming, links and messages.
///
/// `{tag}` in either message is replaced by the new tag.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_marker")]
    pub tag_marker: char,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,

    /// Abort instead of warning when the previous tag cannot be parsed
    #[serde(default)]
    pub strict_tags: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_marker: default_tag_marker(),
            remote: default_remote(),
            host: default_host(),
            commit_message: default_commit_message(),
            tag_message: default_tag_message(),
            strict_tags: false,
        }
    }
}

impl ReleaseConfig {
    pub fn commit_message_for(&self, tag: &str) -> String {
        self.commit_message.replace("{tag}", tag)
    }

    pub fn tag_message_for(&self, tag: &str) -> String {
        self.tag_message.replace("{tag}", tag)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `changelog.toml` in current directory
/// 3. `.changelog.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        read_config_file(Path::new(CONFIG_FILE_NAME))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| ChangelogError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ChangelogError::config(format!("Cannot read {}: {}", path.display(), e)))
}
