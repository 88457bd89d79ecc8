use crate::error::{ChangelogError, Result};
use std::fmt;

use super::history::History;

/// Marker character used when no other is configured
pub const DEFAULT_TAG_MARKER: char = 'v';

/// Three component release version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a release tag such as "v1.2.3".
    ///
    /// The first character is the marker and is dropped whatever it is. The
    /// rest must hold at least three dot-separated non-negative integers;
    /// anything after the third is ignored.
    pub fn parse_tag(tag: &str) -> Result<Self> {
        let mut chars = tag.chars();
        if chars.next().is_none() {
            return Err(ChangelogError::version("Empty tag"));
        }
        let body = chars.as_str();

        let parts: Vec<&str> = body.split('.').collect();
        if parts.len() < 3 {
            return Err(ChangelogError::version(format!(
                "Invalid version format: '{}' - expected <marker>X.Y.Z",
                tag
            )));
        }

        let major = parse_component(parts[0], "major")?;
        let minor = parse_component(parts[1], "minor")?;
        let patch = parse_component(parts[2], "patch")?;

        Ok(Version::new(major, minor, patch))
    }

    /// Lenient variant of [`Version::parse_tag`]: anything unparsable is 0.0.0
    pub fn from_tag(tag: &str) -> Self {
        Self::parse_tag(tag).unwrap_or_default()
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version::new(self.major.saturating_add(1), 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor.saturating_add(1), 0),
            VersionBump::Patch => Version::new(self.major, self.minor, self.patch.saturating_add(1)),
        }
    }

    /// Render as a tag with the given marker, e.g. "v1.2.3"
    pub fn to_tag(&self, marker: char) -> String {
        format!("{}{}", marker, self)
    }
}

fn parse_component(part: &str, name: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChangelogError::version(format!(
            "Invalid {} version: '{}'",
            name, part
        )));
    }
    part.parse::<u64>()
        .map_err(|_| ChangelogError::version(format!("Invalid {} version: '{}'", name, part)))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Pick the bump for a history. Breaks beat features, everything else is a patch.
    pub fn for_history(history: &History) -> Self {
        if !history.breaks().is_empty() {
            VersionBump::Major
        } else if !history.features().is_empty() {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => f.write_str("major"),
            VersionBump::Minor => f.write_str("minor"),
            VersionBump::Patch => f.write_str("patch"),
        }
    }
}

/// Compute the tag that follows `previous_tag`, using `marker` for the result
pub fn next_tag(previous_tag: &str, history: &History, marker: char) -> String {
    Version::from_tag(previous_tag)
        .bump(VersionBump::for_history(history))
        .to_tag(marker)
}

/// Compute the tag that follows `previous_tag` with the default "v" marker
pub fn next_version(previous_tag: &str, history: &History) -> String {
    next_tag(previous_tag, history, DEFAULT_TAG_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::{Commit, CommitKind};

    fn history_of(kinds: &[CommitKind]) -> History {
        let mut history = History::new();
        for (i, kind) in kinds.iter().enumerate() {
            history.add(Commit {
                hash: format!("{:040}", i),
                kind: *kind,
                subject: " change".to_string(),
            });
        }
        history
    }

    #[test]
    fn test_version_parse() {
        let v = Version::parse_tag("v1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_any_marker() {
        assert_eq!(Version::parse_tag("r10.0.7").unwrap(), Version::new(10, 0, 7));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse_tag("").is_err());
        assert!(Version::parse_tag("v1.2").is_err());
        assert!(Version::parse_tag("v1.x.3").is_err());
        assert!(Version::parse_tag("v1.-2.3").is_err());
        assert!(Version::parse_tag("v1..3").is_err());
    }

    #[test]
    fn test_version_parse_extra_components_ignored() {
        assert_eq!(Version::parse_tag("v1.2.3.4").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_from_tag_defaults_to_zero() {
        assert_eq!(Version::from_tag(""), Version::new(0, 0, 0));
        assert_eq!(Version::from_tag("release"), Version::new(0, 0, 0));
        assert_eq!(Version::from_tag("v1.2.beta"), Version::new(0, 0, 0));
    }

    #[test]
    fn test_version_bump() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Major), Version::new(2, 0, 0));
        assert_eq!(v.bump(VersionBump::Minor), Version::new(1, 3, 0));
        assert_eq!(v.bump(VersionBump::Patch), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::new(1, 2, 3).to_tag('v'), "v1.2.3");
    }

    #[test]
    fn test_next_version_feature() {
        let history = history_of(&[CommitKind::Feature, CommitKind::Fix]);
        assert_eq!(next_version("v1.2.3", &history), "v1.3.0");
    }

    #[test]
    fn test_next_version_break_wins() {
        let history = history_of(&[
            CommitKind::Feature,
            CommitKind::Fix,
            CommitKind::Break,
            CommitKind::Chore,
        ]);
        assert_eq!(next_version("v1.2.3", &history), "v2.0.0");
    }

    #[test]
    fn test_next_version_first_release_with_break() {
        let history = history_of(&[CommitKind::Break]);
        assert_eq!(next_version("", &history), "v1.0.0");
    }

    #[test]
    fn test_next_version_chores_only() {
        let history = history_of(&[CommitKind::Chore, CommitKind::Chore]);
        assert_eq!(next_version("v0.4.9", &history), "v0.4.10");
    }

    #[test]
    fn test_next_version_empty_history_is_patch() {
        for (tag, expected) in [
            ("v0.0.0", "v0.0.1"),
            ("v3.1.4", "v3.1.5"),
            ("v10.20.99", "v10.20.100"),
        ] {
            assert_eq!(next_version(tag, &History::new()), expected);
        }
    }

    #[test]
    fn test_next_version_docs_and_build_are_patch() {
        let history = history_of(&[CommitKind::Docs, CommitKind::Build]);
        assert_eq!(next_version("v1.0.0", &history), "v1.0.1");
    }

    #[test]
    fn test_next_version_malformed_previous_tag() {
        let history = history_of(&[CommitKind::Feature]);
        assert_eq!(next_version("not-a-version", &history), "v0.1.0");
    }

    #[test]
    fn test_next_tag_custom_marker() {
        let history = history_of(&[CommitKind::Fix]);
        assert_eq!(next_tag("r2.0.0", &history, 'r'), "r2.0.1");
    }
}
