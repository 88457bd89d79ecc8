//! Main release workflow
//!
//! Drives one release run: find the previous release, classify the commits
//! since then, compute the next tag, render the changelog, and hand the
//! result to the repository. Every read and computation finishes before the
//! first write.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::changelog::{self, ChangelogStore, RepoLinks};
use crate::config::Config;
use crate::domain::{next_tag, parse_log, History, Version, VersionBump};
use crate::error::{ChangelogError, Result};
use crate::git::{repository_identity, Repository};

/// Arguments for the release workflow
///
/// Mirrors the CLI flags that affect the run itself, so the workflow can be
/// called programmatically without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Compute and report the release without writing anything
    pub dry_run: bool,
}

/// Everything computed for a release before any side effect
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub previous_tag: Option<String>,
    pub tag: String,
    pub bump: VersionBump,
    pub history: History,
    /// Rendered sections for this release only
    pub section: String,
    /// Full new changelog document
    pub document: String,
    pub commit_message: String,
    pub tag_message: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a release run
#[derive(Debug, Clone)]
pub enum ReleaseOutcome {
    /// No release-worthy commits since the previous tag
    NothingToRelease {
        previous_tag: Option<String>,
        warnings: Vec<BoundaryWarning>,
    },
    /// Dry run: the plan was computed but nothing was written
    Planned(ReleasePlan),
    /// Changelog written, committed and tagged
    Released(ReleasePlan),
}

/// One release run against a repository and a changelog store
pub struct ReleaseWorkflow<'a, R: Repository, S: ChangelogStore> {
    repo: &'a R,
    store: &'a S,
    config: &'a Config,
}

impl<'a, R: Repository, S: ChangelogStore> ReleaseWorkflow<'a, R, S> {
    pub fn new(repo: &'a R, store: &'a S, config: &'a Config) -> Self {
        ReleaseWorkflow {
            repo,
            store,
            config,
        }
    }

    /// Run the workflow with `now` as the release timestamp
    pub fn run(&self, args: &ReleaseArgs, now: &DateTime<Local>) -> Result<ReleaseOutcome> {
        let plan = match self.plan(now)? {
            ReleaseOutcome::Planned(plan) => plan,
            other => return Ok(other),
        };

        if args.dry_run {
            info!(tag = %plan.tag, "dry run, nothing written");
            return Ok(ReleaseOutcome::Planned(plan));
        }

        self.apply(&plan)?;
        Ok(ReleaseOutcome::Released(plan))
    }

    /// Compute the release without side effects.
    ///
    /// Returns [`ReleaseOutcome::Planned`] or [`ReleaseOutcome::NothingToRelease`].
    pub fn plan(&self, now: &DateTime<Local>) -> Result<ReleaseOutcome> {
        let release = &self.config.release;

        let url = self.repo.remote_url(&release.remote)?;
        let identity = repository_identity(&url).ok_or_else(|| {
            ChangelogError::remote(format!(
                "Cannot determine repository name from '{}' URL '{}'",
                release.remote, url
            ))
        })?;
        debug!(identity = %identity, "resolved repository identity");

        let previous_content = self.store.read()?;
        let timestamp = format_timestamp(now, &self.config.changelog.date_format)?;

        let previous_tag = self.repo.latest_tag()?;
        let log = self.repo.log(previous_tag.as_deref())?;
        let history = History::from_commits(self.config.categories, parse_log(&log));

        let mut warnings = Vec::new();
        if let Some(first) = history.invalid().first() {
            debug!(
                count = history.invalid().len(),
                "ignoring commits without a recognised prefix"
            );
            warnings.push(BoundaryWarning::UnclassifiedCommits {
                count: history.invalid().len(),
                first_hash: first.hash.clone(),
            });
        }

        if history.is_empty() {
            info!(
                previous = previous_tag.as_deref().unwrap_or("none"),
                "no changes to be recorded"
            );
            return Ok(ReleaseOutcome::NothingToRelease {
                previous_tag,
                warnings,
            });
        }

        if let Some(tag) = previous_tag.as_deref() {
            if let Err(e) = Version::parse_tag(tag) {
                if release.strict_tags {
                    return Err(ChangelogError::version(format!(
                        "Previous tag '{}' is not a version: {}",
                        tag, e
                    )));
                }
                warn!(tag, error = %e, "previous tag is not a version, starting from 0.0.0");
                warnings.insert(
                    0,
                    BoundaryWarning::UnparsableTag {
                        tag: tag.to_string(),
                        reason: e.to_string(),
                    },
                );
            }
        }

        let bump = VersionBump::for_history(&history);
        let tag = next_tag(
            previous_tag.as_deref().unwrap_or(""),
            &history,
            release.tag_marker,
        );
        if self.repo.tag_exists(&tag)? {
            return Err(ChangelogError::tag(format!("Tag '{}' already exists", tag)));
        }

        let links = RepoLinks::new(release.host.as_str(), identity);
        let section = changelog::render(&history, &links);
        let header = changelog::render_release_header(&tag, &links, &timestamp);
        let document = changelog::compose(&header, &section, &previous_content);

        info!(
            previous = previous_tag.as_deref().unwrap_or("none"),
            tag = %tag,
            bump = %bump,
            "computed release"
        );

        Ok(ReleaseOutcome::Planned(ReleasePlan {
            previous_tag,
            commit_message: release.commit_message_for(&tag),
            tag_message: release.tag_message_for(&tag),
            tag,
            bump,
            history,
            section,
            document,
            warnings,
        }))
    }

    /// Write the document, commit it and tag the commit
    pub fn apply(&self, plan: &ReleasePlan) -> Result<()> {
        self.store.write(&plan.document)?;
        self.repo.stage(self.store.path())?;
        self.repo.commit(&plan.commit_message)?;
        self.repo
            .create_annotated_tag(&plan.tag, &plan.tag_message)?;

        info!(tag = %plan.tag, "release recorded");
        Ok(())
    }
}

/// Format `now` with a chrono format string, rejecting invalid formats
pub fn format_timestamp(now: &DateTime<Local>, format: &str) -> Result<String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ChangelogError::config(format!(
            "Invalid date format '{}'",
            format
        )));
    }
    Ok(now.format(format).to_string())
}
