use std::path::{Path, PathBuf};

use git2::{DescribeFormatOptions, DescribeOptions, ErrorCode, Repository as Git2Repo, Sort};
use tracing::{debug, info, instrument};

use crate::error::{ChangelogError, Result};
use crate::git::format_record;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the repository containing `path`
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                ChangelogError::NotARepository(path.display().to_string())
            } else {
                ChangelogError::Git(e)
            }
        })?;
        debug!(git_dir = %repo.path().display(), "opened repository");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree, `None` for bare repositories
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| ChangelogError::changelog("Cannot stage files in a bare repository"))?;

        let workdir = workdir.canonicalize()?;
        let path = path.canonicalize()?;

        path.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ChangelogError::changelog(format!(
                    "{} is outside the working tree {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn latest_tag(&self) -> Result<Option<String>> {
        if self.repo.tag_names(None)?.is_empty() {
            debug!("repository has no tags");
            return Ok(None);
        }

        let mut options = DescribeOptions::new();
        options.describe_tags();

        match self.repo.describe(&options) {
            Ok(describe) => {
                let mut format = DescribeFormatOptions::new();
                format.abbreviated_size(0);
                let tag = describe.format(Some(&format))?;
                debug!(tag = %tag, "found latest tag");
                Ok(Some(tag))
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!("no tag reachable from HEAD");
                Ok(None)
            }
            Err(e) => Err(ChangelogError::tag(format!("Cannot describe HEAD: {}", e))),
        }
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ChangelogError::tag(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        }
    }

    #[instrument(skip(self))]
    fn log(&self, since: Option<&str>) -> Result<String> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(tag) = since {
            let target = self
                .repo
                .revparse_single(&format!("refs/tags/{}", tag))
                .and_then(|object| object.peel_to_commit())
                .map_err(|e| ChangelogError::tag(format!("Cannot resolve tag '{}': {}", tag, e)))?;
            revwalk.hide(target.id())?;
        }

        let mut log = String::new();
        let mut count = 0usize;
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            let message = String::from_utf8_lossy(commit.message_bytes());
            log.push_str(&format_record(&oid.to_string(), &message));
            count += 1;
        }

        debug!(count, "collected commits");
        Ok(log)
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self.repo.find_remote(remote).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                ChangelogError::remote(format!("No remote named '{}' found", remote))
            } else {
                ChangelogError::remote(format!("Cannot find remote '{}': {}", remote, e))
            }
        })?;

        found
            .url()
            .map(str::to_string)
            .ok_or_else(|| ChangelogError::remote(format!("Remote '{}' has no URL", remote)))
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn stage(&self, path: &Path) -> Result<()> {
        let relative = self.relative_to_workdir(path)?;

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        debug!(path = %relative.display(), "staged file");
        Ok(())
    }

    #[instrument(skip(self))]
    fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        info!(hash = %oid, "created commit");
        Ok(oid.to_string())
    }

    #[instrument(skip(self, message))]
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| ChangelogError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        info!(tag = name, "created annotated tag");
        Ok(())
    }
}
