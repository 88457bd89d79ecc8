//! Changelog document handling
//!
//! - `render` - Markdown sections for a [`History`](crate::domain::History)
//! - `store` - Reading and replacing the changelog document
//! - This module - Release header and document composition

pub mod render;
pub mod store;

pub use render::{render, render_commit, short_hash, RepoLinks, DEFAULT_HOST, SHORT_HASH_LEN};
pub use store::{ChangelogStore, FileChangelogStore, MemoryChangelogStore};

/// Heading line for a new release, followed by a blank line.
///
/// # Example
/// ```ignore
/// let header = render_release_header("v1.3.0", &RepoLinks::github("acme/widgets"), "2024-05-01 10:30");
/// // "## [Version v1.3.0](https://github.com/acme/widgets/releases/tag/v1.3.0) (2024-05-01 10:30)\n\n"
/// ```
pub fn render_release_header(tag: &str, links: &RepoLinks, timestamp: &str) -> String {
    format!(
        "## [Version {}]({}) ({})\n\n",
        tag,
        links.release_url(tag),
        timestamp
    )
}

/// New document: header, rendered sections, a blank line, then the previous content verbatim
pub fn compose(header: &str, sections: &str, previous: &str) -> String {
    let mut out = String::with_capacity(header.len() + sections.len() + previous.len() + 1);
    out.push_str(header);
    out.push_str(sections);
    out.push('\n');
    out.push_str(previous);
    out
}
