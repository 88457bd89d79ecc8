//! Pure formatting functions for UI output.
//!
//! All user-facing text goes through here. Diagnostics go through `tracing`.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::ReleasePlan;
use crate::domain::{CommitKind, History};

/// Kinds listed in the run summary, in changelog order
const SUMMARY_KINDS: &[CommitKind] = &[
    CommitKind::Break,
    CommitKind::Fix,
    CommitKind::Feature,
    CommitKind::Chore,
    CommitKind::Docs,
    CommitKind::Build,
];

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One line per non-empty category, e.g. "  feature: 2"
pub fn format_commit_counts(history: &History) -> Vec<String> {
    SUMMARY_KINDS
        .iter()
        .filter(|kind| history.is_released(**kind))
        .filter_map(|kind| {
            let count = history.commits(*kind).len();
            (count > 0).then(|| format!("  {}: {}", kind, count))
        })
        .collect()
}

/// Display the proposed tag change (or initial tag).
///
/// # Arguments
/// * `old_tag` - Previous tag (None if this is the first release)
/// * `new_tag` - The new tag being released
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Release:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Release:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Display what a release contains: tags, bump, and commit counts
pub fn display_release_plan(plan: &ReleasePlan) {
    display_proposed_tag(plan.previous_tag.as_deref(), &plan.tag);
    println!("  Bump: {}", plan.bump);
    println!("\n{}", style("Commits:").underlined());
    for line in format_commit_counts(&plan.history) {
        println!("{}", line);
    }
}

/// Print the rendered changelog section for a dry run
pub fn display_section_preview(section: &str) {
    println!("\n{}\n", style("Changelog preview:").bold());
    print!("{}", section);
}
