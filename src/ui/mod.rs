//! User interface module.
//!
//! - `formatter` - Pure formatting and printing
//! - This module - Reporting a finished run

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_proposed_tag, display_release_plan,
    display_section_preview, display_status, display_success, format_commit_counts,
};

use crate::cli::ReleaseOutcome;

/// Message printed when there is nothing to release
pub const NOTHING_TO_RELEASE: &str = "No changes to be recorded";

/// Print the result of a release run
pub fn report_outcome(outcome: &ReleaseOutcome) {
    match outcome {
        ReleaseOutcome::NothingToRelease {
            previous_tag,
            warnings,
        } => {
            for warning in warnings {
                display_boundary_warning(warning);
            }
            match previous_tag {
                Some(tag) => display_status(&format!("{} since {}", NOTHING_TO_RELEASE, tag)),
                None => display_status(NOTHING_TO_RELEASE),
            }
        }
        ReleaseOutcome::Planned(plan) => {
            for warning in &plan.warnings {
                display_boundary_warning(warning);
            }
            display_release_plan(plan);
            display_section_preview(&plan.section);
            display_status(&format!("Dry run: {} was not written or tagged", plan.tag));
        }
        ReleaseOutcome::Released(plan) => {
            for warning in &plan.warnings {
                display_boundary_warning(warning);
            }
            display_release_plan(plan);
            display_success(&format!("Updated changelog and tagged {}", plan.tag));
        }
    }
}
