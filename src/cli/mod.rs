//! Release orchestration, decoupled from argument parsing

pub mod orchestration;

pub use orchestration::{ReleaseArgs, ReleaseOutcome, ReleasePlan, ReleaseWorkflow};
