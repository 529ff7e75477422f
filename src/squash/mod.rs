//! Squash engine for a single pull request
//!
//! Two-phase pattern:
//! 1. Plan - derive branch name, commit message and PR texts (pure, testable)
//! 2. Execute - run the remote step sequence (effectful)

mod execute;
mod guard;
mod plan;
mod progress;

pub use execute::{
    SquashOptions, SquashOutcome, WorkflowState, execute_squash, start_workflow,
    start_workflow_guarded,
};
pub use guard::{InFlightGuard, InFlightRegistry};
pub use plan::{
    BRANCH_PREFIX, SquashPlan, create_squash_plan, generate_branch_name, now_millis,
    squash_commit_message, squashed_pr_body, squashed_pr_title,
};
pub use progress::{NoopProgress, ProgressCallback};
