//! Squash planning - pure functions for deriving names and messages
//!
//! Everything the workflow writes that is derived from the input context
//! (branch name, commit message, new PR title and body) is computed here, with
//! no I/O, so it can be shown in a dry run and unit tested directly.

use crate::types::{PullRequestContext, SquashStep};

/// Prefix of every generated branch name
pub const BRANCH_PREFIX: &str = "squashed-pr-";

/// Derived values for one squash run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquashPlan {
    /// Name of the branch that will hold the squashed commit
    pub branch_name: String,
    /// Message of the squashed commit
    pub commit_message: String,
    /// Title of the replacement PR
    pub pr_title: String,
    /// Body of the replacement PR
    pub pr_body: String,
    /// Number of the PR being replaced
    pub original_pr: u64,
    /// Head branch of the PR being replaced
    pub original_branch: String,
    /// Base branch for the replacement PR
    pub base_branch: String,
}

impl SquashPlan {
    /// One line describing what `step` will do
    pub fn describe(&self, step: SquashStep) -> String {
        match step {
            SquashStep::FetchDetails => {
                format!("Fetch head and base of PR #{}", self.original_pr)
            }
            SquashStep::FetchTree => "Fetch the tree of the head commit".to_string(),
            SquashStep::CreateBranch => format!(
                "Create branch {} at the tip of {}",
                self.branch_name, self.base_branch
            ),
            SquashStep::CreateCommit => {
                "Create one commit with the head tree on top of the base".to_string()
            }
            SquashStep::UpdateRef => format!("Point {} at the squashed commit", self.branch_name),
            SquashStep::CreatePullRequest => format!(
                "Open \"{}\" ({} -> {})",
                self.pr_title, self.branch_name, self.base_branch
            ),
            SquashStep::CloseOriginal => format!("Close PR #{}", self.original_pr),
            SquashStep::DeleteOriginalBranch => {
                format!("Delete branch {} (best-effort)", self.original_branch)
            }
        }
    }
}

/// Generated branch name: `squashed-pr-<number>-<epoch millis>`
pub fn generate_branch_name(pr_number: u64, timestamp_millis: u64) -> String {
    format!("{BRANCH_PREFIX}{pr_number}-{timestamp_millis}")
}

/// Commit message of the squashed commit
pub fn squash_commit_message(title: &str, pr_number: u64) -> String {
    format!("{title}\n\nSquashed commits from #{pr_number}")
}

/// Title of the replacement PR
pub fn squashed_pr_title(title: &str) -> String {
    format!("{title} (Squashed)")
}

/// Body of the replacement PR
pub fn squashed_pr_body(description: &str, pr_number: u64) -> String {
    format!("{description}\n\n---\n_Squashed version of #{pr_number}_")
}

/// Create the plan for squashing `ctx` at `timestamp_millis` (PURE)
pub fn create_squash_plan(ctx: &PullRequestContext, timestamp_millis: u64) -> SquashPlan {
    SquashPlan {
        branch_name: generate_branch_name(ctx.pr_number, timestamp_millis),
        commit_message: squash_commit_message(&ctx.title, ctx.pr_number),
        pr_title: squashed_pr_title(&ctx.title),
        pr_body: squashed_pr_body(&ctx.description, ctx.pr_number),
        original_pr: ctx.pr_number,
        original_branch: ctx.original_branch.clone(),
        base_branch: ctx.base_branch.clone(),
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
