//! Squash execution - effectful operations
//!
//! Drives the fixed step sequence against the platform. Each step consumes
//! what the previous one produced, so nothing runs concurrently and the
//! order never changes. Steps up to closing the original PR abort the run on
//! failure; deleting the original branch is best-effort.

use crate::error::{Error, Result};
use crate::platform::SquashPlatform;
use crate::squash::guard::InFlightRegistry;
use crate::squash::plan::{SquashPlan, create_squash_plan, now_millis};
use crate::squash::progress::ProgressCallback;
use crate::types::{
    NewBranch, NewPullRequest, PrState, PullRequestContext, PullRequestDetails, SquashStep,
    SquashedCommit, TreeReference,
};
use tracing::{debug, info, warn};

/// Options for a squash run
#[derive(Debug, Clone, Copy, Default)]
pub struct SquashOptions {
    /// Delete the generated branch if the run fails before the new PR exists
    pub cleanup_on_failure: bool,
}

/// Result of a successful squash
#[derive(Debug, Clone)]
pub struct SquashOutcome {
    /// The replacement PR
    pub new_pull_request: NewPullRequest,
    /// The branch holding the squashed commit
    pub new_branch: NewBranch,
    /// The squashed commit
    pub commit: SquashedCommit,
    /// Whether the original branch was deleted (or was already gone)
    pub original_branch_deleted: bool,
    /// Why the original branch was left in place, if it was
    pub branch_cleanup_error: Option<String>,
}

/// Values produced so far by one invocation
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    /// Step currently running
    pub current_step: Option<SquashStep>,
    /// Steps that finished successfully
    pub completed: Vec<SquashStep>,
    /// Output of `FetchDetails`
    pub details: Option<PullRequestDetails>,
    /// Output of `FetchTree`
    pub tree: Option<TreeReference>,
    /// Output of `CreateBranch`, then `UpdateRef`
    pub branch: Option<NewBranch>,
    /// Output of `CreateCommit`
    pub commit: Option<SquashedCommit>,
    /// Output of `CreatePullRequest`
    pub new_pull_request: Option<NewPullRequest>,
}

impl WorkflowState {
    async fn begin(&mut self, step: SquashStep, progress: &dyn ProgressCallback) {
        debug!(%step, "starting step");
        self.current_step = Some(step);
        progress.on_step(step).await;
    }

    fn finish(&mut self, step: SquashStep) {
        debug!(%step, "finished step");
        self.current_step = None;
        self.completed.push(step);
    }
}

/// Squash `ctx` now (EFFECTFUL)
///
/// Plans with the current timestamp and runs the workflow.
pub async fn start_workflow(
    ctx: &PullRequestContext,
    platform: &dyn SquashPlatform,
    progress: &dyn ProgressCallback,
    options: SquashOptions,
) -> Result<SquashOutcome> {
    let plan = create_squash_plan(ctx, now_millis());
    execute_squash(ctx, &plan, platform, progress, options).await
}

/// Like [`start_workflow`], but refuses to run while another squash of the
/// same PR holds a slot in `registry`.
pub async fn start_workflow_guarded(
    registry: &InFlightRegistry,
    ctx: &PullRequestContext,
    platform: &dyn SquashPlatform,
    progress: &dyn ProgressCallback,
    options: SquashOptions,
) -> Result<SquashOutcome> {
    let _guard = registry.try_acquire(&ctx.key())?;
    start_workflow(ctx, platform, progress, options).await
}

/// Execute a squash plan (EFFECTFUL)
///
/// Returns the outcome on success. On failure the error names the step that
/// failed; objects created before it stay in place unless
/// `options.cleanup_on_failure` is set.
pub async fn execute_squash(
    ctx: &PullRequestContext,
    plan: &SquashPlan,
    platform: &dyn SquashPlatform,
    progress: &dyn ProgressCallback,
    options: SquashOptions,
) -> Result<SquashOutcome> {
    let repo = platform.repo();
    if repo.owner != ctx.owner || repo.repo != ctx.repo {
        let err = Error::InvalidReference(format!(
            "{} does not belong to {}/{}",
            ctx.key(),
            repo.owner,
            repo.repo
        ));
        progress.on_error(&err).await;
        return Err(err);
    }

    info!(pr = %ctx.key(), branch = %plan.branch_name, "squashing PR");
    let mut state = WorkflowState::default();

    match run_steps(ctx, plan, platform, progress, &mut state).await {
        Ok(outcome) => {
            info!(url = %outcome.new_pull_request.url, "squash complete");
            progress.on_complete(&outcome.new_pull_request).await;
            Ok(outcome)
        }
        Err(err) => {
            warn!(pr = %ctx.key(), error = %err, "squash failed");
            if options.cleanup_on_failure {
                compensate(&state, platform, progress).await;
            }
            progress.on_error(&err).await;
            Err(err)
        }
    }
}

async fn run_steps(
    ctx: &PullRequestContext,
    plan: &SquashPlan,
    platform: &dyn SquashPlatform,
    progress: &dyn ProgressCallback,
    state: &mut WorkflowState,
) -> Result<SquashOutcome> {
    // 1. Head and base shas
    let step = SquashStep::FetchDetails;
    state.begin(step, progress).await;
    let details = platform
        .get_pull_request(ctx.pr_number)
        .await
        .map_err(|e| e.at_step(step))?;
    if details.state != PrState::Open {
        return Err(Error::Platform(format!(
            "PR #{} is {}, only open PRs can be squashed",
            ctx.pr_number, details.state
        ))
        .at_step(step));
    }
    let base_sha = details.base_sha.clone();
    let head_sha = details.head_sha.clone();
    let same_repo = details.is_same_repo();
    state.details = Some(details);
    state.finish(step);

    // 2. Tree of the head commit
    let step = SquashStep::FetchTree;
    state.begin(step, progress).await;
    let tree = platform
        .get_commit_tree(&head_sha)
        .await
        .map_err(|e| e.at_step(step))?;
    state.tree = Some(tree.clone());
    state.finish(step);

    // 3. New branch at the base tip
    let step = SquashStep::CreateBranch;
    state.begin(step, progress).await;
    let branch = platform
        .create_branch(&plan.branch_name, &base_sha)
        .await
        .map_err(|e| e.at_step(step))?;
    state.branch = Some(branch);
    state.finish(step);

    // 4. One commit: head tree, base as the only parent
    let step = SquashStep::CreateCommit;
    state.begin(step, progress).await;
    let parents = vec![base_sha];
    let commit = platform
        .create_commit(&plan.commit_message, &tree.sha, &parents)
        .await
        .map_err(|e| e.at_step(step))?;
    state.commit = Some(commit.clone());
    state.finish(step);

    // 5. Move the new branch onto the squashed commit
    let step = SquashStep::UpdateRef;
    state.begin(step, progress).await;
    let branch = platform
        .update_branch(&plan.branch_name, &commit.sha, true)
        .await
        .map_err(|e| e.at_step(step))?;
    state.branch = Some(branch.clone());
    state.finish(step);

    // 6. Replacement PR
    let step = SquashStep::CreatePullRequest;
    state.begin(step, progress).await;
    let new_pr = platform
        .create_pull_request(
            &plan.branch_name,
            &plan.base_branch,
            &plan.pr_title,
            &plan.pr_body,
        )
        .await
        .map_err(|e| e.at_step(step))?;
    state.new_pull_request = Some(new_pr.clone());
    state.finish(step);

    // 7. Close the original only once the replacement exists
    let step = SquashStep::CloseOriginal;
    state.begin(step, progress).await;
    platform
        .close_pull_request(ctx.pr_number)
        .await
        .map_err(|e| e.at_step(step))?;
    state.finish(step);

    // 8. Original branch, best-effort
    let step = SquashStep::DeleteOriginalBranch;
    state.begin(step, progress).await;
    let (original_branch_deleted, branch_cleanup_error) = if same_repo {
        match platform.delete_branch(&plan.original_branch).await {
            Ok(()) => {
                debug!(branch = %plan.original_branch, "deleted original branch");
                (true, None)
            }
            Err(e) => {
                warn!(branch = %plan.original_branch, error = %e, "failed to delete original branch");
                progress
                    .on_warning(&format!(
                        "Could not delete branch {}: {e}",
                        plan.original_branch
                    ))
                    .await;
                (false, Some(e.to_string()))
            }
        }
    } else {
        let reason = format!(
            "branch {} lives in a fork, left in place",
            plan.original_branch
        );
        debug!(%reason, "skipping original branch deletion");
        progress.on_warning(&format!("Skipped: {reason}")).await;
        (false, Some(reason))
    };
    state.finish(step);

    Ok(SquashOutcome {
        new_pull_request: new_pr,
        new_branch: branch,
        commit,
        original_branch_deleted,
        branch_cleanup_error,
    })
}

/// Remove the generated branch after a failure, unless the new PR exists.
async fn compensate(
    state: &WorkflowState,
    platform: &dyn SquashPlatform,
    progress: &dyn ProgressCallback,
) {
    let Some(ref branch) = state.branch else {
        return;
    };
    if state.new_pull_request.is_some() {
        debug!(branch = %branch.name, "new PR exists, keeping generated branch");
        return;
    }

    debug!(branch = %branch.name, "deleting generated branch after failure");
    match platform.delete_branch(&branch.name).await {
        Ok(()) => {
            progress
                .on_message(&format!("Removed leftover branch {}", branch.name))
                .await;
        }
        Err(e) => {
            warn!(branch = %branch.name, error = %e, "failed to remove leftover branch");
            progress
                .on_warning(&format!(
                    "Could not remove leftover branch {}: {e}",
                    branch.name
                ))
                .await;
        }
    }
}
