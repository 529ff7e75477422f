//! Squash command - replace a PR with a single-commit copy

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, hyperlink};
use anstream::println;
use dialoguer::Confirm;
use pr_squash::error::{Error, Result};
use pr_squash::platform::fetch_context;
use pr_squash::squash::{
    SquashOptions, SquashOutcome, SquashPlan, create_squash_plan, execute_squash, now_millis,
};
use pr_squash::types::{PullRequestContext, SquashStep};

/// Options for the squash command
#[derive(Debug, Clone, Default)]
pub struct SquashCommandOptions {
    /// Host for `owner/repo#N` references
    pub host: Option<String>,
    /// Show the plan without touching the remote
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub yes: bool,
    /// Delete the generated branch if the run fails before the new PR exists
    pub cleanup_on_failure: bool,
}

/// Run the squash command
#[allow(clippy::future_not_send)]
pub async fn run_squash(pr_input: &str, options: SquashCommandOptions) -> Result<()> {
    let ctx = CommandContext::new(pr_input, options.host.as_deref()).await?;
    if let Some(source) = ctx.auth_source {
        tracing::debug!(%source, "using GitHub token");
    }

    // Capture the input once; the workflow never re-reads it
    let progress = CliProgress::start(&format!("Reading PR #{}...", ctx.pr.number));
    let fetched = fetch_context(&ctx.platform, ctx.pr.number).await;
    progress.finish_and_clear();
    let context = fetched?;

    let plan = create_squash_plan(&context, now_millis());

    if options.dry_run {
        report_plan(&context, &plan);
        println!("{}", "Run without --dry-run to execute.".muted());
        return Ok(());
    }

    if !options.yes {
        report_plan(&context, &plan);
        if !Confirm::new()
            .with_prompt(format!("Squash PR #{}?", context.pr_number))
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let squash_options = SquashOptions {
        cleanup_on_failure: options.cleanup_on_failure,
    };
    let progress = CliProgress::start("Starting...");
    let outcome = execute_squash(
        &context,
        &plan,
        &ctx.platform,
        &progress,
        squash_options,
    )
    .await?;

    print_summary(&context, &outcome);
    Ok(())
}

/// Print what the squash will do
fn report_plan(context: &PullRequestContext, plan: &SquashPlan) {
    println!(
        "{} PR #{}: {}",
        "Squash plan for".emphasis(),
        context.pr_number,
        context.title.accent()
    );
    println!(
        "   {} {} {} {}",
        context.original_branch.accent(),
        "->".muted(),
        plan.branch_name.accent(),
        format!("(onto {})", context.base_branch).muted()
    );
    println!();
    for (i, step) in SquashStep::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, plan.describe(*step));
    }
    println!();
}

/// Print the result of a successful squash
fn print_summary(context: &PullRequestContext, outcome: &SquashOutcome) {
    let pr = &outcome.new_pull_request;
    println!();
    println!(
        "{} Squashed PR #{} into #{}",
        check(),
        context.pr_number,
        pr.number.to_string().accent()
    );
    println!("   {}", hyperlink(&pr.url, &pr.url));
    println!(
        "   {} {}",
        "Branch:".muted(),
        outcome.new_branch.name.accent()
    );

    if outcome.original_branch_deleted {
        println!(
            "   {} {}",
            "Deleted:".muted(),
            context.original_branch.muted()
        );
    } else if let Some(ref reason) = outcome.branch_cleanup_error {
        println!(
            "   {} {}",
            "⚠ Original branch kept:".warn(),
            reason.muted()
        );
    }
}
