//! pr-squash CLI entry point

mod cli;

use clap::{Parser, Subcommand};
use cli::squash::{SquashCommandOptions, run_squash};
use cli::style::{Stylize, cross};
use pr_squash::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pr-squash",
    version,
    about = "Squash a GitHub pull request into a single commit on a new PR"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Squash a PR into one commit, open a replacement PR and close the original
    Squash {
        /// PR URL or owner/repo#number
        pr: String,

        /// GitHub host for owner/repo#number references
        #[arg(long)]
        host: Option<String>,

        /// Show what would happen without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Delete the generated branch if the squash fails before the new PR exists
        #[arg(long)]
        cleanup_on_failure: bool,
    },
    /// Manage GitHub credentials
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Store a personal access token (prompts when omitted)
    SetToken {
        /// Token starting with ghp_ or github_pat_
        token: Option<String>,
    },
    /// Set the GitHub Enterprise host (empty string clears it)
    SetEnterpriseHost {
        /// Host name, e.g. github.example.com
        host: String,
    },
    /// Show the configured credentials
    Status,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pr_squash=debug" } else { "pr_squash=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Squash {
            pr,
            host,
            dry_run,
            yes,
            cleanup_on_failure,
        } => {
            run_squash(
                &pr,
                SquashCommandOptions {
                    host,
                    dry_run,
                    yes,
                    cleanup_on_failure,
                },
            )
            .await
        }
        Commands::Auth { action } => match action {
            AuthCommands::SetToken { token } => cli::auth::run_set_token(token),
            AuthCommands::SetEnterpriseHost { host } => cli::auth::run_set_enterprise_host(&host),
            AuthCommands::Status => cli::auth::run_status(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(error: &Error) {
    anstream::eprintln!("{} {}", cross(), error.to_string().error());
    if matches!(error, Error::WorkflowAborted { .. }) {
        anstream::eprintln!(
            "  {}",
            "Objects created before the failure may remain (see --cleanup-on-failure).".muted()
        );
    }
}
