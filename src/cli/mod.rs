//! CLI commands and progress rendering

pub mod auth;
pub mod context;
pub mod squash;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use pr_squash::error::Error;
use pr_squash::squash::ProgressCallback;
use pr_squash::types::{NewPullRequest, SquashStep};
use std::time::Duration;
use style::{Stylize, check, cross, spinner_style};

/// Spinner-based progress output for the squash workflow
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner with an initial message
    pub fn start(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Remove the spinner line
    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step(&self, step: SquashStep) {
        self.spinner.set_message(step.label().to_string());
    }

    async fn on_message(&self, message: &str) {
        self.spinner.println(format!("  {}", message.muted()));
    }

    async fn on_warning(&self, message: &str) {
        self.spinner.println(format!("  {} {}", "⚠".warn(), message.warn()));
    }

    async fn on_complete(&self, pr: &NewPullRequest) {
        self.spinner.finish_with_message(format!(
            "{} Created PR #{}",
            check(),
            pr.number.to_string().accent()
        ));
    }

    async fn on_error(&self, error: &Error) {
        let step = error
            .failed_step()
            .map_or_else(|| "Squash failed".to_string(), |s| format!("Failed while {s}"));
        self.spinner
            .abandon_with_message(format!("{} {}", cross(), step.error()));
    }
}
