//! Progress reporting for the squash workflow

use crate::error::Error;
use crate::types::{NewPullRequest, SquashStep};
use async_trait::async_trait;

/// Receives progress notifications while a squash runs
///
/// Implementations render these however they like (spinner, log, channel).
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called right before a step starts
    async fn on_step(&self, step: SquashStep);

    /// Informational message
    async fn on_message(&self, message: &str);

    /// Something went wrong but the workflow continues
    async fn on_warning(&self, message: &str) {
        self.on_message(message).await;
    }

    /// The workflow finished and produced `pr`
    async fn on_complete(&self, pr: &NewPullRequest);

    /// The workflow stopped with `error`
    async fn on_error(&self, error: &Error);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_step(&self, _step: SquashStep) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_complete(&self, _pr: &NewPullRequest) {}
    async fn on_error(&self, _error: &Error) {}
}
