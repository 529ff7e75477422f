//! Error types for pr-squash

use crate::types::SquashStep;
use thiserror::Error;

/// Errors produced by the client, the orchestrator, and configuration
#[derive(Debug, Error)]
pub enum Error {
    /// No token configured; raised before any network call
    #[error("GitHub token not set. Run 'pr-squash auth set-token' or set GITHUB_TOKEN")]
    MissingCredential,

    /// Token failed prefix validation
    #[error("invalid token format: {0}")]
    InvalidToken(String),

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("GitHub API error: {status} - {body}")]
    RemoteRejected {
        /// HTTP method of the rejected request
        method: String,
        /// Endpoint path of the rejected request
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A workflow step failed and the workflow stopped there
    #[error("squash failed while {step}: {source}")]
    WorkflowAborted {
        /// Step that failed
        step: SquashStep,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Response or request body could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be read or written
    #[error("config error: {0}")]
    Config(String),

    /// PR reference could not be parsed
    #[error("invalid pull request reference: {0}")]
    InvalidReference(String),

    /// Another squash for the same PR is still running
    #[error("a squash for {0} is already in progress")]
    AlreadyInFlight(String),

    /// Generic platform failure
    #[error("platform error: {0}")]
    Platform(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status of the remote rejection behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejected { status, .. } => Some(*status),
            Self::WorkflowAborted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Step at which the workflow stopped, if this is a workflow failure
    pub const fn failed_step(&self) -> Option<SquashStep> {
        match self {
            Self::WorkflowAborted { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Wrap this error with the workflow step it occurred in
    #[must_use]
    pub fn at_step(self, step: SquashStep) -> Self {
        Self::WorkflowAborted {
            step,
            source: Box::new(self),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result alias for pr-squash
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16) -> Error {
        Error::RemoteRejected {
            method: "POST".to_string(),
            endpoint: "/repos/acme/widgets/pulls".to_string(),
            status,
            body: r#"{"message":"Validation Failed"}"#.to_string(),
        }
    }

    #[test]
    fn test_status_walks_through_workflow_abort() {
        let err = rejected(422).at_step(SquashStep::CreatePullRequest);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.failed_step(), Some(SquashStep::CreatePullRequest));
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let msg = rejected(422).to_string();
        assert_eq!(
            msg,
            r#"GitHub API error: 422 - {"message":"Validation Failed"}"#
        );
    }

    #[test]
    fn test_missing_credential_has_no_status() {
        assert_eq!(Error::MissingCredential.status(), None);
        assert_eq!(Error::MissingCredential.failed_step(), None);
    }
}
