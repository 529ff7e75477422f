//! Authentication for GitHub
//!
//! Supports environment variables, the stored config token, and the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, resolve_token};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token stored in the pr-squash config file
    Config,
    /// Token from the `gh` CLI
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar => write!(f, "environment variable"),
            Self::Config => write!(f, "config file"),
            Self::Cli => write!(f, "gh CLI"),
        }
    }
}
