//! GitHub token resolution

use super::AuthSource;
use crate::config::SquashConfig;
use crate::error::{Error, Result};
use tracing::debug;

/// Env vars checked for a token, in order
const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Bearer token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a token from env vars and the stored config, without shelling out.
///
/// Order: `GITHUB_TOKEN`, `GH_TOKEN`, then the config file.
pub fn resolve_token(config: &SquashConfig) -> Option<GitHubAuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var, "using token from environment");
            return Some(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    config.token.as_ref().map(|token| {
        debug!("using token from config file");
        GitHubAuthConfig {
            token: token.clone(),
            source: AuthSource::Config,
        }
    })
}

/// Get GitHub authentication for `host` (None = github.com).
///
/// Falls back to `gh auth token --hostname <host>` when neither the
/// environment nor the config holds a token.
pub async fn get_github_auth(config: &SquashConfig, host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(auth) = resolve_token(config) {
        return Ok(auth);
    }

    let host = host.unwrap_or("github.com");
    debug!(host, "trying gh auth token");
    let output = tokio::process::Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if token.is_empty() {
                return Err(Error::MissingCredential);
            }
            debug!(host, "using token from gh CLI");
            Ok(GitHubAuthConfig {
                token,
                source: AuthSource::Cli,
            })
        }
        Ok(output) => {
            debug!(status = %output.status, "gh auth token returned non-success");
            Err(Error::MissingCredential)
        }
        Err(e) => {
            debug!(error = %e, "gh CLI not available");
            Err(Error::MissingCredential)
        }
    }
}
