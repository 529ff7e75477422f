//! Shared command context for CLI commands
//!
//! Loads configuration, resolves credentials and builds the platform
//! service for the PR named on the command line.

use pr_squash::auth::{AuthSource, get_github_auth};
use pr_squash::config::{config_path, load_config};
use pr_squash::error::Result;
use pr_squash::platform::{
    GitHubService, create_github_service, ensure_known_host, parse_pr_reference,
};
use pr_squash::types::PullRequestRef;
use tracing::debug;

/// Shared context for commands that talk to GitHub
pub struct CommandContext {
    /// The PR the command operates on
    pub pr: PullRequestRef,
    /// Where the token came from (None if no token was found)
    pub auth_source: Option<AuthSource>,
    /// Platform service bound to the PR's repository
    pub platform: GitHubService,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// A missing token is not reported here: the first API call fails with a
    /// missing-credential error instead.
    pub async fn new(pr_input: &str, host: Option<&str>) -> Result<Self> {
        let config_path = config_path()?;
        let config = load_config(&config_path)?.with_env_overrides();

        let default_host = host.or(config.enterprise_host.as_deref());
        let pr = parse_pr_reference(pr_input, default_host)?;
        debug!(owner = %pr.repo.owner, repo = %pr.repo.repo, number = pr.number, host = ?pr.repo.host, "resolved PR reference");

        // Before auth: an unknown host must not even get a token looked up
        ensure_known_host(&config, pr.repo.host.as_deref())?;

        let auth = get_github_auth(&config, pr.repo.host.as_deref()).await.ok();
        let auth_source = auth.as_ref().map(|a| a.source);

        let platform = create_github_service(
            config,
            auth.map(|a| a.token),
            pr.repo.clone(),
        )?;

        Ok(Self {
            pr,
            auth_source,
            platform,
        })
    }
}
