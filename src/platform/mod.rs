//! Platform services for GitHub
//!
//! Provides the typed operations the squash workflow needs, on top of a
//! plain JSON request client.

mod client;
mod detection;
mod github;

pub use client::{ApiClient, PUBLIC_API_BASE, interpret_response};
pub use detection::parse_pr_reference;
pub use github::GitHubService;

use crate::config::SquashConfig;
use crate::error::{Error, Result};
use crate::types::{
    NewBranch, NewPullRequest, PullRequestContext, PullRequestDetails, RepoRef, SquashedCommit,
    TreeReference,
};
use async_trait::async_trait;

/// Platform service trait for the git-data and pull request operations
///
/// One instance is bound to a single repository. Every method maps to one
/// remote request; none of them retry.
#[async_trait]
pub trait SquashPlatform: Send + Sync {
    /// Repository this service operates on
    fn repo(&self) -> &RepoRef;

    /// Fetch PR details including head and base shas
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequestDetails>;

    /// Fetch the tree of a commit
    async fn get_commit_tree(&self, sha: &str) -> Result<TreeReference>;

    /// Create `refs/heads/<name>` pointing at `sha`
    async fn create_branch(&self, name: &str, sha: &str) -> Result<NewBranch>;

    /// Create a commit object from a tree and parents
    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<SquashedCommit>;

    /// Move `refs/heads/<name>` to `sha`
    async fn update_branch(&self, name: &str, sha: &str, force: bool) -> Result<NewBranch>;

    /// Open a pull request
    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<NewPullRequest>;

    /// Close a pull request without merging
    async fn close_pull_request(&self, pr_number: u64) -> Result<()>;

    /// Delete `refs/heads/<name>`; an already missing branch is not an error
    async fn delete_branch(&self, name: &str) -> Result<()>;
}

/// Check that requests for `host` have a known API to go to.
///
/// `None` is github.com. Any other host must be the configured enterprise
/// host; otherwise its token would be sent to the public API.
pub fn ensure_known_host(config: &SquashConfig, host: Option<&str>) -> Result<()> {
    match host {
        Some(host) if !config.is_enterprise_host(host) => Err(Error::Config(format!(
            "unknown GitHub host '{host}'. Run 'pr-squash auth set-enterprise-host {host}' \
             if it is a GitHub Enterprise server"
        ))),
        _ => Ok(()),
    }
}

/// Build a GitHub service for `repo` with the given configuration and token.
///
/// Fails if `repo.host` is neither github.com nor the enterprise host.
pub fn create_github_service(
    config: SquashConfig,
    token: Option<String>,
    repo: RepoRef,
) -> Result<GitHubService> {
    ensure_known_host(&config, repo.host.as_deref())?;
    let client = ApiClient::new(config, token, repo.host.clone())?;
    Ok(GitHubService::new(client, repo))
}

/// Capture the squash input for a PR from its current remote state.
///
/// This is the one read that happens before the workflow starts; the
/// workflow itself never re-reads title, branches or description.
pub async fn fetch_context(
    platform: &dyn SquashPlatform,
    pr_number: u64,
) -> Result<PullRequestContext> {
    let details = platform.get_pull_request(pr_number).await?;
    let repo = platform.repo();

    Ok(PullRequestContext {
        owner: repo.owner.clone(),
        repo: repo.repo.clone(),
        pr_number: details.number,
        original_branch: details.head_ref,
        title: details.title.trim().to_string(),
        base_branch: details.base_ref,
        description: details.body.unwrap_or_default().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_on(host: Option<&str>) -> RepoRef {
        RepoRef {
            owner: "team".to_string(),
            repo: "svc".to_string(),
            host: host.map(String::from),
        }
    }

    #[test]
    fn test_unknown_host_is_rejected() {
        let result = create_github_service(
            SquashConfig::default(),
            Some("ghp_abcdefghijkl".to_string()),
            repo_on(Some("ghe.corp.example")),
        );

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("set-enterprise-host"), "got: {msg}"),
            Err(other) => panic!("Expected Config error, got: {other:?}"),
            Ok(_) => panic!("Expected unknown host to be rejected"),
        }
    }

    #[test]
    fn test_enterprise_host_uses_its_own_api() {
        let mut config = SquashConfig::default();
        config.set_enterprise_host("ghe.corp.example");

        let service = create_github_service(config, None, repo_on(Some("GHE.corp.example"))).unwrap();
        assert_eq!(service.client().api_base(), "https://ghe.corp.example/api/v3");
    }

    #[test]
    fn test_public_host_is_accepted() {
        let service = create_github_service(SquashConfig::default(), None, repo_on(None)).unwrap();
        assert_eq!(service.client().api_base(), PUBLIC_API_BASE);
    }
}
