//! GitHub platform service implementation

use crate::error::Result;
use crate::platform::SquashPlatform;
use crate::platform::client::ApiClient;
use crate::types::{
    NewBranch, NewPullRequest, PrState, PullRequestDetails, RepoRef, SquashedCommit,
    TreeReference,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

// REST response shapes (only the fields we read)

#[derive(Deserialize)]
struct RestPullRequest {
    number: u64,
    #[serde(default)]
    title: String,
    body: Option<String>,
    state: String,
    merged_at: Option<String>,
    #[serde(default)]
    html_url: String,
    head: RestBranchRef,
    base: RestBranchRef,
}

#[derive(Deserialize)]
struct RestBranchRef {
    #[serde(rename = "ref")]
    ref_field: String,
    sha: String,
    repo: Option<RestRepo>,
}

#[derive(Deserialize)]
struct RestRepo {
    full_name: String,
}

#[derive(Deserialize)]
struct RestCommit {
    sha: String,
    tree: RestSha,
    #[serde(default)]
    parents: Vec<RestSha>,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct RestSha {
    sha: String,
}

#[derive(Deserialize)]
struct RestRef {
    object: RestSha,
}

#[derive(Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    ref_field: &'a str,
    sha: &'a str,
}

#[derive(Serialize)]
struct CreateCommitPayload<'a> {
    message: &'a str,
    tree: &'a str,
    parents: &'a [String],
}

#[derive(Serialize)]
struct UpdateRefPayload<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Serialize)]
struct CreatePrPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

impl From<RestPullRequest> for PullRequestDetails {
    fn from(pr: RestPullRequest) -> Self {
        let state = match pr.state.as_str() {
            "open" => PrState::Open,
            _ if pr.merged_at.is_some() => PrState::Merged,
            _ => PrState::Closed,
        };
        Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            state,
            head_ref: pr.head.ref_field,
            base_ref: pr.base.ref_field,
            head_sha: pr.head.sha,
            base_sha: pr.base.sha,
            head_repo: pr.head.repo.map(|r| r.full_name),
            base_repo: pr.base.repo.map(|r| r.full_name),
            html_url: pr.html_url,
        }
    }
}

/// GitHub service bound to one repository
pub struct GitHubService {
    client: ApiClient,
    repo: RepoRef,
}

impl GitHubService {
    /// Create a new GitHub service
    pub const fn new(client: ApiClient, repo: RepoRef) -> Self {
        Self { client, repo }
    }

    /// Underlying API client
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    fn repo_path(&self, rest: &str) -> String {
        format!(
            "/repos/{}/{}/{rest}",
            urlencoding::encode(&self.repo.owner),
            urlencoding::encode(&self.repo.repo)
        )
    }

    fn branch_ref_path(&self, name: &str) -> String {
        self.repo_path(&format!("git/refs/heads/{}", encode_ref(name)))
    }
}

/// Percent-encode each `/`-separated segment of a ref name.
///
/// `#`, `%` and `?` are legal in branch names and would otherwise change
/// which ref the URL addresses.
fn encode_ref(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl SquashPlatform for GitHubService {
    fn repo(&self) -> &RepoRef {
        &self.repo
    }

    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequestDetails> {
        debug!(pr_number, "getting PR details");
        let pr: RestPullRequest = self
            .client
            .call_json(&self.repo_path(&format!("pulls/{pr_number}")), Method::GET, None)
            .await?;

        let details = PullRequestDetails::from(pr);
        debug!(
            pr_number,
            head_sha = %details.head_sha,
            base_sha = %details.base_sha,
            state = %details.state,
            "got PR details"
        );
        Ok(details)
    }

    async fn get_commit_tree(&self, sha: &str) -> Result<TreeReference> {
        debug!(sha, "getting commit tree");
        let commit: RestCommit = self
            .client
            .call_json(
                &self.repo_path(&format!("git/commits/{}", urlencoding::encode(sha))),
                Method::GET,
                None,
            )
            .await?;

        debug!(sha, tree = %commit.tree.sha, "got commit tree");
        Ok(TreeReference {
            sha: commit.tree.sha,
        })
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<NewBranch> {
        debug!(name, sha, "creating branch");
        let git_ref = format!("refs/heads/{name}");
        let payload = serde_json::to_value(CreateRefPayload {
            ref_field: &git_ref,
            sha,
        })?;

        let created: RestRef = self
            .client
            .call_json(&self.repo_path("git/refs"), Method::POST, Some(&payload))
            .await?;

        debug!(name, "created branch");
        Ok(NewBranch {
            name: name.to_string(),
            target_sha: created.object.sha,
        })
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<SquashedCommit> {
        debug!(tree, ?parents, "creating commit");
        let payload = serde_json::to_value(CreateCommitPayload {
            message,
            tree,
            parents,
        })?;

        let commit: RestCommit = self
            .client
            .call_json(&self.repo_path("git/commits"), Method::POST, Some(&payload))
            .await?;

        debug!(sha = %commit.sha, "created commit");
        Ok(SquashedCommit {
            sha: commit.sha,
            tree: commit.tree.sha,
            parents: commit.parents.into_iter().map(|p| p.sha).collect(),
            message: commit.message,
        })
    }

    async fn update_branch(&self, name: &str, sha: &str, force: bool) -> Result<NewBranch> {
        debug!(name, sha, force, "updating branch");
        let payload = serde_json::to_value(UpdateRefPayload { sha, force })?;

        let updated: RestRef = self
            .client
            .call_json(
                &self.branch_ref_path(name),
                Method::PATCH,
                Some(&payload),
            )
            .await?;

        debug!(name, "updated branch");
        Ok(NewBranch {
            name: name.to_string(),
            target_sha: updated.object.sha,
        })
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<NewPullRequest> {
        debug!(head, base, "creating PR");
        let payload = serde_json::to_value(CreatePrPayload {
            title,
            head,
            base,
            body,
        })?;

        let pr: RestPullRequest = self
            .client
            .call_json(&self.repo_path("pulls"), Method::POST, Some(&payload))
            .await?;

        debug!(pr_number = pr.number, url = %pr.html_url, "created PR");
        Ok(NewPullRequest {
            number: pr.number,
            url: pr.html_url,
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        })
    }

    async fn close_pull_request(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "closing PR");
        self.client
            .call(
                &self.repo_path(&format!("pulls/{pr_number}")),
                Method::PATCH,
                Some(&json!({ "state": "closed" })),
            )
            .await?;
        debug!(pr_number, "closed PR");
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        debug!(name, "deleting branch");
        self.client
            .call(
                &self.branch_ref_path(name),
                Method::DELETE,
                None,
            )
            .await?;
        debug!(name, "deleted branch");
        Ok(())
    }
}
