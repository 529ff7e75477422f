//! Core types for pr-squash

use serde::{Deserialize, Serialize};

/// The pull request to squash, as supplied by the caller
///
/// Captured once before the workflow starts and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestContext {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub pr_number: u64,
    /// Head branch of the PR
    pub original_branch: String,
    /// PR title
    pub title: String,
    /// Base branch the PR targets
    pub base_branch: String,
    /// PR description (may be empty)
    pub description: String,
}

impl PullRequestContext {
    /// Key identifying this PR across invocations (`owner/repo#number`)
    pub fn key(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.pr_number)
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Remote PR details fetched at the start of the workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body, if any
    pub body: Option<String>,
    /// Current state
    pub state: PrState,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// Sha of the PR's head commit
    pub head_sha: String,
    /// Sha of the base branch tip
    pub base_sha: String,
    /// `owner/repo` of the head branch (None when the fork was deleted)
    pub head_repo: Option<String>,
    /// `owner/repo` of the base branch
    pub base_repo: Option<String>,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequestDetails {
    /// Whether the head branch lives in the same repository as the base
    pub fn is_same_repo(&self) -> bool {
        match (&self.head_repo, &self.base_repo) {
            (Some(head), Some(base)) => head.eq_ignore_ascii_case(base),
            // Without repository info assume a same-repo branch
            (None, None) => true,
            _ => false,
        }
    }
}

/// Tree snapshot at the PR's head commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeReference {
    /// Tree sha
    pub sha: String,
}

/// Branch created to hold the squashed commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBranch {
    /// Branch name (without `refs/heads/`)
    pub name: String,
    /// Sha the branch currently points at
    pub target_sha: String,
}

/// The synthetic commit carrying the PR's final tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquashedCommit {
    /// Commit sha
    pub sha: String,
    /// Tree sha (equal to the PR head tree)
    pub tree: String,
    /// Parent shas (exactly one: the base tip)
    pub parents: Vec<String>,
    /// Commit message
    pub message: String,
}

/// The replacement pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPullRequest {
    /// PR number
    pub number: u64,
    /// Web URL
    pub url: String,
    /// Head branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// Title
    pub title: String,
    /// Body
    pub body: String,
}

/// One step of the squash workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SquashStep {
    /// Fetch head and base shas of the PR
    FetchDetails,
    /// Fetch the tree of the head commit
    FetchTree,
    /// Create the new branch at the base sha
    CreateBranch,
    /// Create the squashed commit
    CreateCommit,
    /// Point the new branch at the squashed commit
    UpdateRef,
    /// Open the replacement PR
    CreatePullRequest,
    /// Close the original PR
    CloseOriginal,
    /// Delete the original head branch (best-effort)
    DeleteOriginalBranch,
}

impl SquashStep {
    /// All steps in execution order
    pub const ALL: [Self; 8] = [
        Self::FetchDetails,
        Self::FetchTree,
        Self::CreateBranch,
        Self::CreateCommit,
        Self::UpdateRef,
        Self::CreatePullRequest,
        Self::CloseOriginal,
        Self::DeleteOriginalBranch,
    ];

    /// Human-readable progress label
    pub const fn label(self) -> &'static str {
        match self {
            Self::FetchDetails => "Getting PR details...",
            Self::FetchTree => "Getting tree...",
            Self::CreateBranch => "Creating new branch...",
            Self::CreateCommit => "Creating squashed commit...",
            Self::UpdateRef => "Updating branch...",
            Self::CreatePullRequest => "Creating new PR...",
            Self::CloseOriginal => "Closing original PR...",
            Self::DeleteOriginalBranch => "Cleaning up...",
        }
    }

    /// Whether a failure in this step fails the whole workflow
    pub const fn is_best_effort(self) -> bool {
        matches!(self, Self::DeleteOriginalBranch)
    }
}

impl std::fmt::Display for SquashStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchDetails => write!(f, "fetching PR details"),
            Self::FetchTree => write!(f, "fetching head tree"),
            Self::CreateBranch => write!(f, "creating branch"),
            Self::CreateCommit => write!(f, "creating squashed commit"),
            Self::UpdateRef => write!(f, "updating branch ref"),
            Self::CreatePullRequest => write!(f, "creating pull request"),
            Self::CloseOriginal => write!(f, "closing original PR"),
            Self::DeleteOriginalBranch => write!(f, "deleting original branch"),
        }
    }
}

/// Repository coordinates plus the web host the PR lives on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Web host (None for github.com)
    pub host: Option<String>,
}

/// A parsed reference to a single PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository the PR belongs to
    pub repo: RepoRef,
    /// PR number
    pub number: u64,
}
