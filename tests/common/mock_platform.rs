//! In-memory `SquashPlatform` that records every call in order

#![allow(dead_code)]

use async_trait::async_trait;
use pr_squash::error::{Error, Result};
use pr_squash::platform::SquashPlatform;
use pr_squash::types::{
    NewBranch, NewPullRequest, PullRequestDetails, RepoRef, SquashStep, SquashedCommit,
    TreeReference,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded platform call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetPullRequest(u64),
    GetCommitTree(String),
    CreateBranch {
        name: String,
        sha: String,
    },
    CreateCommit {
        message: String,
        tree: String,
        parents: Vec<String>,
    },
    UpdateBranch {
        name: String,
        sha: String,
        force: bool,
    },
    CreatePullRequest {
        head: String,
        base: String,
        title: String,
        body: String,
    },
    ClosePullRequest(u64),
    DeleteBranch(String),
}

impl Call {
    /// The workflow step this call belongs to
    pub const fn step(&self) -> SquashStep {
        match self {
            Self::GetPullRequest(_) => SquashStep::FetchDetails,
            Self::GetCommitTree(_) => SquashStep::FetchTree,
            Self::CreateBranch { .. } => SquashStep::CreateBranch,
            Self::CreateCommit { .. } => SquashStep::CreateCommit,
            Self::UpdateBranch { .. } => SquashStep::UpdateRef,
            Self::CreatePullRequest { .. } => SquashStep::CreatePullRequest,
            Self::ClosePullRequest(_) => SquashStep::CloseOriginal,
            Self::DeleteBranch(_) => SquashStep::DeleteOriginalBranch,
        }
    }
}

/// Injected failure for a step
#[derive(Debug, Clone)]
enum Failure {
    Rejected { status: u16, body: String },
    Message(String),
}

impl Failure {
    fn to_error(&self, step: SquashStep) -> Error {
        match self {
            Self::Rejected { status, body } => Error::RemoteRejected {
                method: "MOCK".to_string(),
                endpoint: format!("{step:?}"),
                status: *status,
                body: body.clone(),
            },
            Self::Message(msg) => Error::Platform(msg.clone()),
        }
    }
}

/// Simple mock platform service for testing
///
/// Features:
/// - Ordered call recording for sequence verification
/// - Configurable PR details, tree, commit and PR responses
/// - Error injection per workflow step
pub struct MockSquashPlatform {
    repo: RepoRef,
    details: Mutex<PullRequestDetails>,
    tree_sha: Mutex<String>,
    commit_sha: Mutex<String>,
    new_pr_number: Mutex<u64>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<SquashStep, Failure>>,
}

impl MockSquashPlatform {
    /// Create a mock for `repo` answering with `details`
    pub fn new(repo: RepoRef, details: PullRequestDetails) -> Self {
        Self {
            repo,
            details: Mutex::new(details),
            tree_sha: Mutex::new("ccc".to_string()),
            commit_sha: Mutex::new("ddd".to_string()),
            new_pr_number: Mutex::new(57),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    // === Response setup ===

    /// Tree sha returned for any commit
    pub fn set_tree_sha(&self, sha: &str) {
        *self.tree_sha.lock().unwrap() = sha.to_string();
    }

    /// Sha returned for the created commit
    pub fn set_commit_sha(&self, sha: &str) {
        *self.commit_sha.lock().unwrap() = sha.to_string();
    }

    /// Replace the PR details
    pub fn set_details(&self, details: PullRequestDetails) {
        *self.details.lock().unwrap() = details;
    }

    // === Error injection methods ===

    /// Make `step` fail with an HTTP rejection
    pub fn reject_at(&self, step: SquashStep, status: u16, body: &str) {
        self.failures.lock().unwrap().insert(
            step,
            Failure::Rejected {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Make `step` fail with a platform error
    pub fn fail_at(&self, step: SquashStep, msg: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(step, Failure::Message(msg.to_string()));
    }

    fn record(&self, call: Call) -> Result<()> {
        let step = call.step();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&step) {
            Some(failure) => Err(failure.to_error(step)),
            None => Ok(()),
        }
    }

    // === Call verification methods ===

    /// All calls in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Steps of all calls in order
    pub fn call_steps(&self) -> Vec<SquashStep> {
        self.calls().iter().map(Call::step).collect()
    }

    /// Number of calls made for `step`
    pub fn count(&self, step: SquashStep) -> usize {
        self.calls().iter().filter(|c| c.step() == step).count()
    }

    /// Assert that no call was made for `step`
    pub fn assert_not_called(&self, step: SquashStep) {
        let calls = self.calls();
        assert!(
            !calls.iter().any(|c| c.step() == step),
            "Expected no {step:?} call but got: {calls:?}"
        );
    }

    /// The recorded `CreateCommit` call
    pub fn commit_call(&self) -> Option<(String, String, Vec<String>)> {
        self.calls().into_iter().find_map(|c| match c {
            Call::CreateCommit {
                message,
                tree,
                parents,
            } => Some((message, tree, parents)),
            _ => None,
        })
    }

    /// Name of the branch created by `CreateBranch`
    pub fn created_branch(&self) -> Option<String> {
        self.calls().into_iter().find_map(|c| match c {
            Call::CreateBranch { name, .. } => Some(name),
            _ => None,
        })
    }

    /// Names passed to `delete_branch`
    pub fn deleted_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteBranch(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SquashPlatform for MockSquashPlatform {
    fn repo(&self) -> &RepoRef {
        &self.repo
    }

    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequestDetails> {
        self.record(Call::GetPullRequest(pr_number))?;
        Ok(self.details.lock().unwrap().clone())
    }

    async fn get_commit_tree(&self, sha: &str) -> Result<TreeReference> {
        self.record(Call::GetCommitTree(sha.to_string()))?;
        Ok(TreeReference {
            sha: self.tree_sha.lock().unwrap().clone(),
        })
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<NewBranch> {
        self.record(Call::CreateBranch {
            name: name.to_string(),
            sha: sha.to_string(),
        })?;
        Ok(NewBranch {
            name: name.to_string(),
            target_sha: sha.to_string(),
        })
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<SquashedCommit> {
        self.record(Call::CreateCommit {
            message: message.to_string(),
            tree: tree.to_string(),
            parents: parents.to_vec(),
        })?;
        Ok(SquashedCommit {
            sha: self.commit_sha.lock().unwrap().clone(),
            tree: tree.to_string(),
            parents: parents.to_vec(),
            message: message.to_string(),
        })
    }

    async fn update_branch(&self, name: &str, sha: &str, force: bool) -> Result<NewBranch> {
        self.record(Call::UpdateBranch {
            name: name.to_string(),
            sha: sha.to_string(),
            force,
        })?;
        Ok(NewBranch {
            name: name.to_string(),
            target_sha: sha.to_string(),
        })
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<NewPullRequest> {
        self.record(Call::CreatePullRequest {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        })?;
        let number = *self.new_pr_number.lock().unwrap();
        Ok(NewPullRequest {
            number,
            url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.repo.owner, self.repo.repo
            ),
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        })
    }

    async fn close_pull_request(&self, pr_number: u64) -> Result<()> {
        self.record(Call::ClosePullRequest(pr_number))
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteBranch(name.to_string()))
    }
}
