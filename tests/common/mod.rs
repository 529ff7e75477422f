//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{Call, MockSquashPlatform};

use async_trait::async_trait;
use pr_squash::error::Error;
use pr_squash::squash::ProgressCallback;
use pr_squash::types::{
    NewPullRequest, PrState, PullRequestContext, PullRequestDetails, RepoRef, SquashStep,
};
use std::sync::Mutex;

/// `acme/widgets` on github.com
pub fn acme_repo() -> RepoRef {
    RepoRef {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

/// PR #42 of `acme/widgets`, `feature/widgets` into `main`
pub fn acme_context() -> PullRequestContext {
    PullRequestContext {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        pr_number: 42,
        original_branch: "feature/widgets".to_string(),
        title: "Add widgets".to_string(),
        base_branch: "main".to_string(),
        description: "Adds the widget module.".to_string(),
    }
}

/// Open same-repo PR #42 with head `aaa` and base `bbb`
pub fn acme_details() -> PullRequestDetails {
    PullRequestDetails {
        number: 42,
        title: "Add widgets".to_string(),
        body: Some("Adds the widget module.".to_string()),
        state: PrState::Open,
        head_ref: "feature/widgets".to_string(),
        base_ref: "main".to_string(),
        head_sha: "aaa".to_string(),
        base_sha: "bbb".to_string(),
        head_repo: Some("acme/widgets".to_string()),
        base_repo: Some("acme/widgets".to_string()),
        html_url: "https://github.com/acme/widgets/pull/42".to_string(),
    }
}

/// Mock platform preloaded with [`acme_details`]
pub fn acme_platform() -> MockSquashPlatform {
    MockSquashPlatform::new(acme_repo(), acme_details())
}

/// Progress events as seen by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Step(SquashStep),
    Message(String),
    Warning(String),
    Complete(String),
    Error(String),
}

/// Progress callback that records every event
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<Event>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<SquashStep> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Step(step) => Some(step),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Warning(w) => Some(w),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_step(&self, step: SquashStep) {
        self.events.lock().unwrap().push(Event::Step(step));
    }

    async fn on_message(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Message(message.to_string()));
    }

    async fn on_warning(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Warning(message.to_string()));
    }

    async fn on_complete(&self, pr: &NewPullRequest) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Complete(pr.url.clone()));
    }

    async fn on_error(&self, error: &Error) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Error(error.to_string()));
    }
}
