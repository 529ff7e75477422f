//! pr-squash - squash a GitHub pull request into one commit
//!
//! Collapses a PR's history into a single commit on a fresh branch, opens a
//! replacement PR with the same title and description, closes the original
//! and deletes its branch.
//!
//! # Architecture
//!
//! - [`platform`]: typed GitHub operations over a plain JSON request client
//! - [`squash`]: the ordered workflow, its failure policy and progress events
//! - [`config`] and [`auth`]: explicit configuration injected at construction
//!
//! All I/O is async and state is passed explicitly (no globals).

pub mod auth;
pub mod config;
pub mod error;
pub mod platform;
pub mod squash;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
