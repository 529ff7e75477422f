//! Per-PR in-flight guard
//!
//! Rejects a second squash of the same PR while one is already running in
//! this process. The key is released when the guard drops.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Set of PR keys with a squash in progress
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<Mutex<HashSet<String>>>,
}

impl InFlightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, failing with [`Error::AlreadyInFlight`] if it is taken
    pub fn try_acquire(&self, key: &str) -> Result<InFlightGuard> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| Error::Internal("in-flight registry lock poisoned".to_string()))?;

        if !active.insert(key.to_string()) {
            debug!(key, "squash already in flight");
            return Err(Error::AlreadyInFlight(key.to_string()));
        }

        debug!(key, "claimed in-flight slot");
        Ok(InFlightGuard {
            key: key.to_string(),
            active: Arc::clone(&self.active),
        })
    }

    /// Whether `key` is currently claimed
    pub fn is_active(&self, key: &str) -> bool {
        self.active
            .lock()
            .map(|active| active.contains(key))
            .unwrap_or(false)
    }
}

/// Holds a claimed key until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    key: String,
    active: Arc<Mutex<HashSet<String>>>,
}

impl InFlightGuard {
    /// The claimed key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            active.remove(&self.key);
        }
    }
}
