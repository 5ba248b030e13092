use std::collections::HashMap;
use std::hash::Hash;
use crate::error::{AuditError, Result};
use super::judge::basename;

/// A loading event that arrived before the response it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Early {
    Finished,
    Failed(String),
}

/// Request-id bookkeeping for candidate scripts during a live session.
///
/// Response, finish and failure notifications arrive on independent streams
/// and may be observed in any order. Every candidate that shows up must end
/// in a fetched body; anything else is an error.
#[derive(Debug)]
pub struct ScriptTracker<K> {
    pending: HashMap<K, String>,
    early: HashMap<K, Early>,
}

impl<K: Hash + Eq + Clone> Default for ScriptTracker<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            early: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> ScriptTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a response. Returns the URL when the body is already complete
    /// and can be fetched now.
    pub fn on_response(&mut self, id: K, url: &str, candidate: bool) -> Result<Option<String>> {
        let early = self.early.remove(&id);
        if !candidate {
            return Ok(None);
        }

        match early {
            Some(Early::Finished) => Ok(Some(url.to_string())),
            Some(Early::Failed(reason)) => Err(unverified(url, &reason)),
            None => {
                self.pending.insert(id, url.to_string());
                Ok(None)
            }
        }
    }

    /// Records a finished load. Returns the URL when it belongs to a tracked
    /// candidate whose body should be fetched now.
    pub fn on_finished(&mut self, id: K) -> Option<String> {
        match self.pending.remove(&id) {
            Some(url) => Some(url),
            None => {
                self.early.insert(id, Early::Finished);
                None
            }
        }
    }

    /// Records a failed load. A tracked candidate that failed can never be
    /// verified.
    pub fn on_failed(&mut self, id: K, reason: &str) -> Result<()> {
        match self.pending.remove(&id) {
            Some(url) => Err(unverified(&url, reason)),
            None => {
                self.early.insert(id, Early::Failed(reason.to_string()));
                Ok(())
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Fails on the first (by URL) candidate whose body never arrived.
    pub fn ensure_resolved(&self, reason: &str) -> Result<()> {
        match self.pending.values().min() {
            Some(url) => Err(unverified(url, reason)),
            None => Ok(()),
        }
    }
}

fn unverified(url: &str, reason: &str) -> AuditError {
    AuditError::UnverifiedAsset {
        name: basename(url).unwrap_or_else(|| url.to_string()),
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
