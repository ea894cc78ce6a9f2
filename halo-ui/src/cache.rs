//! Passage cache
//!
//! Keyed by `translation:book:chapter`. Each entry is a small status machine
//! (`loading -> success | error`); `ensure` enforces at most one in-flight
//! load per key. Entries are never evicted: the keyspace is bounded at
//! translations x 1189 chapters. An LRU bound would be the first hardening
//! step if that ever changes.

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;
use tokio::sync::RwLock;

use halo_common::api::types::PassageResponse;

/// Composite cache key for one chapter under one translation
pub fn cache_key(translation: &str, book: &str, chapter: u32) -> String {
    format!("{}:{}:{}", translation, book, chapter)
}

/// Per-key entry state
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PassageStatus {
    Loading,
    Success {
        #[serde(flatten)]
        passage: PassageResponse,
    },
    Error {
        error: String,
    },
}

impl PassageStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, PassageStatus::Success { .. })
    }
}

/// In-memory passage cache shared across handlers
#[derive(Default)]
pub struct PassageCache {
    entries: RwLock<HashMap<String, PassageStatus>>,
}

impl PassageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry for a key, if any
    pub async fn get(&self, key: &str) -> Option<PassageStatus> {
        self.entries.read().await.get(key).cloned()
    }

    /// Load a key if it is absent or in error state.
    ///
    /// The loader runs only when this call claims the key; a second `ensure`
    /// for a key already `loading` or `success` is a no-op that returns the
    /// existing entry. An errored key is re-triggered (user-driven retry,
    /// no automatic backoff).
    pub async fn ensure<F, Fut>(&self, key: &str, loader: F) -> PassageStatus
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PassageResponse, String>>,
    {
        {
            let mut entries = self.entries.write().await;
            match entries.get(key) {
                Some(entry @ PassageStatus::Loading) | Some(entry @ PassageStatus::Success { .. }) => {
                    return entry.clone();
                }
                _ => {
                    entries.insert(key.to_string(), PassageStatus::Loading);
                }
            }
        }

        let status = match loader().await {
            Ok(passage) => PassageStatus::Success { passage },
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Passage load failed");
                PassageStatus::Error { error }
            }
        };

        self.entries
            .write()
            .await
            .insert(key.to_string(), status.clone());
        status
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
