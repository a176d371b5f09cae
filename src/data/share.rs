//! Share bridge
//!
//! Hands a payload captured by a redirect-based share submission over to
//! a follow-up JSON read. Entries live in memory only, expire after a TTL
//! and are consumed by the first successful read.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::models::{SharedPayload, random_hex};

/// Hex characters in a share token (64 random bits)
const TOKEN_LEN: usize = 16;

/// Process-scoped store behind the share hand-off
#[async_trait]
pub trait ShareBridge: Send + Sync {
    /// Store a payload under a fresh token and return the token
    async fn put(&self, payload: SharedPayload) -> String;

    /// Remove and return the payload stored under `token`
    async fn take(&self, token: &str) -> Option<SharedPayload>;

    /// Drop expired entries, returning how many were removed
    async fn prune_expired(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Entry {
    payload: SharedPayload,
    stored_at: Instant,
}

/// In-memory share bridge bounded by TTL and capacity
pub struct InMemoryShareBridge {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    max_entries: usize,
}

impl InMemoryShareBridge {
    /// Create a bridge
    ///
    /// # Arguments
    /// * `ttl` - How long a payload stays retrievable
    /// * `max_entries` - Capacity; the oldest entry is evicted when full
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        entry.stored_at.elapsed() >= self.ttl
    }

    fn record_size(entries: &HashMap<String, Entry>) {
        crate::metrics::SHARE_BRIDGE_ENTRIES.set(entries.len() as i64);
    }
}

#[async_trait]
impl ShareBridge for InMemoryShareBridge {
    async fn put(&self, payload: SharedPayload) -> String {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries {
            entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        }
        while entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(token, _)| token.clone());
            match oldest {
                Some(token) => {
                    entries.remove(&token);
                    tracing::debug!("Share bridge full; evicted oldest entry");
                }
                None => break,
            }
        }

        let token = loop {
            let candidate = random_hex(TOKEN_LEN);
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };

        entries.insert(
            token.clone(),
            Entry {
                payload,
                stored_at: Instant::now(),
            },
        );
        Self::record_size(&entries);

        token
    }

    async fn take(&self, token: &str) -> Option<SharedPayload> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(token);
        Self::record_size(&entries);

        entry
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.payload)
    }

    async fn prune_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        let removed = before - entries.len();
        Self::record_size(&entries);

        if removed > 0 {
            tracing::info!(removed, "Pruned expired share bridge entries");
        }

        removed
    }
}
