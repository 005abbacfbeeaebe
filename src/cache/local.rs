use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::utils::errors::CacheError;

pub const DEFAULT_LOCAL_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone)]
struct LocalEntry {
    value: Value,
    expires_at: Instant,
}

/// In-process ephemeral cache tier, the fastest link of the chain and
/// private to one client. Values are stored as JSON so a single map serves
/// catalog pages and detail records alike. Entries expire a fixed TTL after
/// the write; an expired lookup evicts the entry eagerly. There is no
/// capacity bound.
#[derive(Debug, Clone)]
pub struct LocalCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, LocalEntry>>>,
}

impl LocalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Look up `key`. A hit past its expiry is removed and reported as a
    /// miss; an entry that no longer deserializes to `T` is also a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if Instant::now() < entry.expires_at => {
                    return serde_json::from_value(entry.value.clone()).ok();
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // Re-check under the write lock: another task may have refreshed
        // the entry between the two locks.
        if entries
            .get(key)
            .is_some_and(|entry| Instant::now() >= entry.expires_at)
        {
            entries.remove(key);
            debug!("Evicted expired local cache entry {}", key);
        }
        None
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            LocalEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }

    /// Raw presence check, ignoring expiry. Lets tests and diagnostics
    /// observe eager eviction.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_TTL)
    }
}
