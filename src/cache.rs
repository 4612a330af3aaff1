use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

struct CacheEntry {
    payload: serde_json::Value,
    written_at: Instant,
    ttl: Duration,
    version: String,
}

/// TTL-keyed cache with versioned invalidation. Payload serialization is
/// owned here so callers never hand-roll hit/miss/TTL logic.
pub struct ScoreCache<T> {
    version: String,
    entries: RwLock<HashMap<String, CacheEntry>>,
    fill_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    _payload: PhantomData<fn() -> T>,
}

enum Verdict<T> {
    Hit(T),
    Stale(&'static str),
    Miss,
}

impl<T: Serialize + DeserializeOwned> ScoreCache<T> {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            entries: RwLock::new(HashMap::new()),
            fill_locks: Mutex::new(HashMap::new()),
            _payload: PhantomData,
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        let verdict = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => Verdict::Miss,
                Some(entry) if entry.version != self.version => Verdict::Stale("version mismatch"),
                Some(entry) if entry.written_at.elapsed() >= entry.ttl => Verdict::Stale("expired"),
                Some(entry) => match serde_json::from_value(entry.payload.clone()) {
                    Ok(value) => Verdict::Hit(value),
                    Err(err) => {
                        warn!(
                            "{}",
                            EngineError::CacheCorrupt(format!("key {}: {}", key, err))
                        );
                        Verdict::Stale("corrupt payload")
                    }
                },
            }
        };

        match verdict {
            Verdict::Hit(value) => Some(value),
            Verdict::Stale(reason) => {
                debug!("evicting cache entry {} ({})", key, reason);
                self.entries.write().await.remove(key);
                None
            }
            Verdict::Miss => None,
        }
    }

    pub async fn set(&self, key: &str, value: &T, ttl: Duration) {
        let version = self.version.clone();
        self.set_with_version(key, value, ttl, &version).await;
    }

    /// Plants an entry under an explicit version tag, as an older build
    /// would have written it.
    pub async fn set_with_version(&self, key: &str, value: &T, ttl: Duration, version: &str) {
        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("failed to serialize cache entry {}: {}", key, err);
                return;
            }
        };
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                written_at: Instant::now(),
                ttl,
                version: version.to_string(),
            },
        );
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(prefix));
    }

    pub async fn age_minutes(&self, key: &str) -> Option<i64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .map(|entry| entry.written_at.elapsed().as_secs() as i64 / 60)
    }

    /// At-most-one concurrent fill per key: later callers wait on the key
    /// lock and re-check the cache instead of recomputing.
    pub async fn get_or_fill<F, Fut>(&self, key: &str, ttl: Duration, fill: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let lock = {
            let mut locks = self.fill_locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = lock.lock().await;

        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = fill().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }
}
