use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::{EngineError, Result};
use crate::providers::AffinityBackend;

/// A user's historical preference for one hashtag. Incremented on every
/// post save; wiped only by an explicit personalization reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagAffinity {
    pub tag: String,
    pub usage_count: u32,
    pub last_used_at: i64,
    pub category: String,
}

type UserAffinityMap = HashMap<String, HashMap<String, HashtagAffinity>>;

/// File-backed `AffinityBackend`: one JSON document keyed by user id,
/// written atomically via a tmp-file rename.
pub struct JsonAffinityStore {
    path: PathBuf,
    users: RwLock<UserAffinityMap>,
}

impl JsonAffinityStore {
    pub async fn open(path: PathBuf) -> Result<Self> {
        let users = if path.exists() {
            let data = tokio::fs::read_to_string(&path).await.map_err(|err| {
                EngineError::PersistenceFailure(format!("failed to read affinity store: {}", err))
            })?;
            if data.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&data).map_err(|err| {
                    EngineError::PersistenceFailure(format!(
                        "failed to parse affinity store: {}",
                        err
                    ))
                })?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    async fn persist(&self, users: &UserAffinityMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(users).map_err(|err| {
            EngineError::PersistenceFailure(format!("failed to serialize affinity store: {}", err))
        })?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload).await.map_err(|err| {
            EngineError::PersistenceFailure(format!("failed to write affinity store: {}", err))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|err| {
            EngineError::PersistenceFailure(format!("failed to finalize affinity store: {}", err))
        })?;
        Ok(())
    }
}

#[async_trait]
impl AffinityBackend for JsonAffinityStore {
    async fn load(&self, user_id: &str) -> Result<HashMap<String, HashtagAffinity>> {
        let guard = self.users.read().await;
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    async fn save(&self, user_id: &str, map: HashMap<String, HashtagAffinity>) -> Result<()> {
        let mut guard = self.users.write().await;
        guard.insert(user_id.to_string(), map);
        self.persist(&guard).await
    }
}

async fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path).await.map_err(|err| {
        EngineError::PersistenceFailure(format!("failed to create affinity dir: {}", err))
    })
}
