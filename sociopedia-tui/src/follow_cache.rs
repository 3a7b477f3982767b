use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::storage::KeyValueStore;

/// Key under which the whole follow map is stored
pub const FOLLOW_STATUS_KEY: &str = "followStatus";

/// Client-only record of which authors the viewer follows.
///
/// Nothing reconciles this with the server's follow graph, so it can drift
/// when the viewer follows or unfollows from another client.
#[derive(Clone)]
pub struct FollowStatusCache {
    store: Arc<dyn KeyValueStore>,
}

impl FollowStatusCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the stored map; a missing or unreadable value counts as empty
    pub fn load(&self) -> BTreeMap<String, bool> {
        let raw = match self.store.get(FOLLOW_STATUS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                log::warn!("Failed to read follow status cache: {}", e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Follow status cache is not valid JSON, ignoring it: {}", e);
            BTreeMap::new()
        })
    }

    pub fn is_following(&self, author_id: &str) -> bool {
        self.load().get(author_id).copied().unwrap_or(false)
    }

    /// Record the follow flag for one author, keeping every other entry
    pub fn set_following(&self, author_id: &str, following: bool) -> Result<()> {
        let mut statuses = self.load();
        statuses.insert(author_id.to_string(), following);

        let json = serde_json::to_string(&statuses)
            .context("Failed to serialize follow status cache")?;
        self.store.set(FOLLOW_STATUS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use tempfile::TempDir;

    #[test]
    fn test_unknown_author_is_not_followed() {
        let cache = FollowStatusCache::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(!cache.is_following("u2"));
    }

    #[test]
    fn test_set_following_keeps_other_authors() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let cache = FollowStatusCache::new(store.clone());

        cache.set_following("u2", true).unwrap();
        cache.set_following("u3", true).unwrap();
        cache.set_following("u2", false).unwrap();

        assert!(!cache.is_following("u2"));
        assert!(cache.is_following("u3"));
        assert_eq!(
            store.get(FOLLOW_STATUS_KEY).unwrap(),
            Some(r#"{"u2":false,"u3":true}"#.to_string())
        );
    }

    #[test]
    fn test_garbage_value_reads_as_empty() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(FOLLOW_STATUS_KEY, "null").unwrap();
        let cache = FollowStatusCache::new(store);

        assert!(cache.load().is_empty());
        cache.set_following("u2", true).unwrap();
        assert!(cache.is_following("u2"));
    }

    #[test]
    fn test_follow_status_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");

        let cache = FollowStatusCache::new(Arc::new(FileKeyValueStore::new(&path)));
        cache.set_following("u2", true).unwrap();
        drop(cache);

        let reloaded = FollowStatusCache::new(Arc::new(FileKeyValueStore::new(&path)));
        assert!(reloaded.is_following("u2"));
    }
}
