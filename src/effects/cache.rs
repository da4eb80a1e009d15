//! Feature cache
//!
//! Holds serialized feature representations keyed by
//! `Feature::cache_key`. Stage writes invalidate the entry of their feature.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub struct FeatureCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl FeatureCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.write().await.insert(key.into(), value);
    }

    /// Drop `key`; returns whether an entry existed. Idempotent.
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        debug!("Cache invalidate {} (present: {})", key, removed);
        removed
    }
}

impl Default for FeatureCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let cache = FeatureCache::new();
        cache.set("featureentry|1", json!({"id": 1})).await;

        assert!(cache.invalidate("featureentry|1").await);
        assert!(!cache.invalidate("featureentry|1").await);
        assert_eq!(cache.get("featureentry|1").await, None);
    }

    #[test]
    fn test_entries_are_independent() {
        let cache = FeatureCache::default();
        tokio_test::block_on(async {
            cache.set("featureentry|1", json!(1)).await;
            cache.set("featureentry|2", json!(2)).await;
            cache.invalidate("featureentry|1").await;

            assert_eq!(cache.get("featureentry|2").await, Some(json!(2)));
        });
    }
}
