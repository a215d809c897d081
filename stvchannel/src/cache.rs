//! Cache en mémoire des réponses de l'API SimpleTV
//!
//! Les réponses JSON brutes sont conservées avec un TTL, indexées par URL et
//! header `Authorization` : deux comptes ne partagent jamais une entrée.

use moka::future::Cache as MokaCache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// TTL par défaut (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;
/// TTL de l'annuaire des serveurs (1 heure)
pub const DIRECTORY_TTL_SECS: u64 = 3600;

const MAX_CAPACITY: u64 = 500;

/// Politique de cache d'une requête
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Listings de contenu
    Default,
    /// Annuaire des media servers
    Directory,
}

#[derive(Clone)]
pub struct ResponseCache {
    /// Cache par défaut (TTL: 5 minutes)
    default: Arc<MokaCache<String, Value>>,
    /// Cache de l'annuaire (TTL: 1 heure)
    directory: Arc<MokaCache<String, Value>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_ttls(
            Duration::from_secs(DEFAULT_TTL_SECS),
            Duration::from_secs(DIRECTORY_TTL_SECS),
        )
    }

    pub fn with_ttls(default_ttl: Duration, directory_ttl: Duration) -> Self {
        Self {
            default: Arc::new(
                MokaCache::builder()
                    .max_capacity(MAX_CAPACITY)
                    .time_to_live(default_ttl)
                    .build(),
            ),
            directory: Arc::new(
                MokaCache::builder()
                    .max_capacity(MAX_CAPACITY / 10)
                    .time_to_live(directory_ttl)
                    .build(),
            ),
        }
    }

    /// Clé de cache : URL + header d'authentification
    pub fn key(url: &str, authorization: Option<&str>) -> String {
        format!("{}|{}", url, authorization.unwrap_or_default())
    }

    fn store(&self, policy: CachePolicy) -> &MokaCache<String, Value> {
        match policy {
            CachePolicy::Default => &self.default,
            CachePolicy::Directory => &self.directory,
        }
    }

    pub async fn get(&self, policy: CachePolicy, key: &str) -> Option<Value> {
        self.store(policy).get(key).await
    }

    pub async fn put(&self, policy: CachePolicy, key: String, value: Value) {
        self.store(policy).insert(key, value).await;
    }

    /// Vide tous les caches
    pub fn clear_all(&self) {
        self.default.invalidate_all();
        self.directory.invalidate_all();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = ResponseCache::new();
        let key = ResponseCache::key("http://api/x", Some("Basic abc"));
        cache.put(CachePolicy::Default, key.clone(), json!({"a": 1})).await;

        assert_eq!(cache.get(CachePolicy::Default, &key).await, Some(json!({"a": 1})));
        assert_eq!(cache.get(CachePolicy::Directory, &key).await, None);
    }

    #[tokio::test]
    async fn test_policies_use_separate_stores() {
        let cache = ResponseCache::new();
        cache.put(CachePolicy::Directory, "k".into(), json!(1)).await;
        assert_eq!(cache.get(CachePolicy::Directory, "k").await, Some(json!(1)));
        assert_eq!(cache.get(CachePolicy::Default, "k").await, None);
    }

    #[test]
    fn test_key_includes_authorization() {
        assert_ne!(
            ResponseCache::key("http://api/x", Some("Basic a")),
            ResponseCache::key("http://api/x", Some("Basic b"))
        );
        assert_ne!(
            ResponseCache::key("http://api/x", None),
            ResponseCache::key("http://api/x", Some("Basic a"))
        );
    }

    #[tokio::test]
    async fn test_clear_all() {
        let cache = ResponseCache::new();
        cache.put(CachePolicy::Default, "a".into(), json!(1)).await;
        cache.put(CachePolicy::Directory, "b".into(), json!(2)).await;
        cache.clear_all();

        assert_eq!(cache.get(CachePolicy::Default, "a").await, None);
        assert_eq!(cache.get(CachePolicy::Directory, "b").await, None);
    }
}
