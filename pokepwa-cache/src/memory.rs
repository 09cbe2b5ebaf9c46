//! In-memory implementation of the `CacheStorage` and `Cache` traits. Partitions
//! are kept in creation order so cross-partition lookups are deterministic.
use crate::{Cache, CacheError, CacheStorage, RequestKey, Response};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct InMemoryCache {
    name: String,
    entries: Mutex<HashMap<RequestKey, Response>>,
}

impl InMemoryCache {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> Result<usize, CacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &RequestKey) -> Result<Option<Response>, CacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: RequestKey, response: Response) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        debug!("Cached {} in {}", key, self.name);
        entries.insert(key, response);
        Ok(())
    }

    async fn put_all(
        &self,
        batch: Vec<(RequestKey, Response)>,
    ) -> Result<(), CacheError> {
        // Single lock so the batch lands as one unit.
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        let count = batch.len();
        entries.extend(batch);
        debug!("Cached batch of {} entries in {}", count, self.name);
        Ok(())
    }

    async fn delete(&self, key: &RequestKey) -> Result<bool, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entries.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<RequestKey>, CacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entries.keys().cloned().collect())
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("name", &self.name)
            .field("entries", &self.len().ok())
            .finish()
    }
}

#[derive(Default)]
pub struct InMemoryCacheStorage {
    partitions: Mutex<IndexMap<String, Arc<InMemoryCache>>>,
}

impl InMemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError> {
        let mut partitions = self
            .partitions
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        let cache = partitions
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Created cache partition {}", name);
                Arc::new(InMemoryCache::new(name))
            })
            .clone();
        Ok(cache)
    }

    async fn existing(&self, name: &str) -> Result<Option<Arc<dyn Cache>>, CacheError> {
        let partitions = self
            .partitions
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(partitions
            .get(name)
            .map(|cache| cache.clone() as Arc<dyn Cache>))
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        let partitions = self
            .partitions
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(partitions.contains_key(name))
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut partitions = self
            .partitions
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(partitions.shift_remove(name).is_some())
    }

    async fn names(&self) -> Result<Vec<String>, CacheError> {
        let partitions = self
            .partitions
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(partitions.keys().cloned().collect())
    }

    async fn match_any(&self, key: &RequestKey) -> Result<Option<Response>, CacheError> {
        // Listing and lookup share one lock, so a concurrent delete is either
        // fully before or fully after the search.
        let partitions = self
            .partitions
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        for cache in partitions.values() {
            let entries = cache
                .entries
                .lock()
                .map_err(|e| CacheError::Lock(e.to_string()))?;
            if let Some(response) = entries.get(key) {
                return Ok(Some(response.clone()));
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for InMemoryCacheStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .partitions
            .lock()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default();

        f.debug_struct("InMemoryCacheStorage")
            .field("partitions", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use url::Url;

    fn key(path: &str) -> RequestKey {
        RequestKey::get(Url::parse("http://localhost:3000/").unwrap().join(path).unwrap())
    }

    #[tokio::test]
    async fn test_open_creates_partition_once() {
        let storage = InMemoryCacheStorage::new();
        assert!(!storage.has("static-v1").await.unwrap());

        let first = storage.open("static-v1").await.unwrap();
        first.put(key("/"), Response::new(StatusCode::OK, "home")).await.unwrap();

        let second = storage.open("static-v1").await.unwrap();
        assert_eq!(second.keys().await.unwrap().len(), 1);
        assert_eq!(storage.names().await.unwrap(), vec!["static-v1"]);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let storage = InMemoryCacheStorage::new();
        let cache = storage.open("api-v1").await.unwrap();

        cache.put(key("/a"), Response::new(StatusCode::OK, "one")).await.unwrap();
        cache.put(key("/a"), Response::new(StatusCode::OK, "two")).await.unwrap();

        assert_eq!(cache.keys().await.unwrap().len(), 1);
        let hit = cache.get(&key("/a")).await.unwrap().unwrap();
        assert_eq!(hit.text(), "two");
    }

    #[tokio::test]
    async fn test_put_all_and_delete() {
        let storage = InMemoryCacheStorage::new();
        let cache = storage.open("static-v1").await.unwrap();
        cache
            .put_all(vec![
                (key("/"), Response::new(StatusCode::OK, "home")),
                (key("/app.js"), Response::new(StatusCode::OK, "js")),
            ])
            .await
            .unwrap();

        assert_eq!(cache.keys().await.unwrap().len(), 2);
        assert!(cache.delete(&key("/app.js")).await.unwrap());
        assert!(!cache.delete(&key("/app.js")).await.unwrap());
        assert!(cache.get(&key("/app.js")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_match_any_uses_creation_order() {
        let storage = InMemoryCacheStorage::new();
        let older = storage.open("older").await.unwrap();
        let newer = storage.open("newer").await.unwrap();
        newer.put(key("/"), Response::new(StatusCode::OK, "newer")).await.unwrap();
        older.put(key("/"), Response::new(StatusCode::OK, "older")).await.unwrap();

        let hit = storage.match_any(&key("/")).await.unwrap().unwrap();
        assert_eq!(hit.text(), "older");
        assert!(storage.match_any(&key("/missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_match_any_never_creates_partitions() {
        let storage = InMemoryCacheStorage::new();
        assert!(storage.match_any(&key("/")).await.unwrap().is_none());
        assert!(storage.names().await.unwrap().is_empty());
        assert!(storage.existing("static-v1").await.unwrap().is_none());
        assert!(!storage.has("static-v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_len_counts_entries() {
        let cache = InMemoryCache::new("static-v1");
        assert!(cache.is_empty().unwrap());
        cache.put(key("/"), Response::new(StatusCode::OK, "home")).await.unwrap();
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_partition() {
        let storage = InMemoryCacheStorage::new();
        storage.open("a").await.unwrap();
        storage.open("b").await.unwrap();
        storage.open("c").await.unwrap();

        assert!(storage.delete("b").await.unwrap());
        assert!(!storage.delete("b").await.unwrap());
        assert_eq!(storage.names().await.unwrap(), vec!["a", "c"]);
    }
}
