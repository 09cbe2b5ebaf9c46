use crate::{CacheError, RequestKey, Response};
use async_trait::async_trait;
use std::sync::Arc;

/// A single named cache partition.
///
/// Every operation is atomic on its own; read-then-write sequences are not.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Name the partition was opened under.
    fn name(&self) -> &str;

    /// Look up a stored response by request identity.
    async fn get(&self, key: &RequestKey) -> Result<Option<Response>, CacheError>;

    /// Store a response, overwriting any previous entry for the same identity.
    async fn put(&self, key: RequestKey, response: Response) -> Result<(), CacheError>;

    /// Store a batch of responses.
    async fn put_all(
        &self,
        entries: Vec<(RequestKey, Response)>,
    ) -> Result<(), CacheError> {
        for (key, response) in entries {
            self.put(key, response).await?;
        }
        Ok(())
    }

    /// Remove an entry; `false` if nothing was stored under that identity.
    async fn delete(&self, key: &RequestKey) -> Result<bool, CacheError>;

    /// All request identities currently stored.
    async fn keys(&self) -> Result<Vec<RequestKey>, CacheError>;
}

/// The partitioned store: opens, lists and deletes named partitions.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a partition, creating it when it does not exist yet.
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError>;

    /// Open a partition only if it already exists. Never creates one.
    async fn existing(&self, name: &str) -> Result<Option<Arc<dyn Cache>>, CacheError>;

    async fn has(&self, name: &str) -> Result<bool, CacheError>;

    /// Delete a whole partition; `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;

    /// Names of all existing partitions, in creation order.
    async fn names(&self) -> Result<Vec<String>, CacheError>;

    /// Look the identity up in every partition, in creation order, and return
    /// the first hit. Partitions deleted after the listing are skipped.
    async fn match_any(&self, key: &RequestKey) -> Result<Option<Response>, CacheError> {
        for name in self.names().await? {
            let Some(cache) = self.existing(&name).await? else {
                continue;
            };
            if let Some(response) = cache.get(key).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}
