//! In-memory store implementation.
//!
//! Backs tests and ad-hoc tooling with the same trait surface as the
//! on-disk store. Also carries a fault switch so callers can exercise
//! their storage-failure paths without touching the filesystem.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::RecordId;

use super::schema;
use super::{Collection, Store, StoreError, StoreResult};

/// In-memory [`Store`].
///
/// Starts at the latest schema version with every collection present and
/// empty. [`MemoryStore::poison`] flips the store into a failing state in
/// which every operation returns [`StoreError::Unavailable`].
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<i64, Value>>>,
    poisoned: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as if the backing storage had
    /// gone away.
    pub fn poison(&self) {
        self.poisoned.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.poisoned.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(std::io::Error::other(
                "store poisoned",
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_record(&self, collection: Collection, id: RecordId) -> StoreResult<Option<Value>> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|map| map.get(&id.as_i64()))
            .cloned())
    }

    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: RecordId,
    ) -> StoreResult<Vec<Value>> {
        self.check()?;
        let Some(def) = schema::index_def(collection, index) else {
            return Err(StoreError::UnknownIndex {
                collection,
                index: index.to_string(),
            });
        };

        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|map| {
                map.values()
                    .filter(|row| {
                        row.get(def.key_field)
                            .and_then(|v| serde_json::from_value::<RecordId>(v.clone()).ok())
                            == Some(key)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put(&self, collection: Collection, id: RecordId, record: Value) -> StoreResult<()> {
        self.check()?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id.as_i64(), record);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_then_get_record() {
        let store = MemoryStore::new();
        let row = json!({"id": 5, "name": "The Dutch"});

        store
            .put(Collection::Restaurants, RecordId::from(5), row.clone())
            .await
            .unwrap();

        let got = store
            .get_record(Collection::Restaurants, RecordId::from(5))
            .await
            .unwrap();
        assert_eq!(got, Some(row));
    }

    #[tokio::test]
    async fn test_empty_store_reads_cleanly() {
        let store = MemoryStore::new();

        assert!(store
            .get_record(Collection::Reviews, RecordId::from(1))
            .await
            .unwrap()
            .is_none());
        assert!(store.get_all(Collection::Reviews).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_index_filters_on_parent() {
        let store = MemoryStore::new();
        store
            .put(
                Collection::Reviews,
                RecordId::from(1),
                json!({"id": 1, "restaurant_id": 9}),
            )
            .await
            .unwrap();
        store
            .put(
                Collection::Reviews,
                RecordId::from(2),
                json!({"id": 2, "restaurant_id": "9"}),
            )
            .await
            .unwrap();
        store
            .put(
                Collection::Reviews,
                RecordId::from(3),
                json!({"id": 3, "restaurant_id": 4}),
            )
            .await
            .unwrap();

        let rows = store
            .get_by_index(Collection::Reviews, "restaurant_id", RecordId::from(9))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_index_unknown_index_is_an_error() {
        let store = MemoryStore::new();
        let err = store
            .get_by_index(Collection::Reviews, "reviewer", RecordId::from(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownIndex { .. }));
    }

    #[tokio::test]
    async fn test_poisoned_store_fails_every_operation() {
        let store = MemoryStore::new();
        store
            .put(Collection::Restaurants, RecordId::from(1), json!({"id": 1}))
            .await
            .unwrap();

        store.poison();

        assert!(matches!(
            store
                .get_record(Collection::Restaurants, RecordId::from(1))
                .await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.get_all(Collection::Restaurants).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store
                .put(Collection::Restaurants, RecordId::from(2), json!({"id": 2}))
                .await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
