//! Cache gateway: typed reads and conflict-resolved writes.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::RecordId;
use crate::store::{Store, StoreResult};

use super::{CacheRecord, IndexedRecord};

/// Typed gateway over a [`Store`].
///
/// Cheap to clone; every clone shares the underlying store. All writes go
/// through the conflict policy in [`CacheGateway::put_records`].
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn Store>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Write a batch of records, resolving conflicts per record.
    ///
    /// A record is written when the cache has no copy under its id, when
    /// `force` is set, or when its `updated_at` is strictly newer than the
    /// cached copy's. Equal timestamps keep the cached copy, which makes
    /// re-caching the same snapshot a no-op.
    ///
    /// Records are decided and written independently; a failure on one does
    /// not stop the others. The first error (if any) surfaces after every
    /// record has been attempted.
    pub async fn put_records<T: CacheRecord>(
        &self,
        records: impl IntoIterator<Item = T>,
        force: bool,
    ) -> StoreResult<()> {
        let writes = records
            .into_iter()
            .map(|record| self.put_one(record, force));
        let mut first_error = None;
        for result in join_all(writes).await {
            if let Err(err) = result {
                warn!(error = %err, "cache write failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn put_one<T: CacheRecord>(&self, record: T, force: bool) -> StoreResult<()> {
        let id = record.record_id();
        let cached = self.store.get_record(T::COLLECTION, id).await?;

        if !force {
            if let Some(existing) = cached.and_then(decode::<T>) {
                if record.updated_at() <= existing.updated_at() {
                    debug!(
                        collection = %T::COLLECTION,
                        id = %id,
                        "cached copy is current, skipping write"
                    );
                    return Ok(());
                }
            }
        }

        let row = serde_json::to_value(&record)?;
        self.store.put(T::COLLECTION, id, row).await
    }

    /// Typed point lookup. An undecodable cached row reads as a miss.
    pub async fn get_record<T: CacheRecord>(&self, id: RecordId) -> StoreResult<Option<T>> {
        let row = self.store.get_record(T::COLLECTION, id).await?;
        Ok(row.and_then(decode))
    }

    /// Typed full scan, dropping any rows that no longer decode.
    pub async fn get_all<T: CacheRecord>(&self) -> StoreResult<Vec<T>> {
        let rows = self.store.get_all(T::COLLECTION).await?;
        Ok(rows.into_iter().filter_map(decode).collect())
    }

    /// Typed secondary-index scan by parent id.
    pub async fn get_by_parent<T: IndexedRecord>(&self, parent: RecordId) -> StoreResult<Vec<T>> {
        let rows = self
            .store
            .get_by_index(T::COLLECTION, T::PARENT_INDEX, parent)
            .await?;
        Ok(rows.into_iter().filter_map(decode).collect())
    }
}

/// Decode a stored row, treating decode failure as absence.
///
/// A row that predates a model change must never block a fresh record from
/// landing, so it is logged and skipped rather than surfaced as corruption.
fn decode<T: CacheRecord>(row: Value) -> Option<T> {
    match serde_json::from_value(row) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(collection = %T::COLLECTION, error = %err, "dropping undecodable cached row");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
