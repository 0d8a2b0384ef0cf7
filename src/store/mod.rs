//! Persistent local store for restaurant data.
//!
//! This module provides the durable half of the offline cache: a small
//! key-value store with two collections (`restaurants`, `reviews`), one
//! secondary index (reviews by parent restaurant id), and a versioned schema
//! with incremental migrations.
//!
//! The store is exposed through the [`Store`] trait so the cache gateway can
//! run against the on-disk [`FileStore`] in production and the in-memory
//! [`MemoryStore`] in tests. Records cross the trait boundary as raw
//! `serde_json::Value` rows; typed encode/decode lives in the gateway.

pub mod file;
pub mod memory;
pub mod schema;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::RecordId;

/// Named collections in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Restaurants,
    Reviews,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Restaurants => "restaurants",
            Collection::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing storage could not be read or written (missing directory,
    /// permission problem, disk full). Callers must see this as distinct
    /// from an empty result.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// A stored document exists but cannot be decoded.
    #[error("store data corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("no index named '{index}' on collection '{collection}'")]
    UnknownIndex {
        collection: Collection,
        index: String,
    },

    /// The on-disk schema was written by a newer build than this one.
    #[error("store schema version {found} is newer than supported version {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable key-value storage with point lookups, full scans, and one
/// secondary-index scan.
///
/// Implementations serialize each logical operation against their own
/// transaction boundary; callers never share a transaction across
/// operations. A lookup miss is `Ok(None)` / an empty vec, never an error -
/// errors are reserved for the store itself failing.
#[async_trait]
pub trait Store: Send + Sync {
    /// Point lookup by primary key.
    async fn get_record(&self, collection: Collection, id: RecordId) -> StoreResult<Option<Value>>;

    /// Full collection scan. Unordered set semantics - insertion order is
    /// not preserved.
    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Value>>;

    /// Scan a declared secondary index for rows whose indexed field matches
    /// `key`. The index must exist in the schema.
    async fn get_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: RecordId,
    ) -> StoreResult<Vec<Value>>;

    /// Upsert by primary key. Overwrites unconditionally - conflict policy
    /// is the gateway's job.
    async fn put(&self, collection: Collection, id: RecordId, record: Value) -> StoreResult<()>;
}
