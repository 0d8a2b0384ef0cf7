//! Typed cache layer over the raw store.
//!
//! The store speaks `serde_json::Value`; this module adds the typed surface
//! the rest of the crate uses. [`CacheRecord`] binds a model type to its
//! collection and conflict-resolution timestamp, and [`CacheGateway`]
//! implements the write policy: last write wins on the record's server
//! timestamp, unless the caller forces the overwrite.

pub mod gateway;

pub use gateway::CacheGateway;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{RecordId, Restaurant, Review};
use crate::store::Collection;

/// A model type the cache knows how to persist.
///
/// `updated_at` is the server-stamped modification time and the only value
/// conflict resolution ever compares.
pub trait CacheRecord:
    Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const COLLECTION: Collection;

    fn record_id(&self) -> RecordId;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// A [`CacheRecord`] that also belongs to a parent record and is retrievable
/// through the parent's secondary index.
pub trait IndexedRecord: CacheRecord {
    const PARENT_INDEX: &'static str;

    fn parent_id(&self) -> RecordId;
}

impl CacheRecord for Restaurant {
    const COLLECTION: Collection = Collection::Restaurants;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl CacheRecord for Review {
    const COLLECTION: Collection = Collection::Reviews;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl IndexedRecord for Review {
    const PARENT_INDEX: &'static str = "restaurant_id";

    fn parent_id(&self) -> RecordId {
        self.restaurant_id
    }
}
