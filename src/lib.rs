//! platecache - offline-tolerant data access for a restaurant listing app.
//!
//! The crate fronts a remote listing service with a local persistent cache.
//! Reads go to the network first; successful payloads are written through
//! to the cache, and when the network fails the cache answers instead.
//! Conflicts between fetched and cached records are resolved last-write-wins
//! on the record's server timestamp.
//!
//! Layering, top to bottom:
//!
//! - [`Fetcher`] - unified entry points, fallback policy, write-through.
//! - [`query`] - pure filters and projections over fetched sets.
//! - [`cache::CacheGateway`] - typed reads and conflict-resolved writes.
//! - [`store`] - durable key-value collections with a versioned schema.
//! - [`api`] - the reqwest client for the remote service.
//!
//! No logging subscriber is installed here; embedders that want output
//! install their own `tracing` subscriber.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod query;
pub mod store;

pub use api::{ApiClient, ApiError, RemoteApi};
pub use cache::{CacheGateway, CacheRecord, IndexedRecord};
pub use config::Config;
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use models::{LatLng, RecordId, Restaurant, Review};
pub use store::{Collection, FileStore, MemoryStore, Store, StoreError};
