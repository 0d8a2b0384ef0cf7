//! Fetch orchestrator: network first, cache fallback.
//!
//! Every entry point tries the remote service, and on any failure falls
//! back to the local cache. A successful fetch is written through to the
//! cache off the caller's critical path; `settle` joins those writes before
//! shutdown. Stale data beats no data: the caller only sees an error when
//! both sources come up empty.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{ApiClient, RemoteApi};
use crate::cache::{CacheGateway, CacheRecord};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{RecordId, Restaurant, Review};
use crate::query;
use crate::store::FileStore;

/// Unified data access over a remote service and a local cache.
pub struct Fetcher<A: RemoteApi> {
    api: A,
    gateway: CacheGateway,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
}

impl<A: RemoteApi> Fetcher<A> {
    pub fn new(api: A, gateway: CacheGateway) -> Self {
        Self {
            api,
            gateway,
            pending_writes: Mutex::new(Vec::new()),
        }
    }

    // ===== Primary entry points =====

    /// Every restaurant, from the service or the cache.
    ///
    /// On network failure, any cached restaurants are served silently. An
    /// empty cache after a failed fetch is [`Error::NotFoundAnywhere`].
    pub async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>> {
        match self.api.restaurants().await {
            Ok(restaurants) => {
                self.write_through(restaurants.clone()).await;
                Ok(restaurants)
            }
            Err(err) => {
                debug!(error = %err, "restaurant fetch failed, falling back to cache");
                let cached: Vec<Restaurant> = self.gateway.get_all().await?;
                if cached.is_empty() {
                    Err(Error::NotFoundAnywhere)
                } else {
                    debug!(count = cached.len(), "serving cached restaurants");
                    Ok(cached)
                }
            }
        }
    }

    /// One restaurant by id.
    pub async fn fetch_restaurant(&self, id: impl Into<RecordId>) -> Result<Restaurant> {
        let id = id.into();
        match self.api.restaurant(id).await {
            Ok(restaurant) => {
                self.write_through(vec![restaurant.clone()]).await;
                Ok(restaurant)
            }
            Err(err) => {
                debug!(id = %id, error = %err, "restaurant fetch failed, falling back to cache");
                self.cached_restaurant(id).await.map_err(|err| match err {
                    // A plain miss surfaces as the both-sources-failed case.
                    Error::CacheMiss => Error::NotFoundAnywhere,
                    other => other,
                })
            }
        }
    }

    async fn cached_restaurant(&self, id: RecordId) -> Result<Restaurant> {
        self.gateway.get_record(id).await?.ok_or(Error::CacheMiss)
    }

    /// Every review for one restaurant.
    ///
    /// An empty list is a normal answer from either source; a restaurant
    /// nobody has reviewed yet is not an error.
    pub async fn fetch_reviews_for_restaurant(
        &self,
        restaurant_id: impl Into<RecordId>,
    ) -> Result<Vec<Review>> {
        let restaurant_id = restaurant_id.into();
        match self.api.reviews_for_restaurant(restaurant_id).await {
            Ok(reviews) => {
                self.write_through(reviews.clone()).await;
                Ok(reviews)
            }
            Err(err) => {
                debug!(
                    restaurant_id = %restaurant_id,
                    error = %err,
                    "review fetch failed, falling back to cache"
                );
                Ok(self.gateway.get_by_parent(restaurant_id).await?)
            }
        }
    }

    // ===== Derived entry points =====

    /// Restaurants with an exact cuisine match.
    pub async fn fetch_by_cuisine(&self, cuisine: &str) -> Result<Vec<Restaurant>> {
        let all = self.fetch_restaurants().await?;
        Ok(query::by_cuisine(&all, cuisine).into_iter().cloned().collect())
    }

    /// Restaurants with an exact neighborhood match.
    pub async fn fetch_by_neighborhood(&self, neighborhood: &str) -> Result<Vec<Restaurant>> {
        let all = self.fetch_restaurants().await?;
        Ok(query::by_neighborhood(&all, neighborhood)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Restaurants filtered on both axes; [`query::ALL`] disables an axis.
    pub async fn fetch_by_cuisine_and_neighborhood(
        &self,
        cuisine: &str,
        neighborhood: &str,
    ) -> Result<Vec<Restaurant>> {
        let all = self.fetch_restaurants().await?;
        Ok(query::by_cuisine_and_neighborhood(&all, cuisine, neighborhood)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Distinct neighborhoods in first-occurrence order.
    pub async fn fetch_neighborhoods(&self) -> Result<Vec<String>> {
        let all = self.fetch_restaurants().await?;
        Ok(query::neighborhoods(&all))
    }

    /// Distinct cuisines in first-occurrence order.
    pub async fn fetch_cuisines(&self) -> Result<Vec<String>> {
        let all = self.fetch_restaurants().await?;
        Ok(query::cuisines(&all))
    }

    // ===== Write-through plumbing =====

    /// Schedule a cache update for freshly fetched records.
    ///
    /// The caller is never blocked on, or failed by, the cache write; the
    /// spawned handle is retained so [`Fetcher::settle`] can join it.
    async fn write_through<T: CacheRecord>(&self, records: Vec<T>) {
        let gateway = self.gateway.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = gateway.put_records(records, false).await {
                warn!(error = %err, "write-through cache update failed");
            }
        });
        self.pending_writes.lock().await.push(handle);
    }

    /// Await every write-through scheduled so far.
    ///
    /// Call before process exit so no cache update is lost. Tests call it
    /// to make the cache state deterministic.
    pub async fn settle(&self) {
        let handles: Vec<_> = {
            let mut pending = self.pending_writes.lock().await;
            pending.drain(..).collect()
        };
        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "write-through task panicked");
            }
        }
    }
}

impl Fetcher<ApiClient> {
    /// Production wiring: reqwest client against the configured base URL,
    /// on-disk store at the configured data directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = ApiClient::new(config.base_url())?;
        let store = FileStore::open(config.data_dir()?)?;
        let gateway = CacheGateway::new(Arc::new(store));
        Ok(Self::new(api, gateway))
    }
}

// ============================================================================
// Tests
// ============================================================================
