//! Remote service client.
//!
//! [`RemoteApi`] is the seam between the fetch layer and the network; the
//! production implementation is [`ApiClient`] over reqwest, and tests plug
//! in scripted stubs.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

use async_trait::async_trait;

use crate::models::{RecordId, Restaurant, Review};

/// The remote listing service.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Every listed restaurant.
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;

    /// One restaurant by id.
    async fn restaurant(&self, id: RecordId) -> Result<Restaurant, ApiError>;

    /// Every review for one restaurant. An empty list is a normal response
    /// for a restaurant nobody has reviewed yet.
    async fn reviews_for_restaurant(&self, restaurant_id: RecordId)
        -> Result<Vec<Review>, ApiError>;
}
