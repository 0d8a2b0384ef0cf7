//! Crate-level error type.
//!
//! Callers of the fetch layer see one taxonomy regardless of which half
//! failed. The cases a caller is expected to branch on: a miss everywhere
//! renders as "not found", a broken cache as "try again later", and
//! everything network-shaped has already been through the fallback path
//! before it surfaces.

use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum Error {
    /// The service could not be reached at the transport level. Triggers
    /// the cache fallback; only surfaces when the fallback also failed.
    #[error("service unreachable: {0}")]
    NetworkUnavailable(#[source] ApiError),

    /// The service answered with a non-success status or an undecodable
    /// body. The service is up and disagreeing.
    #[error("service rejected the request: {0}")]
    NetworkRejected(#[source] ApiError),

    /// A cache lookup found nothing. Internal signal; the fetch layer
    /// converts it to [`Error::NotFoundAnywhere`] before returning.
    #[error("record not present in cache")]
    CacheMiss,

    /// The local store failed (disk gone, data corrupt). Distinct from a
    /// cache miss, which only means the record was never cached.
    #[error("local cache unavailable: {0}")]
    CacheUnavailable(#[from] StoreError),

    /// Both sources exhausted: the network did not answer and the cache
    /// had nothing.
    #[error("service unreachable and no cached data available")]
    NotFoundAnywhere,
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unreachable(_) => Error::NetworkUnavailable(err),
            ApiError::Rejected { .. } | ApiError::Malformed(_) => Error::NetworkRejected(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
