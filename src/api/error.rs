//! Remote service error types.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS failure, refused
    /// connection, timeout). The caller should fall back to the cache.
    #[error("service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service rejected request: {status}")]
    Rejected { status: StatusCode },

    /// The service answered 2xx but the body did not decode.
    #[error("service response malformed: {0}")]
    Malformed(#[source] reqwest::Error),
}
