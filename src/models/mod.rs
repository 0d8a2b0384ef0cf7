//! Data models for restaurant listing entities.
//!
//! This module contains the data structures exchanged with the listing
//! service and stored in the local cache:
//!
//! - `Restaurant`: a listed restaurant with location and cuisine info
//! - `Review`: a customer review attached to a restaurant
//! - `RecordId`: the canonical identifier type shared by both

pub mod restaurant;
pub mod review;

pub use restaurant::{LatLng, Restaurant};
pub use review::Review;

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical record identifier.
///
/// The listing service is inconsistent about id types: collection payloads
/// carry numeric ids, while review payloads (and callers passing ids pulled
/// out of URLs) often carry the same id as a string. `RecordId` accepts
/// either form on deserialization and always compares numerically, so cache
/// lookups are insensitive to how an id arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    /// Text-form ids (URL parameters) normalize to the same canonical value
    /// as numeric ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(RecordId)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer id, or the same id as a string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                i64::try_from(v)
                    .map(RecordId)
                    .map_err(|_| E::custom(format!("id {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                v.parse::<i64>()
                    .map(RecordId)
                    .map_err(|_| E::custom(format!("id '{}' is not numeric", v)))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// ============================================================================
// Tests
// ============================================================================
