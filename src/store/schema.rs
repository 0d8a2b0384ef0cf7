//! Versioned store schema.
//!
//! The schema is a registry of migration steps in strictly increasing
//! version order. Each step declares only the collections and indexes
//! introduced at that version, so opening a store recorded at version N
//! applies the deltas for N+1.. and leaves existing records untouched.

use super::Collection;

/// One schema version step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub version: u32,
    /// Collections introduced at this version.
    pub collections: &'static [Collection],
    /// Secondary indexes introduced at this version.
    pub indexes: &'static [IndexDef],
}

/// A declared secondary index: rows of `collection` are retrievable by the
/// value of `key_field`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexDef {
    pub collection: Collection,
    pub name: &'static str,
    pub key_field: &'static str,
}

pub(crate) const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        collections: &[Collection::Restaurants],
        indexes: &[],
    },
    Migration {
        version: 2,
        collections: &[Collection::Reviews],
        indexes: &[IndexDef {
            collection: Collection::Reviews,
            name: "restaurant_id",
            key_field: "restaurant_id",
        }],
    },
];

/// Latest schema version known by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Migration steps still pending for a store recorded at `from`.
pub(crate) fn steps_after(from: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS.iter().filter(move |m| m.version > from)
}

/// Look up a declared index by collection and name.
pub(crate) fn index_def(collection: Collection, name: &str) -> Option<&'static IndexDef> {
    MIGRATIONS
        .iter()
        .flat_map(|m| m.indexes)
        .find(|ix| ix.collection == collection && ix.name == name)
}
