//! On-disk store implementation.
//!
//! Each collection is persisted as one JSON document in the data directory
//! (a map of canonical id to record), alongside a `meta.json` that records
//! the schema version. Every operation loads, mutates, and rewrites the
//! affected document under the store lock - one transaction per logical
//! operation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::RecordId;

use super::schema::{self, IndexDef};
use super::{Collection, Store, StoreError, StoreResult};

const META_FILE: &str = "meta.json";

#[derive(Debug, Serialize, Deserialize)]
struct Meta {
    schema_version: u32,
}

type CollectionMap = BTreeMap<String, Value>;

/// File-backed [`Store`].
///
/// Opening the store runs any pending schema migrations, so a handle is
/// always at the latest version. The handle is cheap to share behind an
/// `Arc`; the internal lock serializes operations.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open or create a store at `data_dir`, applying pending schema
    /// migrations.
    ///
    /// Migrations are cumulative: a store recorded at version N gets only
    /// the collection/index deltas for versions above N, so records written
    /// under the old schema survive the upgrade. A store recorded at a
    /// version newer than this build supports is refused.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let store = Self {
            data_dir,
            lock: Mutex::new(()),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> StoreResult<()> {
        let stored = self.read_meta()?;
        let latest = schema::latest_version();

        if stored > latest {
            return Err(StoreError::UnsupportedSchemaVersion {
                found: stored,
                supported: latest,
            });
        }
        if stored == latest {
            debug!(version = stored, "store schema up to date");
            return Ok(());
        }

        for step in schema::steps_after(stored) {
            for collection in step.collections {
                let path = self.collection_path(*collection);
                if !path.exists() {
                    self.write_json(&path, &CollectionMap::new())?;
                }
            }
            // Declared indexes are scanned from the collection document, so
            // a new index needs no on-disk structure of its own.
            info!(
                version = step.version,
                collections = step.collections.len(),
                indexes = step.indexes.len(),
                "applied store migration"
            );
        }

        self.write_json(
            &self.data_dir.join(META_FILE),
            &Meta {
                schema_version: latest,
            },
        )?;
        info!(from = stored, to = latest, "store schema migrated");
        Ok(())
    }

    fn read_meta(&self) -> StoreResult<u32> {
        let path = self.data_dir.join(META_FILE);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let meta: Meta = serde_json::from_str(&contents)?;
                Ok(meta.schema_version)
            }
            // A directory without a meta file is a brand-new store.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.name()))
    }

    fn load_collection(&self, collection: Collection) -> StoreResult<CollectionMap> {
        let contents = std::fs::read_to_string(self.collection_path(collection))?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_json<T: Serialize>(&self, path: &PathBuf, value: &T) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for FileStore {
    async fn get_record(&self, collection: Collection, id: RecordId) -> StoreResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        let map = self.load_collection(collection)?;
        Ok(map.get(&id.to_string()).cloned())
    }

    async fn get_all(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        let _guard = self.lock.lock().await;
        let map = self.load_collection(collection)?;
        Ok(map.into_values().collect())
    }

    async fn get_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: RecordId,
    ) -> StoreResult<Vec<Value>> {
        let Some(def) = schema::index_def(collection, index) else {
            return Err(StoreError::UnknownIndex {
                collection,
                index: index.to_string(),
            });
        };

        let _guard = self.lock.lock().await;
        let map = self.load_collection(collection)?;
        Ok(map
            .into_values()
            .filter(|row| indexed_key(row, def) == Some(key))
            .collect())
    }

    async fn put(&self, collection: Collection, id: RecordId, record: Value) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_collection(collection)?;
        map.insert(id.to_string(), record);
        self.write_json(&self.collection_path(collection), &map)
    }
}

/// Canonical value of the indexed field, if the row carries one.
///
/// Goes through [`RecordId`] parsing so a string-form foreign key in a
/// stored row still matches a numeric lookup key.
fn indexed_key(row: &Value, def: &IndexDef) -> Option<RecordId> {
    row.get(def.key_field)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::open(dir.path()).expect("open store");
        (store, dir)
    }

    #[test]
    fn test_fresh_open_lands_at_latest_version() {
        let (_store, dir) = open_store();

        let meta = std::fs::read_to_string(dir.path().join("meta.json")).unwrap();
        let meta: Meta = serde_json::from_str(&meta).unwrap();
        assert_eq!(meta.schema_version, schema::latest_version());

        assert!(dir.path().join("restaurants.json").exists());
        assert!(dir.path().join("reviews.json").exists());
    }

    #[tokio::test]
    async fn test_put_then_get_record() {
        let (store, _dir) = open_store();
        let row = json!({"id": 1, "name": "Katz's"});

        store
            .put(Collection::Restaurants, RecordId::from(1), row.clone())
            .await
            .unwrap();

        let got = store
            .get_record(Collection::Restaurants, RecordId::from(1))
            .await
            .unwrap();
        assert_eq!(got, Some(row));
    }

    #[tokio::test]
    async fn test_get_record_miss_is_none_not_error() {
        let (store, _dir) = open_store();
        let got = store
            .get_record(Collection::Restaurants, RecordId::from(404))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_get_all_returns_every_record() {
        let (store, _dir) = open_store();
        for id in 1..=3 {
            store
                .put(
                    Collection::Restaurants,
                    RecordId::from(id),
                    json!({"id": id}),
                )
                .await
                .unwrap();
        }

        let all = store.get_all(Collection::Restaurants).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_get_by_index_matches_string_form_foreign_key() {
        let (store, _dir) = open_store();
        store
            .put(
                Collection::Reviews,
                RecordId::from(1),
                json!({"id": 1, "restaurant_id": "2", "rating": 4}),
            )
            .await
            .unwrap();
        store
            .put(
                Collection::Reviews,
                RecordId::from(2),
                json!({"id": 2, "restaurant_id": 3, "rating": 5}),
            )
            .await
            .unwrap();

        let rows = store
            .get_by_index(Collection::Reviews, "restaurant_id", RecordId::from(2))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(1));
    }

    #[tokio::test]
    async fn test_get_by_index_unknown_index_is_an_error() {
        let (store, _dir) = open_store();
        let err = store
            .get_by_index(Collection::Restaurants, "cuisine_type", RecordId::from(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownIndex { .. }));
    }

    #[tokio::test]
    async fn test_migration_from_v1_preserves_records() {
        let dir = TempDir::new().unwrap();

        // Lay down a version-1 store by hand: restaurants only, no reviews.
        std::fs::write(dir.path().join("meta.json"), r#"{"schema_version":1}"#).unwrap();
        std::fs::write(
            dir.path().join("restaurants.json"),
            r#"{"7":{"id":7,"name":"Roberta's"}}"#,
        )
        .unwrap();

        let store = FileStore::open(dir.path()).unwrap();

        // The v2 delta created the reviews collection...
        assert!(dir.path().join("reviews.json").exists());

        // ...and the v1 records survived untouched.
        let got = store
            .get_record(Collection::Restaurants, RecordId::from(7))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got["name"], json!("Roberta's"));
    }

    #[test]
    fn test_future_schema_version_is_refused() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("meta.json"), r#"{"schema_version":99}"#).unwrap();

        let err = FileStore::open(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedSchemaVersion { found: 99, .. }
        ));
    }

    #[test]
    fn test_unwritable_location_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("not-a-dir");
        std::fs::write(&file_path, "x").unwrap();

        // Opening "inside" a regular file cannot create the data dir.
        let err = FileStore::open(file_path.join("store")).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_reopen_preserves_records() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store
                .put(Collection::Restaurants, RecordId::from(1), json!({"id": 1}))
                .await
                .unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let got = store
            .get_record(Collection::Restaurants, RecordId::from(1))
            .await
            .unwrap();
        assert!(got.is_some());
    }
}
