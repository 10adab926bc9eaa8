//! Filesystem-backed Entity Store.
//!
//! Every entity lives in its own directory named by its id, holding a single
//! canonical record file (`flow.json` or `nugget.json`). All I/O is
//! non-blocking (`tokio::fs`) and unsynchronized, except merge-updates,
//! which are serialized per entity (see [`ContentStore::merge_update`]).

mod flows;
mod json;
mod merge;
mod nuggets;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::{EntityKind, Record};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type MergeLockMap = HashMap<(EntityKind, String), Arc<tokio::sync::Mutex<()>>>;

/// The Entity Store.
///
/// Cheap to clone: clones share the configuration and the per-entity lock
/// map, so a cloned store participates in the same merge-update
/// serialization.
#[derive(Clone)]
pub struct ContentStore {
    config: Arc<StoreConfig>,
    merge_locks: Arc<Mutex<MergeLockMap>>,
}

impl ContentStore {
    /// Open the store over a validated configuration.
    ///
    /// Ensures the `flows/` and `nuggets/` roots exist so enumeration works
    /// on a freshly created content root.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DirectoryCreateFailure` if an entity root cannot
    /// be created.
    pub async fn open(config: Arc<StoreConfig>) -> StoreResult<Self> {
        for kind in [EntityKind::Flow, EntityKind::Nugget] {
            let dir = config.entity_root(kind);
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                StoreError::DirectoryCreateFailure {
                    path: dir.clone(),
                    source: e,
                }
            })?;
        }

        Ok(Self {
            config,
            merge_locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Directory holding one entity.
    fn entity_dir(&self, kind: EntityKind, id: &str) -> PathBuf {
        self.config.entity_root(kind).join(id)
    }

    /// Read one entity's canonical record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailure` when the record file is missing,
    /// unreadable, or not valid JSON.
    pub async fn read_record(&self, kind: EntityKind, id: &str) -> StoreResult<Record> {
        json::read_json(&self.entity_dir(kind, id), kind.file_stem()).await
    }

    /// Best-effort batch load.
    ///
    /// Fetches every id in parallel; entries that fail to read are logged
    /// and dropped, so one damaged or missing record never prevents the rest
    /// of the batch from loading. The returned order matches the input id
    /// order regardless of completion order.
    pub async fn load_entities_by_ids(&self, kind: EntityKind, ids: &[String]) -> Vec<Record> {
        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            let store = self.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let result = store.read_record(kind, &id).await;
                (id, result)
            }));
        }

        let mut records = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok((_, Ok(record))) => records.push(record),
                Ok((id, Err(e))) => {
                    tracing::warn!("skipping unreadable {kind} record {id}: {e}");
                }
                Err(e) => {
                    tracing::warn!("batch load task failed: {e}");
                }
            }
        }

        records
    }

    /// Shared create path for both entity kinds.
    ///
    /// Assigns a fresh id (replacing any caller-supplied one), stamps the
    /// timestamps, creates the entity directory, then writes the record. If
    /// the directory cannot be created the write is never attempted.
    pub(crate) async fn create_entity(
        &self,
        kind: EntityKind,
        mut partial: Record,
    ) -> StoreResult<Record> {
        let id = crate::record::new_record_id();
        partial.insert(crate::record::ID_FIELD.into(), Value::String(id.clone()));
        crate::record::init_timestamps(&mut partial);

        let dir = self.entity_dir(kind, &id);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::DirectoryCreateFailure {
                path: dir.clone(),
                source: e,
            }
        })?;

        json::write_json(&dir, kind.file_stem(), &partial).await?;
        tracing::debug!("created {kind} {id}");

        Ok(partial)
    }

    /// Shared delete path for both entity kinds: recursive removal of the
    /// entity's whole directory, canonical file and co-located files alike.
    pub(crate) async fn delete_entity(&self, kind: EntityKind, id: &str) -> StoreResult<()> {
        let dir = self.entity_dir(kind, id);
        tokio::fs::remove_dir_all(&dir)
            .await
            .map_err(|e| StoreError::DeleteFailure {
                path: dir,
                source: e,
            })?;
        tracing::debug!("deleted {kind} {id}");

        Ok(())
    }
}

/// Names of all immediate subdirectories of `root`, excluding files.
///
/// Returns bare names, not full paths, in filesystem enumeration order.
///
/// # Errors
///
/// Returns `StoreError::DirectoryReadFailure` if `root` does not exist or
/// cannot be read.
pub async fn list_subdirectories(root: &Path) -> StoreResult<Vec<String>> {
    let mut entries =
        tokio::fs::read_dir(root)
            .await
            .map_err(|e| StoreError::DirectoryReadFailure {
                path: root.to_path_buf(),
                source: e,
            })?;

    let mut names = Vec::new();
    while let Some(entry) =
        entries
            .next_entry()
            .await
            .map_err(|e| StoreError::DirectoryReadFailure {
                path: root.to_path_buf(),
                source: e,
            })?
    {
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn open_store(temp: &TempDir) -> ContentStore {
        let config = Arc::new(StoreConfig::new(temp.path().to_path_buf()).unwrap());
        ContentStore::open(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_entity_roots() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        assert!(store.config().flows_dir().is_dir());
        assert!(store.config().nuggets_dir().is_dir());
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let config = Arc::new(StoreConfig::new(temp.path().to_path_buf()).unwrap());

        ContentStore::open(config.clone()).await.unwrap();
        ContentStore::open(config).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_subdirectories_excludes_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("aaa")).unwrap();
        std::fs::create_dir(temp.path().join("bbb")).unwrap();
        std::fs::write(temp.path().join("stray.json"), "{}").unwrap();

        let mut names = list_subdirectories(temp.path()).await.unwrap();
        names.sort();

        assert_eq!(names, vec!["aaa".to_string(), "bbb".to_string()]);
    }

    #[tokio::test]
    async fn test_list_subdirectories_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("non-existent");

        let result = list_subdirectories(&missing).await;

        assert!(matches!(
            result,
            Err(StoreError::DirectoryReadFailure { .. })
        ));
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_batch_load_preserves_input_order() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let mut ids = Vec::new();
        for n in 0..5 {
            let record = store
                .create_entity(
                    EntityKind::Nugget,
                    json!({"n": n}).as_object().unwrap().clone(),
                )
                .await
                .unwrap();
            ids.push(record["id"].as_str().unwrap().to_string());
        }

        ids.reverse();
        let records = store.load_entities_by_ids(EntityKind::Nugget, &ids).await;

        let loaded_ids: Vec<&str> = records
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(loaded_ids, ids.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_batch_load_drops_damaged_records() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let mut ids = Vec::new();
        for n in 0..3 {
            let record = store
                .create_entity(
                    EntityKind::Flow,
                    json!({"n": n}).as_object().unwrap().clone(),
                )
                .await
                .unwrap();
            ids.push(record["id"].as_str().unwrap().to_string());
        }

        // Corrupt the middle record and add an id with no directory at all.
        let damaged = store.config().flows_dir().join(&ids[1]).join("flow.json");
        std::fs::write(&damaged, "not json {").unwrap();
        ids.push("does-not-exist".to_string());

        let records = store.load_entities_by_ids(EntityKind::Flow, &ids).await;

        assert_eq!(records.len(), 2);
        let loaded: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(loaded, vec![ids[0].as_str(), ids[2].as_str()]);
    }

    #[tokio::test]
    async fn test_batch_load_empty_ids() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let records = store.load_entities_by_ids(EntityKind::Flow, &[]).await;

        assert!(records.is_empty());
    }
}
