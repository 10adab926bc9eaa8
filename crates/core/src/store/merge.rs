//! Generic merge-update.
//!
//! A merge-update overlays a partial payload onto the stored record's full
//! current state and persists the result. Within one process, updates to the
//! same entity are serialized by a per-entity mutex held across the whole
//! read-merge-write, so concurrent merges cannot silently drop each other's
//! fields. Writers in other processes remain last-write-wins.

use super::{json, ContentStore};
use crate::error::{StoreError, StoreResult};
use crate::record::{self, EntityKind, Record};
use std::sync::Arc;

impl ContentStore {
    /// Lock guarding merge-updates for one entity.
    fn merge_lock(&self, kind: EntityKind, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.merge_locks.lock().expect("merge lock map poisoned");
        locks
            .entry((kind, id.to_string()))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Merge a partial payload into the stored record for `kind`/`id`.
    ///
    /// The partial's `id` field, if present, is stripped so the stored id
    /// can never change, and `updatedAt` is stamped with the current time.
    /// Fields named in the partial overwrite like-named stored fields;
    /// fields present only in the stored record are preserved. Returns the
    /// merged record as written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MergeFailure` wrapping the underlying read or
    /// write error. A failed read aborts before anything is written; a
    /// failed write leaves the previous on-disk content untouched.
    pub async fn merge_update(
        &self,
        kind: EntityKind,
        id: &str,
        mut partial: Record,
    ) -> StoreResult<Record> {
        partial.remove(record::ID_FIELD);
        record::touch_updated_at(&mut partial);

        let lock = self.merge_lock(kind, id);
        let _guard = lock.lock().await;

        let dir = self.entity_dir(kind, id);
        let mut merged = json::read_json(&dir, kind.file_stem())
            .await
            .map_err(|e| merge_failure(kind, id, e))?;

        for (field, value) in partial {
            merged.insert(field, value);
        }

        json::write_json(&dir, kind.file_stem(), &merged)
            .await
            .map_err(|e| merge_failure(kind, id, e))?;

        tracing::debug!("merged update into {kind} {id}");
        Ok(merged)
    }
}

fn merge_failure(kind: EntityKind, id: &str, source: StoreError) -> StoreError {
    StoreError::MergeFailure {
        kind,
        id: id.to_string(),
        source: Box::new(source),
    }
}
