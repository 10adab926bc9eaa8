//! Nugget operations.
//!
//! Nuggets are reusable content units shared between Flows. The store keeps
//! no reference counts: a Nugget outlives every Flow that points at it, and
//! orphaned Nuggets are an accepted outcome cleaned up out of band.

use super::{list_subdirectories, ContentStore};
use crate::error::StoreResult;
use crate::record::{EntityKind, Record};

impl ContentStore {
    /// List every Nugget stored under the content root.
    ///
    /// Same contract as [`ContentStore::list_all_flows`]: enumeration order,
    /// unreadable records skipped.
    pub async fn list_all_nuggets(&self) -> StoreResult<Vec<Record>> {
        let dirs = list_subdirectories(&self.config.nuggets_dir()).await?;
        Ok(self.load_entities_by_ids(EntityKind::Nugget, &dirs).await)
    }

    /// Create a new Nugget from a partial payload.
    ///
    /// Same contract as [`ContentStore::create_flow`], writing
    /// `nugget.json` under the Nuggets root.
    pub async fn create_nugget(&self, partial: Record) -> StoreResult<Record> {
        self.create_entity(EntityKind::Nugget, partial).await
    }

    /// Read a single Nugget record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailure` when the Nugget is missing or its
    /// record file is damaged.
    pub async fn get_nugget(&self, nugget_id: &str) -> StoreResult<Record> {
        self.read_record(EntityKind::Nugget, nugget_id).await
    }

    /// Delete a Nugget's entire directory.
    ///
    /// No back-reference check is made against Flows; callers that care
    /// about dangling references must resolve them themselves.
    pub async fn delete_nugget(&self, nugget_id: &str) -> StoreResult<()> {
        self.delete_entity(EntityKind::Nugget, nugget_id).await
    }
}
