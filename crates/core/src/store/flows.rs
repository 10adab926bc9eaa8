//! Flow operations.

use super::{json, list_subdirectories, ContentStore};
use crate::error::{StoreError, StoreResult};
use crate::record::{EntityKind, FlowComponent, Record};

impl ContentStore {
    /// List every Flow stored under the content root.
    ///
    /// Order follows filesystem enumeration and is not guaranteed stable
    /// across platforms. Unreadable records are skipped (best-effort batch
    /// load), so one damaged Flow never hides the rest.
    pub async fn list_all_flows(&self) -> StoreResult<Vec<Record>> {
        let dirs = list_subdirectories(&self.config.flows_dir()).await?;
        Ok(self.load_entities_by_ids(EntityKind::Flow, &dirs).await)
    }

    /// Create a new Flow from a partial payload.
    ///
    /// Assigns a fresh id (any caller-supplied `id` is replaced), stamps
    /// `createdAt` and an empty `updatedAt`, creates the Flow's directory
    /// and writes `flow.json` inside it. Returns the fully populated record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DirectoryCreateFailure` if the Flow directory
    /// cannot be created; the record write is not attempted in that case.
    /// Returns `StoreError::WriteFailure` if writing `flow.json` fails.
    pub async fn create_flow(&self, partial: Record) -> StoreResult<Record> {
        self.create_entity(EntityKind::Flow, partial).await
    }

    /// Delete a Flow's entire directory, including `flow.json` and any
    /// co-located component files such as `nuggetSeq.json`.
    ///
    /// Referenced Nuggets are left in place: they may be shared with other
    /// Flows, and orphan cleanup happens out of band.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DeleteFailure` if the directory does not exist
    /// or cannot be removed.
    pub async fn delete_flow(&self, flow_id: &str) -> StoreResult<()> {
        self.delete_entity(EntityKind::Flow, flow_id).await
    }

    /// Read one of the named component files in a Flow's directory.
    ///
    /// Only `flow` and `nuggetSeq` are valid component types; anything else
    /// is rejected before the filesystem is touched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidComponentType` for a disallowed component
    /// name, `StoreError::ReadFailure` for filesystem errors.
    pub async fn get_flow_component(
        &self,
        flow_id: &str,
        component_type: &str,
    ) -> StoreResult<Record> {
        let component = FlowComponent::parse(component_type)
            .ok_or_else(|| StoreError::InvalidComponentType(component_type.to_string()))?;

        json::read_json(
            &self.entity_dir(EntityKind::Flow, flow_id),
            component.file_stem(),
        )
        .await
    }
}
