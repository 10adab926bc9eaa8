//! Record helpers: identifiers, timestamps, and the schemaless record type.
//!
//! Records are schemaless JSON objects. Beyond `id`, `createdAt` and
//! `updatedAt`, every field is caller-supplied and passed through untouched:
//! the store does no validation of record contents.
//!
//! ## Timestamp contract
//!
//! - `createdAt` is set exactly once, when the record is created, and is not
//!   touched by the store afterwards.
//! - `updatedAt` is the empty string until the first merge-update, after
//!   which it holds the time of the most recent successful merge.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// A stored entity record.
pub type Record = Map<String, Value>;

/// Field holding the entity identifier.
pub const ID_FIELD: &str = "id";
/// Field holding the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Field holding the last-update timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// The two entity kinds the store persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A top-level content sequence; owns an ordering of Nugget references.
    Flow,
    /// A reusable content unit; may be referenced by multiple Flows.
    Nugget,
}

impl EntityKind {
    /// Directory under the content root holding entities of this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            EntityKind::Flow => "flows",
            EntityKind::Nugget => "nuggets",
        }
    }

    /// File stem of the canonical record file inside an entity directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            EntityKind::Flow => "flow",
            EntityKind::Nugget => "nugget",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Named files readable from a Flow's directory.
///
/// Only these two names are ever read; any other value is rejected before
/// the filesystem is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowComponent {
    /// The Flow record itself (`flow.json`).
    Flow,
    /// The Flow's nugget-sequence ordering (`nuggetSeq.json`).
    NuggetSeq,
}

impl FlowComponent {
    /// Parse a component name as supplied by a caller.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "flow" => Some(FlowComponent::Flow),
            "nuggetSeq" => Some(FlowComponent::NuggetSeq),
            _ => None,
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            FlowComponent::Flow => "flow",
            FlowComponent::NuggetSeq => "nuggetSeq",
        }
    }
}

/// Current time in the stored timestamp format: RFC 3339 with millisecond
/// precision and a `Z` suffix.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generate a new record identifier.
///
/// Canonical uuid-v4 simple form: 32 lowercase hex characters, URL-safe.
/// No check against existing directories is made; collisions are assumed
/// negligible.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Stamp creation-time fields on a new record.
///
/// `createdAt` is only set when missing, null, or empty, so a caller-supplied
/// creation time survives. `updatedAt` is always reset to the empty string.
pub fn init_timestamps(record: &mut Record) {
    let created_missing = match record.get(CREATED_AT_FIELD) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if created_missing {
        record.insert(CREATED_AT_FIELD.into(), Value::String(now_timestamp()));
    }
    record.insert(UPDATED_AT_FIELD.into(), Value::String(String::new()));
}

/// Stamp `updatedAt` with the current time. Called once per merge-update.
pub fn touch_updated_at(record: &mut Record) {
    record.insert(UPDATED_AT_FIELD.into(), Value::String(now_timestamp()));
}
