//! JSON file primitives.
//!
//! Reads and writes whole-record JSON files. Both directions share a single
//! success/failure contract: any I/O or (de)serialization problem surfaces
//! as a typed `StoreError`, never as a partial result.

use crate::error::{ReadCause, StoreError, StoreResult, WriteCause};
use crate::record::Record;
use std::path::{Path, PathBuf};

/// Absolute path of `<dir>/<file_stem>.json`.
fn record_path(dir: &Path, file_stem: &str) -> PathBuf {
    dir.join(format!("{file_stem}.json"))
}

/// Read and parse `<dir>/<file_stem>.json` into a record.
///
/// # Errors
///
/// Returns `StoreError::ReadFailure` when the file is missing, unreadable,
/// or does not hold a JSON object.
pub(crate) async fn read_json(dir: &Path, file_stem: &str) -> StoreResult<Record> {
    let path = record_path(dir, file_stem);
    tracing::debug!("reading record file {}", path.display());

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| StoreError::ReadFailure {
            path: path.clone(),
            source: ReadCause::Io(e),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| StoreError::ReadFailure {
        path,
        source: ReadCause::Parse(e),
    })
}

/// Serialize `record` as pretty-printed JSON (2-space indent) and write it to
/// `<dir>/<file_stem>.json`, fully overwriting any existing content.
///
/// Parent directories are not created here; callers ensure the entity
/// directory exists first.
///
/// # Errors
///
/// Returns `StoreError::WriteFailure` on any serialization or I/O error
/// (directory missing, permission denied).
pub(crate) async fn write_json(dir: &Path, file_stem: &str, record: &Record) -> StoreResult<()> {
    let path = record_path(dir, file_stem);
    tracing::debug!("writing record file {}", path.display());

    let bytes = serde_json::to_vec_pretty(record).map_err(|e| StoreError::WriteFailure {
        path: path.clone(),
        source: WriteCause::Serialize(e),
    })?;

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| StoreError::WriteFailure {
            path,
            source: WriteCause::Io(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record_from(value: serde_json::Value) -> Record {
        value.as_object().expect("test value is an object").clone()
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let temp = TempDir::new().unwrap();
        let record = record_from(json!({
            "id": "abc123",
            "title": "Intro",
            "tags": ["welcome", "first"],
        }));

        write_json(temp.path(), "flow", &record).await.unwrap();
        let loaded = read_json(temp.path(), "flow").await.unwrap();

        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_read_twice_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let record = record_from(json!({"title": "Intro"}));
        write_json(temp.path(), "nugget", &record).await.unwrap();

        let first = read_json(temp.path(), "nugget").await.unwrap();
        let second = read_json(temp.path(), "nugget").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();

        let result = read_json(temp.path(), "flow").await;

        assert!(matches!(result, Err(StoreError::ReadFailure { .. })));
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("flow.json"), "{ not json").unwrap();

        let result = read_json(temp.path(), "flow").await;

        assert!(matches!(result, Err(StoreError::ReadFailure { .. })));
        assert!(!result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_read_non_object_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("flow.json"), "[1, 2, 3]").unwrap();

        let result = read_json(temp.path(), "flow").await;

        assert!(matches!(result, Err(StoreError::ReadFailure { .. })));
    }

    #[tokio::test]
    async fn test_write_to_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("non-existent");
        let record = record_from(json!({"title": "Intro"}));

        let result = write_json(&missing, "flow", &record).await;

        assert!(matches!(result, Err(StoreError::WriteFailure { .. })));
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_content() {
        let temp = TempDir::new().unwrap();
        let original = record_from(json!({"title": "Intro", "extra": true}));
        write_json(temp.path(), "flow", &original).await.unwrap();

        let replacement = record_from(json!({"title": "Intro v2"}));
        write_json(temp.path(), "flow", &replacement).await.unwrap();

        let loaded = read_json(temp.path(), "flow").await.unwrap();
        assert_eq!(loaded, replacement);
        assert!(!loaded.contains_key("extra"));
    }

    #[tokio::test]
    async fn test_write_is_pretty_printed() {
        let temp = TempDir::new().unwrap();
        let record = record_from(json!({"title": "Intro"}));

        write_json(temp.path(), "flow", &record).await.unwrap();

        let raw = std::fs::read_to_string(temp.path().join("flow.json")).unwrap();
        assert!(raw.contains("\n  \"title\""));
    }
}
