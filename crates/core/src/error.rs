use crate::record::EntityKind;
use std::io;
use std::path::PathBuf;

/// Cause of a failed record-file read.
#[derive(Debug, thiserror::Error)]
pub enum ReadCause {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// Cause of a failed record-file write.
#[derive(Debug, thiserror::Error)]
pub enum WriteCause {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record file is missing, unreadable, or not valid JSON.
    #[error("failed to read record file {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: ReadCause,
    },
    #[error("failed to write record file {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: WriteCause,
    },
    #[error("failed to list directory {path}: {source}")]
    DirectoryReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreateFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to delete directory {path}: {source}")]
    DeleteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The requested Flow component is not one of the permitted names.
    /// Raised before the filesystem is touched.
    #[error("invalid component type: {0:?}")]
    InvalidComponentType(String),
    #[error("failed to merge update into {kind} {id}: {source}")]
    MergeFailure {
        kind: EntityKind,
        id: String,
        #[source]
        source: Box<StoreError>,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// True when the underlying cause is a missing file or directory.
    ///
    /// Callers translating store errors into user-visible responses use this
    /// to distinguish "no such entity" from genuine I/O trouble.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::ReadFailure {
                source: ReadCause::Io(e),
                ..
            } => e.kind() == io::ErrorKind::NotFound,
            StoreError::DirectoryReadFailure { source, .. }
            | StoreError::DeleteFailure { source, .. } => source.kind() == io::ErrorKind::NotFound,
            StoreError::MergeFailure { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found_read_failure() {
        let err = StoreError::ReadFailure {
            path: PathBuf::from("/tmp/missing/flow.json"),
            source: ReadCause::Io(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        };
        assert!(err.is_not_found());

        let err = StoreError::ReadFailure {
            path: PathBuf::from("/tmp/locked/flow.json"),
            source: ReadCause::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_is_not_found_through_merge_failure() {
        let inner = StoreError::ReadFailure {
            path: PathBuf::from("/tmp/missing/nugget.json"),
            source: ReadCause::Io(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        };
        let err = StoreError::MergeFailure {
            kind: EntityKind::Nugget,
            id: "abc".into(),
            source: Box::new(inner),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_component_type_is_not_not_found() {
        let err = StoreError::InvalidComponentType("banner".into());
        assert!(!err.is_not_found());
    }
}
