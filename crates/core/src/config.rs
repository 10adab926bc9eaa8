//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! store. Operations never read environment variables or other ambient state,
//! which keeps behaviour consistent across multi-threaded runtimes and test
//! harnesses.

use crate::error::{StoreError, StoreResult};
use crate::record::EntityKind;
use std::io;
use std::path::{Path, PathBuf};

/// Store configuration resolved at startup.
///
/// All entity paths are computed relative to the content root; nothing else
/// in the store touches the filesystem outside of it.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    content_root: PathBuf,
}

impl StoreConfig {
    /// Create a new `StoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DirectoryReadFailure` if `content_root` does not
    /// exist or is not a directory.
    pub fn new(content_root: PathBuf) -> StoreResult<Self> {
        if !content_root.is_dir() {
            return Err(StoreError::DirectoryReadFailure {
                path: content_root,
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    "content root does not exist or is not a directory",
                ),
            });
        }

        Ok(Self { content_root })
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Directory holding all entities of one kind.
    pub fn entity_root(&self, kind: EntityKind) -> PathBuf {
        self.content_root.join(kind.dir_name())
    }

    pub fn flows_dir(&self) -> PathBuf {
        self.entity_root(EntityKind::Flow)
    }

    pub fn nuggets_dir(&self) -> PathBuf {
        self.entity_root(EntityKind::Nugget)
    }
}
