//! # FlowCMS Core
//!
//! Entity Store for the FlowCMS content service.
//!
//! This crate contains pure data operations and file/folder management:
//! - Flow and Nugget records stored as JSON files, one directory per entity
//! - JSON read/write primitives and directory enumeration under the content root
//! - Generic merge-update (read-modify-write) over both entity kinds
//!
//! **No API concerns**: HTTP servers, request/response shapes, and status-code
//! mapping belong in `api-rest`.
//!
//! ## Storage layout
//!
//! ```text
//! <contentRoot>/
//!   flows/
//!     <flowId>/
//!       flow.json          # the Flow record
//!       nuggetSeq.json     # optional nugget-sequence ordering
//!   nuggets/
//!     <nuggetId>/
//!       nugget.json        # the Nugget record
//! ```
//!
//! Each `.json` file holds a single pretty-printed JSON object. Nuggets are
//! shared between Flows, never owned by one: deleting a Flow leaves its
//! referenced Nuggets in place for an out-of-band cleanup process.

pub mod config;
pub mod error;
pub mod record;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use record::{EntityKind, FlowComponent, Record};
pub use store::{list_subdirectories, ContentStore};
