//! Archived-statement storage collaborator.
//!
//! Uploaded statement files are archived by the upload glue; this module
//! only carries what the accounting core needs: a vendor-agnostic handle
//! for best-effort deletion when a report is removed, plus the key scheme
//! shared with the glue.

pub mod config;
pub mod error;
pub mod service;

pub use config::StorageBackend;
pub use error::StorageError;
pub use service::StorageService;
