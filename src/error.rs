//! Error types.
//!
//! Only configuration checks, the persistence collaborator and the export
//! side-channel are fallible. The table engine itself swallows persistence
//! failures after logging them, so none of these errors reach the rendered UI.

use std::io;
use thiserror::Error;

/// Failure reported by a [`LayoutStore`](crate::storage::LayoutStore).
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write because it is full.
    #[error("storage quota exceeded for key {key:?}")]
    QuotaExceeded {
        /// Key being written.
        key: String,
    },

    /// I/O error from a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Contract violation in a caller-supplied column registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two descriptors share the same key.
    #[error("duplicate column key: {0:?}")]
    DuplicateColumnKey(String),

    /// The registry has no columns, so nothing could ever be visible.
    #[error("column registry is empty")]
    EmptyRegistry,
}

/// Failure of the default export path.
#[derive(Error, Debug)]
pub enum ExportError {
    /// There are no rows to export.
    #[error("no data to export")]
    NoData,

    /// Export is not enabled for this table.
    #[error("export is disabled")]
    Disabled,

    /// Writing the output failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// CSV encoding failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias for store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
