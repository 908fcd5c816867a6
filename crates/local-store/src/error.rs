//! Error types for the local-store crate.

use thiserror::Error;

/// Errors raised by blob store backends.
///
/// Corrupt contents are not an error at this level; [`crate::JsonStore`]
/// reports them as absent values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The profile directory could not be opened or created.
    #[error("failed to open store directory '{path}': {message}")]
    Open {
        /// Directory path.
        path: String,
        /// Description of the I/O error.
        message: String,
    },

    /// A stored blob could not be read.
    #[error("failed to read '{key}': {message}")]
    Read {
        /// Key being read.
        key: String,
        /// Description of the I/O error.
        message: String,
    },

    /// A blob could not be written.
    #[error("failed to write '{key}': {message}")]
    Write {
        /// Key being written.
        key: String,
        /// Description of the failure.
        message: String,
    },

    /// A blob could not be removed.
    #[error("failed to remove '{key}': {message}")]
    Remove {
        /// Key being removed.
        key: String,
        /// Description of the I/O error.
        message: String,
    },

    /// A value could not be serialised before writing.
    #[error("failed to serialise value for '{key}': {message}")]
    Serialize {
        /// Key being written.
        key: String,
        /// Description of the serde error.
        message: String,
    },
}
