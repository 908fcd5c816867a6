//! Error shared by the local repositories.

use super::define_port_error;

define_port_error! {
    /// Errors raised when a repository cannot persist state.
    ///
    /// Loads never fail: missing or corrupt values read as empty.
    pub enum PersistenceError {
        /// Writing the value failed.
        Write { key: String, message: String } =>
            "failed to persist {key}: {message}",
        /// Removing the value failed.
        Remove { key: String, message: String } =>
            "failed to remove {key}: {message}",
    }
}
