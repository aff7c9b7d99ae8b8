//! Index registry error types.

use thiserror::Error;

/// Errors that can occur while resolving or constructing index handles.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// No handle type is registered under the requested alias.
    #[error("No index type is registered under `{0}`")]
    MissingIndexType(String),

    /// A cached handle was requested again with diverging options.
    #[error("You cannot configure `{0}`, it already exists in the registry")]
    ConfigConflict(String),

    /// The connection required by the handle is not configured.
    #[error("Connection `{0}` is not configured")]
    ConnectionMisconfigured(String),
}

impl RegistryError {
    /// Create a missing index type error.
    pub fn missing_index_type(alias: impl Into<String>) -> Self {
        Self::MissingIndexType(alias.into())
    }

    /// Create a configuration conflict error.
    pub fn config_conflict(alias: impl Into<String>) -> Self {
        Self::ConfigConflict(alias.into())
    }

    /// Create a misconfigured connection error.
    pub fn connection_misconfigured(name: impl Into<String>) -> Self {
        Self::ConnectionMisconfigured(name.into())
    }
}
