//! # Search Kit CLI
//!
//! Index lifecycle management command for the search kit.
//!
//! This crate provides the entry point and configuration wiring for the
//! `search-kit` command.

pub mod config;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during command initialization or execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Registry error.
    #[error("Registry error: {0}")]
    RegistryError(#[from] search_kit::RegistryError),

    /// Index error.
    #[error("Index error: {0}")]
    IndexError(#[from] search_kit::IndexError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
