//! Servex - expose build-settings server credentials as session properties.
//!
//! This library provides the core functionality for the `svx` CLI tool: it
//! loads named server records from a settings store, resolves every field
//! through a layered precedence chain (user-supplied override > stored value,
//! then placeholder expansion), and flattens the results into a property
//! table that can be published into every project of a build session.

pub mod cli;
pub mod commands;
pub mod config;
pub mod eval;
pub mod models;
pub mod resolver;
pub mod session;

/// Library-level error type for servex operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("settings error: {0}")]
    Settings(String),

    #[error("server not found: {0}")]
    ServerNotFound(String),

    /// Resolution failed; the build should abort. Records mutated before the
    /// failure are left mutated.
    #[error("failed to expose settings.servers.*: {0}")]
    Resolution(String),
}

/// Result type alias for servex operations.
pub type Result<T> = std::result::Result<T, Error>;
