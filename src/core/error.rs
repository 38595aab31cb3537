//! Error types for tagtree
//!
//! Only failures that abort a command or a provider's resolution live here.
//! Data defects in a backup (unparseable rows, missing UDT definitions,
//! dangling folder references) are logged and degraded instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using tagtree's Error
pub type Result<T> = std::result::Result<T, Error>;

/// tagtree error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database not found: {path}")]
    DatabaseNotFound { path: PathBuf },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Tag provider not found: {name}")]
    ProviderNotFound { name: String },

    #[error("Cyclic UDT inheritance: {chain}")]
    CyclicInheritance { chain: String },

    #[error("Definition '{type_id}' points at group {prefix}, which is not part of the provider")]
    MissingAncestorGroup { type_id: String, prefix: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// True for errors that abort a single provider but not the whole run
    pub fn is_provider_fatal(&self) -> bool {
        matches!(
            self,
            Error::CyclicInheritance { .. } | Error::MissingAncestorGroup { .. }
        )
    }
}
