//! # Error Types
//!
//! Defines `SeedError`, the unified error enum for every failure mode in the
//! Athletica pipeline. Every variant carries enough context (table name,
//! provider name, dump file, statement index) to debug immediately without
//! digging through logs.

use thiserror::Error;

/// All errors that can occur in Athletica operations.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown value provider '{name}'")]
    UnknownProvider { name: String },

    #[error("Database connection failed after {attempts} attempts\n  Target: {connection_hint}\n  Cause: {source}")]
    Connection {
        attempts: u32,
        connection_hint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Statement {statement_index} of '{file}' failed, the whole file was rolled back\n  DB error: {source}")]
    Statement {
        file: String,
        statement_index: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error: {message}\n  Cause: {source}")]
    Database {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Dump file '{path}' is empty")]
    EmptyDump { path: String },

    #[error("Missing resource: {message}")]
    MissingResource { message: String },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl SeedError {
    /// Shorthand for configuration failures built from format strings.
    pub fn config(message: impl Into<String>) -> Self {
        SeedError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
