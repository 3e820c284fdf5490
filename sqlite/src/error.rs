//! Error types for SQLite citation storage.

use thiserror::Error;

/// Errors that can occur during SQLite citation operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Document-to-SQL or SQL-to-document conversion failure.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Migration lifecycle operation failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// Requested citation record was not found.
    #[error("citation not found: {0}")]
    CitationNotFound(String),

    /// Error loading records through the citation database loader.
    #[error("loader error: {0}")]
    LoaderError(#[from] cffkit_db::DatabaseError),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
