//! SQL schema generation with customizable table prefixes.
//!
//! Generates normalized `CREATE TABLE` and `CREATE INDEX` statements for
//! storing citation records in SQLite. All table names are prefixed with a
//! configurable string to allow multiple isolated citation sets in the same
//! database.
//!
//! # Table structure
//!
//! The normalized schema consists of 4 tables:
//!
//! - `{prefix}citations` — top-level document fields
//! - `{prefix}authors` — ordered author list per citation
//! - `{prefix}identifiers` — ordered identifier list per citation
//! - `{prefix}keywords` — ordered keyword list per citation
//!
//! Child tables track their position so that document order survives a
//! round trip; author order is meaningful in a citation.

use crate::error::{Result, SqliteError};

/// Validates that a table prefix contains only alphanumeric characters and underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    if !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Generates the complete SQL schema for all tables with the given prefix.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix contains characters
/// other than alphanumerics and underscores, or if it is empty.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}citations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    cff_version TEXT NOT NULL,
    message TEXT NOT NULL,
    license TEXT,
    license_url TEXT,
    repository_code TEXT,
    repository_artifact TEXT,
    url TEXT,
    doi TEXT,
    commit_ref TEXT,
    version TEXT,
    date_released TEXT,
    abstract TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS {prefix}authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    citation_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    family_names TEXT NOT NULL,
    given_names TEXT NOT NULL,
    affiliation TEXT,
    orcid TEXT,
    email TEXT,
    FOREIGN KEY (citation_id) REFERENCES {prefix}citations(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS {prefix}identifiers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    citation_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    kind TEXT NOT NULL,
    value TEXT NOT NULL,
    description TEXT,
    FOREIGN KEY (citation_id) REFERENCES {prefix}citations(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS {prefix}keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    citation_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    keyword TEXT NOT NULL,
    FOREIGN KEY (citation_id) REFERENCES {prefix}citations(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_{prefix}authors_citation ON {prefix}authors(citation_id);
CREATE INDEX IF NOT EXISTS idx_{prefix}authors_family ON {prefix}authors(family_names);
CREATE INDEX IF NOT EXISTS idx_{prefix}identifiers_citation ON {prefix}identifiers(citation_id);
CREATE INDEX IF NOT EXISTS idx_{prefix}identifiers_value ON {prefix}identifiers(value);
CREATE INDEX IF NOT EXISTS idx_{prefix}keywords_citation ON {prefix}keywords(citation_id);
CREATE INDEX IF NOT EXISTS idx_{prefix}keywords_keyword ON {prefix}keywords(keyword);
"#
    );

    Ok(sql)
}

/// Generates `DROP TABLE` statements in reverse dependency order.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] for invalid prefixes.
pub fn generate_drop_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
DROP TABLE IF EXISTS {prefix}keywords;
DROP TABLE IF EXISTS {prefix}identifiers;
DROP TABLE IF EXISTS {prefix}authors;
DROP TABLE IF EXISTS {prefix}citations;
"#
    );

    Ok(sql)
}
