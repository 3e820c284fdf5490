//! Migration lifecycle operations for the SQLite citation schema.
//!
//! Provides [`Migration`] for creating, dropping, seeding, and refreshing
//! the normalized table structure. All mutation operations use transactions
//! to ensure atomicity.
//!
//! # Example
//!
//! ```no_run
//! use cffkit_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("citations.db").unwrap();
//! let mut migration = Migration::new(conn, "cff_").unwrap();
//!
//! migration.up().unwrap();
//! let report = migration.seed("citations/").unwrap();
//! println!("Inserted {} citations", report.citations_inserted);
//!
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! ```

use std::path::Path;

use cffkit_db::CitationDatabase;
use rusqlite::Connection;

use crate::convert::{self, InsertCounts};
use crate::error::{Result, SqliteError};
use crate::schema::{generate_drop_sql, generate_schema_sql, validate_prefix};

/// Row counts reported after seeding.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedReport {
    /// Citation rows inserted.
    pub citations_inserted: usize,
    /// Author rows inserted.
    pub authors_inserted: usize,
    /// Identifier rows inserted.
    pub identifiers_inserted: usize,
    /// Keyword rows inserted.
    pub keywords_inserted: usize,
}

impl SeedReport {
    fn merge_counts(&mut self, counts: &InsertCounts) {
        self.citations_inserted += counts.citations;
        self.authors_inserted += counts.authors;
        self.identifiers_inserted += counts.identifiers;
        self.keywords_inserted += counts.keywords;
    }
}

/// Current state of the citation tables.
#[derive(Debug, Clone, Copy)]
pub struct MigrationStatus {
    /// Whether the citation tables exist.
    pub tables_exist: bool,
    /// Number of citation rows.
    pub citation_count: usize,
    /// Number of author rows.
    pub author_count: usize,
    /// Number of identifier rows.
    pub identifier_count: usize,
    /// Number of keyword rows.
    pub keyword_count: usize,
}

/// Manages the lifecycle of the SQLite citation tables.
///
/// Provides operations to create tables ([`up`](Self::up)), drop them
/// ([`down`](Self::down)), seed data from JSON record files
/// ([`seed`](Self::seed)), and check the current migration status
/// ([`status`](Self::status)).
pub struct Migration {
    conn: Connection,
    prefix: String,
}

impl Migration {
    /// Creates a new migration manager for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix contains invalid characters.
    pub fn new(conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, prefix })
    }

    /// Creates all citation tables and indexes.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS` so it is safe to call multiple times.
    /// Executes within a transaction for atomicity.
    pub fn up(&mut self) -> Result<()> {
        let sql = generate_schema_sql(&self.prefix)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Drops all citation tables in reverse dependency order.
    ///
    /// Uses `DROP TABLE IF EXISTS` so it is safe to call even if tables
    /// do not exist. Executes within a transaction for atomicity.
    pub fn down(&mut self) -> Result<()> {
        let sql = generate_drop_sql(&self.prefix)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to drop tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Returns the current status of the migration.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus {
                tables_exist: false,
                citation_count: 0,
                author_count: 0,
                identifier_count: 0,
                keyword_count: 0,
            });
        }

        Ok(MigrationStatus {
            tables_exist: true,
            citation_count: self.count_rows("citations")?,
            author_count: self.count_rows("authors")?,
            identifier_count: self.count_rows("identifiers")?,
            keyword_count: self.count_rows("keywords")?,
        })
    }

    /// Seeds the database from a directory of JSON citation record files.
    ///
    /// Loads records using [`CitationDatabase::from_dir`], then inserts each
    /// record into the SQLite tables within a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::LoaderError`] if the directory cannot be read,
    /// or [`SqliteError::DatabaseError`] if insertion fails.
    pub fn seed(&mut self, source_dir: impl AsRef<Path>) -> Result<SeedReport> {
        let db = CitationDatabase::from_dir(source_dir)?;
        let mut titles: Vec<String> = db.titles().map(String::from).collect();
        titles.sort();

        let tx = self.conn.transaction()?;
        let mut report = SeedReport::default();

        for title in &titles {
            let document = db.get(title).ok_or_else(|| {
                SqliteError::CitationNotFound(title.clone())
            })?;
            let counts = convert::insert_citation(&tx, &self.prefix, document)?;
            report.merge_counts(&counts);
        }

        tx.commit()?;
        Ok(report)
    }

    /// Drops all tables, recreates them, and seeds from the given directory.
    ///
    /// Equivalent to calling [`down`](Self::down), [`up`](Self::up), then
    /// [`seed`](Self::seed) in sequence.
    pub fn refresh(&mut self, source_dir: impl AsRef<Path>) -> Result<SeedReport> {
        self.down()?;
        self.up()?;
        self.seed(source_dir)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Checks whether the citations table exists.
    fn tables_exist(&self) -> Result<bool> {
        let table_name = format!("{}citations", self.prefix);
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
        let count: i64 = stmt.query_row([&table_name], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Counts rows in a prefixed table.
    fn count_rows(&self, table: &str) -> Result<usize> {
        let full_table = format!("{}{}", self.prefix, table);
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT COUNT(*) FROM {full_table}"))?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }
}
