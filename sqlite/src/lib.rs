//! SQLite storage backend for citation records.
//!
//! This crate provides a normalized SQLite schema for storing
//! [`CffDocument`](cffkit_core::CffDocument) data with full round-trip
//! fidelity. It includes migration lifecycle management, bidirectional
//! conversion between Rust types and SQL rows, and a high-level query
//! interface for repository-index use cases.
//!
//! # Architecture
//!
//! The crate is organized into four modules:
//!
//! - **`schema`** — SQL generation with customizable table prefixes
//! - **`migration`** — Lifecycle operations (up/down/seed/refresh/status)
//! - **`convert`** — Bidirectional `CffDocument` ↔ SQL row transformations
//! - **`query`** — Runtime citation access (CRUD and search)
//!
//! # Quick start — migrations
//!
//! ```no_run
//! use cffkit_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("citations.db").unwrap();
//! let mut migration = Migration::new(conn, "cff_").unwrap();
//!
//! migration.up().unwrap();
//! migration.seed("citations/").unwrap();
//!
//! let status = migration.status().unwrap();
//! println!("Citations: {}", status.citation_count);
//! ```
//!
//! # Quick start — queries
//!
//! ```no_run
//! use cffkit_sqlite::CitationQuery;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("citations.db").unwrap();
//! let query = CitationQuery::new(&conn, "cff_").unwrap();
//!
//! if let Some(doc) = query.get("eWaterCycle Python package").unwrap() {
//!     println!("{} has {} authors", doc.title, doc.authors.len());
//! }
//! ```
//!
//! # Table prefix customization
//!
//! All table and index names are prefixed with a configurable string,
//! allowing multiple isolated citation sets within the same SQLite database.
//! Prefixes must contain only alphanumeric characters and underscores.

mod convert;
mod error;
mod migration;
mod query;
mod schema;

pub use error::{Result, SqliteError};
pub use migration::{Migration, MigrationStatus, SeedReport};
pub use query::CitationQuery;
