//! Citation record loading and manifest management.
//!
//! This crate provides infrastructure for loading validated citation
//! records from various sources (directories of per-record JSON files,
//! collection bundles, gzipped bundles) and for tracking validation state
//! across CI runs through checksum manifests.
//!
//! # Quick start
//!
//! ```no_run
//! use cffkit_db::{CitationDatabase, Manifest, ValidationPolicyFingerprint};
//!
//! // Load records from a directory
//! let db = CitationDatabase::from_dir("citations/").unwrap();
//! if let Some(doc) = db.get("eWaterCycle Python package") {
//!     println!("{} authors", doc.authors.len());
//! }
//!
//! // Use the builder for fallback chains
//! let db = CitationDatabase::builder()
//!     .from_dir("citations/")
//!     .from_bundle("citations.json.gz")
//!     .build()
//!     .unwrap();
//!
//! // Track validation state with a manifest
//! let manifest = Manifest::new(
//!     "0.1.0".into(),
//!     ValidationPolicyFingerprint::default(),
//! );
//! ```

mod config;
mod error;
mod loader;
mod manifest;

pub use config::{CheckConfig, PolicyConfig, default_config_path};
pub use error::{DatabaseError, Result};
pub use loader::{CitationDatabase, DatabaseBuilder, DatabaseSource, write_bundle};
pub use manifest::{Manifest, RecordMetadata, ValidationPolicyFingerprint};
