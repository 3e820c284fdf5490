//! Citation database loading with builder pattern and fallback chains.
//!
//! Provides [`CitationDatabase`] for in-memory lookup of validated citation
//! records and [`DatabaseBuilder`] for constructing a database from multiple
//! sources with automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use cffkit_db::CitationDatabase;
//!
//! // Load from a directory of per-record JSON files
//! let db = CitationDatabase::from_dir("citations/").unwrap();
//!
//! // Load from a CitationCollection bundle (plain or gzipped)
//! let db = CitationDatabase::from_bundle("citations.json.gz").unwrap();
//!
//! // Use the builder for a fallback chain
//! let db = CitationDatabase::builder()
//!     .from_dir("citations/")
//!     .from_bundle("citations.json")
//!     .build()
//!     .unwrap();
//! ```
//!
//! All lookups are O(1) via the internal `HashMap`, keyed by title.

use std::collections::HashMap;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use cffkit_core::{CffDocument, CitationCollection};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::error::{DatabaseError, Result};

/// Describes where a [`CitationDatabase`] was loaded from.
#[derive(Debug, Clone)]
pub enum DatabaseSource {
    /// Loaded from a directory of individual JSON record files.
    Directory(PathBuf),
    /// Loaded from a single [`CitationCollection`] file.
    Bundle(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<DatabaseSource>),
}

/// In-memory collection of citation records with O(1) lookup by title.
///
/// # Examples
///
/// ```no_run
/// use cffkit_db::CitationDatabase;
///
/// let db = CitationDatabase::from_dir("citations/").unwrap();
/// println!("Loaded {} records", db.len());
///
/// for title in db.titles() {
///     println!("  {}", title);
/// }
/// ```
#[derive(Debug)]
pub struct CitationDatabase {
    documents: HashMap<String, CffDocument>,
    source: DatabaseSource,
}

impl CitationDatabase {
    /// Returns a new [`DatabaseBuilder`] for configuring a fallback chain.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Loads records from a directory of `*.json` files.
    ///
    /// Each file is parsed as a [`CffDocument`] and indexed by its `title`
    /// field.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IoError`] if the directory cannot be read,
    /// or [`DatabaseError::JsonError`] if any file contains invalid JSON.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut documents = HashMap::new();

        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            if file_path.extension().and_then(|e| e.to_str()) == Some("json") {
                let file = std::fs::File::open(&file_path)?;
                let reader = BufReader::new(file);
                let document: CffDocument = serde_json::from_reader(reader)?;
                documents.insert(document.title.clone(), document);
            }
        }
        debug!(count = documents.len(), dir = %path.display(), "loaded citation records");

        Ok(Self {
            documents,
            source: DatabaseSource::Directory(path.to_path_buf()),
        })
    }

    /// Loads records from a [`CitationCollection`] file.
    ///
    /// Paths ending in `.gz` are decompressed transparently.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IoError`] if the file cannot be read or the
    /// gzip stream is corrupt, or [`DatabaseError::JsonError`] if parsing
    /// fails.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader: Box<dyn Read> = if is_gzip_path(path) {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        let collection: CitationCollection = serde_json::from_reader(reader)?;

        let mut documents = HashMap::new();
        for document in collection.documents {
            documents.insert(document.title.clone(), document);
        }

        Ok(Self {
            documents,
            source: DatabaseSource::Bundle(path.to_path_buf()),
        })
    }

    /// Looks up a record by title in O(1) time.
    pub fn get(&self, title: &str) -> Option<&CffDocument> {
        self.documents.get(title)
    }

    /// Inserts a record, replacing any existing entry with the same title.
    pub fn insert(&mut self, document: CffDocument) {
        self.documents.insert(document.title.clone(), document);
    }

    /// Returns `true` if a record with this title exists.
    pub fn contains(&self, title: &str) -> bool {
        self.documents.contains_key(title)
    }

    /// Returns the number of records in the database.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the database contains no records.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns an iterator over record titles.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(|s| s.as_str())
    }

    /// Returns an iterator over all records.
    pub fn documents(&self) -> impl Iterator<Item = &CffDocument> {
        self.documents.values()
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &DatabaseSource {
        &self.source
    }
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Writes a collection to disk as JSON, gzipped when `gzip` is set.
///
/// # Examples
///
/// ```no_run
/// use cffkit_core::CitationCollection;
/// use cffkit_db::write_bundle;
///
/// let collection = CitationCollection::new("0.1.0", "2026-08-07T10:30:00Z");
/// write_bundle(&collection, "citations.json.gz", true).unwrap();
/// ```
pub fn write_bundle(
    collection: &CitationCollection,
    path: impl AsRef<Path>,
    gzip: bool,
) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    if gzip {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer_pretty(&mut encoder, collection)?;
        encoder.finish()?;
    } else {
        serde_json::to_writer_pretty(BufWriter::new(file), collection)?;
    }
    Ok(())
}

/// Builder for constructing a [`CitationDatabase`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`DatabaseError::NoSourcesAvailable`] is returned.
pub struct DatabaseBuilder {
    sources: Vec<DatabaseSource>,
}

impl DatabaseBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a directory of JSON record files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(DatabaseSource::Directory(path.into()));
        self
    }

    /// Adds a [`CitationCollection`] bundle file as a source.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(DatabaseSource::Bundle(path.into()));
        self
    }

    /// Attempts to load records from configured sources in order.
    ///
    /// Returns the first successfully loaded database. If all sources fail,
    /// returns [`DatabaseError::NoSourcesAvailable`].
    pub fn build(self) -> Result<CitationDatabase> {
        if self.sources.is_empty() {
            return Err(DatabaseError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                DatabaseSource::Directory(path) => CitationDatabase::from_dir(path),
                DatabaseSource::Bundle(path) => CitationDatabase::from_bundle(path),
                DatabaseSource::Multiple(_) => continue,
            };

            if let Ok(mut db) = result {
                db.source = DatabaseSource::Multiple(all_sources);
                return Ok(db);
            }
        }

        Err(DatabaseError::NoSourcesAvailable)
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
