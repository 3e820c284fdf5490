//! Serializable citation bundles for curation and distribution.

use serde::{Deserialize, Serialize};

use crate::types::CffDocument;

/// A bundle of citation documents with collection-level metadata.
///
/// Collections group many validated [`CffDocument`] records into a single
/// JSON file, suitable for distributing a repository index snapshot or
/// seeding a SQLite database.
///
/// # Examples
///
/// ```
/// use cffkit_core::{CffDocument, CitationCollection};
///
/// let mut collection = CitationCollection::new("0.1.0", "2026-08-07T10:30:00Z");
/// collection.name = Some("organization-index".into());
/// collection.documents.push(CffDocument::new("my-tool"));
///
/// assert_eq!(collection.document_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationCollection {
    /// CFF schema version the documents target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cff_version: Option<String>,
    /// Collection format version (semver string).
    pub version: String,
    /// Optional collection name.
    pub name: Option<String>,
    /// Optional collection description.
    pub description: Option<String>,
    /// RFC 3339 timestamp for collection creation.
    pub generated_at: String,
    /// Citation documents included in this collection.
    pub documents: Vec<CffDocument>,
}

impl CitationCollection {
    /// Creates a collection with required fields.
    ///
    /// The `cff_version` is set from [`crate::CFF_SCHEMA_VERSION`].
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            cff_version: Some(crate::CFF_SCHEMA_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            documents: Vec::new(),
        }
    }

    /// Returns the number of documents in this collection.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Finds a document by exact title.
    pub fn find(&self, title: &str) -> Option<&CffDocument> {
        self.documents.iter().find(|doc| doc.title == title)
    }
}
