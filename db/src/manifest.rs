//! Manifest management for tracking citation validation state.
//!
//! The manifest records per-file metadata that enables efficient CI
//! re-validation. A citation file should be re-checked when any of the
//! following change:
//!
//! - **Checksum**: the on-disk file no longer matches the recorded SHA-256
//!   digest (edit, corruption, new release).
//! - **Policy**: the validation policy (strict mode, warnings-as-errors)
//!   was adjusted.
//! - **Tool version**: the validator itself changed.
//!
//! # Examples
//!
//! ```no_run
//! use cffkit_db::{Manifest, RecordMetadata, ValidationPolicyFingerprint};
//!
//! let mut manifest = Manifest::new(
//!     "0.1.0".into(),
//!     ValidationPolicyFingerprint::default(),
//! );
//!
//! manifest.update_entry("repos/tool/CITATION.cff".into(), RecordMetadata {
//!     title: Some("tool".into()),
//!     cff_version: Some("1.2.0".into()),
//!     checksum: "abc123".into(),
//!     validated_at: "2026-08-07T10:30:00Z".into(),
//!     passed: true,
//! });
//!
//! manifest.save("manifest.json").unwrap();
//! let loaded = Manifest::load("manifest.json").unwrap();
//! assert!(loaded.contains("repos/tool/CITATION.cff"));
//! ```

use std::collections::HashMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Fingerprint of the validation policy used during a check run.
///
/// Stored in the manifest so that CI can detect when the policy changes and
/// trigger a full re-validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicyFingerprint {
    /// Whether unknown fields are rejected.
    pub strict: bool,
    /// Whether warnings fail the run.
    pub warnings_as_errors: bool,
}

/// Per-file metadata recorded after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Title of the cited software, when parsing succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `cff-version` declared by the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cff_version: Option<String>,
    /// SHA-256 hex digest of the file on disk.
    pub checksum: String,
    /// RFC 3339 timestamp of the last validation.
    pub validated_at: String,
    /// Whether the file passed validation.
    pub passed: bool,
}

/// Top-level manifest tracking all checked citation files.
///
/// Persisted as pretty-printed JSON alongside the checked tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version (e.g., `"1.0"`).
    pub version: String,
    /// Version of the tool that produced this manifest.
    pub tool_version: String,
    /// Validation policy in effect when files were checked.
    pub policy: ValidationPolicyFingerprint,
    /// RFC 3339 timestamp of the last manifest update.
    pub updated_at: String,
    /// Per-file metadata keyed by path.
    pub files: HashMap<String, RecordMetadata>,
}

impl Manifest {
    /// Creates a new, empty manifest stamped with the current time.
    pub fn new(tool_version: String, policy: ValidationPolicyFingerprint) -> Self {
        Self {
            version: "1.0".to_string(),
            tool_version,
            policy,
            updated_at: chrono::Utc::now().to_rfc3339(),
            files: HashMap::new(),
        }
    }

    /// Loads a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) if the file cannot
    /// be read, or [`JsonError`](crate::DatabaseError::JsonError) if the
    /// content is not valid manifest JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let manifest = serde_json::from_reader(reader)?;
        Ok(manifest)
    }

    /// Saves the manifest as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Inserts or updates the metadata for `path` and refreshes `updated_at`.
    pub fn update_entry(&mut self, path: String, metadata: RecordMetadata) {
        self.files.insert(path, metadata);
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Computes the SHA-256 hex digest of a file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) if the file cannot
    /// be read.
    pub fn calculate_checksum(path: impl AsRef<Path>) -> Result<String> {
        let bytes = std::fs::read(path)?;
        let hash = Sha256::digest(&bytes);
        Ok(format!("{:x}", hash))
    }

    /// Returns the paths whose state differs between `self` and `other`.
    ///
    /// A file is considered changed if it exists in one manifest but not the
    /// other, or if its checksum differs. If the policy or tool version
    /// changed, **all** files are returned for re-validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cffkit_db::{Manifest, RecordMetadata, ValidationPolicyFingerprint};
    ///
    /// let meta = |checksum: &str| RecordMetadata {
    ///     title: None,
    ///     cff_version: None,
    ///     checksum: checksum.into(),
    ///     validated_at: "2026-08-07T00:00:00Z".into(),
    ///     passed: true,
    /// };
    ///
    /// let mut old = Manifest::new("0.1.0".into(), ValidationPolicyFingerprint::default());
    /// old.update_entry("a.cff".into(), meta("abc"));
    ///
    /// let mut new = Manifest::new("0.1.0".into(), ValidationPolicyFingerprint::default());
    /// new.update_entry("a.cff".into(), meta("def"));
    ///
    /// assert_eq!(old.diff(&new), vec!["a.cff".to_string()]);
    /// ```
    pub fn diff(&self, other: &Manifest) -> Vec<String> {
        if self.policy != other.policy || self.tool_version != other.tool_version {
            let mut all: Vec<String> = self.files.keys().cloned().collect();
            for path in other.files.keys() {
                if !self.files.contains_key(path) {
                    all.push(path.clone());
                }
            }
            all.sort();
            return all;
        }

        let mut changed = Vec::new();

        for (path, meta) in &self.files {
            match other.files.get(path) {
                None => changed.push(path.clone()),
                Some(other_meta) => {
                    if meta.checksum != other_meta.checksum {
                        changed.push(path.clone());
                    }
                }
            }
        }

        for path in other.files.keys() {
            if !self.files.contains_key(path) {
                changed.push(path.clone());
            }
        }

        changed.sort();
        changed
    }

    /// Looks up metadata for a file path.
    pub fn get(&self, path: &str) -> Option<&RecordMetadata> {
        self.files.get(path)
    }

    /// Returns `true` if the manifest contains an entry for `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
