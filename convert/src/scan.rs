//! Batch validation over files and directory trees.
//!
//! Directory inputs are walked recursively; anything named `CITATION.cff`
//! or carrying a `.cff` extension counts as a citation file. Validation of
//! a batch is parallelized with rayon, one file per task.

use std::fs;
use std::path::{Path, PathBuf};

use cffkit_core::{CitationCollection, validate_document};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parser::{parse_citation, parse_citation_strict};
use crate::report::{ValidationReport, document_warnings};

/// Errors raised by batch operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// File or directory access failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No citation files were found under the given inputs.
    #[error("no citation files found")]
    NoInputs,

    /// One or more files failed validation during bundling.
    #[error("{failed} of {total} citation file(s) failed validation")]
    InvalidInputs {
        /// Number of failing files.
        failed: usize,
        /// Number of files examined.
        total: usize,
    },

    /// Bundle serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Collects citation file paths from a mix of files and directories.
///
/// Explicit file arguments are taken as-is; directories are walked
/// recursively. The result is sorted for deterministic output.
///
/// # Errors
///
/// Returns [`ConvertError::NoInputs`] when nothing is found, or
/// [`ConvertError::Io`] when an input cannot be read.
pub fn collect_citation_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ConvertError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk_dir(input, &mut paths)?;
        } else {
            paths.push(input.clone());
        }
    }
    paths.sort();
    paths.dedup();

    if paths.is_empty() {
        return Err(ConvertError::NoInputs);
    }
    debug!(count = paths.len(), "collected citation paths");
    Ok(paths)
}

fn walk_dir(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), ConvertError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, paths)?;
        } else if is_citation_file(&path) {
            paths.push(path);
        }
    }
    Ok(())
}

fn is_citation_file(path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) == Some("CITATION.cff") {
        return true;
    }
    path.extension().and_then(|e| e.to_str()) == Some("cff")
}

/// Validates a single citation file, producing a report.
///
/// Parse failures, field-name violations (strict mode), and content
/// violations all land in the report's error list; this function itself
/// never fails.
pub fn validate_citation_file(path: &Path, strict: bool) -> ValidationReport {
    let display = path.display().to_string();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return ValidationReport::failure(display, vec![format!("I/O error: {e}")]),
    };

    let (document, mut errors) = if strict {
        match parse_citation_strict(&text) {
            Ok((document, unknown)) => (document, unknown),
            Err(e) => return ValidationReport::failure(display, vec![e.to_string()]),
        }
    } else {
        match parse_citation(&text) {
            Ok(document) => (document, Vec::new()),
            Err(e) => return ValidationReport::failure(display, vec![e.to_string()]),
        }
    };

    errors.extend(validate_document(&document));
    let warnings = document_warnings(&document);

    if errors.is_empty() {
        ValidationReport::success(display, &document.title, warnings)
    } else {
        warn!(path = %path.display(), errors = errors.len(), "citation file failed validation");
        let mut report =
            ValidationReport::failure(display, errors.iter().map(|e| e.to_string()).collect());
        report.warnings = warnings;
        if !document.title.is_empty() {
            report.title = Some(document.title);
        }
        report
    }
}

/// Validates a batch of citation files in parallel.
///
/// Reports come back in input order regardless of scheduling.
pub fn validate_citation_files(paths: &[PathBuf], strict: bool) -> Vec<ValidationReport> {
    paths
        .par_iter()
        .map(|path| validate_citation_file(path, strict))
        .collect()
}

/// Parses and validates citation files into a [`CitationCollection`].
///
/// # Errors
///
/// Returns [`ConvertError::InvalidInputs`] if any file fails validation;
/// a bundle never contains unvalidated records.
pub fn bundle_citation_files(
    paths: &[PathBuf],
    version: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<CitationCollection, ConvertError> {
    let reports = validate_citation_files(paths, false);
    let failed = reports.iter().filter(|r| !r.ok).count();
    if failed > 0 {
        return Err(ConvertError::InvalidInputs {
            failed,
            total: paths.len(),
        });
    }

    let mut collection =
        CitationCollection::new(version, chrono::Utc::now().to_rfc3339());
    collection.name = name;
    collection.description = description;

    for path in paths {
        let text = fs::read_to_string(path)?;
        // Already validated above; a parse failure here means the file
        // changed between the two reads.
        let document = parse_citation(&text)
            .map_err(|_| ConvertError::InvalidInputs { failed: 1, total: paths.len() })?;
        collection.documents.push(document);
    }

    Ok(collection)
}
