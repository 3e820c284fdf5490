//! Per-file validation reports.

use cffkit_core::{CffDocument, is_valid_license, suggest_license};
use serde::{Deserialize, Serialize};

/// Outcome of validating one citation file.
///
/// Errors are rendered to strings so reports serialize cleanly; each string
/// carries the field path produced by the validator.
///
/// # Examples
///
/// ```
/// use cffkit_convert::ValidationReport;
///
/// let report = ValidationReport::failure(
///     "CITATION.cff",
///     vec!["missing required field: title".into()],
/// );
/// assert!(!report.ok);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Path of the validated file.
    pub path: String,
    /// Title of the cited software, when parsing got that far.
    pub title: Option<String>,
    /// Whether the file passed validation.
    pub ok: bool,
    /// Validation and parse errors, with field paths.
    pub errors: Vec<String>,
    /// Non-fatal observations (duplicate keywords, license suggestions).
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Builds a passing report.
    pub fn success(path: impl Into<String>, title: &str, warnings: Vec<String>) -> Self {
        Self {
            path: path.into(),
            title: Some(title.to_string()),
            ok: true,
            errors: Vec::new(),
            warnings,
        }
    }

    /// Builds a failing report.
    pub fn failure(path: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            ok: false,
            errors,
            warnings: Vec::new(),
        }
    }
}

/// A batch of validation reports with run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    /// Version of the tool that produced this bundle.
    pub tool_version: String,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Number of files that passed.
    pub passed: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Per-file reports, in input order.
    pub reports: Vec<ValidationReport>,
}

impl ReportBundle {
    /// Assembles a bundle, counting passes and failures.
    pub fn new(tool_version: &str, reports: Vec<ValidationReport>) -> Self {
        let passed = reports.iter().filter(|r| r.ok).count();
        let failed = reports.len() - passed;
        Self {
            tool_version: tool_version.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            passed,
            failed,
            reports,
        }
    }
}

/// Computes non-fatal warnings for a parsed document.
///
/// Duplicate keywords are reported here rather than as validation errors:
/// real citation files routinely carry near-duplicates and downstream
/// consumers deduplicate on ingest. An unrecognized license token is an
/// error, but when a plausible SPDX identifier exists the hint lands here.
///
/// # Examples
///
/// ```
/// use cffkit_core::CffDocument;
/// use cffkit_convert::document_warnings;
///
/// let doc = CffDocument::new("tool")
///     .with_keyword("hydrology")
///     .with_keyword("hydrology");
/// assert_eq!(
///     document_warnings(&doc),
///     vec!["keywords: duplicate entry 'hydrology'".to_string()]
/// );
/// ```
pub fn document_warnings(doc: &CffDocument) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen = std::collections::HashSet::new();
    for keyword in &doc.keywords {
        if !seen.insert(keyword.as_str()) {
            warnings.push(format!("keywords: duplicate entry '{keyword}'"));
        }
    }

    if let Some(license) = &doc.license {
        if !is_valid_license(license) {
            if let Some(suggestion) = suggest_license(license) {
                warnings.push(format!("license: did you mean '{suggestion}'?"));
            }
        }
    }

    warnings
}
