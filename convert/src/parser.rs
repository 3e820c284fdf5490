//! YAML parsing for CITATION.cff documents.
//!
//! Parsing is two-staged: the text is first read into a raw YAML mapping so
//! that strict mode can audit field names with precise paths, then
//! deserialized into the typed [`CffDocument`]. Field *content* checks
//! (ORCID syntax, SPDX tokens, required values) are the validator's job;
//! this module only decides whether the YAML is structurally usable.

use cffkit_core::{
    CffDocument, KNOWN_AUTHOR_FIELDS, KNOWN_DOCUMENT_FIELDS, KNOWN_IDENTIFIER_FIELDS,
    ValidationError, audit_fields,
};
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning YAML text into a typed document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not valid YAML, or its shape does not fit the model
    /// (e.g. `authors` holding a string instead of a sequence).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is not a mapping.
    #[error("document root must be a YAML mapping")]
    NotAMapping,
}

/// Parses CITATION.cff text into a typed document.
///
/// Unknown fields are dropped silently; use [`parse_citation_strict`] to
/// have them reported.
///
/// # Examples
///
/// ```
/// let doc = cffkit_convert::parse_citation(
///     "cff-version: 1.2.0\nmessage: please cite\ntitle: tool\nauthors:\n  - family-names: R\n    given-names: A\n",
/// )
/// .unwrap();
/// assert_eq!(doc.title, "tool");
/// ```
pub fn parse_citation(text: &str) -> Result<CffDocument, ParseError> {
    let value: Value = serde_yaml::from_str(text)?;
    if !value.is_mapping() {
        return Err(ParseError::NotAMapping);
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Parses CITATION.cff text, auditing field names against the schema.
///
/// Returns the typed document together with one
/// [`ValidationError::UnknownField`] per field the schema does not define,
/// at the document root and inside each author and identifier record.
///
/// # Examples
///
/// ```
/// use cffkit_core::ValidationError;
///
/// let (_, unknown) = cffkit_convert::parse_citation_strict(
///     "title: tool\ncolour: green\n",
/// )
/// .unwrap();
/// assert_eq!(unknown, vec![ValidationError::UnknownField("colour".into())]);
/// ```
pub fn parse_citation_strict(
    text: &str,
) -> Result<(CffDocument, Vec<ValidationError>), ParseError> {
    let value: Value = serde_yaml::from_str(text)?;
    let Some(mapping) = value.as_mapping() else {
        return Err(ParseError::NotAMapping);
    };

    let mut unknown = audit_fields("", &mapping_keys(mapping), KNOWN_DOCUMENT_FIELDS);
    unknown.extend(audit_sequence(mapping, "authors", KNOWN_AUTHOR_FIELDS));
    unknown.extend(audit_sequence(mapping, "identifiers", KNOWN_IDENTIFIER_FIELDS));

    if !unknown.is_empty() {
        debug!(count = unknown.len(), "unknown fields in strict parse");
    }

    let document = serde_yaml::from_value(value)?;
    Ok((document, unknown))
}

fn mapping_keys(mapping: &serde_yaml::Mapping) -> Vec<&str> {
    mapping.keys().filter_map(Value::as_str).collect()
}

/// Audits each mapping element of the sequence under `field`.
fn audit_sequence(
    root: &serde_yaml::Mapping,
    field: &str,
    known: &[&str],
) -> Vec<ValidationError> {
    let Some(entries) = root.get(field).and_then(Value::as_sequence) else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if let Some(mapping) = entry.as_mapping() {
            errors.extend(audit_fields(
                &format!("{field}[{i}]."),
                &mapping_keys(mapping),
                known,
            ));
        }
    }
    errors
}
