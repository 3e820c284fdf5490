//! Document validation.
//!
//! Validates a parsed [`CffDocument`] against the CFF schema contract:
//! required fields, ORCID and identifier syntax, SPDX license tokens, and
//! calendar dates. Every violation is reported with the path of the field
//! that caused it; the validator never mutates or repairs the document.
//!
//! # Examples
//!
//! ```
//! use cffkit_core::*;
//!
//! let doc = CffDocument::new("my-tool")
//!     .with_author(Author::new("Researcher", "Alice"))
//!     .with_license("Apache-2.0");
//! assert!(validate_document(&doc).is_empty());
//!
//! // Invalid: ORCID is not an orcid.org URI
//! let bad = CffDocument::new("my-tool")
//!     .with_author(Author::new("Researcher", "Alice").with_orcid("0000-0002-1825-0097"));
//! assert!(!validate_document(&bad).is_empty());
//! ```

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::spdx::is_valid_license;
use crate::types::{CffDocument, IdentifierType};

/// Top-level fields the document model recognizes.
///
/// Used for strict-mode field audits: anything else at the document root is
/// an [`ValidationError::UnknownField`].
pub const KNOWN_DOCUMENT_FIELDS: &[&str] = &[
    "cff-version",
    "message",
    "title",
    "authors",
    "keywords",
    "license",
    "license-url",
    "repository-code",
    "repository-artifact",
    "url",
    "doi",
    "commit",
    "version",
    "date-released",
    "abstract",
    "identifiers",
];

/// Fields recognized inside an author record.
pub const KNOWN_AUTHOR_FIELDS: &[&str] =
    &["family-names", "given-names", "affiliation", "orcid", "email"];

/// Fields recognized inside an identifier record.
pub const KNOWN_IDENTIFIER_FIELDS: &[&str] = &["type", "value", "description"];

/// Validation errors for CFF documents.
///
/// Each variant carries the path of the offending field (e.g.
/// `authors[2].orcid`) so that reports can point a maintainer at the exact
/// line to fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),
    /// A field not defined by the schema is present (strict mode only).
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// `cff-version` is not a version number.
    #[error("cff-version: '{0}' is not a version number")]
    InvalidCffVersion(String),
    /// An ORCID value is not a well-formed `https://orcid.org/<id>` URI.
    #[error("{field}: '{value}' is not a well-formed ORCID URI")]
    InvalidOrcid {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// An email address is malformed.
    #[error("{field}: '{value}' is not a valid email address")]
    InvalidEmail {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// A DOI does not match `10.<registrant>/<suffix>`.
    #[error("{field}: '{value}' is not a well-formed DOI")]
    InvalidDoi {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// A URL is not absolute.
    #[error("{field}: '{value}' is not an absolute URL")]
    InvalidUrl {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// A Software Heritage identifier is malformed.
    #[error("{field}: '{value}' is not a well-formed Software Heritage identifier")]
    InvalidSwh {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// An identifier declares a type outside the recognized set.
    #[error("{field}: unrecognized identifier type '{value}'")]
    UnknownIdentifierType {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// The license token is not a recognized SPDX identifier.
    #[error("license: '{0}' is not a recognized SPDX identifier")]
    UnknownLicense(String),
    /// `date-released` is not an ISO calendar date.
    #[error("{field}: '{value}' is not a calendar date (YYYY-MM-DD)")]
    InvalidDate {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
}

fn orcid_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://orcid\.org/\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").unwrap()
    })
}

fn doi_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^10\.\d{4,9}/\S+$").unwrap())
}

fn swh_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^swh:1:(cnt|dir|rel|rev|snp):[0-9a-f]{40}$").unwrap())
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(https?|ftp)://\S+$").unwrap())
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn version_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").unwrap())
}

/// Validates a document, returning every violation found.
///
/// Unlike a fail-fast parser, this collects all errors in one pass so a
/// single run shows the complete repair list.
///
/// # Examples
///
/// ```
/// use cffkit_core::*;
///
/// // Missing authors and message
/// let mut doc = CffDocument::new("tool");
/// doc.message.clear();
/// let errors = validate_document(&doc);
/// assert!(errors.contains(&ValidationError::MissingRequiredField("message".into())));
/// assert!(errors.contains(&ValidationError::MissingRequiredField("authors".into())));
/// ```
pub fn validate_document(doc: &CffDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if doc.cff_version.is_empty() {
        errors.push(ValidationError::MissingRequiredField("cff-version".into()));
    } else if !version_pattern().is_match(&doc.cff_version) {
        errors.push(ValidationError::InvalidCffVersion(doc.cff_version.clone()));
    }

    if doc.message.trim().is_empty() {
        errors.push(ValidationError::MissingRequiredField("message".into()));
    }
    if doc.title.trim().is_empty() {
        errors.push(ValidationError::MissingRequiredField("title".into()));
    }

    if doc.authors.is_empty() {
        errors.push(ValidationError::MissingRequiredField("authors".into()));
    }
    for (i, author) in doc.authors.iter().enumerate() {
        if author.family_names.trim().is_empty() {
            errors.push(ValidationError::MissingRequiredField(format!(
                "authors[{i}].family-names"
            )));
        }
        if author.given_names.trim().is_empty() {
            errors.push(ValidationError::MissingRequiredField(format!(
                "authors[{i}].given-names"
            )));
        }
        if let Some(orcid) = &author.orcid {
            if !orcid_pattern().is_match(orcid) {
                errors.push(ValidationError::InvalidOrcid {
                    field: format!("authors[{i}].orcid"),
                    value: orcid.clone(),
                });
            }
        }
        if let Some(email) = &author.email {
            if !email_pattern().is_match(email) {
                errors.push(ValidationError::InvalidEmail {
                    field: format!("authors[{i}].email"),
                    value: email.clone(),
                });
            }
        }
    }

    if let Some(license) = &doc.license {
        if !is_valid_license(license) {
            errors.push(ValidationError::UnknownLicense(license.clone()));
        }
    }

    for (field, value) in [
        ("license-url", &doc.license_url),
        ("repository-code", &doc.repository_code),
        ("repository-artifact", &doc.repository_artifact),
        ("url", &doc.url),
    ] {
        if let Some(value) = value {
            if !url_pattern().is_match(value) {
                errors.push(ValidationError::InvalidUrl {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
    }

    if let Some(doi) = &doc.doi {
        if !doi_pattern().is_match(doi) {
            errors.push(ValidationError::InvalidDoi {
                field: "doi".to_string(),
                value: doi.clone(),
            });
        }
    }

    if let Some(date) = &doc.date_released {
        if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            errors.push(ValidationError::InvalidDate {
                field: "date-released".to_string(),
                value: date.clone(),
            });
        }
    }

    for (i, identifier) in doc.identifiers.iter().enumerate() {
        if identifier.kind.is_empty() {
            errors.push(ValidationError::MissingRequiredField(format!(
                "identifiers[{i}].type"
            )));
            continue;
        }
        if identifier.value.is_empty() {
            errors.push(ValidationError::MissingRequiredField(format!(
                "identifiers[{i}].value"
            )));
            continue;
        }

        let field = format!("identifiers[{i}].value");
        match IdentifierType::from_name(&identifier.kind) {
            None => errors.push(ValidationError::UnknownIdentifierType {
                field: format!("identifiers[{i}].type"),
                value: identifier.kind.clone(),
            }),
            Some(IdentifierType::Doi) => {
                if !doi_pattern().is_match(&identifier.value) {
                    errors.push(ValidationError::InvalidDoi {
                        field,
                        value: identifier.value.clone(),
                    });
                }
            }
            Some(IdentifierType::Url) => {
                if !url_pattern().is_match(&identifier.value) {
                    errors.push(ValidationError::InvalidUrl {
                        field,
                        value: identifier.value.clone(),
                    });
                }
            }
            Some(IdentifierType::Swh) => {
                if !swh_pattern().is_match(&identifier.value) {
                    errors.push(ValidationError::InvalidSwh {
                        field,
                        value: identifier.value.clone(),
                    });
                }
            }
            Some(IdentifierType::Other) => {}
        }
    }

    errors
}

/// Reports fields outside the `known` set as [`ValidationError::UnknownField`].
///
/// `path` prefixes each reported key (empty for the document root,
/// `"authors[0]."` for a nested record). Used by strict-mode parsing to
/// audit raw YAML mappings before typed deserialization drops what the
/// model does not carry.
///
/// # Examples
///
/// ```
/// use cffkit_core::{KNOWN_IDENTIFIER_FIELDS, ValidationError, audit_fields};
///
/// let errors = audit_fields(
///     "identifiers[0].",
///     &["type", "value", "relation"],
///     KNOWN_IDENTIFIER_FIELDS,
/// );
/// assert_eq!(
///     errors,
///     vec![ValidationError::UnknownField("identifiers[0].relation".into())]
/// );
/// ```
pub fn audit_fields(path: &str, present: &[&str], known: &[&str]) -> Vec<ValidationError> {
    present
        .iter()
        .filter(|key| !known.contains(*key))
        .map(|key| ValidationError::UnknownField(format!("{path}{key}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::types::{Author, Identifier};

    use super::*;

    fn valid_document() -> CffDocument {
        CffDocument::new("eWaterCycle Python package")
            .with_author(
                Author::new("Verhoeven", "Stefan")
                    .with_orcid("https://orcid.org/0000-0002-5821-2060"),
            )
            .with_license("Apache-2.0")
            .with_repository_code("https://github.com/eWaterCycle/ewatercycle")
            .with_identifier(Identifier::doi("10.5281/zenodo.5119389"))
    }

    #[test]
    fn test_valid_document_has_no_errors() {
        assert!(validate_document(&valid_document()).is_empty());
    }

    #[test]
    fn test_each_missing_required_field_is_named() {
        for field in ["cff-version", "message", "title"] {
            let mut doc = valid_document();
            match field {
                "cff-version" => doc.cff_version.clear(),
                "message" => doc.message.clear(),
                _ => doc.title.clear(),
            }
            let errors = validate_document(&doc);
            assert!(
                errors.contains(&ValidationError::MissingRequiredField(field.into())),
                "expected missing-field error for {field}, got {errors:?}"
            );
        }

        let mut doc = valid_document();
        doc.authors.clear();
        assert!(validate_document(&doc)
            .contains(&ValidationError::MissingRequiredField("authors".into())));
    }

    #[test]
    fn test_author_without_names_is_rejected() {
        let mut doc = valid_document();
        doc.authors.push(Author::default());

        let errors = validate_document(&doc);
        assert!(errors.contains(&ValidationError::MissingRequiredField(
            "authors[1].family-names".into()
        )));
        assert!(errors.contains(&ValidationError::MissingRequiredField(
            "authors[1].given-names".into()
        )));
    }

    #[test]
    fn test_malformed_orcid_is_rejected() {
        let mut doc = valid_document();
        doc.authors[0].orcid = Some("https://orcid.org/0000-0002".to_string());

        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![ValidationError::InvalidOrcid {
                field: "authors[0].orcid".into(),
                value: "https://orcid.org/0000-0002".into(),
            }]
        );
    }

    #[test]
    fn test_orcid_checksum_digit_may_be_x() {
        let mut doc = valid_document();
        doc.authors[0].orcid = Some("https://orcid.org/0000-0002-1694-233X".to_string());
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn test_doi_identifier_syntax() {
        let mut doc = valid_document();
        doc.identifiers[0].value = "zenodo.5119389".to_string();

        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![ValidationError::InvalidDoi {
                field: "identifiers[0].value".into(),
                value: "zenodo.5119389".into(),
            }]
        );
    }

    #[test]
    fn test_unrecognized_identifier_type() {
        let doc = valid_document().with_identifier(Identifier {
            kind: "isbn".into(),
            value: "978-3-16-148410-0".into(),
            description: None,
        });

        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownIdentifierType {
                field: "identifiers[1].type".into(),
                value: "isbn".into(),
            }]
        );
    }

    #[test]
    fn test_swh_identifier_syntax() {
        let good = valid_document().with_identifier(Identifier::swh(
            "swh:1:dir:d198bc9d7a6bcf6db04f476d29314f157507d505",
        ));
        assert!(validate_document(&good).is_empty());

        let bad = valid_document()
            .with_identifier(Identifier::swh("swh:1:dir:not-a-hash"));
        assert!(matches!(
            validate_document(&bad).as_slice(),
            [ValidationError::InvalidSwh { .. }]
        ));
    }

    #[test]
    fn test_unknown_license_is_rejected() {
        let mut doc = valid_document();
        doc.license = Some("Not-A-License".to_string());

        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownLicense("Not-A-License".into())]
        );
    }

    #[test]
    fn test_invalid_date_released() {
        let mut doc = valid_document();
        doc.date_released = Some("2021-13-01".to_string());
        assert!(matches!(
            validate_document(&doc).as_slice(),
            [ValidationError::InvalidDate { .. }]
        ));

        doc.date_released = Some("2021-07-21".to_string());
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn test_all_errors_are_collected_in_one_pass() {
        let mut doc = valid_document();
        doc.title.clear();
        doc.license = Some("Not-A-License".to_string());
        doc.authors[0].orcid = Some("bogus".to_string());

        let errors = validate_document(&doc);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_audit_fields_flags_unknown_keys() {
        let errors = audit_fields(
            "",
            &["title", "message", "favourite-colour"],
            KNOWN_DOCUMENT_FIELDS,
        );
        assert_eq!(
            errors,
            vec![ValidationError::UnknownField("favourite-colour".into())]
        );
    }
}
