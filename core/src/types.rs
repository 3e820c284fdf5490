//! Document model for Citation File Format (CFF) metadata.
//!
//! This module defines the typed representation of a `CITATION.cff` document.
//! The types are designed for serialization with [`serde`] and round-trip
//! through YAML and JSON without loss: optional fields that are absent in the
//! source stay absent when the document is written back out.

use serde::{Deserialize, Serialize};

/// CFF schema version this crate targets.
///
/// New documents created with [`CffDocument::new`] declare this version in
/// their `cff-version` field.
pub const CFF_SCHEMA_VERSION: &str = "1.2.0";

/// Default citation request message for new documents.
pub const DEFAULT_MESSAGE: &str =
    "If you use this software, please cite it using the metadata from this file.";

/// Recognized identifier kinds for the `identifiers` sequence.
///
/// The document model stores the raw `type` string so that unrecognized
/// kinds surface as validation errors rather than parse failures; this enum
/// is the closed set the validator accepts.
///
/// # Examples
///
/// ```
/// use cffkit_core::IdentifierType;
///
/// assert_eq!(IdentifierType::from_name("doi"), Some(IdentifierType::Doi));
/// assert_eq!(IdentifierType::from_name("isbn"), None);
/// assert_eq!(IdentifierType::Doi.as_str(), "doi");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    /// Digital Object Identifier (e.g., `10.5281/zenodo.5119389`).
    Doi,
    /// Absolute URL.
    Url,
    /// Software Heritage persistent identifier.
    Swh,
    /// Free-form identifier with no enforced syntax.
    Other,
}

impl IdentifierType {
    /// Parses a raw `type` string into a recognized kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "doi" => Some(Self::Doi),
            "url" => Some(Self::Url),
            "swh" => Some(Self::Swh),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::Url => "url",
            Self::Swh => "swh",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single author of the cited software.
///
/// CFF author records are person records: family and given names are
/// required by validation, while affiliation, ORCID, and email are optional.
///
/// # Examples
///
/// ```
/// use cffkit_core::Author;
///
/// let author = Author::new("Researcher", "Alice")
///     .with_affiliation("Example University")
///     .with_orcid("https://orcid.org/0000-0002-1825-0097");
/// assert_eq!(author.display_name(), "Alice Researcher");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Family name(s), e.g. `"Verhoeven"`.
    #[serde(rename = "family-names", default, skip_serializing_if = "String::is_empty")]
    pub family_names: String,
    /// Given name(s), e.g. `"Stefan"`.
    #[serde(rename = "given-names", default, skip_serializing_if = "String::is_empty")]
    pub given_names: String,
    /// Institutional affiliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// ORCID URI, e.g. `"https://orcid.org/0000-0002-1825-0097"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    /// Contact email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    /// Creates an author from family and given names.
    pub fn new(family_names: &str, given_names: &str) -> Self {
        Self {
            family_names: family_names.to_string(),
            given_names: given_names.to_string(),
            affiliation: None,
            orcid: None,
            email: None,
        }
    }

    /// Adds an institutional affiliation.
    pub fn with_affiliation(mut self, affiliation: &str) -> Self {
        self.affiliation = Some(affiliation.to_string());
        self
    }

    /// Adds an ORCID URI.
    pub fn with_orcid(mut self, orcid: &str) -> Self {
        self.orcid = Some(orcid.to_string());
        self
    }

    /// Adds a contact email.
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    /// Returns `"Given Family"` for display purposes.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_names, self.family_names).trim().to_string()
    }
}

/// A persistent identifier attached to the cited software.
///
/// The `kind` field holds the raw `type` string from the document; the
/// validator checks it against [`IdentifierType`] and enforces the matching
/// value syntax.
///
/// # Examples
///
/// ```
/// use cffkit_core::Identifier;
///
/// let id = Identifier::doi("10.5281/zenodo.5119389")
///     .with_description("The concept DOI of the work.");
/// assert_eq!(id.kind, "doi");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    /// Identifier kind, e.g. `"doi"`, `"url"`, `"swh"`, `"other"`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Identifier value; syntax depends on `kind`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Human-readable description of what this identifier points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Identifier {
    /// Creates an identifier with an explicit kind.
    pub fn new(kind: IdentifierType, value: &str) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            value: value.to_string(),
            description: None,
        }
    }

    /// Creates a DOI identifier.
    pub fn doi(value: &str) -> Self {
        Self::new(IdentifierType::Doi, value)
    }

    /// Creates a URL identifier.
    pub fn url(value: &str) -> Self {
        Self::new(IdentifierType::Url, value)
    }

    /// Creates a Software Heritage identifier.
    pub fn swh(value: &str) -> Self {
        Self::new(IdentifierType::Swh, value)
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Complete representation of a `CITATION.cff` document.
///
/// This is the primary type in the crate. Field names follow the CFF schema
/// (kebab-case in the serialized form); required fields deserialize as empty
/// values when absent so that the validator can report them with a field
/// path instead of failing the parse.
///
/// # Examples
///
/// ```
/// use cffkit_core::{Author, CffDocument, Identifier};
///
/// let doc = CffDocument::new("my-tool")
///     .with_author(Author::new("Researcher", "Alice"))
///     .with_license("Apache-2.0")
///     .with_identifier(Identifier::doi("10.5281/zenodo.1234567"));
///
/// assert_eq!(doc.cff_version, cffkit_core::CFF_SCHEMA_VERSION);
/// assert_eq!(doc.doi(), Some("10.5281/zenodo.1234567"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CffDocument {
    /// Declared CFF schema version, e.g. `"1.2.0"`.
    #[serde(rename = "cff-version", default, skip_serializing_if = "String::is_empty")]
    pub cff_version: String,
    /// Citation request message shown to users.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Title of the cited software.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Ordered author list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,
    /// Keyword strings describing the software.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// SPDX license identifier, e.g. `"Apache-2.0"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// URL of the license text for non-standard licenses.
    #[serde(rename = "license-url", default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    /// URL of the source code repository.
    #[serde(rename = "repository-code", default, skip_serializing_if = "Option::is_none")]
    pub repository_code: Option<String>,
    /// URL of a build or release artifact.
    #[serde(rename = "repository-artifact", default, skip_serializing_if = "Option::is_none")]
    pub repository_artifact: Option<String>,
    /// Landing page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// DOI of the work (shortcut for a `doi` identifier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Commit hash or tag the citation refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Released version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Release date as an ISO calendar date, e.g. `"2021-07-21"`.
    #[serde(rename = "date-released", default, skip_serializing_if = "Option::is_none")]
    pub date_released: Option<String>,
    /// Abstract or short description.
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// Additional persistent identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<Identifier>,
}

impl CffDocument {
    /// Creates a new document with the given title.
    ///
    /// The `cff-version` is set to [`CFF_SCHEMA_VERSION`] and `message` to
    /// [`DEFAULT_MESSAGE`]; authors must be added before the document
    /// validates.
    pub fn new(title: &str) -> Self {
        Self {
            cff_version: CFF_SCHEMA_VERSION.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Appends an author.
    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }

    /// Appends a keyword.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keywords.push(keyword.to_string());
        self
    }

    /// Sets the SPDX license identifier.
    pub fn with_license(mut self, license: &str) -> Self {
        self.license = Some(license.to_string());
        self
    }

    /// Sets the source repository URL.
    pub fn with_repository_code(mut self, url: &str) -> Self {
        self.repository_code = Some(url.to_string());
        self
    }

    /// Sets the released version string.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Sets the release date (`YYYY-MM-DD`).
    pub fn with_date_released(mut self, date: &str) -> Self {
        self.date_released = Some(date.to_string());
        self
    }

    /// Appends a persistent identifier.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifiers.push(identifier);
        self
    }

    /// Returns the DOI of the work, if any.
    ///
    /// The top-level `doi` field wins; otherwise the first identifier of
    /// kind `doi` is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use cffkit_core::{CffDocument, Identifier};
    ///
    /// let doc = CffDocument::new("tool")
    ///     .with_identifier(Identifier::doi("10.5281/zenodo.5119389"));
    /// assert_eq!(doc.doi(), Some("10.5281/zenodo.5119389"));
    /// ```
    pub fn doi(&self) -> Option<&str> {
        if let Some(doi) = self.doi.as_deref() {
            return Some(doi);
        }
        self.identifiers
            .iter()
            .find(|id| id.kind == IdentifierType::Doi.as_str())
            .map(|id| id.value.as_str())
    }

    /// Finds the first identifier of the given kind.
    pub fn find_identifier(&self, kind: IdentifierType) -> Option<&Identifier> {
        self.identifiers.iter().find(|id| id.kind == kind.as_str())
    }

    /// Returns display names for all authors, in document order.
    pub fn author_names(&self) -> Vec<String> {
        self.authors.iter().map(Author::display_name).collect()
    }
}
