//! Document merging with configurable conflict resolution.
//!
//! Release automation typically carries an overlay document holding only the
//! fields that change per release (`version`, `date-released`, a fresh DOI)
//! and merges it into the maintained base citation file. [`merge_documents`]
//! combines two documents using a [`MergeStrategy`] to resolve scalar
//! conflicts; sequences are deduplicated while preserving citation order.
//!
//! # Example
//!
//! ```
//! use cffkit_core::*;
//!
//! let base = CffDocument::new("my-tool")
//!     .with_author(Author::new("Researcher", "Alice"));
//!
//! let mut overlay = CffDocument::default();
//! overlay.version = Some("2.1.0".into());
//! overlay.date_released = Some("2026-03-01".into());
//!
//! let merged = merge_documents(&base, &overlay, MergeStrategy::PreferOverlay);
//! assert_eq!(merged.version.as_deref(), Some("2.1.0"));
//! assert_eq!(merged.title, "my-tool");
//! ```

use std::collections::HashMap;

use crate::types::{Author, CffDocument, Identifier};

/// Merge behavior for conflicting scalar fields.
///
/// Sequences (authors, keywords, identifiers) are always combined and
/// deduplicated; the strategy only decides which side's record wins when
/// both define the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep base values when conflicts occur.
    PreferBase,
    /// Keep overlay values when conflicts occur.
    PreferOverlay,
    /// Combine both; overlay wins scalar conflicts.
    Union,
}

/// Merges two citation documents into one.
///
/// Authors are keyed by family + given names, identifiers by type + value,
/// keywords by exact string. Base ordering is preserved with new overlay
/// entries appended, since author order is meaningful in a citation.
///
/// # Examples
///
/// ```
/// use cffkit_core::*;
///
/// let base = CffDocument::new("tool")
///     .with_author(Author::new("Researcher", "Alice"))
///     .with_identifier(Identifier::doi("10.5281/zenodo.1111111"));
///
/// let mut overlay = CffDocument::default();
/// overlay.identifiers.push(Identifier::doi("10.5281/zenodo.1111111"));
/// overlay.identifiers.push(Identifier::doi("10.5281/zenodo.2222222"));
///
/// let merged = merge_documents(&base, &overlay, MergeStrategy::Union);
/// assert_eq!(merged.identifiers.len(), 2); // deduplicated
/// ```
pub fn merge_documents(
    base: &CffDocument,
    overlay: &CffDocument,
    strategy: MergeStrategy,
) -> CffDocument {
    let mut merged = base.clone();

    merged.cff_version = pick_string(&base.cff_version, &overlay.cff_version, strategy);
    merged.message = pick_string(&base.message, &overlay.message, strategy);
    merged.title = pick_string(&base.title, &overlay.title, strategy);

    merged.license = pick_option(&base.license, &overlay.license, strategy);
    merged.license_url = pick_option(&base.license_url, &overlay.license_url, strategy);
    merged.repository_code =
        pick_option(&base.repository_code, &overlay.repository_code, strategy);
    merged.repository_artifact = pick_option(
        &base.repository_artifact,
        &overlay.repository_artifact,
        strategy,
    );
    merged.url = pick_option(&base.url, &overlay.url, strategy);
    merged.doi = pick_option(&base.doi, &overlay.doi, strategy);
    merged.commit = pick_option(&base.commit, &overlay.commit, strategy);
    merged.version = pick_option(&base.version, &overlay.version, strategy);
    merged.date_released = pick_option(&base.date_released, &overlay.date_released, strategy);
    merged.abstract_text = pick_option(&base.abstract_text, &overlay.abstract_text, strategy);

    merged.authors = merge_authors(&base.authors, &overlay.authors, strategy);
    merged.keywords = merge_keywords(&base.keywords, &overlay.keywords);
    merged.identifiers = merge_identifiers(&base.identifiers, &overlay.identifiers);

    merged
}

fn pick_string(base: &str, overlay: &str, strategy: MergeStrategy) -> String {
    let (first, second) = match strategy {
        MergeStrategy::PreferBase => (base, overlay),
        MergeStrategy::PreferOverlay | MergeStrategy::Union => (overlay, base),
    };
    if first.is_empty() {
        second.to_string()
    } else {
        first.to_string()
    }
}

fn pick_option(
    base: &Option<String>,
    overlay: &Option<String>,
    strategy: MergeStrategy,
) -> Option<String> {
    match strategy {
        MergeStrategy::PreferBase => base.clone().or_else(|| overlay.clone()),
        MergeStrategy::PreferOverlay | MergeStrategy::Union => {
            overlay.clone().or_else(|| base.clone())
        }
    }
}

fn author_key(author: &Author) -> String {
    format!("{}\u{1f}{}", author.family_names, author.given_names)
}

fn merge_authors(base: &[Author], overlay: &[Author], strategy: MergeStrategy) -> Vec<Author> {
    let mut merged: Vec<Author> = base.to_vec();
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, a)| (author_key(a), i))
        .collect();

    for author in overlay {
        match index.get(&author_key(author)) {
            Some(&i) => {
                if strategy != MergeStrategy::PreferBase {
                    merged[i] = author.clone();
                }
            }
            None => {
                index.insert(author_key(author), merged.len());
                merged.push(author.clone());
            }
        }
    }

    merged
}

fn merge_keywords(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut merged = base.to_vec();
    for keyword in overlay {
        if !merged.contains(keyword) {
            merged.push(keyword.clone());
        }
    }
    merged
}

fn merge_identifiers(base: &[Identifier], overlay: &[Identifier]) -> Vec<Identifier> {
    let mut merged = base.to_vec();
    for identifier in overlay {
        let duplicate = merged
            .iter()
            .any(|id| id.kind == identifier.kind && id.value == identifier.value);
        if !duplicate {
            merged.push(identifier.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefer_base_keeps_base_scalars() {
        let mut base = CffDocument::new("tool");
        base.version = Some("1.0.0".into());
        let mut overlay = CffDocument::default();
        overlay.version = Some("2.0.0".into());

        let merged = merge_documents(&base, &overlay, MergeStrategy::PreferBase);
        assert_eq!(merged.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_prefer_overlay_takes_release_fields() {
        let mut base = CffDocument::new("tool");
        base.version = Some("1.0.0".into());
        base.date_released = Some("2025-01-01".into());

        let mut overlay = CffDocument::default();
        overlay.version = Some("1.1.0".into());
        overlay.date_released = Some("2026-02-01".into());

        let merged = merge_documents(&base, &overlay, MergeStrategy::PreferOverlay);
        assert_eq!(merged.version.as_deref(), Some("1.1.0"));
        assert_eq!(merged.date_released.as_deref(), Some("2026-02-01"));
        // Fields absent from the overlay fall through to the base.
        assert_eq!(merged.title, "tool");
    }

    #[test]
    fn test_authors_deduplicate_by_name_preserving_order() {
        let base = CffDocument::new("tool")
            .with_author(Author::new("Verhoeven", "Stefan"))
            .with_author(Author::new("Drost", "Niels"));
        let overlay = CffDocument::default()
            .with_author(Author::new("Drost", "Niels").with_orcid(
                "https://orcid.org/0000-0001-9795-7981",
            ))
            .with_author(Author::new("Hut", "Rolf"));

        let merged = merge_documents(&base, &overlay, MergeStrategy::Union);
        let names: Vec<String> = merged.author_names();
        assert_eq!(names, vec!["Stefan Verhoeven", "Niels Drost", "Rolf Hut"]);
        // Union lets the overlay enrich the duplicated record.
        assert!(merged.authors[1].orcid.is_some());
    }

    #[test]
    fn test_keywords_union_without_duplicates() {
        let base = CffDocument::new("tool").with_keyword("hydrology").with_keyword("FAIR");
        let overlay = CffDocument::default().with_keyword("FAIR").with_keyword("bmi");

        let merged = merge_documents(&base, &overlay, MergeStrategy::Union);
        assert_eq!(merged.keywords, vec!["hydrology", "FAIR", "bmi"]);
    }
}
