//! Bidirectional conversion between [`CffDocument`] and SQLite rows.
//!
//! Handles inserting citation records into the normalized table structure
//! and reconstructing them from SQL queries. Preserves full round-trip
//! fidelity: author, identifier, and keyword order are restored from the
//! stored positions, and absent optional fields stay absent.
//!
//! # Internal API
//!
//! Most functions in this module are `pub(crate)` and used by
//! [`Migration`](crate::Migration) and [`CitationQuery`](crate::CitationQuery).

use cffkit_core::{Author, CffDocument, Identifier};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;

/// Row counts produced by seed and insert operations.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct InsertCounts {
    pub citations: usize,
    pub authors: usize,
    pub identifiers: usize,
    pub keywords: usize,
}

impl InsertCounts {
    pub(crate) fn merge(&mut self, other: &InsertCounts) {
        self.citations += other.citations;
        self.authors += other.authors;
        self.identifiers += other.identifiers;
        self.keywords += other.keywords;
    }
}

/// Inserts a full citation record and returns the row counts.
pub(crate) fn insert_citation(
    conn: &Connection,
    prefix: &str,
    document: &CffDocument,
) -> Result<InsertCounts> {
    let mut counts = InsertCounts::default();

    conn.execute(
        &format!(
            "INSERT INTO {prefix}citations \
             (title, cff_version, message, license, license_url, repository_code, \
              repository_artifact, url, doi, commit_ref, version, date_released, abstract) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ),
        params![
            document.title,
            document.cff_version,
            document.message,
            document.license,
            document.license_url,
            document.repository_code,
            document.repository_artifact,
            document.url,
            document.doi,
            document.commit,
            document.version,
            document.date_released,
            document.abstract_text,
        ],
    )?;
    let citation_id = conn.last_insert_rowid();
    counts.citations += 1;

    for (position, author) in document.authors.iter().enumerate() {
        conn.execute(
            &format!(
                "INSERT INTO {prefix}authors \
                 (citation_id, position, family_names, given_names, affiliation, orcid, email) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            params![
                citation_id,
                position as i64,
                author.family_names,
                author.given_names,
                author.affiliation,
                author.orcid,
                author.email,
            ],
        )?;
        counts.authors += 1;
    }

    for (position, identifier) in document.identifiers.iter().enumerate() {
        conn.execute(
            &format!(
                "INSERT INTO {prefix}identifiers \
                 (citation_id, position, kind, value, description) \
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ),
            params![
                citation_id,
                position as i64,
                identifier.kind,
                identifier.value,
                identifier.description,
            ],
        )?;
        counts.identifiers += 1;
    }

    for (position, keyword) in document.keywords.iter().enumerate() {
        conn.execute(
            &format!(
                "INSERT INTO {prefix}keywords (citation_id, position, keyword) \
                 VALUES (?1, ?2, ?3)"
            ),
            params![citation_id, position as i64, keyword],
        )?;
        counts.keywords += 1;
    }

    Ok(counts)
}

/// Loads a citation record by title, or `None` if it does not exist.
pub(crate) fn load_citation(
    conn: &Connection,
    prefix: &str,
    title: &str,
) -> Result<Option<CffDocument>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT id, title, cff_version, message, license, license_url, \
                 repository_code, repository_artifact, url, doi, commit_ref, version, \
                 date_released, abstract \
                 FROM {prefix}citations WHERE title = ?1"
            ),
            params![title],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    CffDocument {
                        title: row.get(1)?,
                        cff_version: row.get(2)?,
                        message: row.get(3)?,
                        license: row.get(4)?,
                        license_url: row.get(5)?,
                        repository_code: row.get(6)?,
                        repository_artifact: row.get(7)?,
                        url: row.get(8)?,
                        doi: row.get(9)?,
                        commit: row.get(10)?,
                        version: row.get(11)?,
                        date_released: row.get(12)?,
                        abstract_text: row.get(13)?,
                        authors: Vec::new(),
                        keywords: Vec::new(),
                        identifiers: Vec::new(),
                    },
                ))
            },
        )
        .optional()?;

    let Some((citation_id, mut document)) = row else {
        return Ok(None);
    };

    document.authors = load_authors(conn, prefix, citation_id)?;
    document.identifiers = load_identifiers(conn, prefix, citation_id)?;
    document.keywords = load_keywords(conn, prefix, citation_id)?;

    Ok(Some(document))
}

fn load_authors(conn: &Connection, prefix: &str, citation_id: i64) -> Result<Vec<Author>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT family_names, given_names, affiliation, orcid, email \
         FROM {prefix}authors WHERE citation_id = ?1 ORDER BY position"
    ))?;
    let authors = stmt
        .query_map(params![citation_id], |row| {
            Ok(Author {
                family_names: row.get(0)?,
                given_names: row.get(1)?,
                affiliation: row.get(2)?,
                orcid: row.get(3)?,
                email: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(authors)
}

fn load_identifiers(
    conn: &Connection,
    prefix: &str,
    citation_id: i64,
) -> Result<Vec<Identifier>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT kind, value, description \
         FROM {prefix}identifiers WHERE citation_id = ?1 ORDER BY position"
    ))?;
    let identifiers = stmt
        .query_map(params![citation_id], |row| {
            Ok(Identifier {
                kind: row.get(0)?,
                value: row.get(1)?,
                description: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(identifiers)
}

fn load_keywords(conn: &Connection, prefix: &str, citation_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT keyword FROM {prefix}keywords WHERE citation_id = ?1 ORDER BY position"
    ))?;
    let keywords = stmt
        .query_map(params![citation_id], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(keywords)
}
