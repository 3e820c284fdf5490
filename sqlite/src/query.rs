//! Runtime citation access via SQLite queries.
//!
//! Provides [`CitationQuery`] for CRUD and search operations on citation
//! records stored in the normalized SQLite tables. All mutations use
//! transactions, and the cascading foreign key constraints handle cleanup
//! automatically on updates and deletes.
//!
//! # Example
//!
//! ```no_run
//! use cffkit_core::{Author, CffDocument};
//! use cffkit_sqlite::CitationQuery;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("citations.db").unwrap();
//! let query = CitationQuery::new(&conn, "cff_").unwrap();
//!
//! let doc = CffDocument::new("my-tool")
//!     .with_author(Author::new("Researcher", "Alice"));
//! query.insert(&doc).unwrap();
//!
//! let loaded = query.get("my-tool").unwrap();
//! assert!(loaded.is_some());
//!
//! query.delete("my-tool").unwrap();
//! ```

use cffkit_core::CffDocument;
use rusqlite::{Connection, params};

use crate::convert;
use crate::error::{Result, SqliteError};
use crate::schema::validate_prefix;

/// Query interface for reading and writing citation records in SQLite.
///
/// Wraps a connection and table prefix, providing high-level operations
/// that delegate to the `convert` module for the actual row-level
/// transformations.
pub struct CitationQuery<'a> {
    conn: &'a Connection,
    prefix: String,
}

impl<'a> CitationQuery<'a> {
    /// Creates a new query interface for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
    pub fn new(conn: &'a Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, prefix })
    }

    /// Loads a single citation record by title.
    ///
    /// Returns `None` if no record with the given title exists. The returned
    /// document includes all authors, identifiers, and keywords in their
    /// original order.
    pub fn get(&self, title: &str) -> Result<Option<CffDocument>> {
        convert::load_citation(self.conn, &self.prefix, title)
    }

    /// Returns all citation titles, sorted.
    pub fn titles(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT title FROM {}citations ORDER BY title",
            self.prefix
        ))?;
        let titles = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    /// Loads all citation records, sorted by title.
    pub fn get_all(&self) -> Result<Vec<CffDocument>> {
        let titles = self.titles()?;
        let mut documents = Vec::with_capacity(titles.len());
        for title in &titles {
            if let Some(document) = self.get(title)? {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    /// Finds citations with an author matching the given family name.
    ///
    /// Matching is case-insensitive and exact (not substring).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use cffkit_sqlite::CitationQuery;
    /// # use rusqlite::Connection;
    /// # let conn = Connection::open("citations.db").unwrap();
    /// # let query = CitationQuery::new(&conn, "cff_").unwrap();
    /// for doc in query.search_by_author("Verhoeven").unwrap() {
    ///     println!("{}", doc.title);
    /// }
    /// ```
    pub fn search_by_author(&self, family_names: &str) -> Result<Vec<CffDocument>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT c.title FROM {p}citations c \
             JOIN {p}authors a ON a.citation_id = c.id \
             WHERE a.family_names = ?1 COLLATE NOCASE \
             ORDER BY c.title",
            p = self.prefix
        ))?;
        let titles: Vec<String> = stmt
            .query_map(params![family_names], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.load_titles(&titles)
    }

    /// Finds citations tagged with the given keyword (case-insensitive).
    pub fn search_by_keyword(&self, keyword: &str) -> Result<Vec<CffDocument>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT c.title FROM {p}citations c \
             JOIN {p}keywords k ON k.citation_id = c.id \
             WHERE k.keyword = ?1 COLLATE NOCASE \
             ORDER BY c.title",
            p = self.prefix
        ))?;
        let titles: Vec<String> = stmt
            .query_map(params![keyword], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.load_titles(&titles)
    }

    /// Finds the citation carrying the given DOI, either in the top-level
    /// field or in a `doi` identifier.
    pub fn find_by_doi(&self, doi: &str) -> Result<Option<CffDocument>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT c.title FROM {p}citations c \
             LEFT JOIN {p}identifiers i ON i.citation_id = c.id AND i.kind = 'doi' \
             WHERE c.doi = ?1 OR i.value = ?1 \
             LIMIT 1",
            p = self.prefix
        ))?;
        let title: Option<String> = stmt
            .query_map(params![doi], |row| row.get::<_, String>(0))?
            .next()
            .transpose()?;

        match title {
            Some(title) => self.get(&title),
            None => Ok(None),
        }
    }

    /// Inserts a new citation record.
    ///
    /// All related rows (authors, identifiers, keywords) are inserted within
    /// a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a record with the same title already exists.
    pub fn insert(&self, document: &CffDocument) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        convert::insert_citation(&tx, &self.prefix, document)?;
        tx.commit()?;
        Ok(())
    }

    /// Replaces an existing citation record.
    ///
    /// Deletes the existing record (cascading to all related rows) and
    /// inserts the new document. Operates within a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::CitationNotFound`] if no record with the
    /// document's title exists.
    pub fn update(&self, document: &CffDocument) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let deleted = tx.execute(
            &format!("DELETE FROM {}citations WHERE title = ?1", self.prefix),
            params![document.title],
        )?;
        if deleted == 0 {
            return Err(SqliteError::CitationNotFound(document.title.clone()));
        }

        convert::insert_citation(&tx, &self.prefix, document)?;
        tx.commit()?;
        Ok(())
    }

    /// Deletes a citation record by title.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::CitationNotFound`] if no record exists.
    pub fn delete(&self, title: &str) -> Result<()> {
        let deleted = self.conn.execute(
            &format!("DELETE FROM {}citations WHERE title = ?1", self.prefix),
            params![title],
        )?;
        if deleted == 0 {
            return Err(SqliteError::CitationNotFound(title.to_string()));
        }
        Ok(())
    }

    /// Returns the number of citation records.
    pub fn count(&self) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT COUNT(*) FROM {}citations", self.prefix))?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn load_titles(&self, titles: &[String]) -> Result<Vec<CffDocument>> {
        let mut documents = Vec::with_capacity(titles.len());
        for title in titles {
            if let Some(document) = self.get(title)? {
                documents.push(document);
            }
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use cffkit_core::{Author, Identifier};
    use rusqlite::Connection;

    use crate::schema::generate_schema_sql;

    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&generate_schema_sql("cff_").unwrap())
            .unwrap();
        conn
    }

    fn sample(title: &str, family: &str) -> CffDocument {
        CffDocument::new(title)
            .with_author(Author::new(family, "Alice"))
            .with_keyword("hydrology")
            .with_identifier(Identifier::doi("10.5281/zenodo.5119389"))
    }

    #[test]
    fn test_insert_get_delete_cycle() {
        let conn = test_conn();
        let query = CitationQuery::new(&conn, "cff_").unwrap();

        query.insert(&sample("tool", "Researcher")).unwrap();
        assert_eq!(query.count().unwrap(), 1);

        let loaded = query.get("tool").unwrap().unwrap();
        assert_eq!(loaded.authors[0].family_names, "Researcher");

        query.delete("tool").unwrap();
        assert_eq!(query.count().unwrap(), 0);
        assert!(matches!(
            query.delete("tool"),
            Err(SqliteError::CitationNotFound(_))
        ));
    }

    #[test]
    fn test_search_by_author_case_insensitive() {
        let conn = test_conn();
        let query = CitationQuery::new(&conn, "cff_").unwrap();
        query.insert(&sample("tool-a", "Verhoeven")).unwrap();
        query.insert(&sample("tool-b", "Drost")).unwrap();

        let hits = query.search_by_author("verhoeven").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "tool-a");
    }

    #[test]
    fn test_search_by_keyword() {
        let conn = test_conn();
        let query = CitationQuery::new(&conn, "cff_").unwrap();
        query.insert(&sample("tool-a", "Verhoeven")).unwrap();

        assert_eq!(query.search_by_keyword("Hydrology").unwrap().len(), 1);
        assert!(query.search_by_keyword("astronomy").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_doi_checks_field_and_identifiers() {
        let conn = test_conn();
        let query = CitationQuery::new(&conn, "cff_").unwrap();
        query.insert(&sample("tool-a", "Verhoeven")).unwrap();

        let hit = query.find_by_doi("10.5281/zenodo.5119389").unwrap();
        assert_eq!(hit.unwrap().title, "tool-a");
        assert!(query.find_by_doi("10.1000/none").unwrap().is_none());
    }

    #[test]
    fn test_update_replaces_children() {
        let conn = test_conn();
        let query = CitationQuery::new(&conn, "cff_").unwrap();
        query.insert(&sample("tool", "Researcher")).unwrap();

        let mut updated = sample("tool", "Researcher");
        updated.keywords = vec!["renamed".to_string()];
        query.update(&updated).unwrap();

        let loaded = query.get("tool").unwrap().unwrap();
        assert_eq!(loaded.keywords, vec!["renamed"]);

        assert!(matches!(
            query.update(&sample("missing", "X")),
            Err(SqliteError::CitationNotFound(_))
        ));
    }
}
