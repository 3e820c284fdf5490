//! Parsing, validation reporting, and format conversion for CITATION.cff
//! documents.
//!
//! This crate is the I/O-facing layer on top of [`cffkit_core`]: it turns
//! raw YAML text into typed documents, audits fields in strict mode, renders
//! citation metadata into downstream formats (BibTeX, APA-like text,
//! Markdown), and batch-validates whole directory trees.

mod parser;
mod report;
mod scan;

pub mod output;

pub use parser::{ParseError, parse_citation, parse_citation_strict};
pub use report::{ReportBundle, ValidationReport, document_warnings};
pub use scan::{
    ConvertError, bundle_citation_files, collect_citation_paths, validate_citation_file,
    validate_citation_files,
};
