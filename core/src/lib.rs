//! Core document model, validation, and merge primitives for Citation File
//! Format (CFF) metadata.

mod collection;
mod merge;
mod spdx;
mod types;
mod validate;

pub use collection::CitationCollection;
pub use merge::{MergeStrategy, merge_documents};
pub use spdx::{is_valid_license, suggest_license};
pub use types::*;
pub use validate::{
    KNOWN_AUTHOR_FIELDS, KNOWN_DOCUMENT_FIELDS, KNOWN_IDENTIFIER_FIELDS, ValidationError,
    audit_fields, validate_document,
};
