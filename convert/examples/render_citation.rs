//! Parse a CITATION.cff file and render it as BibTeX and APA-like text.
//!
//! Usage:
//!
//! cargo run -p cffkit-convert --example render_citation -- path/to/CITATION.cff

use cffkit_convert::output::{OutputFormat, format_citation};
use cffkit_convert::parse_citation;
use cffkit_core::validate_document;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "CITATION.cff".to_string());
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {path}: {e}"));

    let document = parse_citation(&text).expect("failed to parse citation file");
    let errors = validate_document(&document);
    if !errors.is_empty() {
        eprintln!("{path} has {} validation error(s):", errors.len());
        for error in &errors {
            eprintln!("  {error}");
        }
        std::process::exit(1);
    }

    println!("{}", format_citation(&document, OutputFormat::BibTex).unwrap());
    println!("{}", format_citation(&document, OutputFormat::ApaLike).unwrap());
}
