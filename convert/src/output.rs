//! Output formatting for citation documents and validation reports.

use cffkit_core::{Author, CffDocument};

use crate::report::ValidationReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    #[cfg_attr(feature = "clap", value(name = "bibtex"))]
    BibTex,
    #[cfg_attr(feature = "clap", value(name = "apalike"))]
    ApaLike,
    Markdown,
}

/// Formats a citation document in the requested output format.
pub fn format_citation(doc: &CffDocument, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(doc)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(doc).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::BibTex => Ok(citation_to_bibtex(doc)),
        OutputFormat::ApaLike => Ok(citation_to_apalike(doc)),
        OutputFormat::Markdown => Ok(citation_to_markdown(doc)),
    }
}

/// Formats a validation report in the requested output format.
///
/// BibTeX and APA-like make no sense for reports; those fall back to the
/// human-readable Markdown rendering.
pub fn format_report(report: &ValidationReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::BibTex | OutputFormat::ApaLike | OutputFormat::Markdown => {
            Ok(report_to_markdown(report))
        }
    }
}

/// Derives a BibTeX citation key from the document title.
///
/// Lowercased, with runs of non-alphanumerics collapsed to single
/// underscores: `"eWaterCycle Python package"` → `ewatercycle_python_package`.
pub fn citation_key(doc: &CffDocument) -> String {
    let mut key = String::with_capacity(doc.title.len());
    let mut last_was_sep = true;
    for ch in doc.title.chars() {
        if ch.is_ascii_alphanumeric() {
            key.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            key.push('_');
            last_was_sep = true;
        }
    }
    let key = key.trim_matches('_').to_string();
    if key.is_empty() { "software".to_string() } else { key }
}

fn release_year(doc: &CffDocument) -> Option<String> {
    let date = doc.date_released.as_deref()?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y").to_string())
}

/// Escapes characters BibTeX treats specially.
fn bibtex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '{' | '}' | '%' | '&' | '#' | '_' | '$' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn bibtex_author_list(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|a| format!("{}, {}", bibtex_escape(&a.family_names), bibtex_escape(&a.given_names)))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn citation_to_bibtex(doc: &CffDocument) -> String {
    let mut fields: Vec<(&str, String)> = Vec::new();

    fields.push(("author", bibtex_author_list(&doc.authors)));
    fields.push(("title", format!("{{{}}}", bibtex_escape(&doc.title))));
    if let Some(year) = release_year(doc) {
        fields.push(("year", year));
    }
    if let Some(doi) = doc.doi() {
        fields.push(("doi", doi.to_string()));
    }
    if let Some(url) = doc.repository_code.as_deref().or(doc.url.as_deref()) {
        fields.push(("url", url.to_string()));
    }
    if let Some(version) = &doc.version {
        fields.push(("version", version.clone()));
    }
    if let Some(license) = &doc.license {
        fields.push(("license", license.clone()));
    }

    let mut out = format!("@software{{{},\n", citation_key(doc));
    let last = fields.len().saturating_sub(1);
    for (i, (name, value)) in fields.iter().enumerate() {
        let comma = if i == last { "" } else { "," };
        out.push_str(&format!("  {name} = {{{value}}}{comma}\n"));
    }
    out.push_str("}\n");
    out
}

fn apalike_author_list(authors: &[Author]) -> String {
    let rendered: Vec<String> = authors
        .iter()
        .map(|a| {
            let initial = a.given_names.chars().next().map(|c| format!(" {c}.")).unwrap_or_default();
            format!("{}{}", a.family_names, initial)
        })
        .collect();

    match rendered.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} & {}", head.join(", "), last),
    }
}

fn citation_to_apalike(doc: &CffDocument) -> String {
    let mut out = apalike_author_list(&doc.authors);

    if let Some(year) = release_year(doc) {
        out.push_str(&format!(" ({year})."));
    } else {
        out.push('.');
    }

    out.push_str(&format!(" {}", doc.title));
    if let Some(version) = &doc.version {
        out.push_str(&format!(" (Version {version})"));
    }
    out.push_str(" [Computer software].");

    if let Some(doi) = doc.doi() {
        out.push_str(&format!(" https://doi.org/{doi}"));
    } else if let Some(url) = doc.repository_code.as_deref().or(doc.url.as_deref()) {
        out.push_str(&format!(" {url}"));
    }

    out.push('\n');
    out
}

fn citation_to_markdown(doc: &CffDocument) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", doc.title));

    if !doc.message.is_empty() {
        out.push_str(&format!("{}\n\n", doc.message));
    }

    if let Some(abstract_text) = &doc.abstract_text {
        out.push_str(&format!("{abstract_text}\n\n"));
    }

    if !doc.authors.is_empty() {
        out.push_str("## Authors\n\n");
        out.push_str("| Name | Affiliation | ORCID |\n");
        out.push_str("|------|-------------|-------|\n");
        for author in &doc.authors {
            let affiliation = author.affiliation.as_deref().unwrap_or("");
            let orcid = author.orcid.as_deref().unwrap_or("");
            out.push_str(&format!(
                "| {} | {affiliation} | {orcid} |\n",
                author.display_name()
            ));
        }
        out.push('\n');
    }

    let mut facts: Vec<(&str, String)> = Vec::new();
    if let Some(version) = &doc.version {
        facts.push(("Version", version.clone()));
    }
    if let Some(date) = &doc.date_released {
        facts.push(("Released", date.clone()));
    }
    if let Some(license) = &doc.license {
        facts.push(("License", license.clone()));
    }
    if let Some(doi) = doc.doi() {
        facts.push(("DOI", format!("[{doi}](https://doi.org/{doi})")));
    }
    if let Some(repo) = &doc.repository_code {
        facts.push(("Repository", repo.clone()));
    }
    if !facts.is_empty() {
        for (name, value) in facts {
            out.push_str(&format!("**{name}:** {value}\n\n"));
        }
    }

    if !doc.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", doc.keywords.join(", ")));
    }

    out
}

fn report_to_markdown(report: &ValidationReport) -> String {
    let mut out = String::new();
    let verdict = if report.ok { "ok" } else { "FAILED" };
    out.push_str(&format!("## {} — {verdict}\n\n", report.path));

    if let Some(title) = &report.title {
        out.push_str(&format!("Title: {title}\n\n"));
    }
    for error in &report.errors {
        out.push_str(&format!("- error: {error}\n"));
    }
    for warning in &report.warnings {
        out.push_str(&format!("- warning: {warning}\n"));
    }
    if !report.errors.is_empty() || !report.warnings.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use cffkit_core::{Author, Identifier};

    use super::*;

    fn sample_document() -> CffDocument {
        CffDocument::new("eWaterCycle Python package")
            .with_author(Author::new("Verhoeven", "Stefan"))
            .with_author(Author::new("Drost", "Niels"))
            .with_license("Apache-2.0")
            .with_version("1.1.4")
            .with_date_released("2021-07-21")
            .with_repository_code("https://github.com/eWaterCycle/ewatercycle")
            .with_identifier(Identifier::doi("10.5281/zenodo.5119389"))
    }

    #[test]
    fn test_citation_key_from_title() {
        assert_eq!(citation_key(&sample_document()), "ewatercycle_python_package");
        assert_eq!(citation_key(&CffDocument::new("--")), "software");
    }

    #[test]
    fn test_bibtex_output() {
        let bibtex = citation_to_bibtex(&sample_document());
        assert!(bibtex.starts_with("@software{ewatercycle_python_package,"));
        assert!(bibtex.contains("author = {Verhoeven, Stefan and Drost, Niels}"));
        assert!(bibtex.contains("year = {2021}"));
        assert!(bibtex.contains("doi = {10.5281/zenodo.5119389}"));
        assert!(bibtex.trim_end().ends_with('}'));
    }

    #[test]
    fn test_bibtex_escapes_special_characters() {
        let doc = CffDocument::new("100% C&O_2 model");
        let bibtex = citation_to_bibtex(&doc);
        assert!(bibtex.contains(r"100\% C\&O\_2 model"));
    }

    #[test]
    fn test_apalike_output() {
        let apa = citation_to_apalike(&sample_document());
        assert_eq!(
            apa.trim_end(),
            "Verhoeven S. & Drost N. (2021). eWaterCycle Python package (Version 1.1.4) \
             [Computer software]. https://doi.org/10.5281/zenodo.5119389"
        );
    }

    #[test]
    fn test_apalike_single_author_without_date() {
        let doc = CffDocument::new("tool").with_author(Author::new("Researcher", "Alice"));
        let apa = citation_to_apalike(&doc);
        assert!(apa.starts_with("Researcher A. tool"));
    }
    #[test]
    fn test_markdown_output_lists_authors() {
        let md = citation_to_markdown(&sample_document());
        assert!(md.starts_with("# eWaterCycle Python package"));
        assert!(md.contains("| Stefan Verhoeven |"));
        assert!(md.contains("**License:** Apache-2.0"));
    }

    #[test]
    fn test_json_yaml_round_trip_identical() {
        let doc = sample_document();
        let json = format_citation(&doc, OutputFormat::Json).unwrap();
        let yaml = format_citation(&doc, OutputFormat::Yaml).unwrap();

        let from_json: CffDocument = serde_json::from_str(&json).unwrap();
        let from_yaml: CffDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(from_json, doc);
        assert_eq!(from_yaml, doc);
    }
}
