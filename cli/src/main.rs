use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cffkit_convert::output::{OutputFormat, format_citation, format_report};
use cffkit_convert::{
    ReportBundle, bundle_citation_files, collect_citation_paths, parse_citation,
    validate_citation_file, validate_citation_files,
};
use cffkit_core::{Author, CffDocument, Identifier, MergeStrategy, merge_documents, validate_document};
use cffkit_db::{CheckConfig, Manifest, RecordMetadata, default_config_path, write_bundle};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "cffkit")]
#[command(about = "Validate, convert, and index CITATION.cff files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more citation files or directories.
    Validate(ValidateArgs),
    /// Convert a citation file to another format.
    Convert(ConvertArgs),
    /// Create a new CITATION.cff file.
    Init(InitArgs),
    /// Merge release metadata into an existing citation file.
    Update(UpdateArgs),
    /// Bundle citation files into a collection file.
    Bundle(BundleArgs),
    /// Manifest-driven re-validation for CI: only changed files are checked.
    CiCheck(CiCheckArgs),
    /// SQLite citation index migration and seeding operations.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Citation files and/or directories to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Reject fields the CFF schema does not define.
    #[arg(long)]
    strict: bool,
    /// Report output format (default: human-readable markdown).
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Citation file to convert.
    #[arg(long)]
    input: PathBuf,
    /// Target format.
    #[arg(long, value_enum, default_value = "bibtex")]
    format: OutputFormat,
    /// Output file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Title of the cited software.
    #[arg(long)]
    title: String,
    /// Author as "Family,Given[,affiliation[,orcid]]"; repeatable.
    #[arg(long = "author", required = true)]
    authors: Vec<String>,
    /// SPDX license identifier.
    #[arg(long)]
    license: Option<String>,
    /// Source repository URL.
    #[arg(long)]
    repository_code: Option<String>,
    /// Released version string.
    #[arg(long)]
    version: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[arg(long)]
    date_released: Option<String>,
    /// DOI of the work.
    #[arg(long)]
    doi: Option<String>,
    /// Keyword; repeatable.
    #[arg(long = "keyword")]
    keywords: Vec<String>,
    /// Output path.
    #[arg(long, default_value = "CITATION.cff")]
    output: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Citation file to update.
    #[arg(long)]
    input: PathBuf,
    /// New released version string.
    #[arg(long)]
    version: Option<String>,
    /// New release date (YYYY-MM-DD).
    #[arg(long)]
    date_released: Option<String>,
    /// DOI of the new release, appended to the identifiers.
    #[arg(long)]
    doi: Option<String>,
    /// Commit hash or tag of the release.
    #[arg(long)]
    commit: Option<String>,
    /// Write the merged document back to the input file.
    #[arg(long)]
    in_place: bool,
    /// Output file (default: stdout unless --in-place).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Citation files and/or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output collection path.
    #[arg(long)]
    output: PathBuf,
    /// Compress the output with gzip.
    #[arg(long)]
    gzip: bool,
    /// Optional collection name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional collection description metadata.
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct CiCheckArgs {
    /// Path to the check configuration YAML (default: user config).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path to the manifest JSON.
    #[arg(long)]
    manifest: PathBuf,
    /// Re-validate everything, ignoring recorded checksums.
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[command(subcommand)]
    operation: MigrateOperation,
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create citation tables in the database.
    Up(MigrateTargetArgs),
    /// Drop citation tables from the database.
    Down(MigrateTargetArgs),
    /// Seed the database with JSON citation records from a directory.
    Seed(MigrateSeedArgs),
    /// Drop tables, recreate, and reseed from a directory.
    Refresh(MigrateSeedArgs),
    /// Show migration and table status.
    Status(MigrateTargetArgs),
}

#[derive(Debug, Args)]
struct MigrateTargetArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Table prefix.
    #[arg(long, default_value = "cff_")]
    prefix: String,
}

#[derive(Debug, Args)]
struct MigrateSeedArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Table prefix.
    #[arg(long, default_value = "cff_")]
    prefix: String,
    /// Source directory with JSON citation records.
    #[arg(long)]
    source: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Convert(args) => run_convert(args),
        Command::Init(args) => run_init(args),
        Command::Update(args) => run_update(args),
        Command::Bundle(args) => run_bundle(args),
        Command::CiCheck(args) => run_ci_check(args),
        Command::Migrate(args) => run_migrate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_citation_paths(&args.inputs).map_err(|e| e.to_string())?;
    let reports = validate_citation_files(&paths, args.strict);
    let bundle = ReportBundle::new(PACKAGE_VERSION, reports);

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&bundle)
                .map_err(|e| format!("Failed to serialize report: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&bundle)
                .map_err(|e| format!("Failed to serialize report: {e}"))?;
            println!("{yaml}");
        }
        _ => {
            for report in &bundle.reports {
                print!("{}", format_report(report, OutputFormat::Markdown)?);
            }
            println!(
                "{} file(s) checked: {} passed, {} failed.",
                bundle.reports.len(),
                bundle.passed,
                bundle.failed
            );
        }
    }

    if bundle.failed > 0 {
        return Err(format!("{} citation file(s) failed validation", bundle.failed));
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input)
        .map_err(|e| format!("Failed to read '{}': {e}", args.input.display()))?;
    let document = parse_citation(&text).map_err(|e| e.to_string())?;

    let errors = validate_document(&document);
    if !errors.is_empty() {
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(format!(
            "'{}' failed validation:\n  {}",
            args.input.display(),
            rendered.join("\n  ")
        ));
    }

    let rendered = format_citation(&document, args.format)?;
    match args.output {
        Some(path) => {
            fs::write(&path, rendered)
                .map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
            println!("Wrote {}.", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn run_init(args: InitArgs) -> Result<(), String> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "'{}' already exists; pass --force to overwrite",
            args.output.display()
        ));
    }

    let mut document = CffDocument::new(&args.title);
    for spec in &args.authors {
        document.authors.push(parse_author_spec(spec)?);
    }
    for keyword in &args.keywords {
        document.keywords.push(keyword.clone());
    }
    document.license = args.license;
    document.repository_code = args.repository_code;
    document.version = args.version;
    document.date_released = args.date_released;
    if let Some(doi) = args.doi {
        document.identifiers.push(Identifier::doi(&doi));
    }

    let errors = validate_document(&document);
    if !errors.is_empty() {
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(format!(
            "refusing to write an invalid citation file:\n  {}",
            rendered.join("\n  ")
        ));
    }

    let yaml = serde_yaml::to_string(&document)
        .map_err(|e| format!("Failed to serialize citation: {e}"))?;
    fs::write(&args.output, yaml)
        .map_err(|e| format!("Failed to write '{}': {e}", args.output.display()))?;
    println!("Wrote {}.", args.output.display());
    Ok(())
}

/// Parses "Family,Given[,affiliation[,orcid]]" into an author record.
fn parse_author_spec(spec: &str) -> Result<Author, String> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(format!(
            "invalid author '{spec}': expected \"Family,Given[,affiliation[,orcid]]\""
        ));
    }

    let mut author = Author::new(parts[0], parts[1]);
    if let Some(affiliation) = parts.get(2).filter(|s| !s.is_empty()) {
        author = author.with_affiliation(affiliation);
    }
    if let Some(orcid) = parts.get(3).filter(|s| !s.is_empty()) {
        author = author.with_orcid(orcid);
    }
    Ok(author)
}

fn run_update(args: UpdateArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input)
        .map_err(|e| format!("Failed to read '{}': {e}", args.input.display()))?;
    let base = parse_citation(&text).map_err(|e| e.to_string())?;

    let mut overlay = CffDocument::default();
    overlay.version = args.version;
    overlay.date_released = args.date_released;
    overlay.commit = args.commit;
    if let Some(doi) = args.doi {
        overlay.identifiers.push(Identifier::doi(&doi));
    }

    let merged = merge_documents(&base, &overlay, MergeStrategy::PreferOverlay);
    let errors = validate_document(&merged);
    if !errors.is_empty() {
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(format!(
            "refusing to write an invalid citation file:\n  {}",
            rendered.join("\n  ")
        ));
    }

    let yaml = serde_yaml::to_string(&merged)
        .map_err(|e| format!("Failed to serialize citation: {e}"))?;
    let target = if args.in_place {
        Some(args.input.clone())
    } else {
        args.output
    };
    match target {
        Some(path) => {
            fs::write(&path, yaml)
                .map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
            println!("Wrote {}.", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let paths = collect_citation_paths(&args.inputs).map_err(|e| e.to_string())?;
    let collection =
        bundle_citation_files(&paths, PACKAGE_VERSION, args.name, args.description)
            .map_err(|e| e.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                format!("Failed to create output directory '{}': {e}", parent.display())
            })?;
        }
    }

    write_bundle(&collection, &args.output, args.gzip).map_err(|e| e.to_string())?;
    println!(
        "Bundled {} citation(s) into '{}'.",
        collection.document_count(),
        args.output.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// ci-check command
// ---------------------------------------------------------------------------

fn run_ci_check(args: CiCheckArgs) -> Result<(), String> {
    use rayon::prelude::*;

    // 1. Load the check configuration.
    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()
            .ok_or_else(|| "no configuration file found; pass --config".to_string())?,
    };
    let config = CheckConfig::load(&config_path)
        .map_err(|e| format!("Failed to load config '{}': {e}", config_path.display()))?;
    let policy = config.policy.fingerprint();

    // 2. Load or create the manifest.
    let mut manifest = if args.manifest.exists() {
        Manifest::load(&args.manifest)
            .map_err(|e| format!("Failed to load manifest '{}': {e}", args.manifest.display()))?
    } else {
        Manifest::new(PACKAGE_VERSION.to_string(), policy)
    };

    // 3. Collect candidate files, honoring exclusions.
    let paths = collect_citation_paths(&config.paths).map_err(|e| e.to_string())?;
    let paths: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| !config.is_excluded(path))
        .collect();

    // 4. Decide which files need re-validation.
    let policy_changed = manifest.policy != policy || manifest.tool_version != PACKAGE_VERSION;

    struct FileWork {
        path: PathBuf,
        checksum: String,
        reason: &'static str,
    }

    let mut to_check: Vec<FileWork> = Vec::new();
    let mut skipped = 0usize;

    for path in &paths {
        let checksum = Manifest::calculate_checksum(path)
            .map_err(|e| format!("Failed to checksum '{}': {e}", path.display()))?;
        let key = path.display().to_string();

        let reason = if args.force {
            Some("forced")
        } else if policy_changed {
            Some("policy changed")
        } else {
            match manifest.get(&key) {
                None => Some("new"),
                Some(meta) if meta.checksum != checksum => Some("changed"),
                Some(meta) if !meta.passed => Some("previously failed"),
                Some(_) => None,
            }
        };

        match reason {
            Some(reason) => to_check.push(FileWork {
                path: path.clone(),
                checksum,
                reason,
            }),
            None => skipped += 1,
        }
    }

    // 5. Validate the marked files in parallel.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let strict = config.policy.strict;
    let warnings_as_errors = config.policy.warnings_as_errors;

    struct CheckOutcome {
        work: FileWork,
        title: Option<String>,
        cff_version: Option<String>,
        passed: bool,
        errors: Vec<String>,
    }

    let outcomes: Vec<CheckOutcome> = pool.install(|| {
        to_check
            .into_par_iter()
            .map(|work| {
                let report = validate_citation_file(&work.path, strict);
                let mut errors = report.errors;
                if warnings_as_errors {
                    errors.extend(report.warnings);
                }
                let cff_version = fs::read_to_string(&work.path)
                    .ok()
                    .and_then(|text| parse_citation(&text).ok())
                    .map(|doc| doc.cff_version);
                CheckOutcome {
                    work,
                    title: report.title,
                    cff_version,
                    passed: errors.is_empty(),
                    errors,
                }
            })
            .collect()
    });

    // 6. Update and save the manifest.
    for outcome in &outcomes {
        manifest.update_entry(
            outcome.work.path.display().to_string(),
            RecordMetadata {
                title: outcome.title.clone(),
                cff_version: outcome.cff_version.clone(),
                checksum: outcome.work.checksum.clone(),
                validated_at: chrono::Utc::now().to_rfc3339(),
                passed: outcome.passed,
            },
        );
    }
    manifest.policy = policy;
    manifest.tool_version = PACKAGE_VERSION.to_string();
    manifest
        .save(&args.manifest)
        .map_err(|e| format!("Failed to save manifest '{}': {e}", args.manifest.display()))?;

    // 7. Print the summary.
    let checked = outcomes.len();
    let failed: Vec<&CheckOutcome> = outcomes.iter().filter(|o| !o.passed).collect();

    println!("CI Check Summary:");
    println!("  Total files: {}", paths.len());
    println!("  Checked: {checked}");
    println!("  Skipped: {skipped} (unchanged)");
    println!("  Failed: {}", failed.len());

    if checked > 0 {
        println!("\nChecked files:");
        for outcome in &outcomes {
            println!("  {} ({})", outcome.work.path.display(), outcome.work.reason);
        }
    }

    if !failed.is_empty() {
        eprintln!("\nFailures:");
        for outcome in &failed {
            for error in &outcome.errors {
                eprintln!("  {}: {error}", outcome.work.path.display());
            }
        }
        return Err(format!("{} citation file(s) failed validation", failed.len()));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// migrate command
// ---------------------------------------------------------------------------

fn run_migrate(args: MigrateArgs) -> Result<(), String> {
    match args.operation {
        MigrateOperation::Up(a) => run_migrate_up(a),
        MigrateOperation::Down(a) => run_migrate_down(a),
        MigrateOperation::Seed(a) => run_migrate_seed(a),
        MigrateOperation::Refresh(a) => run_migrate_refresh(a),
        MigrateOperation::Status(a) => run_migrate_status(a),
    }
}

fn open_migration(db: &PathBuf, prefix: &str) -> Result<cffkit_sqlite::Migration, String> {
    let conn = rusqlite::Connection::open(db)
        .map_err(|e| format!("Failed to open database '{}': {e}", db.display()))?;
    cffkit_sqlite::Migration::new(conn, prefix)
        .map_err(|e| format!("Failed to initialize migration: {e}"))
}

fn run_migrate_up(args: MigrateTargetArgs) -> Result<(), String> {
    let mut migration = open_migration(&args.db, &args.prefix)?;
    migration.up().map_err(|e| format!("Migration up failed: {e}"))?;
    println!(
        "Migration up complete. Tables created with prefix '{}' in '{}'.",
        args.prefix,
        args.db.display()
    );
    Ok(())
}

fn run_migrate_down(args: MigrateTargetArgs) -> Result<(), String> {
    let mut migration = open_migration(&args.db, &args.prefix)?;
    migration.down().map_err(|e| format!("Migration down failed: {e}"))?;
    println!(
        "Migration down complete. Tables with prefix '{}' dropped from '{}'.",
        args.prefix,
        args.db.display()
    );
    Ok(())
}

fn run_migrate_seed(args: MigrateSeedArgs) -> Result<(), String> {
    let mut migration = open_migration(&args.db, &args.prefix)?;
    let report = migration
        .seed(&args.source)
        .map_err(|e| format!("Seed failed: {e}"))?;
    println!("Seed complete:");
    print_seed_report(&report);
    Ok(())
}

fn run_migrate_refresh(args: MigrateSeedArgs) -> Result<(), String> {
    let mut migration = open_migration(&args.db, &args.prefix)?;
    let report = migration
        .refresh(&args.source)
        .map_err(|e| format!("Refresh failed: {e}"))?;
    println!("Refresh complete (tables dropped, recreated, and reseeded):");
    print_seed_report(&report);
    Ok(())
}

fn print_seed_report(report: &cffkit_sqlite::SeedReport) {
    println!("  Citations inserted: {}", report.citations_inserted);
    println!("  Authors inserted: {}", report.authors_inserted);
    println!("  Identifiers inserted: {}", report.identifiers_inserted);
    println!("  Keywords inserted: {}", report.keywords_inserted);
}

fn run_migrate_status(args: MigrateTargetArgs) -> Result<(), String> {
    let migration = open_migration(&args.db, &args.prefix)?;
    let status = migration
        .status()
        .map_err(|e| format!("Failed to get migration status: {e}"))?;
    println!("Migration Status:");
    println!(
        "  Tables exist: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    println!("  Citation count: {}", status.citation_count);
    println!("  Author count: {}", status.author_count);
    println!("  Identifier count: {}", status.identifier_count);
    println!("  Keyword count: {}", status.keyword_count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_author_spec;

    #[test]
    fn test_parse_author_spec_full() {
        let author = parse_author_spec(
            "Verhoeven, Stefan, Netherlands eScience Center, https://orcid.org/0000-0002-5821-2060",
        )
        .unwrap();
        assert_eq!(author.family_names, "Verhoeven");
        assert_eq!(author.given_names, "Stefan");
        assert_eq!(
            author.affiliation.as_deref(),
            Some("Netherlands eScience Center")
        );
        assert!(author.orcid.is_some());
    }

    #[test]
    fn test_parse_author_spec_minimal() {
        let author = parse_author_spec("Hut,Rolf").unwrap();
        assert_eq!(author.family_names, "Hut");
        assert!(author.affiliation.is_none());
    }

    #[test]
    fn test_parse_author_spec_rejects_missing_given_name() {
        assert!(parse_author_spec("OnlyFamily").is_err());
        assert!(parse_author_spec("Family,").is_err());
    }
}
