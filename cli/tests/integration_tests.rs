use std::fs;
use std::path::PathBuf;
use std::process::Command;

const VALID_CITATION: &str = "\
cff-version: 1.2.0
message: If you use this software, please cite it using these metadata.
title: eWaterCycle Python package
authors:
  - family-names: Verhoeven
    given-names: Stefan
    orcid: https://orcid.org/0000-0002-5821-2060
license: Apache-2.0
identifiers:
  - type: doi
    value: 10.5281/zenodo.5119389
";

const BROKEN_CITATION: &str = "\
title: broken-tool
authors:
  - family-names: Researcher
    given-names: Alice
    orcid: not-an-orcid
license: Not-A-License
";

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cffkit"))
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("failed to write fixture");
    path
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_a_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", VALID_CITATION);

    let output = bin()
        .args(["validate", path.to_str().unwrap()])
        .output()
        .expect("failed to run cffkit");

    assert!(output.status.success(), "validate should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 passed, 0 failed"));
}

#[test]
fn validate_rejects_a_broken_file_with_field_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", BROKEN_CITATION);

    let output = bin()
        .args(["validate", path.to_str().unwrap()])
        .output()
        .expect("failed to run cffkit");

    assert!(!output.status.success(), "validate should fail");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("missing required field: cff-version"));
    assert!(stdout.contains("authors[0].orcid"));
    assert!(stdout.contains("Not-A-License"));
}

#[test]
fn validate_strict_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!("{VALID_CITATION}favourite-colour: green\n");
    let path = write_file(&dir, "CITATION.cff", &text);

    let lenient = bin()
        .args(["validate", path.to_str().unwrap()])
        .status()
        .expect("failed to run cffkit");
    assert!(lenient.success());

    let strict = bin()
        .args(["validate", "--strict", path.to_str().unwrap()])
        .output()
        .expect("failed to run cffkit");
    assert!(!strict.status.success());
    let stdout = String::from_utf8_lossy(&strict.stdout);
    assert!(stdout.contains("unknown field: favourite-colour"));
}

#[test]
fn validate_emits_json_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", VALID_CITATION);

    let output = bin()
        .args(["validate", "--format", "json", path.to_str().unwrap()])
        .output()
        .expect("failed to run cffkit");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report should be JSON");
    assert_eq!(report["passed"], 1);
    assert_eq!(report["reports"][0]["title"], "eWaterCycle Python package");
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[test]
fn convert_produces_bibtex() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", VALID_CITATION);

    let output = bin()
        .args(["convert", "--input", path.to_str().unwrap(), "--format", "bibtex"])
        .output()
        .expect("failed to run cffkit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("@software{ewatercycle_python_package,"));
    assert!(stdout.contains("doi = {10.5281/zenodo.5119389}"));
}

#[test]
fn convert_refuses_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", BROKEN_CITATION);

    let output = bin()
        .args(["convert", "--input", path.to_str().unwrap()])
        .output()
        .expect("failed to run cffkit");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed validation"));
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_a_valid_citation_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CITATION.cff");

    let status = bin()
        .args([
            "init",
            "--title",
            "my-tool",
            "--author",
            "Researcher,Alice,Example University",
            "--license",
            "MIT",
            "--output",
            path.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run cffkit");
    assert!(status.success());

    // The generated file must validate.
    let check = bin()
        .args(["validate", "--strict", path.to_str().unwrap()])
        .status()
        .expect("failed to run cffkit");
    assert!(check.success());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("family-names: Researcher"));
}

#[test]
fn init_refuses_invalid_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CITATION.cff");

    let output = bin()
        .args([
            "init",
            "--title",
            "my-tool",
            "--author",
            "Researcher,Alice",
            "--license",
            "Not-A-License",
            "--output",
            path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");

    assert!(!output.status.success());
    assert!(!path.exists(), "no file should be written on failure");
}

#[test]
fn init_does_not_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", VALID_CITATION);

    let output = bin()
        .args([
            "init",
            "--title",
            "other",
            "--author",
            "Researcher,Alice",
            "--output",
            path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");

    assert!(!output.status.success());
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("eWaterCycle Python package"), "file untouched");
}

// ---------------------------------------------------------------------------
// bundle + migrate
// ---------------------------------------------------------------------------

#[test]
fn bundle_then_seed_database() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "CITATION.cff", VALID_CITATION);

    let bundle_path = dir.path().join("out/citations.json");
    let status = bin()
        .args([
            "bundle",
            dir.path().to_str().unwrap(),
            "--output",
            bundle_path.to_str().unwrap(),
            "--name",
            "test-index",
        ])
        .status()
        .expect("failed to run cffkit");
    assert!(status.success());
    assert!(bundle_path.exists());

    // Seed a SQLite index from per-record JSON files.
    let records = tempfile::tempdir().unwrap();
    let bundle: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&bundle_path).unwrap()).unwrap();
    fs::write(
        records.path().join("record.json"),
        serde_json::to_string_pretty(&bundle["documents"][0]).unwrap(),
    )
    .unwrap();

    let db_path = dir.path().join("citations.db");
    let up = bin()
        .args(["migrate", "up", "--db", db_path.to_str().unwrap()])
        .status()
        .expect("failed to run cffkit");
    assert!(up.success());

    let seed = bin()
        .args([
            "migrate",
            "seed",
            "--db",
            db_path.to_str().unwrap(),
            "--source",
            records.path().to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");
    assert!(seed.status.success());
    let stdout = String::from_utf8_lossy(&seed.stdout);
    assert!(stdout.contains("Citations inserted: 1"));

    let status_out = bin()
        .args(["migrate", "status", "--db", db_path.to_str().unwrap()])
        .output()
        .expect("failed to run cffkit");
    let stdout = String::from_utf8_lossy(&status_out.stdout);
    assert!(stdout.contains("Tables exist: yes"));
    assert!(stdout.contains("Citation count: 1"));
}

#[test]
fn bundle_rejects_directories_with_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "good.cff", VALID_CITATION);
    write_file(&dir, "bad.cff", BROKEN_CITATION);

    let output = bin()
        .args([
            "bundle",
            dir.path().to_str().unwrap(),
            "--output",
            dir.path().join("citations.json").to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed validation"));
}

// ---------------------------------------------------------------------------
// ci-check
// ---------------------------------------------------------------------------

fn write_ci_config(dir: &tempfile::TempDir, checked: &std::path::Path) -> PathBuf {
    let yaml = format!(
        "version: \"1.0\"\npaths:\n  - {}\npolicy:\n  strict: false\njobs: 2\n",
        checked.display()
    );
    write_file(dir, "config.yml", &yaml)
}

#[test]
fn ci_check_creates_manifest_and_skips_unchanged_files() {
    let dir = tempfile::tempdir().unwrap();
    let repos = dir.path().join("repos");
    fs::create_dir_all(&repos).unwrap();
    fs::write(repos.join("CITATION.cff"), VALID_CITATION).unwrap();

    let config_path = write_ci_config(&dir, &repos);
    let manifest_path = dir.path().join("manifest.json");

    // First run validates everything and creates the manifest.
    let first = bin()
        .args([
            "ci-check",
            "--config",
            config_path.to_str().unwrap(),
            "--manifest",
            manifest_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");
    assert!(first.status.success());
    assert!(manifest_path.exists());
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("Checked: 1"));

    // Second run skips the unchanged file.
    let second = bin()
        .args([
            "ci-check",
            "--config",
            config_path.to_str().unwrap(),
            "--manifest",
            manifest_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("Checked: 0"));
    assert!(stdout.contains("Skipped: 1"));
}

#[test]
fn ci_check_revalidates_edited_files_and_fails_on_errors() {
    let dir = tempfile::tempdir().unwrap();
    let repos = dir.path().join("repos");
    fs::create_dir_all(&repos).unwrap();
    let citation = repos.join("CITATION.cff");
    fs::write(&citation, VALID_CITATION).unwrap();

    let config_path = write_ci_config(&dir, &repos);
    let manifest_path = dir.path().join("manifest.json");

    let first = bin()
        .args([
            "ci-check",
            "--config",
            config_path.to_str().unwrap(),
            "--manifest",
            manifest_path.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run cffkit");
    assert!(first.success());

    // Break the file; the changed checksum forces re-validation.
    fs::write(&citation, BROKEN_CITATION).unwrap();

    let second = bin()
        .args([
            "ci-check",
            "--config",
            config_path.to_str().unwrap(),
            "--manifest",
            manifest_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cffkit");
    assert!(!second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("(changed)"));
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

#[test]
fn update_merges_release_metadata_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", VALID_CITATION);

    let status = bin()
        .args([
            "update",
            "--input",
            path.to_str().unwrap(),
            "--version",
            "2.0.0",
            "--date-released",
            "2026-08-07",
            "--doi",
            "10.5281/zenodo.9999999",
            "--in-place",
        ])
        .status()
        .expect("failed to run cffkit");
    assert!(status.success());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("version: 2.0.0"));
    assert!(text.contains("date-released: 2026-08-07"));
    assert!(text.contains("10.5281/zenodo.9999999"));
    // The original concept DOI and authors survive the merge.
    assert!(text.contains("10.5281/zenodo.5119389"));
    assert!(text.contains("family-names: Verhoeven"));

    let check = bin()
        .args(["validate", "--strict", path.to_str().unwrap()])
        .status()
        .expect("failed to run cffkit");
    assert!(check.success());
}

#[test]
fn update_rejects_malformed_release_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "CITATION.cff", VALID_CITATION);

    let output = bin()
        .args([
            "update",
            "--input",
            path.to_str().unwrap(),
            "--date-released",
            "not-a-date",
            "--in-place",
        ])
        .output()
        .expect("failed to run cffkit");

    assert!(!output.status.success());
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("not-a-date"), "file untouched on failure");
}
