//! Cross-module integration tests: loader, bundles, manifest, config.

use cffkit_core::{Author, CffDocument, CitationCollection, Identifier};
use cffkit_db::{
    CheckConfig, CitationDatabase, Manifest, RecordMetadata, ValidationPolicyFingerprint,
    write_bundle,
};

fn sample_document(title: &str) -> CffDocument {
    CffDocument::new(title)
        .with_author(Author::new("Verhoeven", "Stefan"))
        .with_license("Apache-2.0")
        .with_identifier(Identifier::doi("10.5281/zenodo.5119389"))
}

#[test]
fn bundle_write_then_load_round_trips_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json.gz");

    let mut collection = CitationCollection::new("0.1.0", "2026-08-07T00:00:00Z");
    collection.name = Some("org-index".into());
    collection.documents.push(sample_document("tool-a"));
    collection.documents.push(sample_document("tool-b"));
    write_bundle(&collection, &path, true).unwrap();

    let db = CitationDatabase::from_bundle(&path).unwrap();
    assert_eq!(db.len(), 2);
    let doc = db.get("tool-a").unwrap();
    assert_eq!(doc.doi(), Some("10.5281/zenodo.5119389"));
}

#[test]
fn manifest_workflow_skips_unchanged_files() {
    let dir = tempfile::tempdir().unwrap();
    let citation = dir.path().join("CITATION.cff");
    std::fs::write(&citation, "cff-version: 1.2.0\ntitle: tool\n").unwrap();

    let checksum = Manifest::calculate_checksum(&citation).unwrap();
    let key = citation.display().to_string();

    let mut recorded = Manifest::new("0.1.0".into(), ValidationPolicyFingerprint::default());
    recorded.update_entry(
        key.clone(),
        RecordMetadata {
            title: Some("tool".into()),
            cff_version: Some("1.2.0".into()),
            checksum: checksum.clone(),
            validated_at: "2026-08-07T00:00:00Z".into(),
            passed: true,
        },
    );

    // Unchanged file: a fresh scan with the same checksum produces no diff.
    let mut rescan = Manifest::new("0.1.0".into(), ValidationPolicyFingerprint::default());
    rescan.update_entry(
        key.clone(),
        RecordMetadata {
            title: Some("tool".into()),
            cff_version: Some("1.2.0".into()),
            checksum,
            validated_at: "2026-08-07T01:00:00Z".into(),
            passed: true,
        },
    );
    assert!(recorded.diff(&rescan).is_empty());

    // Edit the file: checksum changes, diff flags it.
    std::fs::write(&citation, "cff-version: 1.2.0\ntitle: tool\nversion: 2.0.0\n").unwrap();
    let new_checksum = Manifest::calculate_checksum(&citation).unwrap();
    let mut edited = rescan.clone();
    edited.update_entry(
        key.clone(),
        RecordMetadata {
            title: Some("tool".into()),
            cff_version: Some("1.2.0".into()),
            checksum: new_checksum,
            validated_at: "2026-08-07T02:00:00Z".into(),
            passed: true,
        },
    );
    assert_eq!(recorded.diff(&edited), vec![key]);
}

#[test]
fn manifest_persists_across_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");

    let policy = ValidationPolicyFingerprint {
        strict: true,
        warnings_as_errors: false,
    };
    let mut manifest = Manifest::new("0.1.0".into(), policy);
    manifest.update_entry(
        "a.cff".into(),
        RecordMetadata {
            title: None,
            cff_version: None,
            checksum: "abc".into(),
            validated_at: "2026-08-07T00:00:00Z".into(),
            passed: false,
        },
    );
    manifest.save(&path).unwrap();

    let loaded = Manifest::load(&path).unwrap();
    assert_eq!(loaded.policy, policy);
    assert!(!loaded.get("a.cff").unwrap().passed);
}

#[test]
fn config_drives_policy_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(
        &path,
        "version: \"1.0\"\npaths:\n  - repos/\npolicy:\n  strict: true\n",
    )
    .unwrap();

    let config = CheckConfig::load(&path).unwrap();
    let fingerprint = config.policy.fingerprint();
    assert!(fingerprint.strict);

    // A manifest stamped with a different policy forces a full re-check.
    let mut old = Manifest::new("0.1.0".into(), ValidationPolicyFingerprint::default());
    old.update_entry(
        "a.cff".into(),
        RecordMetadata {
            title: None,
            cff_version: None,
            checksum: "abc".into(),
            validated_at: "2026-08-07T00:00:00Z".into(),
            passed: true,
        },
    );
    let new = Manifest::new("0.1.0".into(), fingerprint);
    assert_eq!(old.diff(&new), vec!["a.cff".to_string()]);
}
