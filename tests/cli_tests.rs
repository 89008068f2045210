//! Command-line tests
//!
//! Each test writes a small library and query file to a temporary directory
//! and runs the `lipid-solver` binary against them.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LIBRARY_TSV: &str = "\
name\tmz\tadduct
PC 34:1\t760.585082\t[M+H]+
PE 34:1\t716.523579\t[M-H]-
SM 34:1;2O\t703.574851\t[M+H]+
";

const QUERIES_MGF: &str = "\
BEGIN IONS
TITLE=pc_scan
PEPMASS=760.585
RTINSECONDS=600
CHARGE=1+
184.0733 1000
496.3398 150
522.3554 120
577.5190 300
END IONS
BEGIN IONS
TITLE=unknown_scan
PEPMASS=900.0
CHARGE=1+
184.0733 1000
END IONS
";

fn write_inputs() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("library.tsv");
    let queries = dir.path().join("queries.mgf");
    std::fs::write(&library, LIBRARY_TSV).unwrap();
    std::fs::write(&queries, QUERIES_MGF).unwrap();
    (dir, library, queries)
}

fn lipid_solver() -> Command {
    Command::cargo_bin("lipid-solver").unwrap()
}

#[test]
fn test_annotate_text() {
    let (_dir, library, queries) = write_inputs();
    lipid_solver()
        .arg("annotate")
        .arg(&queries)
        .arg("--library")
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::contains("PC 16:0_18:1"))
        .stdout(predicate::str::contains("No annotation"))
        .stdout(predicate::str::contains("Annotated 1 of 2 spectra"));
}

#[test]
fn test_annotate_json() {
    let (_dir, library, queries) = write_inputs();
    let output = lipid_solver()
        .args(["--format", "json", "annotate"])
        .arg(&queries)
        .arg("-l")
        .arg(&library)
        .args(["--threads", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let annotations = json.as_array().unwrap();
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0]["query_id"], "pc_scan");
    assert_eq!(annotations[0]["result"]["name"], "PC 16:0_18:1");
    assert_eq!(annotations[0]["result"]["level"], "molecular_species");
    assert!(annotations[1]["result"].is_null());
}

#[test]
fn test_annotate_tsv() {
    let (_dir, library, queries) = write_inputs();
    lipid_solver()
        .args(["-f", "tsv", "annotate"])
        .arg(&queries)
        .arg("-l")
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("query_id\tprecursor_mz"))
        .stdout(predicate::str::contains("pc_scan\t760.5850\t10.00\tPC 16:0_18:1\tPC"));
}

#[test]
fn test_annotate_trace() {
    let (_dir, library, queries) = write_inputs();
    lipid_solver()
        .arg("annotate")
        .arg(&queries)
        .arg("-l")
        .arg(&library)
        .arg("--trace")
        .assert()
        .success()
        .stdout(predicate::str::contains("PC 34:1 [M+H]+ (760.5851): matched"))
        .stdout(predicate::str::contains("No library entries in precursor window"));
}

#[test]
fn test_annotate_config_and_overrides() {
    let (dir, library, queries) = write_inputs();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"normalize_queries": false, "ms2_tolerance": 0.02}"#).unwrap();

    lipid_solver()
        .args(["-f", "json", "annotate"])
        .arg(&queries)
        .arg("-l")
        .arg(&library)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("PC 16:0_18:1"));

    lipid_solver()
        .arg("annotate")
        .arg(&queries)
        .arg("-l")
        .arg(&library)
        .args(["--ms2-tolerance", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ms2_tolerance"));
}

#[test]
fn test_annotate_missing_library() {
    let (dir, _library, queries) = write_inputs();
    lipid_solver()
        .arg("annotate")
        .arg(&queries)
        .arg("-l")
        .arg(dir.path().join("missing.tsv"))
        .assert()
        .failure();
}

#[test]
fn test_library_list_and_filter() {
    let (_dir, library, _queries) = write_inputs();
    lipid_solver()
        .args(["library", "list"])
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::contains("Lipid Library (3 entries)"));

    lipid_solver()
        .args(["-f", "tsv", "library", "list", "--ion-mode", "negative"])
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::contains("PE 34:1\tPE\t[M-H]-"))
        .stdout(predicate::str::contains("PC 34:1").not());

    lipid_solver()
        .args(["library", "list", "--class", "nope"])
        .arg(&library)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown lipid class"));
}

#[test]
fn test_library_export_round_trip() {
    let (dir, library, queries) = write_inputs();
    let exported = dir.path().join("library.json");
    lipid_solver()
        .args(["library", "export"])
        .arg(&library)
        .arg(&exported)
        .assert()
        .success();

    let content = std::fs::read_to_string(&exported).unwrap();
    assert!(content.contains("\"version\""));

    lipid_solver()
        .arg("annotate")
        .arg(&queries)
        .arg("-l")
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("PC 16:0_18:1"));
}

#[test]
fn test_classes() {
    lipid_solver()
        .arg("classes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Class Rules (16 classes)"))
        .stdout(predicate::str::contains("Cer_NS"));

    lipid_solver()
        .args(["-f", "tsv", "classes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TG\tTG\t[M+NH4]+\tpositive"));
}
