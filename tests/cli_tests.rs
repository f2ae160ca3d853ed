//! CLI smoke tests driving the compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn ar_recon() -> Command {
    Command::cargo_bin("ar-recon").unwrap()
}

#[test]
fn test_help() {
    ar_recon()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reconcile outstanding invoices"));
}

#[test]
fn test_sample_then_reconcile() {
    let dir = tempfile::tempdir().unwrap();

    ar_recon()
        .args(["sample", "--seed", "42", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 60 invoices"));

    ar_recon()
        .args(["reconcile", "--grouping", "--invoices"])
        .arg(dir.path().join("sample_invoices.csv"))
        .arg("--bank")
        .arg(dir.path().join("sample_bank.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Reconciliation summary"));
}

#[test]
fn test_reconcile_json_output() {
    let dir = tempfile::tempdir().unwrap();

    ar_recon()
        .args(["sample", "--seed", "7", "--dir"])
        .arg(dir.path())
        .assert()
        .success();

    ar_recon()
        .args(["reconcile", "--format", "json", "--invoices"])
        .arg(dir.path().join("sample_invoices.csv"))
        .arg("--bank")
        .arg(dir.path().join("sample_bank.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"summary\""))
        .stdout(predicate::str::contains("\"aging\""));
}

#[test]
fn test_reconcile_export_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let report_dir = dir.path().join("report");

    ar_recon()
        .args(["sample", "--seed", "11", "--dir"])
        .arg(dir.path())
        .assert()
        .success();

    ar_recon()
        .args(["reconcile", "--invoices"])
        .arg(dir.path().join("sample_invoices.csv"))
        .arg("--bank")
        .arg(dir.path().join("sample_bank.csv"))
        .arg("--export")
        .arg(&report_dir)
        .assert()
        .success();

    for name in [
        "summary.csv",
        "matched.csv",
        "unmatched_invoices.csv",
        "unmatched_bank.csv",
    ] {
        assert!(report_dir.join(name).exists(), "{name} missing");
    }
}

#[test]
fn test_reconcile_rejects_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let invoices = dir.path().join("invoices.csv");
    let bank = dir.path().join("bank.csv");
    std::fs::write(&invoices, "Customer,Amount\nAcme,10.00\n").unwrap();
    std::fs::write(
        &bank,
        "Transaction Date,Description,Amount\n2024-01-01,x,10.00\n",
    )
    .unwrap();

    ar_recon()
        .args(["reconcile", "--invoices"])
        .arg(&invoices)
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column"));
}
