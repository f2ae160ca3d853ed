use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::config::ReconcileConfig;
use crate::matching::outcome::{MatchOutcome, Reconciliation, UnmatchedBankLine, UnmatchedInvoice};
use crate::report::summary::ReconcileSummary;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct MatchedRow {
    invoice: String,
    customer: String,
    invoice_date: NaiveDate,
    due_date: Option<NaiveDate>,
    amount: String,
    currency: String,
    bank_reference: String,
    bank_description: String,
    bank_date: NaiveDate,
    mode: &'static str,
    score_pct: i64,
    confidence: &'static str,
}

#[derive(Serialize)]
struct UnmatchedInvoiceRow {
    invoice: String,
    customer: String,
    invoice_date: NaiveDate,
    due_date: Option<NaiveDate>,
    amount: String,
    currency: String,
    reference: String,
}

#[derive(Serialize)]
struct UnmatchedBankRow {
    bank_id: String,
    description: String,
    transaction_date: NaiveDate,
    amount: String,
    currency: String,
    reference: String,
}

/// Write the reconciliation report as four CSV files into `dir`:
/// `summary.csv`, `matched.csv`, `unmatched_invoices.csv` and
/// `unmatched_bank.csv`. The directory is created if needed.
///
/// # Errors
///
/// Returns [`ExportError`] if the directory cannot be created or any of
/// the files cannot be written.
pub fn export_report(
    dir: &Path,
    summary: &ReconcileSummary,
    reconciliation: &Reconciliation,
    config: &ReconcileConfig,
    generated: NaiveDate,
) -> Result<(), ExportError> {
    fs::create_dir_all(dir)?;

    write_summary(&dir.join("summary.csv"), summary, config, generated)?;
    write_matched(&dir.join("matched.csv"), &reconciliation.matches)?;
    write_unmatched_invoices(
        &dir.join("unmatched_invoices.csv"),
        &reconciliation.unmatched_invoices,
    )?;
    write_unmatched_bank(
        &dir.join("unmatched_bank.csv"),
        &reconciliation.unmatched_bank_lines,
    )?;

    debug!(dir = %dir.display(), "report exported");
    Ok(())
}

fn write_summary(
    path: &Path,
    summary: &ReconcileSummary,
    config: &ReconcileConfig,
    generated: NaiveDate,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    let rows: [(&str, String); 16] = [
        ("setting", "value".to_string()),
        ("generated", generated.to_string()),
        ("total_invoices", summary.invoice_count.to_string()),
        ("total_bank_lines", summary.bank_line_count.to_string()),
        ("matched", summary.matched_count.to_string()),
        (
            "unmatched_invoices",
            summary.unmatched_invoice_count.to_string(),
        ),
        (
            "unmatched_bank_lines",
            summary.unmatched_bank_line_count.to_string(),
        ),
        ("invoice_total", summary.invoice_total.to_string()),
        ("bank_total", summary.bank_total.to_string()),
        ("matched_total", summary.matched_total.to_string()),
        ("match_rate_pct", format!("{:.1}", summary.match_rate)),
        ("amount_tolerance", config.amount_tolerance.to_string()),
        ("date_window_days", config.date_window.to_string()),
        ("threshold", config.threshold.to_string()),
        ("allow_variance", yes_no(config.allow_variance).to_string()),
        ("grouping", yes_no(config.enable_grouping).to_string()),
    ];
    for (label, value) in rows {
        writer.write_record([label, value.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn write_matched(path: &Path, matches: &[MatchOutcome]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for outcome in matches {
        #[allow(clippy::cast_possible_truncation)]
        let score_pct = (outcome.score() * 100.0).round() as i64;
        writer.serialize(MatchedRow {
            invoice: outcome.invoice_label(),
            customer: outcome.invoice_customer(),
            invoice_date: outcome.invoice_date(),
            due_date: outcome.invoice_due_date(),
            amount: outcome.invoice_amount().to_string(),
            currency: outcome.invoice_currency(),
            bank_reference: outcome.bank_reference(),
            bank_description: outcome.bank_description(),
            bank_date: outcome.bank_date(),
            mode: outcome.mode_label(),
            score_pct,
            confidence: outcome.confidence().label(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_unmatched_invoices(
    path: &Path,
    unmatched: &[UnmatchedInvoice],
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for item in unmatched {
        writer.serialize(UnmatchedInvoiceRow {
            invoice: item.invoice.invoice_number.clone(),
            customer: item.invoice.customer_name.clone(),
            invoice_date: item.invoice.invoice_date,
            due_date: item.invoice.due_date,
            amount: item.invoice.amount.to_string(),
            currency: item.invoice.currency.clone(),
            reference: item.invoice.reference.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_unmatched_bank(path: &Path, unmatched: &[UnmatchedBankLine]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for item in unmatched {
        writer.serialize(UnmatchedBankRow {
            bank_id: item.bank_line.bank_id.clone(),
            description: item.bank_line.description.clone(),
            transaction_date: item.bank_line.transaction_date,
            amount: item.bank_line.amount.to_string(),
            currency: item.bank_line.currency.clone(),
            reference: item.bank_line.reference.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bank::BankLine;
    use crate::core::invoice::Invoice;
    use crate::core::types::Confidence;
    use crate::matching::scoring::ScoreBreakdown;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_export_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let invoice = Invoice::new("INV-1", "100.00".parse().unwrap(), date(1));
        let line = BankLine::new("B-1", "100.00".parse().unwrap(), date(2));

        let reconciliation = Reconciliation {
            matches: vec![MatchOutcome::OneToOne {
                invoice: invoice.clone(),
                bank_line: line.clone(),
                score: 0.9,
                breakdown: ScoreBreakdown {
                    reference: 1.0,
                    amount: 1.0,
                    date: 0.875,
                    customer: 0.0,
                    amount_diff: "0.00".parse().unwrap(),
                    date_gap: 1,
                },
                confidence: Confidence::High,
            }],
            unmatched_invoices: vec![UnmatchedInvoice {
                invoice: Invoice::new("INV-2", "55.00".parse().unwrap(), date(1)),
            }],
            unmatched_bank_lines: vec![UnmatchedBankLine {
                bank_line: BankLine::new("B-2", "10.00".parse().unwrap(), date(3)),
            }],
        };
        let summary = ReconcileSummary::compute(
            &[invoice],
            &[line],
            &reconciliation,
        );

        export_report(
            dir.path(),
            &summary,
            &reconciliation,
            &ReconcileConfig::default(),
            date(5),
        )
        .unwrap();

        for name in [
            "summary.csv",
            "matched.csv",
            "unmatched_invoices.csv",
            "unmatched_bank.csv",
        ] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }

        let matched = std::fs::read_to_string(dir.path().join("matched.csv")).unwrap();
        assert!(matched.contains("INV-1"));
        assert!(matched.contains("one-to-one"));
        assert!(matched.contains("high"));
    }
}
