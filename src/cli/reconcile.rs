use std::path::PathBuf;

use bigdecimal::BigDecimal;
use chrono::{Local, NaiveDate};
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::config::{MatchWeights, ReconcileConfig};
use crate::matching::engine::{CancelToken, Phase, ProgressSink, ReconcileEngine, RunOutcome};
use crate::matching::outcome::{MatchOutcome, Reconciliation};
use crate::parsing;
use crate::report::aging::{aging_buckets, AgingBucket};
use crate::report::export::export_report;
use crate::report::summary::ReconcileSummary;

#[derive(Args)]
pub struct ReconcileArgs {
    /// Invoice CSV export
    #[arg(long, value_name = "FILE")]
    pub invoices: PathBuf,

    /// Bank statement CSV export
    #[arg(long, value_name = "FILE")]
    pub bank: PathBuf,

    /// Absolute amount difference treated as equal
    #[arg(long, default_value = "0.01")]
    pub tolerance: BigDecimal,

    /// Accept amount mismatches (they still lower the score)
    #[arg(long)]
    pub allow_variance: bool,

    /// Date-proximity horizon in days
    #[arg(long, default_value = "7")]
    pub date_window: i64,

    /// Minimum composite score for a one-to-one match
    #[arg(long, default_value = "0.75")]
    pub threshold: f64,

    /// Enable the split-payment and combined-invoice passes
    #[arg(long)]
    pub grouping: bool,

    // === Scoring weight options ===
    /// Weight for the reference sub-score (0-100, default 45)
    #[arg(long, default_value = "45", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_reference: u32,

    /// Weight for the amount sub-score (0-100, default 35)
    #[arg(long, default_value = "35", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_amount: u32,

    /// Weight for the date sub-score (0-100, default 10)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_date: u32,

    /// Weight for the customer sub-score (0-100, default 10)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_customer: u32,

    /// Directory for the four-file CSV report
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Number of matches to print in text output
    #[arg(short = 'n', long, default_value = "10")]
    pub max_shown: usize,
}

struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, percent: u8, phase: Phase) {
        tracing::debug!(percent, phase = %phase, "progress");
    }
}

/// Execute the reconcile subcommand.
///
/// # Errors
///
/// Returns an error if either input cannot be parsed, the engine refuses
/// the inputs, or the report cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ReconcileArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let invoices = parsing::read_invoices(&args.invoices)?;
    let bank_lines = parsing::read_bank_lines(&args.bank)?;

    if verbose {
        eprintln!(
            "Parsed {} invoices and {} bank lines",
            invoices.len(),
            bank_lines.len()
        );
    }

    let config = ReconcileConfig {
        amount_tolerance: args.tolerance.clone(),
        allow_variance: args.allow_variance,
        date_window: args.date_window,
        threshold: args.threshold,
        weights: MatchWeights {
            reference: f64::from(args.weight_reference) / 100.0,
            amount: f64::from(args.weight_amount) / 100.0,
            date: f64::from(args.weight_date) / 100.0,
            customer: f64::from(args.weight_customer) / 100.0,
        },
        enable_grouping: args.grouping,
    };

    let engine = ReconcileEngine::new(config.clone());
    let outcome = engine.run(&invoices, &bank_lines, &mut LogProgress, &CancelToken::new())?;
    let reconciliation = match outcome {
        RunOutcome::Completed(reconciliation) => reconciliation,
        RunOutcome::Cancelled => {
            eprintln!("Reconciliation cancelled; no results published.");
            return Ok(());
        }
    };

    let summary = ReconcileSummary::compute(&invoices, &bank_lines, &reconciliation);
    let today = Local::now().date_naive();

    match format {
        OutputFormat::Text => print_text(&summary, &reconciliation, today, args.max_shown),
        OutputFormat::Json => print_json(&summary, &reconciliation, today)?,
    }

    if let Some(dir) = &args.export {
        export_report(dir, &summary, &reconciliation, &config, today)?;
        eprintln!("Report written to {}", dir.display());
    }

    Ok(())
}

fn print_text(
    summary: &ReconcileSummary,
    reconciliation: &Reconciliation,
    today: NaiveDate,
    max_shown: usize,
) {
    println!("\nReconciliation summary");
    println!(
        "  Invoices:          {} ({} total)",
        summary.invoice_count, summary.invoice_total
    );
    println!(
        "  Bank lines:        {} ({} total)",
        summary.bank_line_count, summary.bank_total
    );
    println!(
        "  Matched:           {} ({:.1}% of invoices, {} settled)",
        summary.matched_count, summary.match_rate, summary.matched_total
    );
    println!("  Unmatched invoices: {}", summary.unmatched_invoice_count);
    println!("  Unmatched bank:     {}", summary.unmatched_bank_line_count);

    if !reconciliation.unmatched_invoices.is_empty() {
        let buckets = aging_buckets(&reconciliation.unmatched_invoices, today);
        println!("\nUnmatched invoice aging");
        for bucket in AgingBucket::ALL {
            println!("  {:<8} {}", bucket.label(), buckets[&bucket]);
        }
    }

    for (i, outcome) in reconciliation.matches.iter().take(max_shown).enumerate() {
        println!(
            "\n#{} {} ({})",
            i + 1,
            outcome.invoice_label(),
            outcome.confidence().label().to_uppercase()
        );
        println!("   Mode: {}", outcome.mode_label());
        println!(
            "   Amount: {} {}",
            outcome.invoice_amount(),
            outcome.invoice_currency()
        );
        println!("   Bank: {}", outcome.bank_description());
        println!("   Score: {:.0}%", outcome.score() * 100.0);
        if let MatchOutcome::OneToOne { breakdown, .. } = outcome {
            println!(
                "   Breakdown: ref {:.2}, amount {:.2}, date {:.2}, customer {:.2} (diff {}, gap {}d)",
                breakdown.reference,
                breakdown.amount,
                breakdown.date,
                breakdown.customer,
                breakdown.amount_diff,
                breakdown.date_gap,
            );
        }
    }

    if reconciliation.matches.len() > max_shown {
        println!(
            "\n({} more matches not shown)",
            reconciliation.matches.len() - max_shown
        );
    }
    println!();
}

fn print_json(
    summary: &ReconcileSummary,
    reconciliation: &Reconciliation,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let aging: serde_json::Map<String, serde_json::Value> =
        aging_buckets(&reconciliation.unmatched_invoices, today)
            .iter()
            .map(|(bucket, count)| (bucket.label().to_string(), serde_json::json!(count)))
            .collect();

    let output = serde_json::json!({
        "summary": summary,
        "aging": aging,
        "matches": reconciliation.matches,
        "unmatched_invoices": reconciliation.unmatched_invoices,
        "unmatched_bank_lines": reconciliation.unmatched_bank_lines,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
