//! Command-line interface for ar-recon.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **reconcile**: match an invoice CSV export against a bank statement
//! - **sample**: generate paired sample CSV files for demos and testing
//!
//! ## Usage
//!
//! ```text
//! # Reconcile two exports
//! ar-recon reconcile --invoices invoices.csv --bank statement.csv
//!
//! # Accept amount variances and enable grouped matching
//! ar-recon reconcile --invoices invoices.csv --bank statement.csv \
//!     --allow-variance --grouping
//!
//! # JSON output for scripting
//! ar-recon reconcile --invoices invoices.csv --bank statement.csv --format json
//!
//! # Write the four-file CSV report
//! ar-recon reconcile --invoices invoices.csv --bank statement.csv --export report/
//!
//! # Generate sample data
//! ar-recon sample --dir demo --seed 42
//! ```

use clap::{Parser, Subcommand};

pub mod reconcile;
pub mod sample;

#[derive(Parser)]
#[command(name = "ar-recon")]
#[command(version)]
#[command(about = "Reconcile outstanding invoices against bank statement lines")]
#[command(
    long_about = "ar-recon matches an accounts-receivable invoice export against a bank statement export despite inconsistent references, rounding differences and date skew.\n\nEach invoice is scored against candidate bank lines on reference, amount, date and customer evidence; accepted matches carry an explainable score breakdown and a confidence tier. Optional grouped passes settle split payments (one invoice, two bank lines) and combined remittances (two invoices, one bank line)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile an invoice export against a bank statement export
    Reconcile(reconcile::ReconcileArgs),

    /// Generate paired sample CSV files
    Sample(sample::SampleArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
