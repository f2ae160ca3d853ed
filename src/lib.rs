//! # ar-recon
//!
//! A library for reconciling outstanding invoices against bank statement
//! lines.
//!
//! Accounts-receivable exports and bank statements rarely agree cleanly:
//! payment references get mangled, amounts pick up rounding differences
//! and fees, and payments land days after the invoice date. `ar-recon`
//! finds correspondences anyway, scoring every candidate pair on four
//! weighted signals and classifying every input record into exactly one
//! outcome with an explainable confidence tier.
//!
//! ## Features
//!
//! - **Composite scoring**: reference, amount, date and customer evidence
//!   blended with configurable weights
//! - **Greedy one-to-one assignment**: first-come, order-preserving, fast
//! - **Grouped matching**: split payments (one invoice, two bank lines)
//!   and combined remittances (two invoices, one bank line)
//! - **Explainability**: every match keeps its sub-score breakdown
//! - **Aging**: overdue-day buckets over the unmatched invoices
//! - **Cooperative cancellation**: batched runs that discard, never
//!   partially publish
//!
//! ## Example
//!
//! ```rust
//! use ar_recon::{
//!     BankLine, CancelToken, Invoice, NullProgress, ReconcileConfig, ReconcileEngine,
//!     RunOutcome,
//! };
//! use chrono::NaiveDate;
//!
//! let invoices = vec![Invoice::new(
//!     "INV-1001",
//!     "1200.00".parse().unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//! )
//! .with_reference("REF-1001")];
//!
//! let bank_lines = vec![BankLine::new(
//!     "T-900",
//!     "1200.00".parse().unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
//! )
//! .with_reference("REF-1001")];
//!
//! let engine = ReconcileEngine::new(ReconcileConfig::default());
//! let outcome = engine
//!     .run(&invoices, &bank_lines, &mut NullProgress, &CancelToken::new())
//!     .unwrap();
//!
//! if let RunOutcome::Completed(reconciliation) = outcome {
//!     for m in &reconciliation.matches {
//!         println!("{}: {:.0}%", m.invoice_label(), m.score() * 100.0);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: domain records and configuration
//! - [`matching`]: scoring, the consumption ledger, and the engine
//! - [`report`]: aging, summary totals, and CSV export
//! - [`parsing`]: CSV ingestion with header-alias column mapping
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod report;

// Re-export commonly used types for convenience
pub use crate::core::bank::BankLine;
pub use crate::core::config::{MatchWeights, ReconcileConfig};
pub use crate::core::invoice::Invoice;
pub use crate::core::types::Confidence;
pub use crate::matching::engine::{
    CancelToken, EngineError, NullProgress, Phase, ProgressSink, ReconcileEngine, RunOutcome,
};
pub use crate::matching::outcome::{
    MatchOutcome, Reconciliation, UnmatchedBankLine, UnmatchedInvoice,
};
