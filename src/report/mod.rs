//! Result classification and reporting.
//!
//! Pure, read-only summaries over a finished [`Reconciliation`]:
//!
//! - [`aging`]: overdue-day buckets for unmatched invoices
//! - [`summary`]: run-level totals and match rate
//! - [`export`]: four-file CSV report
//!
//! Nothing here mutates outcomes; everything is recomputed on demand.
//!
//! [`Reconciliation`]: crate::matching::outcome::Reconciliation

pub mod aging;
pub mod export;
pub mod summary;
