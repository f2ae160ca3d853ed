use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use crate::core::bank::BankLine;
use crate::core::invoice::Invoice;
use crate::matching::outcome::Reconciliation;

/// Headline figures for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileSummary {
    pub invoice_count: usize,
    pub bank_line_count: usize,
    pub matched_count: usize,
    pub unmatched_invoice_count: usize,
    pub unmatched_bank_line_count: usize,
    pub invoice_total: BigDecimal,
    pub bank_total: BigDecimal,
    /// Invoice-side amount settled by accepted matches.
    pub matched_total: BigDecimal,
    /// Accepted matches per input invoice, as a percentage.
    pub match_rate: f64,
}

impl ReconcileSummary {
    #[must_use]
    pub fn compute(
        invoices: &[Invoice],
        bank_lines: &[BankLine],
        reconciliation: &Reconciliation,
    ) -> Self {
        let invoice_total: BigDecimal = invoices.iter().map(|invoice| &invoice.amount).sum();
        let bank_total: BigDecimal = bank_lines.iter().map(|line| &line.amount).sum();
        let matched_total = reconciliation
            .matches
            .iter()
            .fold(BigDecimal::zero(), |acc, outcome| {
                acc + outcome.invoice_amount()
            });

        let match_rate = if invoices.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                reconciliation.matches.len() as f64 / invoices.len() as f64 * 100.0
            }
        };

        Self {
            invoice_count: invoices.len(),
            bank_line_count: bank_lines.len(),
            matched_count: reconciliation.matches.len(),
            unmatched_invoice_count: reconciliation.unmatched_invoices.len(),
            unmatched_bank_line_count: reconciliation.unmatched_bank_lines.len(),
            invoice_total,
            bank_total,
            matched_total,
            match_rate,
        }
    }
}
