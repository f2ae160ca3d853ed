use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::core::bank::BankLine;
use crate::core::config::ReconcileConfig;
use crate::core::invoice::Invoice;
use crate::core::types::Confidence;
use crate::matching::grouping::{find_split_payment, match_combined_invoices};
use crate::matching::ledger::ConsumptionLedger;
use crate::matching::outcome::{
    MatchOutcome, Reconciliation, UnmatchedBankLine, UnmatchedInvoice,
};
use crate::matching::scoring::{score_candidate, CandidateScore};

/// Invoices processed between cancellation checks and progress reports.
pub const BATCH_SIZE: usize = 200;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The run refused to start; no work was done.
    #[error("precondition not met: {0}")]
    PreconditionNotMet(String),
}

/// Coarse stage labels reported through a [`ProgressSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Prepare,
    Match,
    Group,
    Classify,
    Report,
}

impl Phase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Match => "match",
            Self::Group => "group",
            Self::Classify => "classify",
            Self::Report => "report",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Receives `(percent, phase)` updates as a run advances. Called after
/// every batch of the matching pass and once per later stage.
pub trait ProgressSink {
    fn report(&mut self, percent: u8, phase: Phase);
}

/// Discards progress updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _percent: u8, _phase: Phase) {}
}

/// Cooperative cancellation flag, checked between batches.
///
/// Clone freely; clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(Reconciliation),
    /// Cancellation observed between batches. Nothing was published;
    /// partial progress is discarded, not partially surfaced.
    Cancelled,
}

/// The reconciliation engine.
///
/// Assignment is first-come greedy: invoices are processed in input
/// order and each takes the best-scoring bank line still available, so
/// input order affects the outcome and the total assignment is not
/// guaranteed optimal. Given identical inputs and configuration, two
/// runs produce identical outcome sequences.
#[derive(Debug, Clone, Default)]
pub struct ReconcileEngine {
    config: ReconcileConfig,
}

impl ReconcileEngine {
    #[must_use]
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run one reconciliation over already-normalized records.
    ///
    /// Invoices go through the greedy one-to-one pass in batches of
    /// [`BATCH_SIZE`]; when grouping is enabled, an invoice that fails
    /// one-to-one acceptance is offered the split-payment search before
    /// being declared unmatched, and a combined-invoice pass runs at the
    /// end. Every bank line is consumed at most once across all passes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PreconditionNotMet`] if either input is
    /// empty; the engine refuses to start degenerate work.
    pub fn run(
        &self,
        invoices: &[Invoice],
        bank_lines: &[BankLine],
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, EngineError> {
        if invoices.is_empty() {
            return Err(EngineError::PreconditionNotMet(
                "invoice set is empty".to_string(),
            ));
        }
        if bank_lines.is_empty() {
            return Err(EngineError::PreconditionNotMet(
                "bank line set is empty".to_string(),
            ));
        }

        info!(
            invoices = invoices.len(),
            bank_lines = bank_lines.len(),
            grouping = self.config.enable_grouping,
            "starting reconciliation"
        );
        progress.report(5, Phase::Prepare);

        let mut ledger = ConsumptionLedger::new();
        let mut matches: Vec<MatchOutcome> = Vec::new();
        let mut unmatched_invoices: Vec<Invoice> = Vec::new();

        let total = invoices.len();
        let mut processed = 0usize;

        for batch in invoices.chunks(BATCH_SIZE) {
            if cancel.is_cancelled() {
                info!("cancellation requested, discarding partial results");
                return Ok(RunOutcome::Cancelled);
            }

            for invoice in batch {
                self.place_invoice(
                    invoice,
                    bank_lines,
                    &mut ledger,
                    &mut matches,
                    &mut unmatched_invoices,
                );
            }

            processed += batch.len();
            progress.report(match_percent(processed, total), Phase::Match);
        }

        if self.config.enable_grouping {
            let (combined, remaining) = match_combined_invoices(
                bank_lines,
                unmatched_invoices,
                &mut ledger,
                &self.config.amount_tolerance,
            );
            matches.extend(combined);
            unmatched_invoices = remaining;
            progress.report(80, Phase::Group);
        }

        progress.report(90, Phase::Classify);
        let unmatched_bank_lines: Vec<UnmatchedBankLine> = bank_lines
            .iter()
            .enumerate()
            .filter(|(index, _)| !ledger.is_consumed(*index))
            .map(|(_, line)| UnmatchedBankLine {
                bank_line: line.clone(),
            })
            .collect();

        let reconciliation = Reconciliation {
            matches,
            unmatched_invoices: unmatched_invoices
                .into_iter()
                .map(|invoice| UnmatchedInvoice { invoice })
                .collect(),
            unmatched_bank_lines,
        };

        info!(
            matches = reconciliation.matches.len(),
            unmatched_invoices = reconciliation.unmatched_invoices.len(),
            unmatched_bank_lines = reconciliation.unmatched_bank_lines.len(),
            "reconciliation complete"
        );
        progress.report(100, Phase::Report);

        Ok(RunOutcome::Completed(reconciliation))
    }

    fn place_invoice(
        &self,
        invoice: &Invoice,
        bank_lines: &[BankLine],
        ledger: &mut ConsumptionLedger,
        matches: &mut Vec<MatchOutcome>,
        unmatched: &mut Vec<Invoice>,
    ) {
        if let Some((index, candidate)) = self.find_best_line(invoice, bank_lines, ledger) {
            if candidate.composite >= self.config.threshold && candidate.amount_ok {
                ledger.mark_consumed(index);
                matches.push(MatchOutcome::OneToOne {
                    invoice: invoice.clone(),
                    bank_line: bank_lines[index].clone(),
                    score: candidate.composite,
                    confidence: Confidence::from_score(candidate.composite),
                    breakdown: candidate.breakdown,
                });
                return;
            }
        }

        if self.config.enable_grouping {
            if let Some(split) =
                find_split_payment(invoice, bank_lines, ledger, &self.config.amount_tolerance)
            {
                ledger.mark_consumed(split.indices[0]);
                ledger.mark_consumed(split.indices[1]);
                matches.push(MatchOutcome::OneToMany {
                    invoice: invoice.clone(),
                    bank_lines: [
                        bank_lines[split.indices[0]].clone(),
                        bank_lines[split.indices[1]].clone(),
                    ],
                    combined_amount: split.combined_amount,
                    score: split.score,
                    confidence: Confidence::Medium,
                });
                return;
            }
        }

        unmatched.push(invoice.clone());
    }

    /// Best-scoring unconsumed line for this invoice. Ties keep the first
    /// encountered, and a zero composite never wins.
    fn find_best_line(
        &self,
        invoice: &Invoice,
        bank_lines: &[BankLine],
        ledger: &ConsumptionLedger,
    ) -> Option<(usize, CandidateScore)> {
        let mut best: Option<(usize, CandidateScore)> = None;

        for (index, line) in bank_lines.iter().enumerate() {
            if ledger.is_consumed(index) {
                continue;
            }
            let candidate = score_candidate(invoice, line, &self.config);
            let beats = best.as_ref().map_or(candidate.composite > 0.0, |(_, current)| {
                candidate.composite > current.composite
            });
            if beats {
                best = Some((index, candidate));
            }
        }

        best
    }
}

/// The matching pass occupies the 40-75% band of the progress curve.
fn match_percent(processed: usize, total: usize) -> u8 {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    {
        (40.0 + (processed as f64 / total as f64) * 35.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn money(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    fn run_default(
        invoices: &[Invoice],
        bank_lines: &[BankLine],
        config: ReconcileConfig,
    ) -> Reconciliation {
        let engine = ReconcileEngine::new(config);
        match engine
            .run(invoices, bank_lines, &mut NullProgress, &CancelToken::new())
            .unwrap()
        {
            RunOutcome::Completed(reconciliation) => reconciliation,
            RunOutcome::Cancelled => panic!("run was unexpectedly cancelled"),
        }
    }

    #[test]
    fn test_refuses_empty_invoices() {
        let engine = ReconcileEngine::default();
        let bank = vec![BankLine::new("B-1", money("10.00"), date(1))];
        let result = engine.run(&[], &bank, &mut NullProgress, &CancelToken::new());
        assert!(matches!(result, Err(EngineError::PreconditionNotMet(_))));
    }

    #[test]
    fn test_refuses_empty_bank_lines() {
        let engine = ReconcileEngine::default();
        let invoices = vec![Invoice::new("INV-1", money("10.00"), date(1))];
        let result = engine.run(&invoices, &[], &mut NullProgress, &CancelToken::new());
        assert!(matches!(result, Err(EngineError::PreconditionNotMet(_))));
    }

    #[test]
    fn test_cancelled_before_start_publishes_nothing() {
        let engine = ReconcileEngine::default();
        let invoices = vec![Invoice::new("INV-1", money("10.00"), date(1))];
        let bank = vec![BankLine::new("B-1", money("10.00"), date(1))];
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = engine
            .run(&invoices, &bank, &mut NullProgress, &cancel)
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Cancelled));
    }

    #[test]
    fn test_first_come_greedy_order() {
        // two identical invoices compete for one matching bank line; the
        // first in input order wins it
        let invoices = vec![
            Invoice::new("INV-1", money("100.00"), date(1)).with_reference("REF-7"),
            Invoice::new("INV-2", money("100.00"), date(1)).with_reference("REF-7"),
        ];
        let bank = vec![BankLine::new("B-1", money("100.00"), date(2)).with_reference("REF-7")];

        let reconciliation = run_default(&invoices, &bank, ReconcileConfig::default());

        assert_eq!(reconciliation.matches.len(), 1);
        match &reconciliation.matches[0] {
            MatchOutcome::OneToOne { invoice, .. } => {
                assert_eq!(invoice.invoice_number, "INV-1");
            }
            other => panic!("expected one-to-one, got {other:?}"),
        }
        assert_eq!(reconciliation.unmatched_invoices.len(), 1);
        assert_eq!(
            reconciliation.unmatched_invoices[0].invoice.invoice_number,
            "INV-2"
        );
    }

    #[test]
    fn test_amount_gate_blocks_despite_score() {
        // strong reference and date agreement but a 40 cent gap: composite
        // clears the threshold, the amount gate still rejects
        let invoices = vec![
            Invoice::new("INV-1", money("100.00"), date(1)).with_reference("REF-9")
        ];
        let bank = vec![BankLine::new("B-1", money("100.40"), date(1)).with_reference("REF-9")];

        let strict = run_default(&invoices, &bank, ReconcileConfig::default());
        assert!(strict.matches.is_empty());
        assert_eq!(strict.unmatched_invoices.len(), 1);
        assert_eq!(strict.unmatched_bank_lines.len(), 1);

        let lenient = run_default(
            &invoices,
            &bank,
            ReconcileConfig {
                allow_variance: true,
                ..ReconcileConfig::default()
            },
        );
        assert_eq!(lenient.matches.len(), 1);
    }

    #[test]
    fn test_zero_score_never_matches() {
        // every sub-score is zero here; even with a zero threshold and the
        // amount gate disabled, a scoreless candidate is not a match
        let invoices = vec![Invoice::new("", money("500.00"), date(1))];
        let bank = vec![
            BankLine::new("B-1", money("9000.00"), date(1) + chrono::Duration::days(200))
                .with_description("unrelated"),
        ];
        let config = ReconcileConfig {
            threshold: 0.0,
            allow_variance: true,
            ..ReconcileConfig::default()
        };

        let reconciliation = run_default(&invoices, &bank, config);
        assert!(reconciliation.matches.is_empty());
        assert_eq!(reconciliation.unmatched_invoices.len(), 1);
        assert_eq!(reconciliation.unmatched_bank_lines.len(), 1);
    }

    #[test]
    fn test_progress_reports_cover_run() {
        struct Recorder(Vec<(u8, Phase)>);
        impl ProgressSink for Recorder {
            fn report(&mut self, percent: u8, phase: Phase) {
                self.0.push((percent, phase));
            }
        }

        let invoices = vec![Invoice::new("INV-1", money("100.00"), date(1))];
        let bank = vec![BankLine::new("B-1", money("100.00"), date(1))];
        let mut recorder = Recorder(Vec::new());
        let engine = ReconcileEngine::default();
        engine
            .run(&invoices, &bank, &mut recorder, &CancelToken::new())
            .unwrap();

        assert_eq!(recorder.0.first(), Some(&(5, Phase::Prepare)));
        assert!(recorder.0.contains(&(75, Phase::Match)));
        assert_eq!(recorder.0.last(), Some(&(100, Phase::Report)));
    }
}
