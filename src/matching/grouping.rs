use std::collections::HashSet;

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::core::bank::BankLine;
use crate::core::invoice::Invoice;
use crate::core::types::Confidence;
use crate::matching::ledger::ConsumptionLedger;
use crate::matching::outcome::MatchOutcome;

/// Closest-by-amount candidates examined per pair search.
pub const CANDIDATE_WINDOW: usize = 40;

/// Fixed score assigned to combined-invoice (two invoices, one bank line)
/// matches.
pub const COMBINED_INVOICE_SCORE: f64 = 0.78;

/// A pair of bank lines whose sum settles one invoice.
#[derive(Debug, Clone)]
pub struct SplitPayment {
    /// Input indices of the two bank lines.
    pub indices: [usize; 2],
    pub combined_amount: BigDecimal,
    pub score: f64,
}

/// Search unconsumed bank lines for two whose sum lands within tolerance
/// of the invoice amount.
///
/// Candidates are the [`CANDIDATE_WINDOW`] lines closest to the invoice
/// amount; pairs are tested in smallest-gap-first nested-loop order and
/// the first within tolerance wins. Amount evidence only; no text or
/// date scoring is involved.
#[must_use]
pub fn find_split_payment(
    invoice: &Invoice,
    bank_lines: &[BankLine],
    ledger: &ConsumptionLedger,
    tolerance: &BigDecimal,
) -> Option<SplitPayment> {
    let mut candidates: Vec<(usize, &BankLine)> = bank_lines
        .iter()
        .enumerate()
        .filter(|(index, _)| !ledger.is_consumed(*index))
        .collect();
    candidates.sort_by_key(|(_, line)| (&invoice.amount - &line.amount).abs());
    candidates.truncate(CANDIDATE_WINDOW);

    for (i, &(first_index, first)) in candidates.iter().enumerate() {
        for &(second_index, second) in candidates.iter().skip(i + 1) {
            let sum = &first.amount + &second.amount;
            let diff = (&sum - &invoice.amount).abs();
            if diff <= *tolerance {
                return Some(SplitPayment {
                    indices: [first_index, second_index],
                    score: split_score(&diff, &invoice.amount),
                    combined_amount: sum,
                });
            }
        }
    }

    None
}

/// Floor of 0.7 plus up to 0.3 for residual amount closeness.
fn split_score(diff: &BigDecimal, invoice_amount: &BigDecimal) -> f64 {
    let diff = diff.to_f64().unwrap_or(0.0);
    let base = invoice_amount.to_f64().unwrap_or(0.0).max(1.0);
    (0.7 + (1.0 - diff / base) * 0.3).min(1.0)
}

/// Settle unconsumed bank lines against pairs of unmatched invoices.
///
/// For each unconsumed bank line, the [`CANDIDATE_WINDOW`] unclaimed
/// invoices closest by amount are paired; the first pair whose sum lands
/// within tolerance produces a [`MatchOutcome::ManyToOne`] with the fixed
/// [`COMBINED_INVOICE_SCORE`]. Returns the accepted matches and the
/// invoices left unclaimed, in their original order.
#[must_use]
pub fn match_combined_invoices(
    bank_lines: &[BankLine],
    unmatched: Vec<Invoice>,
    ledger: &mut ConsumptionLedger,
    tolerance: &BigDecimal,
) -> (Vec<MatchOutcome>, Vec<Invoice>) {
    let mut matched = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for (line_index, line) in bank_lines.iter().enumerate() {
        if ledger.is_consumed(line_index) {
            continue;
        }

        let mut candidates: Vec<(usize, &Invoice)> = unmatched
            .iter()
            .enumerate()
            .filter(|(index, _)| !claimed.contains(index))
            .collect();
        candidates.sort_by_key(|(_, invoice)| (&line.amount - &invoice.amount).abs());
        candidates.truncate(CANDIDATE_WINDOW);

        'pairs: for (i, &(first_index, first)) in candidates.iter().enumerate() {
            for &(second_index, second) in candidates.iter().skip(i + 1) {
                let sum = &first.amount + &second.amount;
                let diff = (&sum - &line.amount).abs();
                if diff <= *tolerance {
                    ledger.mark_consumed(line_index);
                    claimed.insert(first_index);
                    claimed.insert(second_index);
                    matched.push(MatchOutcome::ManyToOne {
                        bank_line: line.clone(),
                        invoices: [first.clone(), second.clone()],
                        combined_amount: sum,
                        score: COMBINED_INVOICE_SCORE,
                        confidence: Confidence::Medium,
                    });
                    break 'pairs;
                }
            }
        }
    }

    let remaining = unmatched
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !claimed.contains(index))
        .map(|(_, invoice)| invoice)
        .collect();

    (matched, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn money(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    fn tolerance() -> BigDecimal {
        money("0.01")
    }

    #[test]
    fn test_split_payment_found() {
        let invoice = Invoice::new("INV-1", money("150.00"), date(1));
        let lines = vec![
            BankLine::new("B-1", money("90.00"), date(2)),
            BankLine::new("B-2", money("400.00"), date(2)),
            BankLine::new("B-3", money("60.00"), date(3)),
        ];
        let ledger = ConsumptionLedger::new();

        let split = find_split_payment(&invoice, &lines, &ledger, &tolerance()).unwrap();
        let mut indices = split.indices;
        indices.sort_unstable();
        assert_eq!(indices, [0, 2]);
        assert_eq!(split.combined_amount, money("150.00"));
        assert!(split.score >= 0.7);
    }

    #[test]
    fn test_split_payment_exact_sum_scores_one() {
        let invoice = Invoice::new("INV-1", money("150.00"), date(1));
        let lines = vec![
            BankLine::new("B-1", money("90.00"), date(2)),
            BankLine::new("B-2", money("60.00"), date(2)),
        ];
        let split =
            find_split_payment(&invoice, &lines, &ConsumptionLedger::new(), &tolerance()).unwrap();
        assert!((split.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_payment_skips_consumed_lines() {
        let invoice = Invoice::new("INV-1", money("150.00"), date(1));
        let lines = vec![
            BankLine::new("B-1", money("90.00"), date(2)),
            BankLine::new("B-2", money("60.00"), date(2)),
        ];
        let mut ledger = ConsumptionLedger::new();
        ledger.mark_consumed(0);

        assert!(find_split_payment(&invoice, &lines, &ledger, &tolerance()).is_none());
    }

    #[test]
    fn test_split_payment_none_outside_tolerance() {
        let invoice = Invoice::new("INV-1", money("150.00"), date(1));
        let lines = vec![
            BankLine::new("B-1", money("90.00"), date(2)),
            BankLine::new("B-2", money("61.00"), date(2)),
        ];
        assert!(
            find_split_payment(&invoice, &lines, &ConsumptionLedger::new(), &tolerance()).is_none()
        );
    }

    #[test]
    fn test_combined_invoices_fixed_score() {
        let lines = vec![BankLine::new("B-1", money("150.00"), date(2))];
        let unmatched = vec![
            Invoice::new("INV-1", money("90.00"), date(1)),
            Invoice::new("INV-2", money("60.00"), date(1)),
        ];
        let mut ledger = ConsumptionLedger::new();

        let (matched, remaining) =
            match_combined_invoices(&lines, unmatched, &mut ledger, &tolerance());

        assert_eq!(matched.len(), 1);
        assert!(remaining.is_empty());
        assert!(ledger.is_consumed(0));
        match &matched[0] {
            MatchOutcome::ManyToOne {
                combined_amount,
                score,
                confidence,
                ..
            } => {
                assert_eq!(*combined_amount, money("150.00"));
                assert!((score - COMBINED_INVOICE_SCORE).abs() < 1e-9);
                assert_eq!(*confidence, Confidence::Medium);
            }
            other => panic!("expected many-to-one, got {other:?}"),
        }
    }

    #[test]
    fn test_combined_invoices_claims_each_invoice_once() {
        // two bank lines both summable from the same invoice pool; the
        // second must not reuse invoices claimed by the first
        let lines = vec![
            BankLine::new("B-1", money("150.00"), date(2)),
            BankLine::new("B-2", money("150.00"), date(3)),
        ];
        let unmatched = vec![
            Invoice::new("INV-1", money("90.00"), date(1)),
            Invoice::new("INV-2", money("60.00"), date(1)),
            Invoice::new("INV-3", money("100.00"), date(1)),
        ];
        let mut ledger = ConsumptionLedger::new();

        let (matched, remaining) =
            match_combined_invoices(&lines, unmatched, &mut ledger, &tolerance());

        assert_eq!(matched.len(), 1);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].invoice_number, "INV-3");
        assert!(!ledger.is_consumed(1));
    }
}
