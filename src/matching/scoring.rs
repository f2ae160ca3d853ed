use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serialize;

use crate::core::bank::BankLine;
use crate::core::config::ReconcileConfig;
use crate::core::invoice::Invoice;
use crate::matching::similarity::text_similarity;

/// Sub-scores and raw measurements retained for explaining a candidate
/// pair.
///
/// Consumed by reporting only; no further matching logic reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub reference: f64,
    pub amount: f64,
    pub date: f64,
    pub customer: f64,
    /// Raw absolute amount difference.
    pub amount_diff: BigDecimal,
    /// Absolute gap between invoice and transaction dates, in days.
    pub date_gap: i64,
}

/// Scored invoice/bank-line pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    /// Weighted blend of the four sub-scores, clamped to 1.0.
    pub composite: f64,

    /// Whether the amount constraint alone allows this pair. Gates
    /// one-to-one acceptance independently of the composite score.
    pub amount_ok: bool,

    pub breakdown: ScoreBreakdown,
}

/// Score one invoice/bank-line pair under the given configuration.
///
/// Total and pure: every division is guarded, the same inputs always
/// produce the same score, and nothing is mutated.
#[must_use]
pub fn score_candidate(
    invoice: &Invoice,
    line: &BankLine,
    config: &ReconcileConfig,
) -> CandidateScore {
    let amount_diff = (&invoice.amount - &line.amount).abs();
    let amount_ok = config.allow_variance || amount_diff <= config.amount_tolerance;

    let reference = reference_score(invoice, line);
    let amount = amount_score(&amount_diff, &invoice.amount, &config.amount_tolerance);
    let date_gap = date_gap_days(invoice, line);
    let date = date_score(date_gap, config.date_window);
    let customer = customer_score(invoice, line);

    let weighted = reference * config.weights.reference
        + amount * config.weights.amount
        + date * config.weights.date
        + customer * config.weights.customer;

    CandidateScore {
        composite: weighted.min(1.0),
        amount_ok,
        breakdown: ScoreBreakdown {
            reference,
            amount,
            date,
            customer,
            amount_diff,
            date_gap,
        },
    }
}

/// 1.0 when the invoice's reference appears verbatim in the bank line's
/// reference or description, 0.9 when only the invoice number does, else
/// a fuzzy fallback against whichever of reference/description is set.
/// All containment checks are case-insensitive.
fn reference_score(invoice: &Invoice, line: &BankLine) -> f64 {
    let needle = invoice.match_reference();
    if needle.is_empty() {
        return 0.0;
    }

    let haystack = format!("{} {}", line.reference, line.description).to_uppercase();
    if haystack.contains(&needle.to_uppercase()) {
        return 1.0;
    }
    if !invoice.invoice_number.is_empty()
        && haystack.contains(&invoice.invoice_number.to_uppercase())
    {
        return 0.9;
    }

    let target = if line.reference.is_empty() {
        &line.description
    } else {
        &line.reference
    };
    text_similarity(needle, target)
}

/// 1.0 inside tolerance, then linear decay relative to the invoice amount.
fn amount_score(diff: &BigDecimal, invoice_amount: &BigDecimal, tolerance: &BigDecimal) -> f64 {
    if diff <= tolerance {
        return 1.0;
    }
    let diff = decimal_to_f64(diff);
    let base = decimal_to_f64(invoice_amount).max(1.0);
    (1.0 - diff / base).max(0.0)
}

fn date_gap_days(invoice: &Invoice, line: &BankLine) -> i64 {
    (invoice.invoice_date - line.transaction_date).num_days().abs()
}

/// `1 - gap/(window+1)` inside the window, 0 outside it.
fn date_score(gap: i64, window: i64) -> f64 {
    if gap > window {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        1.0 - gap as f64 / (window as f64 + 1.0)
    }
}

fn customer_score(invoice: &Invoice, line: &BankLine) -> f64 {
    if invoice.customer_name.is_empty() {
        return 0.0;
    }
    text_similarity(&invoice.customer_name, &line.description)
}

/// Lossy conversion for score ratios only; tolerance comparisons stay
/// exact on `BigDecimal`.
fn decimal_to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
