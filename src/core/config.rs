use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Default minimum composite score for accepting a one-to-one match.
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Default date-proximity horizon in days.
pub const DEFAULT_DATE_WINDOW: i64 = 7;

/// Configuration for one reconciliation run.
///
/// Supplied once per run and read-only while the run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Absolute amount difference treated as equal.
    pub amount_tolerance: BigDecimal,

    /// When true an amount mismatch lowers the score but never blocks a
    /// one-to-one match.
    pub allow_variance: bool,

    /// Days over which date proximity decays to zero.
    pub date_window: i64,

    /// Minimum composite score to accept a one-to-one match.
    pub threshold: f64,

    /// Sub-score weights for the candidate scorer.
    pub weights: MatchWeights,

    /// Enables the split-payment and combined-invoice passes.
    pub enable_grouping: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: default_tolerance(),
            allow_variance: false,
            date_window: DEFAULT_DATE_WINDOW,
            threshold: DEFAULT_THRESHOLD,
            weights: MatchWeights::default(),
            enable_grouping: false,
        }
    }
}

/// One cent of absolute tolerance.
fn default_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// Weights applied to the four candidate sub-scores.
///
/// Not required to sum to one; the scorer clamps the composite to 1.0
/// instead of normalizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub reference: f64,
    pub amount: f64,
    pub date: f64,
    pub customer: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            reference: 0.45,
            amount: 0.35,
            date: 0.10,
            customer: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance_is_one_cent() {
        let config = ReconcileConfig::default();
        assert_eq!(config.amount_tolerance, "0.01".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn test_default_weights() {
        let weights = MatchWeights::default();
        let total = weights.reference + weights.amount + weights.date + weights.customer;
        assert!((total - 1.0).abs() < 1e-9);
    }
}
