//! Invoice-to-bank matching engine and scoring.
//!
//! This module provides the core reconciliation functionality:
//!
//! - [`ReconcileEngine`](engine::ReconcileEngine): main entry point for a run
//! - [`score_candidate`](scoring::score_candidate): the four-part candidate scorer
//! - [`ConsumptionLedger`](ledger::ConsumptionLedger): at-most-once record claims
//! - [`MatchOutcome`](outcome::MatchOutcome): classified match results
//!
//! ## Matching algorithm
//!
//! A run makes up to three passes over the data, all sharing one
//! consumption ledger:
//!
//! 1. **One-to-one**: for each invoice in input order, greedily take the
//!    best-scoring unconsumed bank line if it clears the acceptance
//!    threshold and the amount gate.
//! 2. **Split payments** (grouping enabled): an invoice that fails
//!    one-to-one acceptance searches the 40 closest-by-amount lines for a
//!    pair summing to its amount within tolerance.
//! 3. **Combined invoices** (grouping enabled): leftover bank lines search
//!    the unmatched-invoice pool for a pair summing to their amount.
//!
//! ## Scoring
//!
//! The composite score blends four weighted sub-scores:
//!
//! - **Reference**: exact containment of the invoice reference or number
//!   in the bank line's reference/description, with a fuzzy fallback
//! - **Amount**: exact within tolerance, then linear decay
//! - **Date**: linear decay across the configured window
//! - **Customer**: token/edit-distance similarity of name vs. description
//!
//! Grouped matches are accepted on amount evidence alone and carry fixed
//! medium confidence.

pub mod engine;
pub mod grouping;
pub mod ledger;
pub mod outcome;
pub mod scoring;
pub mod similarity;
