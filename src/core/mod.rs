//! Core domain records and configuration.
//!
//! This module provides the types the rest of the crate is built on:
//!
//! - [`Invoice`](invoice::Invoice): an outstanding receivable record
//! - [`BankLine`](bank::BankLine): a bank statement transaction line
//! - [`ReconcileConfig`](config::ReconcileConfig): per-run engine settings
//! - [`Confidence`](types::Confidence): match confidence tiers
//!
//! Records are produced by the ingestion layer with fields already
//! normalized (ISO dates, decimal amounts, upper-cased references) and
//! are immutable from the engine's point of view.

pub mod bank;
pub mod config;
pub mod invoice;
pub mod types;
