use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

use crate::core::bank::BankLine;
use crate::core::invoice::Invoice;
use crate::core::types::Confidence;
use crate::matching::scoring::ScoreBreakdown;

/// An accepted correspondence between the invoice and bank sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum MatchOutcome {
    /// One invoice settled by one bank line.
    OneToOne {
        invoice: Invoice,
        bank_line: BankLine,
        score: f64,
        breakdown: ScoreBreakdown,
        confidence: Confidence,
    },

    /// One invoice settled by two bank lines (split payment).
    OneToMany {
        invoice: Invoice,
        bank_lines: [BankLine; 2],
        combined_amount: BigDecimal,
        score: f64,
        confidence: Confidence,
    },

    /// Two invoices settled by one bank line (combined remittance).
    ManyToOne {
        bank_line: BankLine,
        invoices: [Invoice; 2],
        combined_amount: BigDecimal,
        score: f64,
        confidence: Confidence,
    },
}

impl MatchOutcome {
    /// Number of input invoices this outcome accounts for.
    #[must_use]
    pub fn invoice_count(&self) -> usize {
        match self {
            Self::ManyToOne { .. } => 2,
            _ => 1,
        }
    }

    /// Number of input bank lines this outcome accounts for.
    #[must_use]
    pub fn bank_line_count(&self) -> usize {
        match self {
            Self::OneToMany { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        match self {
            Self::OneToOne { score, .. }
            | Self::OneToMany { score, .. }
            | Self::ManyToOne { score, .. } => *score,
        }
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::OneToOne { confidence, .. }
            | Self::OneToMany { confidence, .. }
            | Self::ManyToOne { confidence, .. } => *confidence,
        }
    }

    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        match self {
            Self::OneToOne { .. } => "one-to-one",
            Self::OneToMany { .. } => "one-to-many",
            Self::ManyToOne { .. } => "many-to-one",
        }
    }

    /// Invoice-side label; combined invoices join their numbers with `+`.
    #[must_use]
    pub fn invoice_label(&self) -> String {
        match self {
            Self::OneToOne { invoice, .. } | Self::OneToMany { invoice, .. } => {
                invoice.invoice_number.clone()
            }
            Self::ManyToOne { invoices, .. } => format!(
                "{} + {}",
                invoices[0].invoice_number, invoices[1].invoice_number
            ),
        }
    }

    /// Invoice-side customer; combined invoices join theirs with `|`.
    #[must_use]
    pub fn invoice_customer(&self) -> String {
        match self {
            Self::OneToOne { invoice, .. } | Self::OneToMany { invoice, .. } => {
                invoice.customer_name.clone()
            }
            Self::ManyToOne { invoices, .. } => format!(
                "{} | {}",
                invoices[0].customer_name, invoices[1].customer_name
            ),
        }
    }

    /// Invoice-side amount (the combined amount for grouped invoices).
    #[must_use]
    pub fn invoice_amount(&self) -> BigDecimal {
        match self {
            Self::OneToOne { invoice, .. } | Self::OneToMany { invoice, .. } => {
                invoice.amount.clone()
            }
            Self::ManyToOne {
                combined_amount, ..
            } => combined_amount.clone(),
        }
    }

    /// Invoice-side date (the first invoice's for combined invoices).
    #[must_use]
    pub fn invoice_date(&self) -> NaiveDate {
        match self {
            Self::OneToOne { invoice, .. } | Self::OneToMany { invoice, .. } => {
                invoice.invoice_date
            }
            Self::ManyToOne { invoices, .. } => invoices[0].invoice_date,
        }
    }

    #[must_use]
    pub fn invoice_due_date(&self) -> Option<NaiveDate> {
        match self {
            Self::OneToOne { invoice, .. } | Self::OneToMany { invoice, .. } => invoice.due_date,
            Self::ManyToOne { invoices, .. } => invoices[0].due_date,
        }
    }

    /// Display currency: the invoice's, except combined remittances take
    /// the bank line's.
    #[must_use]
    pub fn invoice_currency(&self) -> String {
        match self {
            Self::OneToOne { invoice, .. } | Self::OneToMany { invoice, .. } => {
                invoice.currency.clone()
            }
            Self::ManyToOne { bank_line, .. } => bank_line.currency.clone(),
        }
    }

    /// Bank-side description; split payments join theirs with `|`.
    #[must_use]
    pub fn bank_description(&self) -> String {
        match self {
            Self::OneToOne { bank_line, .. } | Self::ManyToOne { bank_line, .. } => {
                bank_line.description.clone()
            }
            Self::OneToMany { bank_lines, .. } => format!(
                "{} | {}",
                bank_lines[0].description, bank_lines[1].description
            ),
        }
    }

    /// Bank-side reference; split payments join theirs with `+`.
    #[must_use]
    pub fn bank_reference(&self) -> String {
        match self {
            Self::OneToOne { bank_line, .. } | Self::ManyToOne { bank_line, .. } => {
                bank_line.reference.clone()
            }
            Self::OneToMany { bank_lines, .. } => {
                format!("{} + {}", bank_lines[0].reference, bank_lines[1].reference)
            }
        }
    }

    /// Bank-side date (the first line's for split payments).
    #[must_use]
    pub fn bank_date(&self) -> NaiveDate {
        match self {
            Self::OneToOne { bank_line, .. } | Self::ManyToOne { bank_line, .. } => {
                bank_line.transaction_date
            }
            Self::OneToMany { bank_lines, .. } => bank_lines[0].transaction_date,
        }
    }
}

/// An invoice no pass could place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedInvoice {
    pub invoice: Invoice,
}

/// A bank line no match consumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedBankLine {
    pub bank_line: BankLine,
}

/// Classified result of one reconciliation run.
///
/// Every input invoice appears in exactly one of `matches` (counting two
/// for many-to-one) or `unmatched_invoices`, and every input bank line in
/// exactly one of `matches` (counting two for one-to-many) or
/// `unmatched_bank_lines`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub matches: Vec<MatchOutcome>,
    pub unmatched_invoices: Vec<UnmatchedInvoice>,
    pub unmatched_bank_lines: Vec<UnmatchedBankLine>,
}

impl Reconciliation {
    /// Input invoices accounted for by accepted matches.
    #[must_use]
    pub fn matched_invoice_count(&self) -> usize {
        self.matches.iter().map(MatchOutcome::invoice_count).sum()
    }

    /// Input bank lines accounted for by accepted matches.
    #[must_use]
    pub fn matched_bank_line_count(&self) -> usize {
        self.matches.iter().map(MatchOutcome::bank_line_count).sum()
    }
}
