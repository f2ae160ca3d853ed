use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single bank statement transaction line.
///
/// Same provenance contract as [`crate::core::invoice::Invoice`]: fields
/// are normalized by ingestion and read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankLine {
    pub bank_id: String,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub currency: String,
    /// Payer-supplied reference, upper-cased and trimmed.
    pub reference: String,
}

impl BankLine {
    #[must_use]
    pub fn new(
        bank_id: impl Into<String>,
        amount: BigDecimal,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            bank_id: bank_id.into(),
            transaction_date,
            description: String::new(),
            amount,
            currency: "USD".to_string(),
            reference: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }
}
