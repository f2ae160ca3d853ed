use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An outstanding receivable record.
///
/// Created by the ingestion layer with fields already normalized (the
/// payment reference upper-cased and whitespace-collapsed); the matching
/// engine reads it but never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub amount: BigDecimal,
    /// 3-letter ISO code. Carried for reporting, never a match gate.
    pub currency: String,
    /// Free-text payment reference, upper-cased and trimmed.
    pub reference: String,
}

impl Invoice {
    #[must_use]
    pub fn new(
        invoice_number: impl Into<String>,
        amount: BigDecimal,
        invoice_date: NaiveDate,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            customer_name: String::new(),
            invoice_date,
            due_date: None,
            amount,
            currency: "USD".to_string(),
            reference: String::new(),
        }
    }

    #[must_use]
    pub fn with_customer(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = customer_name.into();
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
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

    /// Text used for reference matching: the payment reference, falling
    /// back to the invoice number when the reference is blank.
    #[must_use]
    pub fn match_reference(&self) -> &str {
        if self.reference.is_empty() {
            &self.invoice_number
        } else {
            &self.reference
        }
    }

    /// Date used for aging: the due date, falling back to the invoice date.
    #[must_use]
    pub fn aging_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.invoice_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_match_reference_prefers_reference() {
        let invoice = Invoice::new("INV-1", "100".parse().unwrap(), date(2024, 1, 1))
            .with_reference("PO-998");
        assert_eq!(invoice.match_reference(), "PO-998");
    }

    #[test]
    fn test_match_reference_falls_back_to_number() {
        let invoice = Invoice::new("INV-1", "100".parse().unwrap(), date(2024, 1, 1));
        assert_eq!(invoice.match_reference(), "INV-1");
    }

    #[test]
    fn test_aging_date_fallback() {
        let invoice = Invoice::new("INV-1", "100".parse().unwrap(), date(2024, 1, 1));
        assert_eq!(invoice.aging_date(), date(2024, 1, 1));

        let invoice = invoice.with_due_date(date(2024, 1, 21));
        assert_eq!(invoice.aging_date(), date(2024, 1, 21));
    }
}
