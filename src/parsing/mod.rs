//! CSV ingestion for invoice and bank-statement exports.
//!
//! This is the collaborator boundary in front of the engine: readers map
//! spreadsheet-style headers onto record fields via alias tables, then
//! normalize every cell (whitespace collapse, reference upper-casing,
//! money and date parsing). The engine itself never re-parses anything.
//!
//! - [`read_invoices`] / [`parse_invoices`]: invoice CSV exports
//! - [`read_bank_lines`] / [`parse_bank_lines`]: bank statement CSV exports
//!
//! Blank identifier cells get `INV-{n}` / `BANK-{n}` defaults; unparsable
//! dates fall back to today, mirroring how the upstream exports behave.

pub mod mapping;
pub mod normalize;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::Local;
use thiserror::Error;
use tracing::debug;

use crate::core::bank::BankLine;
use crate::core::invoice::Invoice;
use mapping::{
    detect_columns, missing_required, BANK_ALIASES, INVOICE_ALIASES, REQUIRED_BANK_FIELDS,
    REQUIRED_INVOICE_FIELDS,
};
use normalize::{clean_reference, clean_text, normalize_currency, parse_date, parse_money};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {0}")]
    MissingColumns(String),

    #[error("no data rows found")]
    Empty,
}

/// Read and normalize an invoice CSV export.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumns`] if a required column cannot be
/// detected, [`IngestError::Empty`] for a header-only file, or an
/// IO/CSV error.
pub fn read_invoices(path: &Path) -> Result<Vec<Invoice>, IngestError> {
    let invoices = parse_invoices(std::fs::File::open(path)?)?;
    debug!(rows = invoices.len(), path = %path.display(), "parsed invoice file");
    Ok(invoices)
}

/// Parse invoice CSV content from any reader. See [`read_invoices`].
///
/// # Errors
///
/// Same conditions as [`read_invoices`].
pub fn parse_invoices<R: Read>(input: R) -> Result<Vec<Invoice>, IngestError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mapping = detect_columns(&headers, INVOICE_ALIASES);
    let missing = missing_required(&mapping, &REQUIRED_INVOICE_FIELDS);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing.join(", ")));
    }

    let today = Local::now().date_naive();
    let mut invoices = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |field: &str| field_cell(&mapping, &record, field);

        let number = clean_text(cell("invoice_number"));
        let amount_cell = cell("amount");
        invoices.push(Invoice {
            invoice_number: if number.is_empty() {
                format!("INV-{}", row_index + 1)
            } else {
                number
            },
            customer_name: clean_text(cell("customer_name")),
            invoice_date: parse_date(cell("invoice_date")).unwrap_or(today),
            due_date: parse_date(cell("due_date")),
            amount: parse_money(amount_cell),
            currency: currency_of(cell("currency"), amount_cell),
            reference: clean_reference(cell("reference")),
        });
    }

    if invoices.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(invoices)
}

/// Read and normalize a bank statement CSV export.
///
/// # Errors
///
/// Same conditions as [`read_invoices`].
pub fn read_bank_lines(path: &Path) -> Result<Vec<BankLine>, IngestError> {
    let lines = parse_bank_lines(std::fs::File::open(path)?)?;
    debug!(rows = lines.len(), path = %path.display(), "parsed bank statement file");
    Ok(lines)
}

/// Parse bank statement CSV content from any reader. See
/// [`read_bank_lines`].
///
/// # Errors
///
/// Same conditions as [`read_invoices`].
pub fn parse_bank_lines<R: Read>(input: R) -> Result<Vec<BankLine>, IngestError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mapping = detect_columns(&headers, BANK_ALIASES);
    let missing = missing_required(&mapping, &REQUIRED_BANK_FIELDS);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing.join(", ")));
    }

    let today = Local::now().date_naive();
    let mut lines = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |field: &str| field_cell(&mapping, &record, field);

        let bank_id = clean_text(cell("bank_id"));
        let amount_cell = cell("amount");
        lines.push(BankLine {
            bank_id: if bank_id.is_empty() {
                format!("BANK-{}", row_index + 1)
            } else {
                bank_id
            },
            transaction_date: parse_date(cell("transaction_date")).unwrap_or(today),
            description: clean_text(cell("description")),
            amount: parse_money(amount_cell),
            currency: currency_of(cell("currency"), amount_cell),
            reference: clean_reference(cell("reference")),
        });
    }

    if lines.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(lines)
}

fn field_cell<'a>(
    mapping: &HashMap<&'static str, usize>,
    record: &'a csv::StringRecord,
    field: &str,
) -> &'a str {
    mapping
        .get(field)
        .and_then(|&index| record.get(index))
        .unwrap_or("")
}

/// Currency comes from the currency column when present, otherwise from
/// any code embedded in the amount cell.
fn currency_of(currency_cell: &str, amount_cell: &str) -> String {
    let source = if currency_cell.trim().is_empty() {
        amount_cell
    } else {
        currency_cell
    };
    normalize_currency(source)
}
