use std::collections::HashMap;

/// Header aliases accepted for each invoice field.
pub const INVOICE_ALIASES: &[(&str, &[&str])] = &[
    (
        "invoice_number",
        &[
            "invoice number",
            "invoice #",
            "invoice_no",
            "inv number",
            "inv #",
            "inv_no",
        ],
    ),
    (
        "customer_name",
        &["customer", "customer name", "client", "client name", "account"],
    ),
    (
        "invoice_date",
        &["invoice date", "inv date", "date", "bill date"],
    ),
    ("due_date", &["due date", "payment due", "due"]),
    ("amount", &["amount", "total", "invoice amount", "balance"]),
    ("currency", &["currency", "ccy", "curr"]),
    ("reference", &["reference", "ref", "memo", "description"]),
];

/// Header aliases accepted for each bank statement field.
pub const BANK_ALIASES: &[(&str, &[&str])] = &[
    (
        "transaction_date",
        &["transaction date", "date", "value date", "posted date"],
    ),
    (
        "description",
        &["description", "details", "narration", "memo"],
    ),
    ("amount", &["amount", "amt", "debit", "credit", "value"]),
    ("currency", &["currency", "ccy", "curr"]),
    (
        "reference",
        &["reference", "ref", "payment reference", "payer ref"],
    ),
    ("bank_id", &["bank id", "transaction id", "id", "txn id"]),
];

pub const REQUIRED_INVOICE_FIELDS: [&str; 3] = ["invoice_number", "amount", "invoice_date"];
pub const REQUIRED_BANK_FIELDS: [&str; 3] = ["transaction_date", "amount", "description"];

/// Map field names to header column indices by case-insensitive alias
/// lookup. The field name itself is also accepted, so this crate's own
/// exports round-trip.
#[must_use]
pub fn detect_columns(
    headers: &[String],
    aliases: &'static [(&'static str, &'static [&'static str])],
) -> HashMap<&'static str, usize> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    let mut mapping = HashMap::new();
    for (field, names) in aliases {
        let found = normalized
            .iter()
            .position(|header| names.contains(&header.as_str()) || header.as_str() == *field);
        if let Some(index) = found {
            mapping.insert(*field, index);
        }
    }
    mapping
}

/// Required fields with no detected column.
#[must_use]
pub fn missing_required(
    mapping: &HashMap<&'static str, usize>,
    required: &[&'static str],
) -> Vec<&'static str> {
    required
        .iter()
        .copied()
        .filter(|field| !mapping.contains_key(field))
        .collect()
}
