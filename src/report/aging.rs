use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::matching::outcome::UnmatchedInvoice;

/// Fixed overdue-day bins for unmatched receivables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Days91To180,
    Days181To360,
    Days361Plus,
}

impl AgingBucket {
    /// All buckets in report order.
    pub const ALL: [Self; 7] = [
        Self::Current,
        Self::Days1To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Days91To180,
        Self::Days181To360,
        Self::Days361Plus,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Days1To30 => "1-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Days91To180 => "91-180",
            Self::Days181To360 => "181-360",
            Self::Days361Plus => "361+",
        }
    }

    /// Bucket for a number of days overdue (zero or negative = not due).
    #[must_use]
    pub fn for_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            91..=180 => Self::Days91To180,
            181..=360 => Self::Days181To360,
            _ => Self::Days361Plus,
        }
    }
}

impl std::fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Count unmatched invoices per aging bucket as of a given date.
///
/// Ages by due date, falling back to invoice date. Every bucket is
/// present in the result, zero or not. Pure summary: recomputed on
/// demand, never mutating outcomes.
#[must_use]
pub fn aging_buckets(
    unmatched: &[UnmatchedInvoice],
    as_of: NaiveDate,
) -> BTreeMap<AgingBucket, usize> {
    let mut buckets: BTreeMap<AgingBucket, usize> =
        AgingBucket::ALL.iter().map(|bucket| (*bucket, 0)).collect();

    for item in unmatched {
        let overdue = (as_of - item.invoice.aging_date()).num_days();
        *buckets
            .entry(AgingBucket::for_days_overdue(overdue))
            .or_insert(0) += 1;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::Invoice;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unmatched_due(due: NaiveDate) -> UnmatchedInvoice {
        UnmatchedInvoice {
            invoice: Invoice::new("INV-1", "100.00".parse().unwrap(), due).with_due_date(due),
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(AgingBucket::for_days_overdue(-5), AgingBucket::Current);
        assert_eq!(AgingBucket::for_days_overdue(0), AgingBucket::Current);
        assert_eq!(AgingBucket::for_days_overdue(1), AgingBucket::Days1To30);
        assert_eq!(AgingBucket::for_days_overdue(30), AgingBucket::Days1To30);
        assert_eq!(AgingBucket::for_days_overdue(31), AgingBucket::Days31To60);
        assert_eq!(AgingBucket::for_days_overdue(60), AgingBucket::Days31To60);
        assert_eq!(AgingBucket::for_days_overdue(90), AgingBucket::Days61To90);
        assert_eq!(AgingBucket::for_days_overdue(180), AgingBucket::Days91To180);
        assert_eq!(AgingBucket::for_days_overdue(360), AgingBucket::Days181To360);
        assert_eq!(AgingBucket::for_days_overdue(361), AgingBucket::Days361Plus);
        assert_eq!(AgingBucket::for_days_overdue(4000), AgingBucket::Days361Plus);
    }

    #[test]
    fn test_all_buckets_present() {
        let buckets = aging_buckets(&[], date(2024, 6, 1));
        assert_eq!(buckets.len(), 7);
        assert!(buckets.values().all(|count| *count == 0));
    }

    #[test]
    fn test_counts_by_due_date() {
        let as_of = date(2024, 6, 1);
        let unmatched = vec![
            unmatched_due(date(2024, 6, 10)), // not yet due
            unmatched_due(date(2024, 5, 20)), // 12 days overdue
            unmatched_due(date(2024, 5, 2)),  // 30 days overdue
            unmatched_due(date(2023, 1, 1)),  // over a year
        ];

        let buckets = aging_buckets(&unmatched, as_of);
        assert_eq!(buckets[&AgingBucket::Current], 1);
        assert_eq!(buckets[&AgingBucket::Days1To30], 2);
        assert_eq!(buckets[&AgingBucket::Days361Plus], 1);
    }

    #[test]
    fn test_falls_back_to_invoice_date() {
        let invoice = Invoice::new("INV-1", "10.00".parse().unwrap(), date(2024, 5, 2));
        let buckets = aging_buckets(&[UnmatchedInvoice { invoice }], date(2024, 6, 1));
        assert_eq!(buckets[&AgingBucket::Days1To30], 1);
    }
}
