use std::fs;
use std::path::PathBuf;

use bigdecimal::BigDecimal;
use chrono::{Duration, Local};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Args)]
pub struct SampleArgs {
    /// Output directory for the generated CSVs
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Number of invoices to generate
    #[arg(long, default_value = "60")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

const CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];

/// Generate paired sample files: `sample_invoices.csv` and
/// `sample_bank.csv`. Every fifth invoice has no bank counterpart, and a
/// fifth of payments land 50 cents off, so both unmatched views and the
/// variance toggle have something to show.
///
/// # Errors
///
/// Returns an error if the directory or either file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SampleArgs, verbose: bool) -> anyhow::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = Local::now().date_naive();

    fs::create_dir_all(&args.dir)?;
    let invoice_path = args.dir.join("sample_invoices.csv");
    let bank_path = args.dir.join("sample_bank.csv");

    let mut invoice_writer = csv::Writer::from_path(&invoice_path)?;
    invoice_writer.write_record([
        "Invoice Number",
        "Customer",
        "Invoice Date",
        "Due Date",
        "Amount",
        "Currency",
        "Reference",
    ])?;

    let mut bank_writer = csv::Writer::from_path(&bank_path)?;
    bank_writer.write_record([
        "Transaction Date",
        "Description",
        "Amount",
        "Currency",
        "Reference",
        "Bank Id",
    ])?;

    let mut bank_rows = 0usize;
    for i in 1..=args.count {
        let cents: i64 = rng.gen_range(30_000..=930_000);
        let amount = BigDecimal::new(cents.into(), 2);
        let invoice_date = today - Duration::days(rng.gen_range(0..40));
        let due_date = invoice_date + Duration::days(20);
        let customer = format!("Customer {}", customer_letter(i));
        let reference = format!("REF-{i:04}");

        invoice_writer.write_record([
            format!("INV-{i:05}").as_str(),
            customer.as_str(),
            invoice_date.to_string().as_str(),
            due_date.to_string().as_str(),
            amount.to_string().as_str(),
            CURRENCIES[i % CURRENCIES.len()],
            reference.as_str(),
        ])?;

        // every fifth invoice goes unpaid
        if i % 5 == 0 {
            continue;
        }

        let paid = if rng.gen_bool(0.2) {
            amount + BigDecimal::new(50.into(), 2)
        } else {
            amount
        };
        bank_rows += 1;
        bank_writer.write_record([
            invoice_date.to_string().as_str(),
            format!("{customer} payment").as_str(),
            paid.to_string().as_str(),
            CURRENCIES[i % CURRENCIES.len()],
            reference.as_str(),
            format!("BANK-{i:05}").as_str(),
        ])?;
    }

    invoice_writer.flush()?;
    bank_writer.flush()?;

    println!(
        "Wrote {} invoices to {} and {} bank lines to {}",
        args.count,
        invoice_path.display(),
        bank_rows,
        bank_path.display()
    );
    if verbose {
        eprintln!("Seed: {:?}", args.seed);
    }

    Ok(())
}

fn customer_letter(i: usize) -> char {
    #[allow(clippy::cast_possible_truncation)]
    {
        char::from(b'A' + (i % 26) as u8)
    }
}
