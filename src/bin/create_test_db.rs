use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Duration, OffsetDateTime};

use expense_ledger::{ExpenseStore, SQLiteExpenseStore};

/// A utility for creating a test database for the expense ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to create, ending today.
    #[arg(long, short, default_value_t = 7)]
    days: i64,
}

const SAMPLE_EXPENSES: [(&str, f64); 4] = [
    ("coffee", 4.50),
    ("lunch", 12.00),
    ("bus fare", 3.20),
    ("groceries", 54.35),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut store = SQLiteExpenseStore::open(output_path)?;

    println!("Creating test expenses...");

    let today = OffsetDateTime::now_utc().date();
    for day in (0..args.days).rev() {
        let date = today - Duration::days(day);

        // Vary the number of expenses per day so some days are quieter.
        let count = 1 + (day as usize % SAMPLE_EXPENSES.len());
        for (description, amount) in SAMPLE_EXPENSES.iter().take(count) {
            store.insert(description, *amount, date)?;
        }
    }

    println!("Created {} expenses.", store.count()?);
    store.close()?;

    println!("Success!");

    Ok(())
}
