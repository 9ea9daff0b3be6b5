use std::{error::Error as StdError, path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Text};

use expense_ledger::{
    Clock, DeleteOutcome, Error, ExpenseId, ExpenseListing, HELP_TEXT, Ledger, SQLiteExpenseStore,
    ShellCommand, SystemClock, format_row, format_total, parse_shell_command, setup_logging,
};

type SessionLedger = Ledger<SQLiteExpenseStore, SystemClock>;

/// Record your expenses and review them by day or in total.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database holding the expenses.
    #[arg(long, env = "EXPENSE_LEDGER_DB", default_value = "expenses.db")]
    db_path: PathBuf,

    /// The canonical timezone used to work out today's date, e.g.
    /// "Pacific/Auckland". Defaults to the system's local time.
    #[arg(long, env = "EXPENSE_LEDGER_TIMEZONE")]
    timezone: Option<String>,

    /// File path to append debug logs to.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the expenses for "today", "all" or a date (YYYY-MM-DD).
    List {
        #[arg(default_value = "today")]
        filter: String,
    },
    /// Record an expense.
    Add {
        /// What the money was spent on.
        description: String,
        /// How much was spent.
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// The day the money was spent (YYYY-MM-DD), defaults to today.
        #[arg(long, short)]
        date: Option<String>,
    },
    /// Delete the expense on a row of a listing.
    Delete {
        /// The row number shown by `list`.
        row: usize,
        /// The listing the row belongs to: "today", "all" or a date.
        #[arg(long, short, default_value = "today")]
        filter: String,
        /// Delete without asking for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
    /// Start an interactive session, the default when no command is given.
    Shell,
}

fn main() -> Result<(), Box<dyn StdError>> {
    let args = Args::parse();
    setup_logging(args.log_file.as_deref())?;

    let clock = match &args.timezone {
        Some(timezone) => SystemClock::with_timezone(timezone)?,
        None => SystemClock::local(),
    };

    let store = match SQLiteExpenseStore::open(&args.db_path) {
        Ok(store) => store,
        Err(error) => {
            print_error(format!(
                "Could not open the expense database at {:?}: {error}",
                args.db_path
            ));
            exit(1);
        }
    };

    let mut ledger = Ledger::new(store, clock);

    let result = match args.command.unwrap_or(Command::Shell) {
        Command::List { filter } => ledger
            .apply_filter(&filter)
            .map(|listing| print_listing(&listing)),
        Command::Add {
            description,
            amount,
            date,
        } => {
            let date = date.unwrap_or_else(|| clock.today().to_string());
            ledger
                .add(&description, &amount, &date)
                .map(|listing| print_listing(&listing))
        }
        Command::Delete { row, filter, yes } => delete_row(&mut ledger, row, &filter, yes),
        Command::Shell => run_shell(&mut ledger),
    };

    let close_result = ledger.into_store().close();

    if let Err(error) = result {
        print_error(&error);
        exit(1);
    }

    close_result?;

    Ok(())
}

fn delete_row(
    ledger: &mut SessionLedger,
    row: usize,
    filter: &str,
    yes: bool,
) -> Result<(), Error> {
    let listing = ledger.apply_filter(filter)?;

    let outcome = ledger.delete_selected(row.checked_sub(1), |id| {
        yes || confirm_delete(&listing, id)
    })?;

    print_delete_outcome(&outcome);

    Ok(())
}

/// Read commands until the user quits.
///
/// Input mistakes are reported and the session carries on, storage errors end
/// the session.
fn run_shell(ledger: &mut SessionLedger) -> Result<(), Error> {
    println!("Expense Ledger, enter \"help\" to see the commands.");

    let mut listing = ledger.apply_filter("today")?;
    print_listing(&listing);

    loop {
        let line = match Text::new("ledger>").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(error) => {
                print_error(format!("Could not read from the terminal: {error}"));
                break;
            }
        };

        let command = match parse_shell_command(&line) {
            Ok(command) => command,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let result = match command {
            ShellCommand::List(token) => ledger.apply_filter(&token),
            ShellCommand::Add {
                date,
                amount,
                description,
            } => ledger.add(&description, &amount, &date),
            ShellCommand::Delete(selection) => ledger
                .delete_selected(selection, |id| confirm_delete(&listing, id))
                .map(|outcome| {
                    print_delete_outcome(&outcome);
                    match outcome {
                        DeleteOutcome::Deleted(listing) => listing,
                        DeleteOutcome::Cancelled => listing.clone(),
                    }
                }),
            ShellCommand::Help => {
                println!("{HELP_TEXT}");
                continue;
            }
            ShellCommand::Quit => break,
        };

        match result {
            Ok(new_listing) => {
                listing = new_listing;
                print_listing(&listing);
            }
            Err(error) if error.is_validation_error() || error.is_selection_error() => {
                print_error(error);
            }
            Err(error) => return Err(error),
        }
    }

    Ok(())
}

fn confirm_delete(listing: &ExpenseListing, id: ExpenseId) -> bool {
    let row = listing
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .map(|index| format_row(index + 1, &listing.expenses[index]))
        .unwrap_or_default();

    match Confirm::new("Delete selected expense?")
        .with_default(false)
        .with_help_message(&row)
        .prompt()
    {
        Ok(confirmed) => confirmed,
        Err(error) => {
            tracing::debug!("Could not read delete confirmation: {error}");
            false
        }
    }
}

fn print_delete_outcome(outcome: &DeleteOutcome) {
    match outcome {
        DeleteOutcome::Deleted(_) => println!("Expense deleted."),
        DeleteOutcome::Cancelled => println!("Nothing was deleted."),
    }
}

fn print_listing(listing: &ExpenseListing) {
    println!();
    println!("Expenses for {}", listing.filter);

    if listing.is_empty() {
        println!("No expenses.");
    }

    for (index, expense) in listing.expenses.iter().enumerate() {
        println!("{}", format_row(index + 1, expense));
    }

    println!("{}", format_total(listing.total));
    println!();
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}
