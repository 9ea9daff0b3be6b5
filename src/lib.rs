//! A personal expense ledger backed by a local SQLite database.
//!
//! Expenses are recorded with a description, an amount and a date, and can be
//! reviewed one day at a time or all at once, together with a running total.
//!
//! The library is split into two layers:
//! - [stores] owns the durable record set and exposes insert, delete and
//!   filtered queries against a single `expenses` table.
//! - [Ledger] turns user intents (add, delete, filter) into store calls and
//!   remembers which record each displayed row refers to.

#![warn(missing_docs)]

mod clock;
mod database_id;
mod db;
mod expense;
mod format;
mod ledger;
mod logging;
mod shell;

pub mod stores;

pub use clock::{Clock, SystemClock};
pub use database_id::ExpenseId;
pub use expense::{Expense, parse_date};
pub use format::{format_currency, format_row, format_total};
pub use ledger::{DeleteOutcome, ExpenseListing, Ledger};
pub use logging::setup_logging;
pub use shell::{HELP_TEXT, ParseCommandError, ShellCommand, parse_shell_command};
pub use stores::{ExpenseFilter, ExpenseStore, SQLiteExpenseStore};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The description was empty or only contained whitespace.
    #[error("please enter a description")]
    EmptyDescription,

    /// The amount could not be parsed as a finite number.
    ///
    /// Holds the text that was rejected.
    #[error("amount must be a number, got \"{0}\"")]
    InvalidAmount(String),

    /// The date was not a valid calendar date in the form YYYY-MM-DD.
    ///
    /// Holds the text that was rejected.
    #[error("enter date as YYYY-MM-DD, got \"{0}\"")]
    InvalidDate(String),

    /// A delete was requested without selecting a row.
    #[error("please select an expense to delete")]
    NothingSelected,

    /// The selected row does not exist in the current listing.
    ///
    /// This usually means the listing was refreshed after the row was
    /// selected.
    #[error("unable to determine selected record: row {index} is not one of the {len} listed rows")]
    InvalidSelection {
        /// The zero-based index that was selected.
        index: usize,
        /// The number of rows in the current listing.
        len: usize,
    },

    /// The timezone name is not a canonical timezone, e.g. "Pacific/Auckland".
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The database could not be opened, initialised, read or written.
    ///
    /// There is no fallback store, so callers should treat this error as
    /// fatal and end the session.
    #[error("a storage error occurred: {0}")]
    StorageFatal(rusqlite::Error),
}

impl Error {
    /// Whether the error was caused by invalid user input for a new expense
    /// or filter.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyDescription | Error::InvalidAmount(_) | Error::InvalidDate(_)
        )
    }

    /// Whether the error was caused by a missing or stale row selection.
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Error::NothingSelected | Error::InvalidSelection { .. })
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::StorageFatal(value)
    }
}

#[cfg(test)]
mod error_tests {
    use super::Error;

    #[test]
    fn classifies_validation_errors() {
        let errors = [
            Error::EmptyDescription,
            Error::InvalidAmount("abc".to_owned()),
            Error::InvalidDate("01/01/2024".to_owned()),
        ];

        for error in errors {
            assert!(
                error.is_validation_error(),
                "{error:?} should be a validation error"
            );
            assert!(
                !error.is_selection_error(),
                "{error:?} should not be a selection error"
            );
        }
    }

    #[test]
    fn classifies_selection_errors() {
        let errors = [
            Error::NothingSelected,
            Error::InvalidSelection { index: 3, len: 1 },
        ];

        for error in errors {
            assert!(
                error.is_selection_error(),
                "{error:?} should be a selection error"
            );
            assert!(
                !error.is_validation_error(),
                "{error:?} should not be a validation error"
            );
        }
    }

    #[test]
    fn sql_errors_are_fatal() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(
            error,
            Error::StorageFatal(rusqlite::Error::QueryReturnedNoRows)
        );
        assert!(!error.is_validation_error());
        assert!(!error.is_selection_error());
    }
}
