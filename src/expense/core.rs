//! Defines the core data model and table schema for expenses.

use rusqlite::{Connection, Row, types::Type};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, database_id::ExpenseId};

/// The only date format accepted for new expenses, e.g. "2024-01-31".
const ISO_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Also accepts the unpadded dates, e.g. "2024-1-5", found in older databases.
const STORED_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month padding:none]-[day padding:none]");

/// Matches dates that are already stored in the ISO format.
const ISO_DATE_GLOB: &str = "[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]";

/// Money spent on a given day.
///
/// Expenses are created by [ExpenseStore::insert](crate::ExpenseStore::insert)
/// and can only be deleted afterwards, there is no way to edit them.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID assigned by the database, never reused after deletion.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// How much was spent.
    ///
    /// The sign is not checked, so refunds may be recorded as negative
    /// amounts.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
}

/// Parse `text` as an ISO calendar date in the form YYYY-MM-DD.
///
/// Month and day must be zero-padded, so "2024-1-5" is rejected.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date in that form.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, ISO_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Parse a date read from the database, accepting unpadded months and days.
pub fn parse_stored_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), STORED_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Create the expenses table in the database if it does not exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                expense_date TEXT NOT NULL
                )",
        (),
    )?;

    // Both date filters read rows by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(expense_date);",
        (),
    )?;

    Ok(())
}

/// Rewrite stored dates that are not in the ISO format, e.g. "2024-1-5", as
/// ISO dates so that they match date queries.
///
/// Dates that cannot be read at all are left as they are and logged.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn normalize_expense_dates(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare(
        "SELECT id, expense_date FROM expenses WHERE expense_date NOT GLOB ?1 ORDER BY id ASC",
    )?;
    let legacy_dates = statement
        .query_map([ISO_DATE_GLOB], |row| {
            Ok((row.get::<_, ExpenseId>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (id, text) in legacy_dates {
        match parse_stored_date(&text) {
            Ok(date) => {
                connection.execute(
                    "UPDATE expenses SET expense_date = ?1 WHERE id = ?2",
                    (date, id),
                )?;
                tracing::info!("Rewrote date of expense {id} from {text:?} to {date}");
            }
            Err(_) => tracing::warn!("Expense {id} has an unreadable date {text:?}"),
        }
    }

    Ok(())
}

/// Map a database row with the columns `id, description, amount, expense_date`
/// to an [Expense].
///
/// # Errors
/// Returns [rusqlite::Error::FromSqlConversionFailure] for column 3 if the
/// date cannot be read by [parse_stored_date].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let date_text: String = row.get(3)?;
    let date = Date::parse(date_text.trim(), STORED_DATE_FORMAT).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;

    Ok(Expense {
        id,
        description,
        amount,
        date,
    })
}
