//! Implements a SQLite backed expense store.

use std::path::Path;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    database_id::ExpenseId,
    db::initialize,
    expense::{Expense, map_expense_row},
    stores::{ExpenseFilter, ExpenseListing, ExpenseStore},
};

/// Stores expenses in a SQLite database.
///
/// The store owns the only connection to the database for the lifetime of the
/// process. Every write is committed immediately.
#[derive(Debug)]
pub struct SQLiteExpenseStore {
    connection: Connection,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will modify the database by adding the expenses table if
    /// it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::StorageFatal] if the database cannot be initialised.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }

    /// Open the database file at `path`, creating it if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::StorageFatal] if the file cannot be opened or is not
    /// a usable SQLite database.
    pub fn open(path: &Path) -> Result<Self, Error> {
        tracing::info!("Opening expense database at {}", path.display());
        let connection = Connection::open(path)?;

        Self::new(connection)
    }

    /// Open a database that only lives in memory, useful for testing.
    ///
    /// # Errors
    /// Returns an [Error::StorageFatal] if the database cannot be initialised.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Release the database connection.
    ///
    /// Dropping the store also releases the connection, but this function
    /// reports whether the database was closed cleanly.
    ///
    /// # Errors
    /// Returns an [Error::StorageFatal] if SQLite could not close the
    /// connection.
    pub fn close(self) -> Result<(), Error> {
        self.connection
            .close()
            .map_err(|(_connection, error)| Error::from(error))?;

        tracing::debug!("Closed expense database");

        Ok(())
    }

    /// Get the total number of expenses in the database.
    ///
    /// # Errors
    /// This function will return a [Error::StorageFatal] if there is some SQL
    /// error.
    pub fn count(&self) -> Result<u32, Error> {
        self.connection
            .query_row("SELECT COUNT(id) FROM expenses;", [], |row| row.get(0))
            .map_err(|error| error.into())
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// # Errors
    /// This function will return a [Error::StorageFatal] if there is some SQL
    /// error.
    fn insert(&mut self, description: &str, amount: f64, date: Date) -> Result<ExpenseId, Error> {
        self.connection.execute(
            "INSERT INTO expenses (description, amount, expense_date) VALUES (?1, ?2, ?3)",
            (description, amount, date),
        )?;

        let id = self.connection.last_insert_rowid();
        tracing::debug!("Inserted expense {id} for {date}: {description:?} {amount}");

        Ok(id)
    }

    /// Delete an expense from the database.
    ///
    /// # Errors
    /// This function will return a [Error::StorageFatal] if there is some SQL
    /// error.
    fn delete(&mut self, id: ExpenseId) -> Result<bool, Error> {
        let rows_affected = self
            .connection
            .execute("DELETE FROM expenses WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            tracing::debug!("Expense {id} was not in the database, nothing to delete");
        } else {
            tracing::info!("Deleted expense {id}");
        }

        Ok(rows_affected > 0)
    }

    /// Query for expenses in the database.
    ///
    /// Expenses with a date that cannot be read are left out of the listing.
    ///
    /// # Errors
    /// This function will return a [Error::StorageFatal] if there is a SQL
    /// error.
    fn query(&self, filter: ExpenseFilter) -> Result<ExpenseListing, Error> {
        let expenses = match filter {
            ExpenseFilter::All => self
                .connection
                .prepare(
                    "SELECT id, description, amount, expense_date FROM expenses \
                     ORDER BY expense_date ASC, id ASC",
                )?
                .query_map([], map_expense_row)?
                .filter_map(skip_unreadable_date)
                .collect::<Result<Vec<_>, _>>()?,
            ExpenseFilter::ExactDate(date) => self
                .connection
                .prepare(
                    "SELECT id, description, amount, expense_date FROM expenses \
                     WHERE expense_date = ?1 ORDER BY id ASC",
                )?
                .query_map([date], map_expense_row)?
                .filter_map(skip_unreadable_date)
                .collect::<Result<Vec<_>, _>>()?,
        };

        let listing = ExpenseListing::new(filter, expenses);
        tracing::debug!(
            "Query for {filter} returned {} expenses totalling {}",
            listing.expenses.len(),
            listing.total
        );

        Ok(listing)
    }
}

/// Drop rows whose date could not be read by [map_expense_row], so one bad
/// row does not hide every other expense.
fn skip_unreadable_date(
    result: Result<Expense, rusqlite::Error>,
) -> Option<Result<Expense, rusqlite::Error>> {
    match result {
        Err(rusqlite::Error::FromSqlConversionFailure(3, _, error)) => {
            tracing::warn!("Skipping an expense with an unreadable date: {error}");
            None
        }
        result => Some(result),
    }
}
