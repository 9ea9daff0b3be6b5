/*! Sets up the application's database. */

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    expense::{create_expense_table, normalize_expense_dates},
};

/// Create the tables for the domain models if they do not exist.
///
/// Safe to call on every startup. Existing expenses are kept, but dates that
/// were stored without zero padding are rewritten in the ISO format.
///
/// # Errors
/// Returns an [Error::StorageFatal] if the database cannot be locked or the
/// tables cannot be created, e.g. the file is not a SQLite database.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;
    normalize_expense_dates(&transaction)?;

    transaction.commit()?;

    tracing::debug!("database initialised");

    Ok(())
}
