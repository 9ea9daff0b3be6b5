//! Contains the store trait for expenses and its SQLite implementation.

mod expense;

pub mod sqlite;

pub use expense::{ExpenseFilter, ExpenseListing, ExpenseStore};
pub use sqlite::SQLiteExpenseStore;
