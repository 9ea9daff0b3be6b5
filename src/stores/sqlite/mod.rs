//! Contains the SQLite backed implementations of the store traits.

pub mod expense;

pub use expense::SQLiteExpenseStore;
