//! Expense records and their table in the database.
//!
//! This module contains the `Expense` model, the schema for the `expenses`
//! table and the helpers for mapping rows and ISO dates. Older databases may
//! hold unpadded dates such as "2024-1-5", which are rewritten on startup.

mod core;

pub use core::{
    Expense, create_expense_table, map_expense_row, normalize_expense_dates, parse_date,
};
