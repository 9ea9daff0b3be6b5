//! Database ID type definition.

/// Alias for the integer type SQLite assigns to each expense row.
pub type ExpenseId = i64;
