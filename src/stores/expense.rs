//! Defines the expense store trait and the filters it understands.

use std::fmt::Display;

use time::Date;

use crate::{Clock, Error, database_id::ExpenseId, expense::Expense, expense::parse_date};

/// Handles the creation, deletion and retrieval of expenses.
///
/// The store is the only component allowed to change the set of expenses.
pub trait ExpenseStore {
    /// Save a new expense and return its ID.
    ///
    /// Implementers should not validate the fields, that is the job of the
    /// caller.
    fn insert(&mut self, description: &str, amount: f64, date: Date) -> Result<ExpenseId, Error>;

    /// Remove the expense with `id`.
    ///
    /// Returns whether an expense was removed. Deleting an ID that is not in
    /// the store is not an error.
    fn delete(&mut self, id: ExpenseId) -> Result<bool, Error>;

    /// Retrieve the expenses selected by `filter` along with their total.
    ///
    /// [ExpenseFilter::All] returns every expense ordered by date and then
    /// ID, while [ExpenseFilter::ExactDate] returns that day's expenses
    /// ordered by ID, i.e. in the order they were added.
    fn query(&self, filter: ExpenseFilter) -> Result<ExpenseListing, Error>;
}

/// Selects which expenses [ExpenseStore::query] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFilter {
    /// Every expense ever recorded.
    All,
    /// Only the expenses recorded for one day.
    ExactDate(Date),
}

impl ExpenseFilter {
    /// Resolve a filter token: "today", "all" or an ISO date such as
    /// "2024-01-31".
    ///
    /// The keywords are matched case-insensitively and surrounding whitespace
    /// is ignored. `clock` is only read for "today", and it is read every
    /// time so that a long running session follows the calendar.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if the token is not a keyword or a valid
    /// ISO date.
    pub fn parse_token<C: Clock + ?Sized>(token: &str, clock: &C) -> Result<Self, Error> {
        let token = token.trim();

        if token.eq_ignore_ascii_case("today") {
            Ok(Self::ExactDate(clock.today()))
        } else if token.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            parse_date(token).map(Self::ExactDate)
        }
    }
}

impl Display for ExpenseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseFilter::All => write!(f, "All"),
            ExpenseFilter::ExactDate(date) => write!(f, "{date}"),
        }
    }
}

/// The result of a query: the matching expenses in display order and the sum
/// of their amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseListing {
    /// The filter that produced this listing.
    pub filter: ExpenseFilter,
    /// The expenses in the order they should be shown.
    pub expenses: Vec<Expense>,
    /// The sum of the amounts of `expenses`, zero if there are none.
    pub total: f64,
}

impl ExpenseListing {
    /// Create a listing and compute its total.
    pub fn new(filter: ExpenseFilter, expenses: Vec<Expense>) -> Self {
        let total = expenses.iter().map(|expense| expense.amount).sum();

        Self {
            filter,
            expenses,
            total,
        }
    }

    /// The IDs of the listed expenses in display order.
    pub fn ids(&self) -> Vec<ExpenseId> {
        self.expenses.iter().map(|expense| expense.id).collect()
    }

    /// Whether no expenses matched the filter.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}
