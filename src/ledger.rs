//! The session that sits between the user interface and the expense store.

use crate::{
    Clock, Error,
    database_id::ExpenseId,
    expense::parse_date,
    stores::{ExpenseFilter, ExpenseStore},
};

pub use crate::stores::ExpenseListing;

/// The result of [Ledger::delete_selected].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The expense was deleted. Holds the refreshed listing for the current
    /// filter.
    Deleted(ExpenseListing),
    /// The user declined the confirmation, nothing was changed.
    Cancelled,
}

/// Turns user actions into store calls and keeps track of what is on screen.
///
/// Rows are shown with a local row number that has nothing to do with the
/// stored ID, so the ledger remembers the ID behind each displayed row. A
/// selected row is always resolved through these IDs and never by comparing
/// the rendered text, since two expenses with the same description, amount and
/// date would be indistinguishable.
pub struct Ledger<S, C> {
    store: S,
    clock: C,
    /// The IDs of the listed expenses, one per row in display order.
    displayed_ids: Vec<ExpenseId>,
    current_filter: ExpenseFilter,
}

impl<S, C> Ledger<S, C>
where
    S: ExpenseStore,
    C: Clock,
{
    /// Create a session over `store` that resolves "today" with `clock`.
    ///
    /// The session starts out filtered to today's expenses, but nothing is
    /// listed until [Ledger::apply_filter] is called.
    pub fn new(store: S, clock: C) -> Self {
        let current_filter = ExpenseFilter::ExactDate(clock.today());

        Self {
            store,
            clock,
            displayed_ids: Vec::new(),
            current_filter,
        }
    }

    /// List the expenses selected by `token`: "today", "all" or an ISO date.
    ///
    /// "today" is resolved with the clock on every call. On success the
    /// listing replaces the displayed rows and becomes the current filter.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidDate] if the token is not a keyword or a valid date,
    ///   leaving the session unchanged,
    /// - or [Error::StorageFatal] if the store could not be read.
    pub fn apply_filter(&mut self, token: &str) -> Result<ExpenseListing, Error> {
        let filter = ExpenseFilter::parse_token(token, &self.clock)?;

        self.show(filter)
    }

    /// Record a new expense and then show the expenses for its date.
    ///
    /// Surrounding whitespace is ignored for all three fields. The amount may
    /// be zero or negative.
    ///
    /// # Errors
    /// Returns, without changing the store:
    /// - [Error::InvalidAmount] if `amount` is not a finite number,
    /// - [Error::EmptyDescription] if `description` is blank,
    /// - [Error::InvalidDate] if `date` is not in the form YYYY-MM-DD.
    ///
    /// Returns [Error::StorageFatal] if the store could not be written or read.
    pub fn add(
        &mut self,
        description: &str,
        amount: &str,
        date: &str,
    ) -> Result<ExpenseListing, Error> {
        let amount = parse_amount(amount)?;

        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let date = parse_date(date.trim())?;

        self.store.insert(description, amount, date)?;

        self.show(ExpenseFilter::ExactDate(date))
    }

    /// Delete the expense on the selected row after asking `confirm`.
    ///
    /// `selection` is a zero-based index into the rows of the last listing.
    /// `confirm` is given the ID of the expense about to be deleted and must
    /// return `true` for the deletion to go ahead. Afterwards the current
    /// filter is applied again so the rows and total are up to date.
    ///
    /// # Errors
    /// Returns, without changing the store:
    /// - [Error::NothingSelected] if `selection` is `None`,
    /// - [Error::InvalidSelection] if `selection` is not a listed row.
    ///
    /// Returns [Error::StorageFatal] if the store could not be written or read.
    pub fn delete_selected<F>(
        &mut self,
        selection: Option<usize>,
        confirm: F,
    ) -> Result<DeleteOutcome, Error>
    where
        F: FnOnce(ExpenseId) -> bool,
    {
        let index = selection.ok_or(Error::NothingSelected)?;

        let id = *self
            .displayed_ids
            .get(index)
            .ok_or(Error::InvalidSelection {
                index,
                len: self.displayed_ids.len(),
            })?;

        if !confirm(id) {
            tracing::debug!("Deletion of expense {id} was cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.store.delete(id)?;

        self.show(self.current_filter).map(DeleteOutcome::Deleted)
    }

    /// The IDs behind the displayed rows, in display order.
    pub fn displayed_ids(&self) -> &[ExpenseId] {
        &self.displayed_ids
    }

    /// The filter of the last listing.
    pub fn current_filter(&self) -> ExpenseFilter {
        self.current_filter
    }

    /// End the session and hand back the store, e.g. to close it.
    pub fn into_store(self) -> S {
        self.store
    }

    fn show(&mut self, filter: ExpenseFilter) -> Result<ExpenseListing, Error> {
        let listing = self.store.query(filter)?;

        self.displayed_ids = listing.ids();
        self.current_filter = filter;

        Ok(listing)
    }
}

fn parse_amount(text: &str) -> Result<f64, Error> {
    let text = text.trim();

    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use time::{Date, Duration, macros::date};

    use crate::{
        Error,
        stores::{ExpenseFilter, ExpenseStore, SQLiteExpenseStore},
    };

    use super::{DeleteOutcome, Ledger, parse_amount};

    fn new_ledger(today: Date) -> Ledger<SQLiteExpenseStore, impl Fn() -> Date> {
        let store = SQLiteExpenseStore::open_in_memory().unwrap();

        Ledger::new(store, move || today)
    }

    /// Adds coffee and lunch on 2024-01-01 and a taxi on 2024-01-02.
    fn ledger_with_expenses() -> Ledger<SQLiteExpenseStore, impl Fn() -> Date> {
        let mut ledger = new_ledger(date!(2024 - 01 - 02));
        ledger.add("coffee", "4.50", "2024-01-01").unwrap();
        ledger.add("lunch", "12.00", "2024-01-01").unwrap();
        ledger.add("taxi", "20.00", "2024-01-02").unwrap();
        ledger
    }

    fn descriptions(listing: &super::ExpenseListing) -> Vec<&str> {
        listing
            .expenses
            .iter()
            .map(|expense| expense.description.as_str())
            .collect()
    }

    fn count_expenses<C: Fn() -> Date>(ledger: Ledger<SQLiteExpenseStore, C>) -> u32 {
        ledger.into_store().count().unwrap()
    }

    #[test]
    fn starts_filtered_to_today() {
        let ledger = new_ledger(date!(2024 - 05 - 06));

        assert_eq!(
            ledger.current_filter(),
            ExpenseFilter::ExactDate(date!(2024 - 05 - 06))
        );
        assert!(ledger.displayed_ids().is_empty());
    }

    #[test]
    fn filters_by_date_and_all() {
        let mut ledger = ledger_with_expenses();

        let day = ledger.apply_filter("2024-01-01").unwrap();
        assert_eq!(descriptions(&day), ["coffee", "lunch"]);
        assert_eq!(day.total, 16.5);

        let all = ledger.apply_filter("all").unwrap();
        assert_eq!(descriptions(&all), ["coffee", "lunch", "taxi"]);
        assert_eq!(all.total, 36.5);
        assert_eq!(ledger.current_filter(), ExpenseFilter::All);
    }

    #[test]
    fn displayed_ids_follow_listing_order() {
        let mut ledger = ledger_with_expenses();

        let listing = ledger.apply_filter("all").unwrap();

        assert_eq!(ledger.displayed_ids(), listing.ids().as_slice());
        assert_eq!(ledger.displayed_ids().len(), 3);
    }

    #[test]
    fn add_switches_filter_to_new_date() {
        let mut ledger = new_ledger(date!(2024 - 01 - 10));
        ledger.apply_filter("today").unwrap();

        let listing = ledger.add("gift", "5", "2024-01-01").unwrap();

        assert_eq!(
            ledger.current_filter(),
            ExpenseFilter::ExactDate(date!(2024 - 01 - 01))
        );
        assert_eq!(descriptions(&listing), ["gift"]);
        assert_eq!(ledger.displayed_ids(), listing.ids().as_slice());
    }

    #[test]
    fn add_increases_total_by_amount() {
        let mut ledger = ledger_with_expenses();
        let before = ledger.apply_filter("2024-01-01").unwrap();

        let after = ledger.add("snack", "2.25", "2024-01-01").unwrap();

        assert_eq!(after.total, before.total + 2.25);
        assert_eq!(after.expenses.last().unwrap().description, "snack");
    }

    #[test]
    fn add_trims_input() {
        let mut ledger = new_ledger(date!(2024 - 01 - 01));

        let listing = ledger.add("  tea  ", " 3.5 ", " 2024-01-01 ").unwrap();

        assert_eq!(descriptions(&listing), ["tea"]);
        assert_eq!(listing.total, 3.5);
    }

    #[test]
    fn add_accepts_negative_amount() {
        let mut ledger = new_ledger(date!(2024 - 01 - 01));

        let listing = ledger.add("refund", "-7.5", "2024-01-01").unwrap();

        assert_eq!(listing.total, -7.5);
    }

    #[test]
    fn add_rejects_invalid_input_without_changing_store() {
        let amount = |text: &str| Error::InvalidAmount(text.to_owned());
        let date = |text: &str| Error::InvalidDate(text.to_owned());
        let cases = [
            (("", "5", "2024-01-01"), Error::EmptyDescription),
            (("   ", "5", "2024-01-01"), Error::EmptyDescription),
            (("gift", "abc", "2024-01-01"), amount("abc")),
            (("gift", "", "2024-01-01"), amount("")),
            (("gift", "NaN", "2024-01-01"), amount("NaN")),
            (("gift", "inf", "2024-01-01"), amount("inf")),
            (("gift", "5", "01/01/2024"), date("01/01/2024")),
            (("gift", "5", "2024-02-30"), date("2024-02-30")),
        ];

        for ((description, amount, date), want) in cases {
            let mut ledger = ledger_with_expenses();
            let filter = ledger.apply_filter("2024-01-01").unwrap().filter;
            let ids = ledger.displayed_ids().to_vec();

            let got = ledger.add(description, amount, date);

            assert_eq!(got, Err(want), "add({description:?}, {amount:?}, {date:?})");
            assert!(got.unwrap_err().is_validation_error());
            assert_eq!(ledger.current_filter(), filter);
            assert_eq!(ledger.displayed_ids(), ids.as_slice());
            assert_eq!(count_expenses(ledger), 3);
        }
    }

    #[test]
    fn invalid_filter_leaves_session_unchanged() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("2024-01-01").unwrap();
        let ids = ledger.displayed_ids().to_vec();

        let result = ledger.apply_filter("01/01/2024");

        assert_eq!(result, Err(Error::InvalidDate("01/01/2024".to_owned())));
        assert_eq!(
            ledger.current_filter(),
            ExpenseFilter::ExactDate(date!(2024 - 01 - 01))
        );
        assert_eq!(ledger.displayed_ids(), ids.as_slice());
    }

    #[test]
    fn today_is_resolved_on_every_call() {
        let today = Rc::new(Cell::new(date!(2024 - 01 - 01)));
        let clock = {
            let today = today.clone();
            move || today.get()
        };
        let store = SQLiteExpenseStore::open_in_memory().unwrap();
        let mut ledger = Ledger::new(store, clock);

        let first = ledger.apply_filter("today").unwrap().filter;
        today.set(today.get() + Duration::days(1));
        let second = ledger.apply_filter("today").unwrap().filter;

        assert_eq!(first, ExpenseFilter::ExactDate(date!(2024 - 01 - 01)));
        assert_eq!(second, ExpenseFilter::ExactDate(date!(2024 - 01 - 02)));
        assert_ne!(first, second);
    }

    #[test]
    fn delete_selected_removes_expense_and_refreshes() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("2024-01-01").unwrap();
        let coffee_id = ledger.displayed_ids()[0];
        let mut asked_about = None;

        let outcome = ledger
            .delete_selected(Some(0), |id| {
                asked_about = Some(id);
                true
            })
            .unwrap();

        assert_eq!(asked_about, Some(coffee_id));
        let DeleteOutcome::Deleted(listing) = outcome else {
            panic!("want expense to be deleted, got {outcome:?}");
        };
        assert_eq!(descriptions(&listing), ["lunch"]);
        assert_eq!(listing.total, 12.0);
        assert_eq!(ledger.displayed_ids(), listing.ids().as_slice());

        let requeried = ledger.apply_filter("2024-01-01").unwrap();
        assert_eq!(descriptions(&requeried), ["lunch"]);
        assert_eq!(requeried.total, 12.0);
    }

    #[test]
    fn delete_selected_keeps_current_filter() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("all").unwrap();

        let outcome = ledger.delete_selected(Some(2), |_| true).unwrap();

        let DeleteOutcome::Deleted(listing) = outcome else {
            panic!("want expense to be deleted, got {outcome:?}");
        };
        assert_eq!(listing.filter, ExpenseFilter::All);
        assert_eq!(descriptions(&listing), ["coffee", "lunch"]);
    }

    #[test]
    fn delete_selected_resolves_identical_rows_by_id() {
        let mut ledger = new_ledger(date!(2024 - 01 - 01));
        ledger.add("coffee", "4.50", "2024-01-01").unwrap();
        ledger.add("coffee", "4.50", "2024-01-01").unwrap();
        let second_id = ledger.displayed_ids()[1];

        let outcome = ledger.delete_selected(Some(1), |_| true).unwrap();

        let DeleteOutcome::Deleted(listing) = outcome else {
            panic!("want expense to be deleted, got {outcome:?}");
        };
        assert_eq!(listing.expenses.len(), 1);
        assert_ne!(listing.expenses[0].id, second_id);
    }

    #[test]
    fn delete_selected_cancelled_keeps_expense() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("2024-01-01").unwrap();

        let outcome = ledger.delete_selected(Some(0), |_| false).unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(count_expenses(ledger), 3);
    }

    #[test]
    fn delete_selected_without_selection_fails() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("2024-01-01").unwrap();

        let result = ledger.delete_selected(None, |_| panic!("should not ask to confirm"));

        assert_eq!(result, Err(Error::NothingSelected));
        assert_eq!(count_expenses(ledger), 3);
    }

    #[test]
    fn delete_selected_out_of_range_fails() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("2024-01-01").unwrap();

        let result = ledger.delete_selected(Some(2), |_| panic!("should not ask to confirm"));

        assert_eq!(result, Err(Error::InvalidSelection { index: 2, len: 2 }));
        assert!(result.unwrap_err().is_selection_error());
        assert_eq!(count_expenses(ledger), 3);
    }

    #[test]
    fn delete_selected_before_any_listing_fails() {
        let mut ledger = new_ledger(date!(2024 - 01 - 01));

        let result = ledger.delete_selected(Some(0), |_| true);

        assert_eq!(result, Err(Error::InvalidSelection { index: 0, len: 0 }));
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount("4.50"), Ok(4.5));
        assert_eq!(parse_amount(" 12 "), Ok(12.0));
        assert_eq!(parse_amount("-3"), Ok(-3.0));
        assert_eq!(parse_amount("1e2"), Ok(100.0));
        assert_eq!(
            parse_amount("$5"),
            Err(Error::InvalidAmount("$5".to_owned()))
        );
    }

    #[test]
    fn store_is_usable_after_session_ends() {
        let mut ledger = ledger_with_expenses();
        ledger.apply_filter("all").unwrap();

        let store = ledger.into_store();

        assert_eq!(store.query(ExpenseFilter::All).unwrap().total, 36.5);
    }
}
