//! Text formatting for listing expenses in a terminal.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::expense::Expense;

/// numfmt switches to scientific notation from this many dollars.
const SCIENTIFIC_NOTATION_CUTOFF: f64 = 1e12;

/// Format `number` as dollars with two decimal places, e.g. "$1,234.50".
///
/// The amount is rounded to the nearest cent first.
pub fn format_currency(number: f64) -> String {
    let number = (number * 100.0).round() / 100.0;

    if number.abs() >= SCIENTIFIC_NOTATION_CUTOFF {
        let sign = if number < 0.0 { "-" } else { "" };
        return format!("{sign}${:.2}", number.abs());
    }

    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("\"$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("\"-$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_cents(formatted_string)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "$12.3" and
/// "12.00" as "$12".
fn pad_cents(mut formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => formatted_string.push_str(".00"),
        Some(dot) => {
            let decimals = formatted_string.len() - dot - 1;
            for _ in decimals..2 {
                formatted_string.push('0');
            }
        }
    }

    formatted_string
}

/// Format an expense as a listing row with a 1-based row number, e.g.
/// "1 | coffee | $4.50 | 2024-01-01".
pub fn format_row(row_number: usize, expense: &Expense) -> String {
    format!(
        "{row_number} | {} | {} | {}",
        expense.description,
        format_currency(expense.amount),
        expense.date
    )
}

/// Format the total line shown below a listing.
pub fn format_total(total: f64) -> String {
    format!("Total Spent: {}", format_currency(total))
}
