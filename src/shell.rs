//! Parses the commands typed into the interactive shell.

/// The commands understood by the interactive shell.
pub const HELP_TEXT: &str = "\
Commands:
  list [today|all|YYYY-MM-DD]         show expenses, defaults to today
  add YYYY-MM-DD AMOUNT DESCRIPTION   record an expense
  delete ROW                          delete the expense on a listed row
  help                                show this message
  quit                                leave the shell";

/// A command typed into the interactive shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Show the expenses for a filter token.
    List(String),
    /// Record an expense. The fields are passed on unchecked.
    Add {
        /// The date of the expense.
        date: String,
        /// The amount spent.
        amount: String,
        /// What the money was spent on, may contain spaces.
        description: String,
    },
    /// Delete the expense on a row of the last listing.
    ///
    /// Holds the zero-based index of the row, or `None` if no row was given.
    Delete(Option<usize>),
    /// Show the help text.
    Help,
    /// End the session.
    Quit,
}

/// The errors that may occur while parsing a shell command.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseCommandError {
    /// The line was blank.
    #[error("enter a command, or \"help\" to see the commands")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command \"{0}\", enter \"help\" to see the commands")]
    UnknownCommand(String),

    /// A required argument was not given.
    #[error("{command} needs {argument}")]
    MissingArgument {
        /// The command missing an argument.
        command: &'static str,
        /// A description of the missing argument.
        argument: &'static str,
    },

    /// The row is not a positive whole number.
    #[error("row must be one of the listed row numbers, got \"{0}\"")]
    InvalidRow(String),
}

/// Parse a line typed into the interactive shell.
///
/// Command names are case-insensitive. Rows are numbered from 1, as they are
/// displayed.
///
/// # Errors
/// Returns a [ParseCommandError] if the line is not a known command or is
/// missing an argument.
pub fn parse_shell_command(line: &str) -> Result<ShellCommand, ParseCommandError> {
    let (command, rest) = split_first_word(line.trim());

    match command.to_ascii_lowercase().as_str() {
        "" => Err(ParseCommandError::Empty),
        "list" | "ls" | "view" => {
            let token = if rest.is_empty() {
                "today"
            } else {
                rest.trim_end()
            };
            Ok(ShellCommand::List(token.to_owned()))
        }
        "add" => parse_add(rest),
        "delete" | "del" | "rm" => parse_delete(rest.trim_end()),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        _ => Err(ParseCommandError::UnknownCommand(command.to_owned())),
    }
}

/// Split off the first word, trimming the whitespace in front of the rest.
fn split_first_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn parse_add(arguments: &str) -> Result<ShellCommand, ParseCommandError> {
    let (date, rest) = split_first_word(arguments);
    if date.is_empty() {
        return Err(ParseCommandError::MissingArgument {
            command: "add",
            argument: "a date",
        });
    }

    // The description is checked by the ledger, so an empty one is passed on.
    let (amount, description) = split_first_word(rest);
    if amount.is_empty() {
        return Err(ParseCommandError::MissingArgument {
            command: "add",
            argument: "an amount",
        });
    }

    Ok(ShellCommand::Add {
        date: date.to_owned(),
        amount: amount.to_owned(),
        description: description.trim_end().to_owned(),
    })
}

fn parse_delete(arguments: &str) -> Result<ShellCommand, ParseCommandError> {
    if arguments.is_empty() {
        return Ok(ShellCommand::Delete(None));
    }

    match arguments.parse::<usize>() {
        Ok(row) if row > 0 => Ok(ShellCommand::Delete(Some(row - 1))),
        _ => Err(ParseCommandError::InvalidRow(arguments.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseCommandError, ShellCommand, parse_shell_command};

    #[test]
    fn list_defaults_to_today() {
        assert_eq!(
            parse_shell_command("list"),
            Ok(ShellCommand::List("today".to_owned()))
        );
    }

    #[test]
    fn list_takes_filter_token() {
        assert_eq!(
            parse_shell_command("LIST  2024-01-01 "),
            Ok(ShellCommand::List("2024-01-01".to_owned()))
        );
        assert_eq!(
            parse_shell_command("list all"),
            Ok(ShellCommand::List("all".to_owned()))
        );
    }

    #[test]
    fn add_keeps_spaces_in_description() {
        let got = parse_shell_command("add 2024-01-01  4.50   flat white, oat milk ");

        assert_eq!(
            got,
            Ok(ShellCommand::Add {
                date: "2024-01-01".to_owned(),
                amount: "4.50".to_owned(),
                description: "flat white, oat milk".to_owned(),
            })
        );
    }

    #[test]
    fn add_passes_on_empty_description() {
        let got = parse_shell_command("add 2024-01-01 5");

        assert_eq!(
            got,
            Ok(ShellCommand::Add {
                date: "2024-01-01".to_owned(),
                amount: "5".to_owned(),
                description: String::new(),
            })
        );
    }

    #[test]
    fn add_requires_date_and_amount() {
        assert_eq!(
            parse_shell_command("add"),
            Err(ParseCommandError::MissingArgument {
                command: "add",
                argument: "a date"
            })
        );
        assert_eq!(
            parse_shell_command("add 2024-01-01"),
            Err(ParseCommandError::MissingArgument {
                command: "add",
                argument: "an amount"
            })
        );
    }

    #[test]
    fn delete_converts_row_to_index() {
        assert_eq!(
            parse_shell_command("delete 1"),
            Ok(ShellCommand::Delete(Some(0)))
        );
        assert_eq!(
            parse_shell_command("rm 3"),
            Ok(ShellCommand::Delete(Some(2)))
        );
    }

    #[test]
    fn delete_without_row_selects_nothing() {
        assert_eq!(
            parse_shell_command("delete"),
            Ok(ShellCommand::Delete(None))
        );
    }

    #[test]
    fn delete_rejects_invalid_rows() {
        for row in ["0", "-1", "one", "1.5"] {
            assert_eq!(
                parse_shell_command(&format!("delete {row}")),
                Err(ParseCommandError::InvalidRow(row.to_owned())),
                "row {row:?}"
            );
        }
    }

    #[test]
    fn parses_help_and_quit() {
        assert_eq!(parse_shell_command("help"), Ok(ShellCommand::Help));
        assert_eq!(parse_shell_command("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse_shell_command("Quit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn rejects_blank_and_unknown_commands() {
        assert_eq!(parse_shell_command("   "), Err(ParseCommandError::Empty));
        assert_eq!(
            parse_shell_command("edit 1"),
            Err(ParseCommandError::UnknownCommand("edit".to_owned()))
        );
    }
}
