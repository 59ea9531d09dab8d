//! Line commands accepted by the interactive terminal session.

use loan_core::Field;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  price <text>       type into the sales price field (e.g. price $20,000)
  apr <value>        select an APR
  payments <value>   select a number of payments
  blur               leave the sales price field (reformats it)
  clear              reset the form and forget saved values
  show               print the form
  log <level>        change the log filter (e.g. log debug)
  help               print this help
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace a field's content; the controller sees a change event.
    Edit(Field, String),
    /// Sales price loses focus.
    Blur,
    Clear,
    Show,
    LogLevel(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command; type 'help' for the list")]
    Empty,

    #[error("unknown command '{0}'; type 'help' for the list")]
    Unknown(String),

    #[error("'{0}' needs a value")]
    MissingValue(&'static str),
}

impl Command {
    /// Parses one input line. The sales price keeps everything after the
    /// command word verbatim, so `price` alone empties the field.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "price" => Ok(Self::Edit(Field::SalesPrice, rest.to_string())),
            "apr" => required("apr", rest).map(|v| Self::Edit(Field::Apr, v)),
            "payments" => required("payments", rest).map(|v| Self::Edit(Field::NumPayments, v)),
            "blur" => Ok(Self::Blur),
            "clear" => Ok(Self::Clear),
            "show" => Ok(Self::Show),
            "log" => required("log", rest).map(Self::LogLevel),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn required(
    command: &'static str,
    value: &str,
) -> Result<String, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingValue(command))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn price_keeps_rest_of_line() {
        assert_eq!(
            Command::parse("price $20,000 "),
            Ok(Command::Edit(Field::SalesPrice, "$20,000".to_string()))
        );
        assert_eq!(
            Command::parse("price 1 500"),
            Ok(Command::Edit(Field::SalesPrice, "1 500".to_string()))
        );
    }

    #[test]
    fn bare_price_empties_field() {
        assert_eq!(
            Command::parse("price"),
            Ok(Command::Edit(Field::SalesPrice, String::new()))
        );
    }

    #[test]
    fn selectors_need_a_value() {
        assert_eq!(
            Command::parse("apr 9.9"),
            Ok(Command::Edit(Field::Apr, "9.9".to_string()))
        );
        assert_eq!(
            Command::parse("PAYMENTS 60"),
            Ok(Command::Edit(Field::NumPayments, "60".to_string()))
        );
        assert_eq!(Command::parse("apr"), Err(CommandError::MissingValue("apr")));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(Command::parse("blur"), Ok(Command::Blur));
        assert_eq!(Command::parse("clear"), Ok(Command::Clear));
        assert_eq!(Command::parse(" show "), Ok(Command::Show));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert_eq!(
            Command::parse("log debug"),
            Ok(Command::LogLevel("debug".to_string()))
        );
    }

    #[test]
    fn empty_and_unknown_lines() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("down 500"),
            Err(CommandError::Unknown("down".to_string()))
        );
    }
}
