//! Parser for the interactive prompt.

use std::{error::Error, fmt};

use loadout_core::ItemId;

/// Actions a player can type at the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerCommand {
    /// Add the identified item to the selection.
    Pick(ItemId),
    /// Remove the identified item from the selection.
    Drop(ItemId),
    /// Empty the selection.
    Clear,
    /// Judge the selection against the target.
    Submit,
    /// Redraw the current puzzle.
    Show,
    /// Print the command reference.
    Help,
    /// Leave the game; same-day progress stays persisted.
    Quit,
}

/// Errors produced while parsing a prompt line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParseError {
    /// The line was empty or contained only whitespace.
    Empty,
    /// The verb is not part of the command reference.
    UnknownCommand(String),
    /// The verb requires an item number that was not supplied.
    MissingId(&'static str),
    /// The supplied item number is not a positive integer.
    InvalidId(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(formatter, "type a command, or `help`"),
            Self::UnknownCommand(verb) => {
                write!(formatter, "unknown command `{verb}`; try `help`")
            }
            Self::MissingId(verb) => write!(formatter, "`{verb}` needs an item number"),
            Self::InvalidId(value) => {
                write!(formatter, "`{value}` is not a valid item number")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses one prompt line into a [`PlayerCommand`].
pub(crate) fn parse(line: &str) -> Result<PlayerCommand, ParseError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(ParseError::Empty)?;

    match verb {
        "pick" | "p" => Ok(PlayerCommand::Pick(parse_id("pick", words.next())?)),
        "drop" | "d" => Ok(PlayerCommand::Drop(parse_id("drop", words.next())?)),
        "clear" => Ok(PlayerCommand::Clear),
        "submit" | "s" => Ok(PlayerCommand::Submit),
        "show" => Ok(PlayerCommand::Show),
        "help" | "?" => Ok(PlayerCommand::Help),
        "quit" | "q" | "exit" => Ok(PlayerCommand::Quit),
        other => Err(ParseError::UnknownCommand(other.to_owned())),
    }
}

fn parse_id(verb: &'static str, word: Option<&str>) -> Result<ItemId, ParseError> {
    let word = word.ok_or(ParseError::MissingId(verb))?;
    match word.parse::<u32>() {
        Ok(value) if value > 0 => Ok(ItemId::new(value)),
        _ => Err(ParseError::InvalidId(word.to_owned())),
    }
}
