//! Parsing of the interactive command language.
//!
//! A command is its name optionally followed by a single space and
//! comma-separated arguments, e.g. `move A0,2,3` or `fire-to-roll 4`.

use firebreak_core::{BrigadeId, Command, Position, Wind};
use thiserror::Error;

const ARGUMENT_DELIMITER: char = ',';

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// A game command to resolve.
    Play(Command),
    /// Ends the session.
    Quit,
}

/// Errors raised for lines that do not spell a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum SyntaxError {
    /// The line is empty or starts with whitespace.
    #[error("the command is empty")]
    Empty,
    /// The command name is not known.
    #[error("unknown command `{0}`")]
    Unknown(String),
    /// The command is known but its arguments are malformed.
    #[error("invalid arguments for `{0}`")]
    Arguments(&'static str),
}

/// Parses a single input line.
pub(crate) fn parse(line: &str) -> Result<Input, SyntaxError> {
    if line.is_empty() || line.starts_with(char::is_whitespace) {
        return Err(SyntaxError::Empty);
    }

    let (name, arguments) = match line.split_once(' ') {
        Some((name, arguments)) => (name, Some(arguments)),
        None => (line, None),
    };

    let command = match name {
        "quit" => return no_arguments("quit", arguments).map(|()| Input::Quit),
        "turn" => no_arguments("turn", arguments).map(|()| Command::EndTurn)?,
        "reset" => no_arguments("reset", arguments).map(|()| Command::Reset)?,
        "show-board" => no_arguments("show-board", arguments).map(|()| Command::ShowBoard)?,
        "show-player" => no_arguments("show-player", arguments).map(|()| Command::ShowPlayer)?,
        "show-field" => Command::ShowField {
            position: split(arguments)
                .as_deref()
                .and_then(position)
                .ok_or(SyntaxError::Arguments("show-field"))?,
        },
        "buy-fire-engine" => Command::BuyBrigade {
            position: split(arguments)
                .as_deref()
                .and_then(position)
                .ok_or(SyntaxError::Arguments("buy-fire-engine"))?,
        },
        "refill" => Command::Refill {
            brigade: match split(arguments).as_deref() {
                Some([id]) => id.parse().ok(),
                _ => None,
            }
            .ok_or(SyntaxError::Arguments("refill"))?,
        },
        "move" => {
            let (brigade, destination) =
                brigade_and_position(arguments).ok_or(SyntaxError::Arguments("move"))?;
            Command::MoveBrigade {
                brigade,
                destination,
            }
        }
        "extinguish" => {
            let (brigade, target) =
                brigade_and_position(arguments).ok_or(SyntaxError::Arguments("extinguish"))?;
            Command::Extinguish { brigade, target }
        }
        "fire-to-roll" => Command::RollFire {
            wind: arguments
                .and_then(|face| match face.as_bytes() {
                    [digit] if digit.is_ascii_digit() => Wind::from_die(digit - b'0'),
                    _ => None,
                })
                .ok_or(SyntaxError::Arguments("fire-to-roll"))?,
        },
        other => return Err(SyntaxError::Unknown(other.to_owned())),
    };

    Ok(Input::Play(command))
}

fn no_arguments(name: &'static str, arguments: Option<&str>) -> Result<(), SyntaxError> {
    match arguments {
        None => Ok(()),
        Some(_) => Err(SyntaxError::Arguments(name)),
    }
}

fn split(arguments: Option<&str>) -> Option<Vec<&str>> {
    arguments.map(|arguments| arguments.split(ARGUMENT_DELIMITER).collect())
}

fn brigade_and_position(arguments: Option<&str>) -> Option<(BrigadeId, Position)> {
    match split(arguments)?.as_slice() {
        [id, row, column] => Some((id.parse().ok()?, position(&[*row, *column])?)),
        _ => None,
    }
}

fn position(parts: &[&str]) -> Option<Position> {
    match parts {
        [row, column] => Some(Position::new(number(row)?, number(column)?)),
        _ => None,
    }
}

fn number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use firebreak_core::PlayerTag;

    #[test]
    fn parses_every_command() {
        let cases = [
            ("quit", Input::Quit),
            ("turn", Input::Play(Command::EndTurn)),
            ("reset", Input::Play(Command::Reset)),
            ("show-board", Input::Play(Command::ShowBoard)),
            ("show-player", Input::Play(Command::ShowPlayer)),
            (
                "show-field 2,3",
                Input::Play(Command::ShowField {
                    position: Position::new(2, 3),
                }),
            ),
            (
                "buy-fire-engine 0,1",
                Input::Play(Command::BuyBrigade {
                    position: Position::new(0, 1),
                }),
            ),
            (
                "refill C2",
                Input::Play(Command::Refill {
                    brigade: BrigadeId::new(PlayerTag::C, 2),
                }),
            ),
            (
                "move A0,1,2",
                Input::Play(Command::MoveBrigade {
                    brigade: BrigadeId::new(PlayerTag::A, 0),
                    destination: Position::new(1, 2),
                }),
            ),
            (
                "extinguish D10,0,12",
                Input::Play(Command::Extinguish {
                    brigade: BrigadeId::new(PlayerTag::D, 10),
                    target: Position::new(0, 12),
                }),
            ),
            (
                "fire-to-roll 3",
                Input::Play(Command::RollFire { wind: Wind::East }),
            ),
        ];

        for (line, expected) in cases {
            assert_eq!(parse(line), Ok(expected), "parsing `{line}`");
        }
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse(""), Err(SyntaxError::Empty));
        assert_eq!(parse(" turn"), Err(SyntaxError::Empty));
        assert_eq!(parse("jump"), Err(SyntaxError::Unknown("jump".to_owned())));
        assert_eq!(parse("turn now"), Err(SyntaxError::Arguments("turn")));
        assert_eq!(parse("fire-to-roll 7"), Err(SyntaxError::Arguments("fire-to-roll")));
        assert_eq!(parse("fire-to-roll 0"), Err(SyntaxError::Arguments("fire-to-roll")));
        assert_eq!(parse("move A0,1"), Err(SyntaxError::Arguments("move")));
        assert_eq!(parse("move E0,1,1"), Err(SyntaxError::Arguments("move")));
        assert_eq!(parse("show-field -1,2"), Err(SyntaxError::Arguments("show-field")));
        assert_eq!(parse("refill"), Err(SyntaxError::Arguments("refill")));
        assert_eq!(parse("buy-fire-engine 1, 2"), Err(SyntaxError::Arguments("buy-fire-engine")));
    }
}
