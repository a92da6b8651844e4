//! Decoding of the board description passed on the command line.
//!
//! The description is a single comma-separated line: the number of rows, the
//! number of columns and then every cell in row-major order. Stations sit in
//! the corners, lakes on the edge midpoints and every player's starting
//! brigade diagonal to its station.

use firebreak_core::{Condition, PlayerTag, Position, MINIMUM_BOARD_SIDE};
use firebreak_world::Field;
use thiserror::Error;

const FIELD_DELIMITER: char = ',';
const LAKE: &str = "L";

/// Board cells decoded from a layout string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    /// Number of rows on the board.
    pub(crate) rows: u32,
    /// Number of columns on the board.
    pub(crate) columns: u32,
    /// Cells in row-major order.
    pub(crate) fields: Vec<Field>,
}

/// Errors that can occur while decoding a layout string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum LayoutError {
    /// The layout string was empty.
    #[error("the board description is empty")]
    Empty,
    /// A dimension could not be parsed.
    #[error("`{0}` is not a valid board dimension")]
    InvalidDimension(String),
    /// A dimension is even or too small.
    #[error("the board needs an odd number of at least {minimum} rows and columns, got {rows}x{columns}")]
    UnsupportedDimensions {
        /// Smallest allowed side length.
        minimum: u32,
        /// Parsed number of rows.
        rows: u32,
        /// Parsed number of columns.
        columns: u32,
    },
    /// The number of cells does not match the dimensions.
    #[error("expected {expected} cells, got {actual}")]
    CellCount {
        /// Number of cells the dimensions call for.
        expected: usize,
        /// Number of cells provided.
        actual: usize,
    },
    /// A cell does not hold what its position requires.
    #[error("cell {position} holds `{found}` but must be {expected}")]
    UnexpectedCell {
        /// Position of the offending cell.
        position: Position,
        /// Text found in the cell.
        found: String,
        /// Description of what belongs there.
        expected: &'static str,
    },
    /// The board does not contain both a small and a severe fire.
    #[error("the board needs at least one small fire and one severe fire")]
    MissingFire,
}

impl Layout {
    /// Decodes a layout string.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let rows = parse_dimension(parts.next())?;
        let columns = parse_dimension(parts.next())?;
        if rows < MINIMUM_BOARD_SIDE
            || columns < MINIMUM_BOARD_SIDE
            || rows % 2 == 0
            || columns % 2 == 0
        {
            return Err(LayoutError::UnsupportedDimensions {
                minimum: MINIMUM_BOARD_SIDE,
                rows,
                columns,
            });
        }

        let cells: Vec<&str> = parts.collect();
        let expected = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(LayoutError::CellCount {
                expected,
                actual: cells.len(),
            });
        }

        let mut fields = Vec::with_capacity(cells.len());
        let (mut small_fire, mut big_fire) = (false, false);
        for (position, cell) in positions(rows, columns).zip(cells) {
            let field = decode_cell(role(position, rows, columns), position, cell)?;
            if let Some(forest) = field.as_forest() {
                small_fire |= forest.condition() == Condition::SmallFire;
                big_fire |= forest.condition() == Condition::BigFire;
            }
            fields.push(field);
        }

        if !(small_fire && big_fire) {
            return Err(LayoutError::MissingFire);
        }

        Ok(Self {
            rows,
            columns,
            fields,
        })
    }
}

/// What a cell must contain, determined by its position alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Station(PlayerTag),
    Lake,
    StartingBrigade(PlayerTag),
    Forest,
}

fn role(position: Position, rows: u32, columns: u32) -> Role {
    for player in PlayerTag::ALL {
        let base = player.base(rows, columns);
        if position == base {
            return Role::Station(player);
        }
        if position == starting_cell(base) {
            return Role::StartingBrigade(player);
        }
    }

    let (row, column) = (position.row(), position.column());
    let on_horizontal_edge = (row == 0 || row == rows - 1) && column == columns / 2;
    let on_vertical_edge = (column == 0 || column == columns - 1) && row == rows / 2;

    if on_horizontal_edge || on_vertical_edge {
        Role::Lake
    } else {
        Role::Forest
    }
}

fn starting_cell(base: Position) -> Position {
    let inward = |coordinate: u32| if coordinate == 0 { 1 } else { coordinate - 1 };
    Position::new(inward(base.row()), inward(base.column()))
}

fn decode_cell(role: Role, position: Position, cell: &str) -> Result<Field, LayoutError> {
    let unexpected = |expected| LayoutError::UnexpectedCell {
        position,
        found: cell.to_owned(),
        expected,
    };

    match role {
        Role::Station(player) => {
            if cell.len() == 1 && cell.starts_with(player.letter()) {
                Ok(Field::Station(player))
            } else {
                Err(unexpected("the station's letter"))
            }
        }
        Role::Lake => {
            if cell == LAKE {
                Ok(Field::Lake)
            } else {
                Err(unexpected("a lake"))
            }
        }
        Role::StartingBrigade(player) => {
            let mut chars = cell.chars();
            if chars.next() == Some(player.letter()) && chars.as_str() == "0" {
                Ok(Field::forest(Condition::Dry))
            } else {
                Err(unexpected("the player's starting brigade"))
            }
        }
        Role::Forest => {
            let mut chars = cell.chars();
            match (chars.next().and_then(Condition::from_glyph), chars.next()) {
                (Some(condition), None) => Ok(Field::forest(condition)),
                _ => Err(unexpected("a forest")),
            }
        }
    }
}

fn parse_dimension(part: Option<&str>) -> Result<u32, LayoutError> {
    let part = part.unwrap_or_default();
    part.trim()
        .parse::<u32>()
        .map_err(|_| LayoutError::InvalidDimension(part.to_owned()))
}

fn positions(rows: u32, columns: u32) -> impl Iterator<Item = Position> {
    (0..rows).flat_map(move |row| (0..columns).map(move |column| Position::new(row, column)))
}
