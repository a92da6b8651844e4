#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Firebreak.
//!
//! The [`Board`] owns the grid of [`Field`]s and performs every spatial rule:
//! placing and moving brigades, extinguishing, spreading fire and evaluating
//! the win and lose conditions. Brigades themselves are owned by the players;
//! the board only records which brigade stands on which forest.

mod brigade;
mod field;
mod navigation;

use std::collections::BTreeSet;

use firebreak_core::{
    BrigadeId, Condition, GameRules, Position, RuleViolation, Wind, MINIMUM_BOARD_SIDE,
};
use thiserror::Error;

pub use brigade::Brigade;
pub use field::{Field, Forest};

const FIELD_SEPARATOR: char = ',';

/// Errors raised when a board cannot be assembled from the provided cells.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// One of the dimensions is below the playable minimum.
    #[error(
        "a board needs at least {} rows and columns, got {rows}x{columns}",
        MINIMUM_BOARD_SIDE
    )]
    TooSmall {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
    },
    /// The number of cells does not match the dimensions.
    #[error("expected {expected} cells, got {actual}")]
    SizeMismatch {
        /// Number of cells the dimensions call for.
        expected: usize,
        /// Number of cells provided.
        actual: usize,
    },
}

/// Result of placing a new brigade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The brigade now stands on a forest.
    Stationed,
    /// The target is not a forest, so nothing was recorded.
    Discarded,
}

/// Result of a successful extinguish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extinguished {
    /// Condition of the forest afterwards.
    pub condition: Condition,
    /// Whether the extinguish earned the brigade's owner a reputation point.
    pub earned_point: bool,
    /// Whether no forest on the board is burning anymore.
    pub fire_is_out: bool,
}

/// Result of rolling the fire at the end of a round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FireRoll {
    /// Number of forests whose condition increased.
    pub increased: u32,
    /// Brigades caught by a severe fire, in identifier order.
    pub caught: Vec<BrigadeId>,
    /// Whether no brigade survives anywhere on the board.
    pub all_brigades_lost: bool,
}

/// Represents the authoritative Firebreak board.
#[derive(Clone, Debug)]
pub struct Board {
    rows: u32,
    columns: u32,
    fields: Vec<Field>,
    initial: Vec<Field>,
    move_range: u32,
}

impl Board {
    /// Assembles a board from row-major cells.
    ///
    /// The provided cells are retained as the initial layout restored by
    /// [`Board::reset_to_initial`].
    pub fn new(
        rows: u32,
        columns: u32,
        fields: Vec<Field>,
        rules: &GameRules,
    ) -> Result<Self, BoardError> {
        if rows < MINIMUM_BOARD_SIDE || columns < MINIMUM_BOARD_SIDE {
            return Err(BoardError::TooSmall { rows, columns });
        }

        let expected = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(usize::MAX);
        if fields.len() != expected {
            return Err(BoardError::SizeMismatch {
                expected,
                actual: fields.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            initial: fields.clone(),
            fields,
            move_range: rules.move_range,
        })
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Field stored at the position, if it lies on the board.
    #[must_use]
    pub fn field(&self, position: Position) -> Option<&Field> {
        self.index(position).map(|index| &self.fields[index])
    }

    /// Renders a single field including the brigades standing on it.
    pub fn show_field(&self, position: Position) -> Result<String, RuleViolation> {
        self.field(position)
            .map(ToString::to_string)
            .ok_or(RuleViolation::OutOfBounds)
    }

    /// Places a newly created brigade next to its owner's station.
    ///
    /// Placing onto a lake or station passes validation but records nothing;
    /// only forests keep brigades.
    pub fn place_brigade(
        &mut self,
        brigade: BrigadeId,
        target: Position,
        base: Position,
    ) -> Result<Placement, RuleViolation> {
        let index = self.index(target).ok_or(RuleViolation::OutOfBounds)?;
        if target == base {
            return Err(RuleViolation::SamePosition);
        }
        if !target.touches(base) {
            return Err(RuleViolation::NotAdjacent);
        }

        match self.fields[index].as_forest_mut() {
            Some(forest) => {
                forest.admit(brigade)?;
                log::debug!("brigade {brigade} stationed at {target}");
                Ok(Placement::Stationed)
            }
            None => {
                log::debug!("brigade {brigade} placed on non-forest {target}, discarded");
                Ok(Placement::Discarded)
            }
        }
    }

    /// Drives a brigade to a forest at most the configured number of steps away.
    ///
    /// The route runs orthogonally through forests that are not severely
    /// burning. Board and brigade are updated together or not at all.
    pub fn move_brigade(
        &mut self,
        brigade: &mut Brigade,
        destination: Position,
    ) -> Result<(), RuleViolation> {
        let destination_index = self.index(destination).ok_or(RuleViolation::OutOfBounds)?;
        let start = brigade.position();
        if start == destination {
            return Err(RuleViolation::SamePosition);
        }

        match self.fields[destination_index].as_forest() {
            Some(forest) if !forest.is_burning() => {}
            _ => return Err(RuleViolation::InvalidDestination),
        }

        let fields = &self.fields;
        let columns = self.columns;
        let distance = navigation::shortest_path_length(
            self.rows,
            self.columns,
            start,
            destination,
            self.move_range,
            |cell| {
                position_index(columns, cell)
                    .and_then(|index| fields.get(index))
                    .and_then(Field::as_forest)
                    .is_some_and(|forest| forest.condition() != Condition::BigFire)
            },
        );
        if distance.is_none() {
            return Err(RuleViolation::Unreachable);
        }

        self.fields[destination_index]
            .as_forest_mut()
            .ok_or(RuleViolation::InvalidDestination)?
            .admit(brigade.id())?;
        if let Some(forest) = self
            .index(start)
            .and_then(|index| self.fields[index].as_forest_mut())
        {
            forest.release(brigade.id());
        }
        brigade.relocate(destination);
        log::debug!("brigade {} moved {start} -> {destination}", brigade.id());
        Ok(())
    }

    /// Pours water from the brigade onto one of the eight cells around it.
    ///
    /// Only the forest is changed; the caller books tank and action points on
    /// the brigade afterwards.
    pub fn extinguish(
        &mut self,
        brigade: &Brigade,
        target: Position,
    ) -> Result<Extinguished, RuleViolation> {
        let origin = brigade.position();
        if !target.is_within(self.rows, self.columns) || !origin.touches(target) {
            return Err(RuleViolation::Unreachable);
        }
        let index = self.index(target).ok_or(RuleViolation::Unreachable)?;

        let forest = match &mut self.fields[index] {
            Field::Forest(forest) => forest,
            Field::Lake => return Err(RuleViolation::CellIsLake),
            Field::Station(_) => return Err(RuleViolation::CellIsStation),
        };
        let earned_point = forest.extinguish()?;
        let condition = forest.condition();
        log::debug!(
            "brigade {} extinguished {target}, now {}",
            brigade.id(),
            condition.glyph()
        );

        Ok(Extinguished {
            condition,
            earned_point,
            fire_is_out: self.is_fire_out(),
        })
    }

    /// Spreads the fire according to the rolled wind.
    ///
    /// Severe fires ignite their forest neighbours in the wind's directions,
    /// while every small fire grows regardless of the wind. Each affected
    /// forest increases exactly once per roll.
    pub fn roll_fire(&mut self, wind: Wind) -> FireRoll {
        if wind == Wind::Calm {
            return FireRoll::default();
        }

        let mut to_increase: BTreeSet<Position> = BTreeSet::new();
        for (position, forest) in self.forests() {
            match forest.condition() {
                Condition::BigFire => {
                    for &direction in wind.directions() {
                        let Some(neighbour) = position.step(direction) else {
                            continue;
                        };
                        if self.field(neighbour).and_then(Field::as_forest).is_some() {
                            let _ = to_increase.insert(neighbour);
                        }
                    }
                }
                Condition::SmallFire => {
                    let _ = to_increase.insert(position);
                }
                Condition::Dry | Condition::Wet => {}
            }
        }

        let mut caught = Vec::new();
        for &position in &to_increase {
            if let Some(forest) = self
                .index(position)
                .and_then(|index| self.fields[index].as_forest_mut())
            {
                caught.extend(forest.increase());
            }
        }
        caught.sort_unstable();

        let increased = u32::try_from(to_increase.len()).unwrap_or(u32::MAX);
        log::debug!(
            "fire rolled {wind:?}: {increased} forests increased, {} brigades caught",
            caught.len()
        );

        FireRoll {
            increased,
            caught,
            all_brigades_lost: !self.hosts_brigades(),
        }
    }

    /// Reports whether a lake or station lies on one of the eight cells around the brigade.
    #[must_use]
    pub fn has_adjacent_refill_source(&self, brigade: &Brigade) -> bool {
        brigade
            .position()
            .surrounding(self.rows, self.columns)
            .filter_map(|neighbour| self.field(neighbour))
            .any(Field::is_refill_source)
    }

    /// Reports whether no forest on the board is burning.
    #[must_use]
    pub fn is_fire_out(&self) -> bool {
        self.forests().all(|(_, forest)| !forest.is_burning())
    }

    /// Reports whether any forest still hosts a brigade.
    #[must_use]
    pub fn hosts_brigades(&self) -> bool {
        self.forests().any(|(_, forest)| forest.is_occupied())
    }

    /// Renders the board overview, one comma-separated line per row.
    #[must_use]
    pub fn render(&self) -> String {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX);
        self.fields
            .chunks(width.max(1))
            .map(|row| {
                let mut line = String::with_capacity(row.len() * 2);
                for (column, field) in row.iter().enumerate() {
                    if column > 0 {
                        line.push(FIELD_SEPARATOR);
                    }
                    line.push(field.overview_glyph());
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Restores every field to the layout the board was created with.
    pub fn reset_to_initial(&mut self) {
        self.fields.clone_from(&self.initial);
    }

    fn forests(&self) -> impl Iterator<Item = (Position, &Forest)> + '_ {
        let columns = self.columns;
        self.fields.iter().enumerate().filter_map(move |(index, field)| {
            let forest = field.as_forest()?;
            let index = u32::try_from(index).ok()?;
            Some((Position::new(index / columns, index % columns), forest))
        })
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !position.is_within(self.rows, self.columns) {
            return None;
        }
        position_index(self.columns, position)
    }
}

fn position_index(columns: u32, position: Position) -> Option<usize> {
    let row = usize::try_from(position.row()).ok()?;
    let column = usize::try_from(position.column()).ok()?;
    let width = usize::try_from(columns).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
