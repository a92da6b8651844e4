#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Firebreak engine.
//!
//! This crate defines the message surface that connects the command-line
//! adapter, the authoritative board, and the turn systems. Adapters submit
//! [`Command`] values describing desired actions, the game handler resolves
//! each command completely and answers with a [`Reply`] or a
//! [`RuleViolation`], and broadcasts [`Event`] values describing what changed.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest number of rows or columns a playable board may have.
pub const MINIMUM_BOARD_SIDE: u32 = 5;

/// Number of players taking part in every game.
pub const PLAYER_COUNT: usize = 4;

/// Tunable numbers that shape a game session.
///
/// Every field defaults to the canonical rule set, so a partially specified
/// rules file only overrides the values it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameRules {
    /// Units of water a brigade carries when its tank is full.
    pub tank_capacity: u32,
    /// Action points every brigade receives at the start of its owner's turn.
    pub action_points: u32,
    /// Reputation a player pays to buy an additional brigade.
    pub brigade_cost: u32,
    /// Reputation every player owns when the game starts.
    pub starting_reputation: u32,
    /// Longest path, in orthogonal steps, a brigade may drive in one move.
    pub move_range: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            tank_capacity: 3,
            action_points: 3,
            brigade_cost: 5,
            starting_reputation: 5,
            move_range: 2,
        }
    }
}

/// Location of a single board cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Reports whether the position lies on a board with the given dimensions.
    #[must_use]
    pub const fn is_within(&self, rows: u32, columns: u32) -> bool {
        self.row < rows && self.column < columns
    }

    /// Position one step away in the provided direction, if it is representable.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (row, column) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.column),
            Direction::East => (self.row, self.column.checked_add(1)?),
            Direction::South => (self.row.checked_add(1)?, self.column),
            Direction::West => (self.row, self.column.checked_sub(1)?),
        };
        Some(Self::new(row, column))
    }

    /// Orthogonal neighbours that lie on the board, in north, east, south, west order.
    pub fn orthogonal_neighbours(self, rows: u32, columns: u32) -> impl Iterator<Item = Self> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
            .filter(move |neighbour| neighbour.is_within(rows, columns))
    }

    /// All eight surrounding positions that lie on the board, diagonals included.
    pub fn surrounding(self, rows: u32, columns: u32) -> impl Iterator<Item = Self> {
        const OFFSETS: [(i64, i64); 8] = [
            (-1, 0),
            (0, 1),
            (1, 0),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];

        OFFSETS.into_iter().filter_map(move |(row_offset, column_offset)| {
            let row = u32::try_from(i64::from(self.row) + row_offset).ok()?;
            let column = u32::try_from(i64::from(self.column) + column_offset).ok()?;
            let neighbour = Self::new(row, column);
            neighbour.is_within(rows, columns).then_some(neighbour)
        })
    }

    /// Reports whether the other position is one of the eight cells around this one.
    #[must_use]
    pub fn touches(self, other: Self) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.column.abs_diff(other.column) <= 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

/// Cardinal directions on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Outcome of the fire die rolled at the end of every round.
///
/// The wind decides in which directions severe fires spread to their
/// neighbours. Small fires grow regardless of the wind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wind {
    /// Severe fires spread to every orthogonal neighbour.
    AllDirections,
    /// Severe fires spread to their northern neighbour.
    North,
    /// Severe fires spread to their eastern neighbour.
    East,
    /// Severe fires spread to their southern neighbour.
    South,
    /// Severe fires spread to their western neighbour.
    West,
    /// Nothing happens.
    Calm,
}

impl Wind {
    /// Maps a six-sided die face onto the wind it stands for.
    ///
    /// Returns `None` for faces outside `1..=6`.
    #[must_use]
    pub const fn from_die(face: u8) -> Option<Self> {
        match face {
            1 => Some(Self::AllDirections),
            2 => Some(Self::North),
            3 => Some(Self::East),
            4 => Some(Self::South),
            5 => Some(Self::West),
            6 => Some(Self::Calm),
            _ => None,
        }
    }

    /// Directions into which a severe fire spreads under this wind.
    #[must_use]
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::AllDirections => &Direction::ALL,
            Self::North => &[Direction::North],
            Self::East => &[Direction::East],
            Self::South => &[Direction::South],
            Self::West => &[Direction::West],
            Self::Calm => &[],
        }
    }
}

/// Fire intensity of a single forest cell.
///
/// The condition is a closed automaton: [`Condition::increase`] and
/// [`Condition::extinguish`] are its only transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Untouched forest.
    Dry,
    /// Forest soaked by a brigade; cannot be soaked again.
    Wet,
    /// Forest with a small fire.
    SmallFire,
    /// Forest with a severe fire. Brigades caught inside are lost.
    BigFire,
}

impl Condition {
    /// Condition after the fire grows one step.
    ///
    /// A big fire stays a big fire; a wet forest dries out.
    #[must_use]
    pub const fn increase(self) -> Self {
        match self {
            Self::Dry => Self::SmallFire,
            Self::Wet => Self::Dry,
            Self::SmallFire | Self::BigFire => Self::BigFire,
        }
    }

    /// Condition after a brigade pours water on the cell.
    ///
    /// Returns the new condition together with whether the extinguish earned
    /// the brigade's owner a reputation point.
    pub const fn extinguish(self) -> Result<(Self, bool), RuleViolation> {
        match self {
            Self::Dry => Ok((Self::Wet, false)),
            Self::SmallFire => Ok((Self::Wet, true)),
            Self::BigFire => Ok((Self::SmallFire, true)),
            Self::Wet => Err(RuleViolation::AlreadyWet),
        }
    }

    /// Reports whether the cell is on fire.
    #[must_use]
    pub const fn is_burning(self) -> bool {
        matches!(self, Self::SmallFire | Self::BigFire)
    }

    /// Single-character code used on the board string and in field views.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Dry => 'd',
            Self::Wet => 'w',
            Self::SmallFire => '+',
            Self::BigFire => '*',
        }
    }

    /// Parses a condition from its single-character code.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'd' => Some(Self::Dry),
            'w' => Some(Self::Wet),
            '+' => Some(Self::SmallFire),
            '*' => Some(Self::BigFire),
            _ => None,
        }
    }
}

/// Identifies one of the four players.
///
/// The variant order is the fixed turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerTag {
    /// Player owning the top-left station.
    A,
    /// Player owning the bottom-right station.
    B,
    /// Player owning the bottom-left station.
    C,
    /// Player owning the top-right station.
    D,
}

impl PlayerTag {
    /// Every player in turn order.
    pub const ALL: [PlayerTag; PLAYER_COUNT] =
        [PlayerTag::A, PlayerTag::B, PlayerTag::C, PlayerTag::D];

    /// Player whose turn follows this one in the fixed cycle.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::D,
            Self::D => Self::A,
        }
    }

    /// Corner of a `rows` by `columns` board holding this player's station.
    #[must_use]
    pub const fn base(self, rows: u32, columns: u32) -> Position {
        let last_row = rows.saturating_sub(1);
        let last_column = columns.saturating_sub(1);
        match self {
            Self::A => Position::new(0, 0),
            Self::B => Position::new(last_row, last_column),
            Self::C => Position::new(last_row, 0),
            Self::D => Position::new(0, last_column),
        }
    }

    /// Letter used for the player on the board and in identifiers.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// Parses a player from its letter.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Unique identifier of a brigade: its owner's letter followed by a serial number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrigadeId {
    owner: PlayerTag,
    serial: u32,
}

impl BrigadeId {
    /// Creates a new brigade identifier.
    #[must_use]
    pub const fn new(owner: PlayerTag, serial: u32) -> Self {
        Self { owner, serial }
    }

    /// Player owning the brigade.
    #[must_use]
    pub const fn owner(&self) -> PlayerTag {
        self.owner
    }

    /// Serial number allocated by the owner, starting at zero.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

impl fmt::Display for BrigadeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner, self.serial)
    }
}

/// Error returned when a string does not spell a brigade identifier.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{0}` is not a brigade identifier")]
pub struct InvalidBrigadeId(pub String);

impl FromStr for BrigadeId {
    type Err = InvalidBrigadeId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidBrigadeId(value.to_owned());
        let mut chars = value.chars();
        let owner = chars
            .next()
            .and_then(PlayerTag::from_letter)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        let serial = digits.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(owner, serial))
    }
}

/// Player-facing rule violations.
///
/// Every variant renders a fixed message. Operations report a violation
/// before mutating any state, so a rejected command leaves the game untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RuleViolation {
    /// The position lies outside the board.
    #[error("the position is not on the board")]
    OutOfBounds,
    /// A new brigade must be placed next to its owner's station.
    #[error("the position is not next to your fire station")]
    NotAdjacent,
    /// Source and destination of a placement or move are identical.
    #[error("start and destination are the same position")]
    SamePosition,
    /// Brigades cannot be placed onto a burning forest.
    #[error("the ground is burning")]
    CellBurning,
    /// Moves must end on a forest that is not burning.
    #[error("the destination is not valid")]
    InvalidDestination,
    /// The target is out of the brigade's range.
    #[error("the position cannot be reached")]
    Unreachable,
    /// Lakes cannot be extinguished.
    #[error("lakes cannot be extinguished")]
    CellIsLake,
    /// Fire stations cannot be extinguished.
    #[error("fire stations cannot be extinguished")]
    CellIsStation,
    /// The forest is already wet.
    #[error("the forest is already wet")]
    AlreadyWet,
    /// The brigade's tank is already full.
    #[error("the tank is already full")]
    TankFull,
    /// The brigade's tank is empty.
    #[error("the tank is empty, refill first")]
    TankEmpty,
    /// The brigade has no action points left this turn.
    #[error("not enough action points for this action")]
    NoActionPoints,
    /// Moves must come before any other action of the turn.
    #[error("the brigade has already performed an action")]
    AlreadyActed,
    /// A brigade may extinguish each position at most once per turn.
    #[error("the brigade already extinguished this position this turn")]
    AlreadyExtinguishedHere,
    /// Refilling requires a lake or a fire station next to the brigade.
    #[error("there is no lake or fire station next to the brigade")]
    NoRefillSource,
    /// The current player cannot afford another brigade.
    #[error("not enough reputation points to buy a brigade")]
    InsufficientReputation,
    /// The current player owns no brigade with that identifier.
    #[error("the brigade does not exist")]
    UnknownBrigade,
    /// The game has ended; only the board may be inspected or reset.
    #[error("the game is over")]
    GameOver,
    /// The round ended and the fire must be rolled before anything else.
    #[error("the fire has to be rolled before the game continues")]
    MustRollFireFirst,
    /// The fire may only be rolled after the last turn of a round.
    #[error("the fire can only be rolled at the end of a round")]
    NotTimeToRoll,
    /// Every player has been eliminated.
    #[error("no player is left to take the turn")]
    NoPlayersLeft,
}

/// Commands that express every action available to players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Drives a brigade of the current player to another forest cell.
    MoveBrigade {
        /// Brigade that should move.
        brigade: BrigadeId,
        /// Cell the brigade should drive to.
        destination: Position,
    },
    /// Pours water from a brigade's tank onto a nearby cell.
    Extinguish {
        /// Brigade that should extinguish.
        brigade: BrigadeId,
        /// Cell receiving the water.
        target: Position,
    },
    /// Refills a brigade's tank from a lake or station next to it.
    Refill {
        /// Brigade that should refill.
        brigade: BrigadeId,
    },
    /// Buys a new brigade for the current player.
    BuyBrigade {
        /// Cell next to the player's station where the brigade starts.
        position: Position,
    },
    /// Ends the current player's turn.
    EndTurn,
    /// Rolls the fire at the end of a round.
    RollFire {
        /// Wind rolled on the fire die.
        wind: Wind,
    },
    /// Renders the whole board.
    ShowBoard,
    /// Renders a single field including the brigades on it.
    ShowField {
        /// Field to render.
        position: Position,
    },
    /// Renders the current player and their brigades.
    ShowPlayer,
    /// Restores the initial board and players.
    Reset,
}

/// Successful answer to a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The command succeeded without further information.
    Ok,
    /// The last fire was extinguished; the players won.
    Win,
    /// The last brigade burned; the players lost.
    Lose,
    /// Player whose turn it is after the command.
    Player(PlayerTag),
    /// Reputation the current player owns after buying a brigade.
    Reputation(u32),
    /// Action points the brigade has left.
    ActionPoints(u32),
    /// A forest was extinguished.
    Extinguished {
        /// Condition of the forest afterwards.
        condition: Condition,
        /// Action points the brigade has left.
        action_points: u32,
    },
    /// Rendered text of a board, field or player view.
    View(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Win => write!(f, "win"),
            Self::Lose => write!(f, "lose"),
            Self::Player(player) => write!(f, "{player}"),
            Self::Reputation(points) => write!(f, "{points}"),
            Self::ActionPoints(points) => write!(f, "{points}"),
            Self::Extinguished {
                condition,
                action_points,
            } => write!(f, "{},{action_points}", condition.glyph()),
            Self::View(text) => write!(f, "{text}"),
        }
    }
}

/// Events broadcast by the game handler after resolving a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A brigade was stationed on the board.
    BrigadeDeployed {
        /// Brigade that was stationed.
        brigade: BrigadeId,
        /// Cell it occupies.
        position: Position,
    },
    /// A brigade drove to another cell.
    BrigadeMoved {
        /// Brigade that moved.
        brigade: BrigadeId,
        /// Cell it left.
        from: Position,
        /// Cell it occupies now.
        to: Position,
    },
    /// A brigade poured water onto a forest.
    FieldExtinguished {
        /// Brigade that extinguished.
        brigade: BrigadeId,
        /// Forest that received the water.
        position: Position,
        /// Condition of the forest afterwards.
        condition: Condition,
    },
    /// A brigade refilled its tank.
    TankRefilled {
        /// Brigade that refilled.
        brigade: BrigadeId,
    },
    /// A player ended their turn and the next one took over.
    TurnEnded {
        /// Player whose turn begins.
        next: PlayerTag,
    },
    /// The last turn of a round ended; the fire must be rolled.
    RoundCompleted {
        /// Player who opens the next round.
        next: PlayerTag,
    },
    /// The fire spread after a roll.
    FireSpread {
        /// Wind that was rolled.
        wind: Wind,
        /// Number of forest cells whose condition increased.
        increased: u32,
    },
    /// A brigade was caught by a severe fire and lost.
    BrigadeCaught {
        /// Brigade that was lost.
        brigade: BrigadeId,
    },
    /// A player lost their last brigade.
    PlayerEliminated {
        /// Player that was eliminated.
        player: PlayerTag,
    },
    /// Every fire has been extinguished.
    GameWon,
    /// No brigade is left on the board.
    GameLost,
    /// The game was restored to its initial state.
    GameReset,
}
