//! Terrain stored in every board cell.

use std::{collections::BTreeSet, fmt};

use firebreak_core::{BrigadeId, Condition, PlayerTag, RuleViolation};

/// Glyph printed on the board overview for cells that are not on fire.
pub(crate) const NOT_BURNING: char = 'x';

const LAKE: char = 'L';

/// Single cell of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// Water source that brigades may refill from.
    Lake,
    /// Fire station owned by a player; also a refill source.
    Station(PlayerTag),
    /// Burnable terrain that brigades drive on.
    Forest(Forest),
}

impl Field {
    /// Creates a forest field in the provided condition.
    #[must_use]
    pub fn forest(condition: Condition) -> Self {
        Self::Forest(Forest::new(condition))
    }

    /// Forest stored in the field, if any.
    #[must_use]
    pub fn as_forest(&self) -> Option<&Forest> {
        match self {
            Self::Forest(forest) => Some(forest),
            Self::Lake | Self::Station(_) => None,
        }
    }

    pub(crate) fn as_forest_mut(&mut self) -> Option<&mut Forest> {
        match self {
            Self::Forest(forest) => Some(forest),
            Self::Lake | Self::Station(_) => None,
        }
    }

    /// Reports whether brigades next to the field may refill their tanks.
    #[must_use]
    pub const fn is_refill_source(&self) -> bool {
        matches!(self, Self::Lake | Self::Station(_))
    }

    /// Glyph used for the field on the board overview.
    ///
    /// Only burning forests show their fire; everything else is `x`.
    #[must_use]
    pub fn overview_glyph(&self) -> char {
        match self {
            Self::Forest(forest) if forest.is_burning() => forest.condition().glyph(),
            _ => NOT_BURNING,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lake => write!(f, "{LAKE}"),
            Self::Station(owner) => write!(f, "{owner}"),
            Self::Forest(forest) => write!(f, "{forest}"),
        }
    }
}

/// Forest cell with its fire condition and the brigades standing on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forest {
    condition: Condition,
    occupants: BTreeSet<BrigadeId>,
}

impl Forest {
    /// Creates an unoccupied forest.
    #[must_use]
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            occupants: BTreeSet::new(),
        }
    }

    /// Current fire condition.
    #[must_use]
    pub const fn condition(&self) -> Condition {
        self.condition
    }

    /// Reports whether the forest is on fire.
    #[must_use]
    pub const fn is_burning(&self) -> bool {
        self.condition.is_burning()
    }

    /// Brigades standing on the forest in identifier order.
    pub fn occupants(&self) -> impl Iterator<Item = BrigadeId> + '_ {
        self.occupants.iter().copied()
    }

    /// Reports whether any brigade stands on the forest.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub(crate) fn admit(&mut self, brigade: BrigadeId) -> Result<(), RuleViolation> {
        if self.is_burning() {
            return Err(RuleViolation::CellBurning);
        }
        let _ = self.occupants.insert(brigade);
        Ok(())
    }

    pub(crate) fn release(&mut self, brigade: BrigadeId) {
        let _ = self.occupants.remove(&brigade);
    }

    /// Applies one extinguish step, reporting whether it earned a point.
    pub(crate) fn extinguish(&mut self) -> Result<bool, RuleViolation> {
        let (condition, earned_point) = self.condition.extinguish()?;
        self.condition = condition;
        Ok(earned_point)
    }

    /// Lets the fire grow one step and evicts every occupant once it is severe.
    ///
    /// Returns the brigades caught by the fire.
    pub(crate) fn increase(&mut self) -> Vec<BrigadeId> {
        self.condition = self.condition.increase();
        if self.condition == Condition::BigFire {
            std::mem::take(&mut self.occupants).into_iter().collect()
        } else {
            Vec::new()
        }
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.condition.glyph())?;
        for occupant in &self.occupants {
            write!(f, ",{occupant}")?;
        }
        Ok(())
    }
}
