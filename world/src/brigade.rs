//! Fire brigades and their per-turn budget.

use std::{collections::BTreeSet, fmt};

use firebreak_core::{BrigadeId, GameRules, Position, RuleViolation};

/// Mobile fire-fighting unit owned by a player.
///
/// The brigade owns its position; the forest it stands on only records its
/// identifier. [`crate::Board`] keeps both sides in sync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Brigade {
    id: BrigadeId,
    position: Position,
    tank: u32,
    tank_capacity: u32,
    action_points: u32,
    action_budget: u32,
    acted: bool,
    extinguished: BTreeSet<Position>,
    caught_by_fire: bool,
}

impl Brigade {
    /// Creates a brigade with a full tank and a fresh action budget.
    #[must_use]
    pub fn new(id: BrigadeId, position: Position, rules: &GameRules) -> Self {
        Self {
            id,
            position,
            tank: rules.tank_capacity,
            tank_capacity: rules.tank_capacity,
            action_points: rules.action_points,
            action_budget: rules.action_points,
            acted: false,
            extinguished: BTreeSet::new(),
            caught_by_fire: false,
        }
    }

    /// Identifier of the brigade.
    #[must_use]
    pub const fn id(&self) -> BrigadeId {
        self.id
    }

    /// Cell the brigade stands on.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Units of water left in the tank.
    #[must_use]
    pub const fn tank(&self) -> u32 {
        self.tank
    }

    /// Action points left this turn.
    #[must_use]
    pub const fn action_points(&self) -> u32 {
        self.action_points
    }

    /// Reports whether the brigade extinguished or refilled this turn.
    #[must_use]
    pub const fn has_acted(&self) -> bool {
        self.acted
    }

    /// Reports whether the brigade burned in a severe fire.
    #[must_use]
    pub const fn is_caught_by_fire(&self) -> bool {
        self.caught_by_fire
    }

    /// Fails unless the brigade has an action point left.
    pub fn ensure_action_points(&self) -> Result<(), RuleViolation> {
        if self.action_points == 0 {
            return Err(RuleViolation::NoActionPoints);
        }
        Ok(())
    }

    /// Fills the tank, spending one action point.
    pub fn refill(&mut self) -> Result<(), RuleViolation> {
        if self.tank == self.tank_capacity {
            return Err(RuleViolation::TankFull);
        }
        self.ensure_action_points()?;
        self.tank = self.tank_capacity;
        self.action_points -= 1;
        self.acted = true;
        Ok(())
    }

    /// Checks that the brigade may pour water onto the target this turn.
    pub fn validate_extinguish(&self, target: Position) -> Result<(), RuleViolation> {
        if self.extinguished.contains(&target) {
            return Err(RuleViolation::AlreadyExtinguishedHere);
        }
        if self.tank == 0 {
            return Err(RuleViolation::TankEmpty);
        }
        Ok(())
    }

    /// Books an extinguish that the board already carried out.
    pub fn apply_extinguish(&mut self, target: Position) {
        self.tank = self.tank.saturating_sub(1);
        let _ = self.extinguished.insert(target);
        self.action_points = self.action_points.saturating_sub(1);
        self.acted = true;
    }

    /// Checks that the brigade may still move this turn.
    ///
    /// Moving is only possible before the brigade extinguished or refilled.
    pub fn validate_move(&self) -> Result<(), RuleViolation> {
        self.ensure_action_points()?;
        if self.acted {
            return Err(RuleViolation::AlreadyActed);
        }
        Ok(())
    }

    /// Books the action point spent on a completed move.
    pub fn spend_move(&mut self) {
        self.action_points = self.action_points.saturating_sub(1);
    }

    /// Marks the brigade as lost in a severe fire.
    pub fn catch_fire(&mut self) {
        self.caught_by_fire = true;
    }

    /// Restores the action budget at the end of the owner's turn.
    ///
    /// Tank level and position carry over.
    pub fn reset_for_new_turn(&mut self) {
        self.extinguished.clear();
        self.acted = false;
        self.action_points = self.action_budget;
    }

    pub(crate) fn relocate(&mut self, destination: Position) {
        self.position = destination;
    }
}

impl fmt::Display for Brigade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.id,
            self.tank,
            self.action_points,
            self.position.row(),
            self.position.column()
        )
    }
}
