use std::{collections::BTreeMap, fmt};

use firebreak_core::{BrigadeId, PlayerTag, Position, RuleViolation};
use firebreak_world::Brigade;

/// One of the four players together with their brigades and reputation.
#[derive(Clone, Debug)]
pub struct Player {
    tag: PlayerTag,
    base: Position,
    reputation: u32,
    brigades: BTreeMap<BrigadeId, Brigade>,
    next_serial: u32,
}

impl Player {
    pub(crate) fn new(tag: PlayerTag, base: Position, reputation: u32) -> Self {
        Self {
            tag,
            base,
            reputation,
            brigades: BTreeMap::new(),
            next_serial: 0,
        }
    }

    /// Tag identifying the player.
    #[must_use]
    pub const fn tag(&self) -> PlayerTag {
        self.tag
    }

    /// Position of the player's fire station.
    #[must_use]
    pub const fn base(&self) -> Position {
        self.base
    }

    /// Reputation points the player owns.
    #[must_use]
    pub const fn reputation(&self) -> u32 {
        self.reputation
    }

    /// Brigades owned by the player in identifier order.
    pub fn brigades(&self) -> impl Iterator<Item = &Brigade> + '_ {
        self.brigades.values()
    }

    /// A player stays in the game while they own at least one brigade.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.brigades.is_empty()
    }

    /// Cell diagonal to the station, pointing into the board, where the
    /// starting brigade is deployed.
    #[must_use]
    pub fn deployment_position(&self) -> Position {
        let inward = |coordinate: u32| {
            if coordinate == 0 {
                1
            } else {
                coordinate - 1
            }
        };
        Position::new(inward(self.base.row()), inward(self.base.column()))
    }

    pub(crate) const fn next_brigade_id(&self) -> BrigadeId {
        BrigadeId::new(self.tag, self.next_serial)
    }

    pub(crate) fn enlist(&mut self, brigade: Brigade) {
        self.next_serial = self.next_serial.max(brigade.id().serial() + 1);
        let _ = self.brigades.insert(brigade.id(), brigade);
    }

    pub(crate) fn charge(&mut self, cost: u32) -> Result<(), RuleViolation> {
        self.reputation = self
            .reputation
            .checked_sub(cost)
            .ok_or(RuleViolation::InsufficientReputation)?;
        Ok(())
    }

    pub(crate) fn reward(&mut self) {
        self.reputation = self.reputation.saturating_add(1);
    }

    pub(crate) fn brigade_mut(&mut self, id: BrigadeId) -> Option<&mut Brigade> {
        self.brigades.get_mut(&id)
    }

    pub(crate) fn reset_brigades(&mut self) {
        for brigade in self.brigades.values_mut() {
            brigade.reset_for_new_turn();
        }
    }

    /// Drops every brigade caught by the fire and reports how many were lost.
    pub(crate) fn bury_caught(&mut self) -> usize {
        let before = self.brigades.len();
        self.brigades.retain(|_, brigade| !brigade.is_caught_by_fire());
        before - self.brigades.len()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.tag, self.reputation)?;
        for brigade in self.brigades.values() {
            write!(f, "\n{brigade}")?;
        }
        Ok(())
    }
}
