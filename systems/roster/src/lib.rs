#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player and turn management for Firebreak.
//!
//! The [`Roster`] owns the four players in their fixed cyclic order and
//! drives the round state machine: players take turns until everyone still
//! alive has played, then the fire must be rolled before the next round
//! starts. Eliminated players are skipped when the turn passes on.

mod player;

use std::collections::BTreeSet;

use firebreak_core::{BrigadeId, GameRules, PlayerTag, Position, RuleViolation};
use firebreak_world::Brigade;

pub use player::Player;

/// Phase of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the current player's next command.
    Idle,
    /// The round ended; the fire has to be rolled first.
    AwaitingFireRoll,
    /// The game was won or lost.
    GameOver,
}

/// Result of ending a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnAdvance {
    /// Player whose turn begins.
    pub next: PlayerTag,
    /// Whether the ended turn was the last of the round.
    pub round_complete: bool,
}

/// How the turn is affected by brigades lost in a fire roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAfterFire {
    /// The current player was eliminated and the turn passed on.
    Passed(PlayerTag),
    /// Another player was eliminated; the current player keeps the turn.
    Announced(PlayerTag),
    /// Nobody was eliminated.
    Unchanged,
}

/// Outcome of the bookkeeping that follows a fire roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireAftermath {
    /// Players who lost their last brigade in this roll.
    pub eliminated: Vec<PlayerTag>,
    /// Effect on the current turn.
    pub turn: TurnAfterFire,
}

/// Starting brigade placement for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deployment {
    /// Identifier reserved for the starting brigade.
    pub brigade: BrigadeId,
    /// Cell the brigade starts on.
    pub position: Position,
    /// Station of the owning player.
    pub base: Position,
}

/// Owns the players and the round state machine.
#[derive(Clone, Debug)]
pub struct Roster {
    players: Vec<Player>,
    current: PlayerTag,
    turns_taken: usize,
    phase: Phase,
    eliminated: BTreeSet<PlayerTag>,
    rules: GameRules,
}

impl Roster {
    /// Creates the four players for a board with the provided dimensions.
    ///
    /// Player `A` starts the first round.
    #[must_use]
    pub fn new(rows: u32, columns: u32, rules: GameRules) -> Self {
        let players = PlayerTag::ALL
            .into_iter()
            .map(|tag| Player::new(tag, tag.base(rows, columns), rules.starting_reputation))
            .collect();

        Self {
            players,
            current: PlayerTag::A,
            turns_taken: 1,
            phase: Phase::Idle,
            eliminated: BTreeSet::new(),
            rules,
        }
    }

    /// Player whose turn it is.
    #[must_use]
    pub const fn current(&self) -> PlayerTag {
        self.current
    }

    /// Current phase of the round.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Looks up a player by tag.
    #[must_use]
    pub fn player(&self, tag: PlayerTag) -> &Player {
        &self.players[slot(tag)]
    }

    /// Players who have been eliminated, in tag order.
    pub fn eliminated(&self) -> impl Iterator<Item = PlayerTag> + '_ {
        self.eliminated.iter().copied()
    }

    /// Fails once the game is over.
    pub fn ensure_running(&self) -> Result<(), RuleViolation> {
        match self.phase {
            Phase::GameOver => Err(RuleViolation::GameOver),
            Phase::Idle | Phase::AwaitingFireRoll => Ok(()),
        }
    }

    /// Fails unless the current player may act.
    pub fn ensure_can_act(&self) -> Result<(), RuleViolation> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::AwaitingFireRoll => Err(RuleViolation::MustRollFireFirst),
            Phase::GameOver => Err(RuleViolation::GameOver),
        }
    }

    /// Moves the game into its terminal phase.
    pub fn conclude(&mut self) {
        self.phase = Phase::GameOver;
    }

    /// Ends the current player's turn.
    ///
    /// The ending player's brigades regain their action points. When every
    /// living player has played, the round completes and the fire has to be
    /// rolled before anyone acts again.
    pub fn advance_turn(&mut self) -> Result<TurnAdvance, RuleViolation> {
        self.ensure_can_act()?;

        let next = self.next_alive_after(self.current)?;
        let round_complete = self.turns_taken >= self.alive_count();

        self.players[slot(self.current)].reset_brigades();
        if round_complete {
            self.turns_taken = 1;
            self.phase = Phase::AwaitingFireRoll;
            log::info!("round complete, {next} opens the next round after the fire roll");
        } else {
            self.turns_taken += 1;
        }
        self.current = next;
        log::debug!("turn passes to {next}");

        Ok(TurnAdvance {
            next,
            round_complete,
        })
    }

    /// Accepts the fire roll that closes the round.
    pub fn take_fire_roll(&mut self) -> Result<(), RuleViolation> {
        match self.phase {
            Phase::GameOver => Err(RuleViolation::GameOver),
            Phase::Idle => Err(RuleViolation::NotTimeToRoll),
            Phase::AwaitingFireRoll => {
                self.phase = Phase::Idle;
                Ok(())
            }
        }
    }

    /// Removes the brigades caught by the fire and updates the turn.
    ///
    /// When the current player loses their last brigade the turn passes to
    /// the next living player.
    pub fn fire_roll_turn(&mut self, caught: &[BrigadeId]) -> Result<FireAftermath, RuleViolation> {
        let eliminated = self.bury(caught);

        let turn = if !self.player(self.current).is_alive() {
            self.current = self.next_alive_after(self.current)?;
            TurnAfterFire::Passed(self.current)
        } else if !eliminated.is_empty() {
            TurnAfterFire::Announced(self.current)
        } else {
            TurnAfterFire::Unchanged
        };

        Ok(FireAftermath { eliminated, turn })
    }

    /// Removes the brigades caught by the fire from their owners.
    ///
    /// Returns the players who became eliminated.
    pub fn bury(&mut self, caught: &[BrigadeId]) -> Vec<PlayerTag> {
        for &id in caught {
            match self.players[slot(id.owner())].brigade_mut(id) {
                Some(brigade) => brigade.catch_fire(),
                None => log::warn!("caught brigade {id} has no owner on record"),
            }
        }

        let mut newly_eliminated = Vec::new();
        for player in &mut self.players {
            let lost = player.bury_caught();
            if lost > 0 {
                log::debug!("{} lost {lost} brigade(s) to the fire", player.tag());
            }
            if !player.is_alive() && self.eliminated.insert(player.tag()) {
                log::info!("player {} eliminated", player.tag());
                newly_eliminated.push(player.tag());
            }
        }
        newly_eliminated
    }

    /// Reserves an identifier for a brigade the current player wants to buy.
    pub fn create_brigade_for_current(&self) -> Result<BrigadeId, RuleViolation> {
        let player = self.player(self.current);
        if player.reputation() < self.rules.brigade_cost {
            return Err(RuleViolation::InsufficientReputation);
        }
        Ok(player.next_brigade_id())
    }

    /// Hands a bought brigade to the current player and charges its cost.
    pub fn add_brigade(&mut self, brigade: Brigade) -> Result<u32, RuleViolation> {
        let cost = self.rules.brigade_cost;
        let player = &mut self.players[slot(self.current)];
        player.charge(cost)?;
        log::debug!("{} bought brigade {}", player.tag(), brigade.id());
        player.enlist(brigade);
        Ok(player.reputation())
    }

    /// Starting placements for every player in turn order.
    pub fn initial_deployments(&self) -> impl Iterator<Item = Deployment> + '_ {
        self.players.iter().map(|player| Deployment {
            brigade: player.next_brigade_id(),
            position: player.deployment_position(),
            base: player.base(),
        })
    }

    /// Hands a starting brigade to its owner free of charge.
    pub fn enlist_starting(&mut self, brigade: Brigade) {
        self.players[slot(brigade.id().owner())].enlist(brigade);
    }

    /// Looks up a brigade of the current player.
    pub fn brigade_mut(&mut self, id: BrigadeId) -> Result<&mut Brigade, RuleViolation> {
        if id.owner() != self.current {
            return Err(RuleViolation::UnknownBrigade);
        }
        self.players[slot(self.current)]
            .brigade_mut(id)
            .ok_or(RuleViolation::UnknownBrigade)
    }

    /// Reputation of the current player.
    #[must_use]
    pub fn current_reputation(&self) -> u32 {
        self.player(self.current).reputation()
    }

    /// Awards the current player one reputation point.
    pub fn reward_current(&mut self) {
        self.players[slot(self.current)].reward();
    }

    /// Renders the current player and their brigades.
    #[must_use]
    pub fn describe_current(&self) -> String {
        self.player(self.current).to_string()
    }

    fn alive_count(&self) -> usize {
        self.players.iter().filter(|player| player.is_alive()).count()
    }

    fn next_alive_after(&self, tag: PlayerTag) -> Result<PlayerTag, RuleViolation> {
        let mut candidate = tag;
        for _ in 0..self.players.len() {
            candidate = candidate.successor();
            if self.player(candidate).is_alive() {
                return Ok(candidate);
            }
        }
        log::warn!("no living player left after {tag}");
        Err(RuleViolation::NoPlayersLeft)
    }
}

fn slot(tag: PlayerTag) -> usize {
    match tag {
        PlayerTag::A => 0,
        PlayerTag::B => 1,
        PlayerTag::C => 2,
        PlayerTag::D => 3,
    }
}
