#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game handler that resolves player commands against the board and roster.
//!
//! Every command is resolved completely before the next one is accepted.
//! Validation happens before mutation, so a rejected command leaves the
//! session exactly as it was.

use firebreak_core::{
    BrigadeId, Command, Event, GameRules, PlayerTag, Position, Reply, RuleViolation, Wind,
};
use firebreak_system_roster::{Roster, TurnAfterFire};
use firebreak_world::{Board, Brigade, Placement};

/// One game session: the board, the players and the rules they play by.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    roster: Roster,
    rules: GameRules,
}

impl Game {
    /// Starts a session on the provided board and deploys the starting brigades.
    #[must_use]
    pub fn new(board: Board, rules: GameRules) -> Self {
        let roster = Roster::new(board.rows(), board.columns(), rules);
        let mut game = Self {
            board,
            roster,
            rules,
        };
        let _ = game.deploy_starting_brigades();
        game
    }

    /// Board the session is played on.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Players and round state.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Rules the session was started with.
    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Resolves a command, appending the events it caused.
    pub fn apply(
        &mut self,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> Result<Reply, RuleViolation> {
        match command {
            Command::MoveBrigade {
                brigade,
                destination,
            } => self.move_brigade(brigade, destination, out_events),
            Command::Extinguish { brigade, target } => {
                self.extinguish(brigade, target, out_events)
            }
            Command::Refill { brigade } => self.refill(brigade, out_events),
            Command::BuyBrigade { position } => self.buy_brigade(position, out_events),
            Command::EndTurn => self.end_turn(out_events),
            Command::RollFire { wind } => self.roll_fire(wind, out_events),
            Command::ShowBoard => Ok(self.show_board()),
            Command::ShowField { position } => self.show_field(position),
            Command::ShowPlayer => self.show_player(),
            Command::Reset => Ok(self.reset(out_events)),
        }
    }

    /// Drives a brigade of the current player to another forest.
    pub fn move_brigade(
        &mut self,
        id: BrigadeId,
        destination: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<Reply, RuleViolation> {
        self.roster.ensure_can_act()?;
        let brigade = self.roster.brigade_mut(id)?;
        brigade.validate_move()?;

        let from = brigade.position();
        self.board.move_brigade(brigade, destination)?;
        brigade.spend_move();

        out_events.push(Event::BrigadeMoved {
            brigade: id,
            from,
            to: destination,
        });
        Ok(Reply::Ok)
    }

    /// Pours water from a brigade onto a nearby forest.
    ///
    /// Extinguishing the last burning forest wins the game.
    pub fn extinguish(
        &mut self,
        id: BrigadeId,
        target: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<Reply, RuleViolation> {
        self.roster.ensure_can_act()?;
        let brigade = self.roster.brigade_mut(id)?;
        brigade.ensure_action_points()?;
        brigade.validate_extinguish(target)?;

        let outcome = self.board.extinguish(brigade, target)?;
        brigade.apply_extinguish(target);
        let action_points = brigade.action_points();
        if outcome.earned_point {
            self.roster.reward_current();
        }

        out_events.push(Event::FieldExtinguished {
            brigade: id,
            position: target,
            condition: outcome.condition,
        });

        if outcome.fire_is_out {
            self.roster.conclude();
            log::info!("the last fire was put out by {id}, players win");
            out_events.push(Event::GameWon);
            return Ok(Reply::Win);
        }

        Ok(Reply::Extinguished {
            condition: outcome.condition,
            action_points,
        })
    }

    /// Refills a brigade's tank from a lake or station next to it.
    pub fn refill(
        &mut self,
        id: BrigadeId,
        out_events: &mut Vec<Event>,
    ) -> Result<Reply, RuleViolation> {
        self.roster.ensure_can_act()?;
        let brigade = self.roster.brigade_mut(id)?;
        brigade.ensure_action_points()?;
        if !self.board.has_adjacent_refill_source(brigade) {
            return Err(RuleViolation::NoRefillSource);
        }
        brigade.refill()?;

        log::debug!("brigade {id} refilled");
        out_events.push(Event::TankRefilled { brigade: id });
        Ok(Reply::ActionPoints(brigade.action_points()))
    }

    /// Buys a brigade for the current player next to their station.
    ///
    /// Placing onto a lake or station is accepted but produces no brigade
    /// and costs nothing.
    pub fn buy_brigade(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<Reply, RuleViolation> {
        self.roster.ensure_can_act()?;
        let id = self.roster.create_brigade_for_current()?;
        let base = self.roster.player(self.roster.current()).base();

        let reputation = match self.board.place_brigade(id, position, base)? {
            Placement::Stationed => {
                let reputation = self
                    .roster
                    .add_brigade(Brigade::new(id, position, &self.rules))?;
                out_events.push(Event::BrigadeDeployed {
                    brigade: id,
                    position,
                });
                reputation
            }
            Placement::Discarded => self.roster.current_reputation(),
        };

        Ok(Reply::Reputation(reputation))
    }

    /// Ends the current player's turn and names the next player.
    pub fn end_turn(&mut self, out_events: &mut Vec<Event>) -> Result<Reply, RuleViolation> {
        let advance = self.roster.advance_turn()?;
        out_events.push(if advance.round_complete {
            Event::RoundCompleted { next: advance.next }
        } else {
            Event::TurnEnded { next: advance.next }
        });
        Ok(Reply::Player(advance.next))
    }

    /// Rolls the fire at the end of a round.
    ///
    /// Replies `lose` when no brigade survives, the next player's tag when a
    /// player was eliminated and `OK` otherwise.
    pub fn roll_fire(
        &mut self,
        wind: Wind,
        out_events: &mut Vec<Event>,
    ) -> Result<Reply, RuleViolation> {
        self.roster.take_fire_roll()?;

        let roll = self.board.roll_fire(wind);
        log::info!(
            "fire rolled {wind:?}, {} forests increased",
            roll.increased
        );
        out_events.push(Event::FireSpread {
            wind,
            increased: roll.increased,
        });
        out_events.extend(
            roll.caught
                .iter()
                .map(|&brigade| Event::BrigadeCaught { brigade }),
        );

        if roll.all_brigades_lost {
            let eliminated = self.roster.bury(&roll.caught);
            push_eliminations(&eliminated, out_events);
            self.roster.conclude();
            log::info!("no brigade survived the fire, players lose");
            out_events.push(Event::GameLost);
            return Ok(Reply::Lose);
        }

        let aftermath = self.roster.fire_roll_turn(&roll.caught)?;
        push_eliminations(&aftermath.eliminated, out_events);
        Ok(match aftermath.turn {
            TurnAfterFire::Passed(player) | TurnAfterFire::Announced(player) => {
                Reply::Player(player)
            }
            TurnAfterFire::Unchanged => Reply::Ok,
        })
    }

    /// Renders the board overview.
    #[must_use]
    pub fn show_board(&self) -> Reply {
        Reply::View(self.board.render())
    }

    /// Renders a single field including the brigades on it.
    pub fn show_field(&self, position: Position) -> Result<Reply, RuleViolation> {
        self.board.show_field(position).map(Reply::View)
    }

    /// Renders the current player and their brigades.
    pub fn show_player(&self) -> Result<Reply, RuleViolation> {
        self.roster.ensure_running()?;
        Ok(Reply::View(self.roster.describe_current()))
    }

    /// Restores the initial board and players.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) -> Reply {
        self.board.reset_to_initial();
        self.roster = Roster::new(self.board.rows(), self.board.columns(), self.rules);
        log::info!("game reset");
        out_events.push(Event::GameReset);
        out_events.extend(self.deploy_starting_brigades());
        Reply::Ok
    }

    fn deploy_starting_brigades(&mut self) -> Vec<Event> {
        let deployments: Vec<_> = self.roster.initial_deployments().collect();
        let mut events = Vec::with_capacity(deployments.len());

        for deployment in deployments {
            match self
                .board
                .place_brigade(deployment.brigade, deployment.position, deployment.base)
            {
                Ok(Placement::Stationed) => {
                    self.roster.enlist_starting(Brigade::new(
                        deployment.brigade,
                        deployment.position,
                        &self.rules,
                    ));
                    events.push(Event::BrigadeDeployed {
                        brigade: deployment.brigade,
                        position: deployment.position,
                    });
                }
                Ok(Placement::Discarded) => log::warn!(
                    "starting brigade {} has no forest at {}",
                    deployment.brigade,
                    deployment.position
                ),
                Err(violation) => log::warn!(
                    "starting brigade {} could not be placed: {violation}",
                    deployment.brigade
                ),
            }
        }
        events
    }
}

fn push_eliminations(eliminated: &[PlayerTag], out_events: &mut Vec<Event>) {
    out_events.extend(
        eliminated
            .iter()
            .map(|&player| Event::PlayerEliminated { player }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use firebreak_core::Condition;
    use firebreak_world::Field;

    fn small_game() -> Game {
        let layout = ["AdLdD", "ddddd", "Ld*+L", "ddddd", "CdLdB"];
        let mut fields = Vec::new();
        for row in layout {
            for glyph in row.chars() {
                fields.push(match glyph {
                    'L' => Field::Lake,
                    'A' | 'B' | 'C' | 'D' => Field::Station(
                        PlayerTag::from_letter(glyph).expect("station letter"),
                    ),
                    other => Field::forest(Condition::from_glyph(other).expect("forest glyph")),
                });
            }
        }
        let rules = GameRules::default();
        Game::new(Board::new(5, 5, fields, &rules).expect("valid board"), rules)
    }

    #[test]
    fn starting_brigades_stand_next_to_their_stations() {
        let game = small_game();
        assert_eq!(
            game.show_player(),
            Ok(Reply::View("A,5\nA0,3,3,1,1".to_owned()))
        );
        assert_eq!(
            game.show_field(Position::new(3, 3)),
            Ok(Reply::View("d,B0".to_owned()))
        );
    }

    #[test]
    fn rolling_before_the_round_ends_is_rejected() {
        let mut game = small_game();
        let mut events = Vec::new();
        assert_eq!(
            game.apply(Command::RollFire { wind: Wind::Calm }, &mut events),
            Err(RuleViolation::NotTimeToRoll)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn reset_redeploys_starting_brigades() {
        let mut game = small_game();
        let mut events = Vec::new();
        let _ = game
            .apply(Command::EndTurn, &mut events)
            .expect("turn ends");

        events.clear();
        assert_eq!(game.apply(Command::Reset, &mut events), Ok(Reply::Ok));
        assert_eq!(events.first(), Some(&Event::GameReset));
        assert_eq!(events.len(), 5);
        assert_eq!(game.roster().current(), PlayerTag::A);
    }
}
