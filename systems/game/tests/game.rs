use firebreak_core::{
    BrigadeId, Command, Condition, Event, GameRules, PlayerTag, Position, Reply, RuleViolation,
    Wind,
};
use firebreak_system_game::Game;
use firebreak_world::{Board, Field};

const FOREST_BOARD: [&str; 7] = [
    "AddLddD", "ddddddd", "ddddddd", "Ldd*ddL", "ddd+ddd", "ddddddd", "CddLddB",
];

fn game_from(layout: &[&str]) -> Game {
    let mut fields = Vec::new();
    for row in layout {
        for glyph in row.chars() {
            fields.push(match glyph {
                'L' => Field::Lake,
                'A' | 'B' | 'C' | 'D' => {
                    Field::Station(PlayerTag::from_letter(glyph).expect("station letter"))
                }
                other => Field::forest(Condition::from_glyph(other).expect("forest glyph")),
            });
        }
    }
    let rows = u32::try_from(layout.len()).expect("rows");
    let columns = u32::try_from(layout[0].len()).expect("columns");
    let rules = GameRules::default();
    Game::new(
        Board::new(rows, columns, fields, &rules).expect("valid board"),
        rules,
    )
}

fn brigade(tag: PlayerTag, serial: u32) -> BrigadeId {
    BrigadeId::new(tag, serial)
}

fn play(game: &mut Game, command: Command) -> Result<Reply, RuleViolation> {
    let mut events = Vec::new();
    game.apply(command, &mut events)
}

fn finish_round(game: &mut Game) {
    for _ in 0..living_players(game) {
        let _ = play(game, Command::EndTurn).expect("turn ends");
    }
}

fn living_players(game: &Game) -> usize {
    PlayerTag::ALL
        .into_iter()
        .filter(|tag| game.roster().player(*tag).is_alive())
        .count()
}

#[test]
fn turns_cycle_through_every_player_in_fixed_order() {
    let mut game = game_from(&FOREST_BOARD);
    let mut order = Vec::new();

    for _ in 0..3 {
        for _ in 0..4 {
            match play(&mut game, Command::EndTurn) {
                Ok(Reply::Player(tag)) => order.push(tag),
                other => panic!("unexpected reply {other:?}"),
            }
        }
        assert_eq!(
            play(&mut game, Command::RollFire { wind: Wind::Calm }),
            Ok(Reply::Ok)
        );
    }

    let expected = [PlayerTag::B, PlayerTag::C, PlayerTag::D, PlayerTag::A].repeat(3);
    assert_eq!(order, expected);
}

#[test]
fn round_end_blocks_everything_but_the_fire_roll_and_views() {
    let mut game = game_from(&FOREST_BOARD);
    finish_round(&mut game);

    assert_eq!(
        play(
            &mut game,
            Command::MoveBrigade {
                brigade: brigade(PlayerTag::A, 0),
                destination: Position::new(1, 2),
            }
        ),
        Err(RuleViolation::MustRollFireFirst)
    );
    assert_eq!(
        play(&mut game, Command::EndTurn),
        Err(RuleViolation::MustRollFireFirst)
    );
    assert!(play(&mut game, Command::ShowBoard).is_ok());
    assert!(play(&mut game, Command::ShowPlayer).is_ok());

    assert_eq!(
        play(&mut game, Command::RollFire { wind: Wind::Calm }),
        Ok(Reply::Ok)
    );
    assert_eq!(
        play(&mut game, Command::RollFire { wind: Wind::Calm }),
        Err(RuleViolation::NotTimeToRoll)
    );
}

#[test]
fn buying_a_brigade_costs_the_whole_starting_reputation() {
    let mut game = game_from(&FOREST_BOARD);
    let mut events = Vec::new();

    assert_eq!(
        game.apply(
            Command::BuyBrigade {
                position: Position::new(1, 0),
            },
            &mut events
        ),
        Ok(Reply::Reputation(0))
    );
    assert_eq!(
        events,
        vec![Event::BrigadeDeployed {
            brigade: brigade(PlayerTag::A, 1),
            position: Position::new(1, 0),
        }]
    );
    assert_eq!(
        play(
            &mut game,
            Command::BuyBrigade {
                position: Position::new(0, 1),
            }
        ),
        Err(RuleViolation::InsufficientReputation)
    );
    assert_eq!(
        play(&mut game, Command::ShowPlayer),
        Ok(Reply::View("A,0\nA0,3,3,1,1\nA1,3,3,1,0".to_owned()))
    );
}

#[test]
fn buying_far_from_the_station_is_rejected() {
    let mut game = game_from(&FOREST_BOARD);
    assert_eq!(
        play(
            &mut game,
            Command::BuyBrigade {
                position: Position::new(2, 2),
            }
        ),
        Err(RuleViolation::NotAdjacent)
    );
    assert_eq!(game.roster().current_reputation(), 5);
}

#[test]
fn moving_comes_before_other_actions() {
    let mut game = game_from(&FOREST_BOARD);
    let a0 = brigade(PlayerTag::A, 0);

    assert_eq!(
        play(
            &mut game,
            Command::MoveBrigade {
                brigade: a0,
                destination: Position::new(2, 2),
            }
        ),
        Ok(Reply::Ok)
    );
    assert_eq!(
        play(
            &mut game,
            Command::Extinguish {
                brigade: a0,
                target: Position::new(3, 3),
            }
        ),
        Ok(Reply::Extinguished {
            condition: Condition::SmallFire,
            action_points: 1,
        })
    );
    assert_eq!(game.roster().current_reputation(), 6);
    assert_eq!(
        play(
            &mut game,
            Command::MoveBrigade {
                brigade: a0,
                destination: Position::new(2, 1),
            }
        ),
        Err(RuleViolation::AlreadyActed)
    );
    assert_eq!(
        play(
            &mut game,
            Command::Extinguish {
                brigade: a0,
                target: Position::new(3, 3),
            }
        ),
        Err(RuleViolation::AlreadyExtinguishedHere)
    );
}

#[test]
fn only_the_current_players_brigades_take_orders() {
    let mut game = game_from(&FOREST_BOARD);
    assert_eq!(
        play(
            &mut game,
            Command::Refill {
                brigade: brigade(PlayerTag::B, 0),
            }
        ),
        Err(RuleViolation::UnknownBrigade)
    );
}

#[test]
fn refilling_needs_a_source_and_an_emptier_tank() {
    let mut game = game_from(&FOREST_BOARD);
    let a0 = brigade(PlayerTag::A, 0);

    assert_eq!(
        play(&mut game, Command::Refill { brigade: a0 }),
        Err(RuleViolation::TankFull)
    );
    assert_eq!(
        play(
            &mut game,
            Command::Extinguish {
                brigade: a0,
                target: Position::new(2, 2),
            }
        ),
        Ok(Reply::Extinguished {
            condition: Condition::Wet,
            action_points: 2,
        })
    );
    assert_eq!(game.roster().current_reputation(), 5, "dry forest earns nothing");
    assert_eq!(
        play(&mut game, Command::Refill { brigade: a0 }),
        Ok(Reply::ActionPoints(1))
    );

    finish_round(&mut game);
    let _ = play(&mut game, Command::RollFire { wind: Wind::Calm }).expect("roll");
    let _ = play(
        &mut game,
        Command::MoveBrigade {
            brigade: a0,
            destination: Position::new(2, 2),
        },
    )
    .expect("move away from the station");
    assert_eq!(
        play(&mut game, Command::Refill { brigade: a0 }),
        Err(RuleViolation::NoRefillSource)
    );
}

#[test]
fn extinguishing_the_last_fire_wins() {
    let mut game = game_from(&FOREST_BOARD);
    let a0 = brigade(PlayerTag::A, 0);

    let _ = play(
        &mut game,
        Command::MoveBrigade {
            brigade: a0,
            destination: Position::new(2, 2),
        },
    )
    .expect("move");
    let _ = play(
        &mut game,
        Command::Extinguish {
            brigade: a0,
            target: Position::new(3, 3),
        },
    )
    .expect("severe fire shrinks");

    finish_round(&mut game);
    assert_eq!(
        play(&mut game, Command::RollFire { wind: Wind::Calm }),
        Ok(Reply::Ok)
    );

    let _ = play(
        &mut game,
        Command::MoveBrigade {
            brigade: a0,
            destination: Position::new(3, 2),
        },
    )
    .expect("move next to both fires");
    assert_eq!(
        play(
            &mut game,
            Command::Extinguish {
                brigade: a0,
                target: Position::new(3, 3),
            }
        ),
        Ok(Reply::Extinguished {
            condition: Condition::Wet,
            action_points: 1,
        })
    );

    let mut events = Vec::new();
    assert_eq!(
        game.apply(
            Command::Extinguish {
                brigade: a0,
                target: Position::new(4, 3),
            },
            &mut events
        ),
        Ok(Reply::Win)
    );
    assert_eq!(events.last(), Some(&Event::GameWon));

    assert_eq!(
        play(&mut game, Command::EndTurn),
        Err(RuleViolation::GameOver)
    );
    assert_eq!(
        play(&mut game, Command::ShowPlayer),
        Err(RuleViolation::GameOver)
    );
    assert_eq!(
        play(&mut game, Command::ShowBoard),
        Ok(Reply::View(
            "x,x,x,x,x,x,x\n".repeat(6) + "x,x,x,x,x,x,x"
        ))
    );
}

#[test]
fn losing_a_players_last_brigade_eliminates_them() {
    let mut layout = FOREST_BOARD;
    layout[5] = "dd*dddd";
    let mut game = game_from(&layout);

    finish_round(&mut game);
    assert_eq!(
        play(&mut game, Command::RollFire { wind: Wind::West }),
        Ok(Reply::Ok)
    );

    finish_round(&mut game);
    let mut events = Vec::new();
    assert_eq!(
        game.apply(Command::RollFire { wind: Wind::West }, &mut events),
        Ok(Reply::Player(PlayerTag::A))
    );
    assert!(events.contains(&Event::BrigadeCaught {
        brigade: brigade(PlayerTag::C, 0),
    }));
    assert!(events.contains(&Event::PlayerEliminated {
        player: PlayerTag::C,
    }));

    let order: Vec<_> = (0..3)
        .map(|_| play(&mut game, Command::EndTurn))
        .collect();
    assert_eq!(
        order,
        vec![
            Ok(Reply::Player(PlayerTag::B)),
            Ok(Reply::Player(PlayerTag::D)),
            Ok(Reply::Player(PlayerTag::A)),
        ]
    );
    assert_eq!(
        play(&mut game, Command::EndTurn),
        Err(RuleViolation::MustRollFireFirst),
        "three living players make a round"
    );
}

#[test]
fn fire_catching_every_brigade_loses_and_reset_restarts() {
    let layout = ["A+L+D", "+d*d+", "L***L", "+d*d+", "C+L+B"];
    let mut game = game_from(&layout);
    let initial_board = play(&mut game, Command::ShowBoard).expect("board view");

    finish_round(&mut game);
    assert_eq!(
        play(
            &mut game,
            Command::RollFire {
                wind: Wind::AllDirections,
            }
        ),
        Ok(Reply::Ok)
    );

    finish_round(&mut game);
    let mut events = Vec::new();
    assert_eq!(
        game.apply(
            Command::RollFire {
                wind: Wind::AllDirections,
            },
            &mut events
        ),
        Ok(Reply::Lose)
    );
    let caught = events
        .iter()
        .filter(|event| matches!(event, Event::BrigadeCaught { .. }))
        .count();
    assert_eq!(caught, 4);
    assert_eq!(events.last(), Some(&Event::GameLost));
    assert_eq!(
        play(
            &mut game,
            Command::BuyBrigade {
                position: Position::new(0, 1),
            }
        ),
        Err(RuleViolation::GameOver)
    );

    assert_eq!(play(&mut game, Command::Reset), Ok(Reply::Ok));
    assert_eq!(play(&mut game, Command::ShowBoard), Ok(initial_board));
    assert_eq!(
        play(&mut game, Command::ShowPlayer),
        Ok(Reply::View("A,5\nA0,3,3,1,1".to_owned()))
    );
}
