#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Firebreak session on standard input.

mod commands;
mod layout;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use firebreak_core::GameRules;
use firebreak_system_game::Game;
use firebreak_world::Board;

use crate::{commands::Input, layout::Layout};

const ERROR_PREFIX: &str = "Error, ";

#[derive(Debug, Parser)]
#[command(name = "firebreak", version)]
#[command(about = "Turn-based fire-fighting board game for four players")]
struct Args {
    /// Board description: rows, columns and every cell, comma-separated
    board: String,

    /// TOML file overriding the default game rules
    #[arg(long)]
    rules: Option<PathBuf>,
}

/// Entry point for the Firebreak command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rules = load_rules(args.rules.as_deref())?;
    let layout = Layout::decode(&args.board).context("failed to decode the board description")?;
    let board = Board::new(layout.rows, layout.columns, layout.fields, &rules)
        .context("failed to assemble the board")?;
    let mut game = Game::new(board, rules);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    run(&mut game, stdin.lock(), &mut stdout.lock(), &mut stderr.lock())
        .context("failed to run the session")
}

fn load_rules(path: Option<&Path>) -> Result<GameRules> {
    let Some(path) = path else {
        return Ok(GameRules::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    let rules: GameRules = toml::from_str(&contents)
        .with_context(|| format!("failed to parse rules file {}", path.display()))?;
    log::info!("loaded rules from {}: {rules:?}", path.display());
    Ok(rules)
}

/// Reads commands until `quit` or the end of input.
///
/// Replies go to `out`, rejected commands to `err`.
fn run<R, O, E>(game: &mut Game, input: R, out: &mut O, err: &mut E) -> io::Result<()>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    let mut events = Vec::new();
    for line in input.lines() {
        let line = line?;
        let command = match commands::parse(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Play(command)) => command,
            Err(error) => {
                writeln!(err, "{ERROR_PREFIX}{error}")?;
                continue;
            }
        };

        match game.apply(command, &mut events) {
            Ok(reply) => writeln!(out, "{reply}")?,
            Err(violation) => writeln!(err, "{ERROR_PREFIX}{violation}")?,
        }
        for event in events.drain(..) {
            log::debug!("{event:?}");
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = "5,5,A,d,L,d,D,d,A0,*,D0,d,L,+,d,w,L,d,C0,d,B0,d,C,d,L,d,B";

    fn session(script: &str) -> (String, String) {
        let layout = Layout::decode(BOARD).expect("board decodes");
        let rules = GameRules::default();
        let board =
            Board::new(layout.rows, layout.columns, layout.fields, &rules).expect("board builds");
        let mut game = Game::new(board, rules);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        run(&mut game, script.as_bytes(), &mut out, &mut err).expect("session runs");
        (
            String::from_utf8(out).expect("utf-8 output"),
            String::from_utf8(err).expect("utf-8 errors"),
        )
    }

    #[test]
    fn replies_and_errors_use_separate_streams() {
        let (out, err) = session("show-player\njump\nfire-to-roll 1\nturn\nquit\nturn\n");

        assert_eq!(out, "A,5\nA0,3,3,1,1\nB\n");
        assert_eq!(
            err,
            "Error, unknown command `jump`\n\
             Error, the fire can only be rolled at the end of a round\n"
        );
    }

    #[test]
    fn extinguishing_reports_condition_and_action_points() {
        let (out, err) = session("extinguish A0,1,2\nshow-field 1,2\nshow-board\n");

        assert_eq!(err, "");
        assert_eq!(
            out,
            "+,2\n+\nx,x,x,x,x\nx,x,+,x,x\nx,+,x,x,x\nx,x,x,x,x\nx,x,x,x,x\n"
        );
    }

    #[test]
    fn missing_rules_file_is_reported() {
        let error = load_rules(Some(Path::new("/nonexistent/firebreak-rules.toml")))
            .expect_err("file does not exist");
        assert!(error.to_string().contains("failed to read rules file"));
    }

    #[test]
    fn no_rules_file_means_default_rules() {
        assert_eq!(load_rules(None).expect("defaults"), GameRules::default());
    }
}
