#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal adapter that boots and drives the Loadout Daily experience.
//!
//! The binary is the composition layer: it parses options, constructs the
//! random source once, wires the session, generation system, and snapshot
//! store through the [`runner::Runner`], and renders events as plain text.
//! The engine crates below it never print and never reach for ambient
//! randomness.

mod commands;
mod runner;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{parse, PlayerCommand};
use loadout_core::{
    Command, DifficultyTable, Event, Puzzle, RandomSource, SelectionError, SplitMix64,
    StatTriple, WELCOME_BANNER,
};
use loadout_persistence::{today_utc, SnapshotStore};
use loadout_session::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use runner::Runner;

/// Daily loadout puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(name = "loadout-daily")]
struct Options {
    /// Seed for a reproducible run; defaults to OS entropy.
    #[arg(long)]
    seed: Option<u64>,
    /// Path of the daily snapshot file.
    #[arg(long, default_value = "loadout-daily.json")]
    storage: PathBuf,
    /// Discard any stored snapshot and start the day over.
    #[arg(long)]
    fresh: bool,
}

/// Uniform source backed by the `rand` ecosystem for unseeded runs.
struct EntropySource {
    rng: ChaCha8Rng,
}

impl RandomSource for EntropySource {
    fn draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

fn build_rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SplitMix64::new(seed)),
        None => Box::new(EntropySource {
            rng: ChaCha8Rng::from_entropy(),
        }),
    }
}

/// Entry point for the Loadout Daily command-line interface.
fn main() -> Result<()> {
    let options = Options::parse();
    let mut rng = build_rng(options.seed);
    let store = SnapshotStore::new(&options.storage);
    let (mut runner, boot_events) = Runner::boot(
        DifficultyTable::standard(),
        store,
        today_utc(),
        options.fresh,
        rng.as_mut(),
    );

    println!("{WELCOME_BANNER}");
    println!("Type `help` for the command reference.");
    render_events(&runner, &boot_events);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let player = match parse(&line) {
            Ok(player) => player,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        let command = match player {
            PlayerCommand::Pick(item) => Command::SelectItem { item },
            PlayerCommand::Drop(item) => Command::DeselectItem { item },
            PlayerCommand::Clear => Command::ClearSelection,
            PlayerCommand::Submit => Command::SubmitSelection,
            PlayerCommand::Show => {
                render_board(&runner);
                continue;
            }
            PlayerCommand::Help => {
                print_help();
                continue;
            }
            PlayerCommand::Quit => break,
        };

        let events = runner.dispatch(command, rng.as_mut());
        render_events(&runner, &events);
    }

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  pick <n>   add item n to your loadout");
    println!("  drop <n>   remove item n from your loadout");
    println!("  clear      empty your loadout");
    println!("  submit     judge your loadout against the target");
    println!("  show       redraw the current puzzle");
    println!("  quit       leave; same-day progress is saved");
}

fn render_events(runner: &Runner, events: &[Event]) {
    for event in events {
        match event {
            Event::PuzzleInstalled { .. } => render_board(runner),
            Event::SelectionChanged { totals } => {
                println!("totals: {}", fmt_triple(*totals));
            }
            Event::SelectionRejected { item, reason } => match reason {
                SelectionError::UnknownItem => {
                    println!("no item {} in this pool", item.get());
                }
                SelectionError::NoPuzzle => println!("no puzzle in play"),
                SelectionError::SessionComplete => {
                    println!("the daily session is already complete");
                }
            },
            Event::SubmissionJudged { solved, totals, .. } => {
                if *solved {
                    println!("correct! advancing...");
                } else {
                    println!(
                        "not solved: totals {} miss the target",
                        fmt_triple(*totals)
                    );
                }
            }
            Event::DailyCompleted => {
                println!("daily complete! come back tomorrow.");
            }
            Event::SessionReset { .. } | Event::RoundAdvanced { .. } => {}
        }
    }
}

fn render_board(runner: &Runner) {
    let session = runner.session();
    let Some(puzzle) = query::puzzle(session) else {
        println!("no puzzle in play");
        return;
    };

    println!();
    println!(
        "{} - round {}/3",
        puzzle.difficulty().name(),
        puzzle.round() + 1
    );
    println!(
        "target: {}   (items in solution: {})",
        fmt_triple(puzzle.target()),
        puzzle.solution_size()
    );
    render_items(puzzle);

    let selection = query::selection(session);
    if selection.is_empty() {
        println!("loadout: empty");
    } else {
        let picked: Vec<String> = selection.iter().map(|id| id.get().to_string()).collect();
        println!(
            "loadout: [{}]  totals: {}",
            picked.join(", "),
            fmt_triple(query::totals(session))
        );
    }
}

fn render_items(puzzle: &Puzzle) {
    for item in puzzle.items() {
        println!(
            "  {:>2}. {:<16} dmg {:<7} arm {:<7} stl {:<7}",
            item.id.get(),
            item.name,
            fmt_modifier(item.add.damage, item.mult.damage),
            fmt_modifier(item.add.armor, item.mult.armor),
            fmt_modifier(item.add.stealth, item.mult.stealth),
        );
    }
}

/// Formats one axis as `+n` / `-n`, with ` x2` / ` x3` appended when the
/// multiplicative component is not the identity.
fn fmt_modifier(add: f64, mult: f64) -> String {
    let base = fmt_signed(add);
    if mult == 1.0 {
        base
    } else {
        format!("{base} x{}", fmt_plain(mult))
    }
}

fn fmt_triple(triple: StatTriple) -> String {
    format!(
        "dmg {} / arm {} / stl {}",
        fmt_plain(triple.damage),
        fmt_plain(triple.armor),
        fmt_plain(triple.stealth)
    )
}

fn fmt_plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

fn fmt_signed(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:+}", value as i64)
    } else {
        format!("{value:+.2}")
    }
}
