#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic puzzle generation system.
//!
//! Generation draws a visible pool from the catalog, rolls per-item stat
//! modifiers, picks a hidden solution subset, and derives the target from
//! that subset before discarding its identities. Every random decision
//! flows through the injected [`RandomSource`], so a fixed seed replays an
//! identical puzzle. The difficulty table is validated at construction, so
//! a pool or solution draw can never exceed its candidate list.

use loadout_core::{
    round2, CatalogEntry, Command, Difficulty, DifficultyConfig, DifficultyTable, Event, Item,
    ItemId, Puzzle, RandomSource, StatTriple, CATALOG,
};

/// Pure system that answers session events with freshly generated puzzles.
#[derive(Clone, Debug)]
pub struct Generation {
    table: DifficultyTable,
}

impl Generation {
    /// Creates a generation system backed by the provided difficulty table.
    #[must_use]
    pub fn new(table: DifficultyTable) -> Self {
        Self { table }
    }

    /// Consumes session events and emits [`Command::InstallPuzzle`] for each
    /// reset or advancement.
    pub fn handle(
        &self,
        events: &[Event],
        rng: &mut dyn RandomSource,
        out_commands: &mut Vec<Command>,
    ) {
        for event in events {
            let (difficulty, round) = match event {
                Event::SessionReset { difficulty, round }
                | Event::RoundAdvanced { difficulty, round } => (*difficulty, *round),
                _ => continue,
            };
            let puzzle = generate(self.table.config(difficulty), difficulty, round, rng);
            out_commands.push(Command::InstallPuzzle { puzzle });
        }
    }

    /// Read-only access to the table the system generates from.
    #[must_use]
    pub fn table(&self) -> &DifficultyTable {
        &self.table
    }
}

/// Generates a puzzle for the provided tier and round.
///
/// The hidden solution is guaranteed to exist by construction: the target
/// is computed from an actual subset of the returned pool, and only the
/// subset's cardinality survives as the player-facing hint.
#[must_use]
pub fn generate(
    config: &DifficultyConfig,
    difficulty: Difficulty,
    round: u32,
    rng: &mut dyn RandomSource,
) -> Puzzle {
    let entries: Vec<CatalogEntry> = draw_distinct(&CATALOG, config.pool_size() as usize, rng);

    let (stat_min, stat_max) = config.stat_range();
    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mult = match config.multiplier_chance() {
            Some(chance) => StatTriple::new(
                roll_multiplier(chance, rng),
                roll_multiplier(chance, rng),
                roll_multiplier(chance, rng),
            ),
            None => StatTriple::identity(),
        };
        let add = StatTriple::new(
            f64::from(roll_inclusive(stat_min, stat_max, rng)),
            f64::from(roll_inclusive(stat_min, stat_max, rng)),
            f64::from(roll_inclusive(stat_min, stat_max, rng)),
        );
        items.push(Item {
            id: ItemId::new(index as u32 + 1),
            name: entry.name().to_owned(),
            image_ref: entry.image_ref().to_owned(),
            add,
            mult,
        });
    }

    let (solution_min, solution_max) = config.solution_size_range();
    let solution_size = roll_inclusive(solution_min as i32, solution_max as i32, rng) as u32;
    let solution = draw_distinct(&items, solution_size as usize, rng);

    let mut add = StatTriple::zero();
    let mut mult = StatTriple::identity();
    for item in &solution {
        add.damage += item.add.damage;
        add.armor += item.add.armor;
        add.stealth += item.add.stealth;
        mult.damage *= item.mult.damage;
        mult.armor *= item.mult.armor;
        mult.stealth *= item.mult.stealth;
    }
    let target = StatTriple::new(
        round2(add.damage * mult.damage),
        round2(add.armor * mult.armor),
        round2(add.stealth * mult.stealth),
    );

    Puzzle::new(items, target, solution_size, difficulty, round)
}

/// Extracts `count` distinct elements via partial random permutation.
///
/// Repeatedly draws a uniform index into the shrinking candidate list, so
/// no element can be collected twice from the same call.
fn draw_distinct<T: Clone>(candidates: &[T], count: usize, rng: &mut dyn RandomSource) -> Vec<T> {
    let mut remaining: Vec<T> = candidates.to_vec();
    let mut collected = Vec::with_capacity(count.min(remaining.len()));
    while collected.len() < count && !remaining.is_empty() {
        let index = (rng.draw() * remaining.len() as f64) as usize;
        collected.push(remaining.remove(index));
    }
    collected
}

/// Draws a uniform integer in `[min, max]` inclusive.
fn roll_inclusive(min: i32, max: i32, rng: &mut dyn RandomSource) -> i32 {
    let span = f64::from(max - min + 1);
    min + (rng.draw() * span) as i32
}

/// Rolls one multiplicative axis component: 2 or 3 with the configured
/// probability, otherwise the identity.
fn roll_multiplier(chance: f64, rng: &mut dyn RandomSource) -> f64 {
    if rng.draw() < chance {
        if rng.draw() < 0.5 {
            2.0
        } else {
            3.0
        }
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_core::SplitMix64;

    #[test]
    fn easy_puzzles_never_roll_multipliers() {
        let table = DifficultyTable::standard();
        let mut rng = SplitMix64::new(11);
        for round in 0..3 {
            let puzzle = generate(table.config(Difficulty::Easy), Difficulty::Easy, round, &mut rng);
            for item in puzzle.items() {
                assert_eq!(item.mult, StatTriple::identity());
            }
        }
    }

    #[test]
    fn rolled_multipliers_are_one_two_or_three() {
        let table = DifficultyTable::standard();
        let mut rng = SplitMix64::new(23);
        for seed_round in 0..8 {
            let puzzle = generate(
                table.config(Difficulty::Hard),
                Difficulty::Hard,
                seed_round % 3,
                &mut rng,
            );
            for item in puzzle.items() {
                for axis in [item.mult.damage, item.mult.armor, item.mult.stealth] {
                    assert!(axis == 1.0 || axis == 2.0 || axis == 3.0);
                }
            }
        }
    }

    #[test]
    fn additive_rolls_respect_the_configured_range() {
        let table = DifficultyTable::standard();
        let mut rng = SplitMix64::new(37);
        let puzzle = generate(table.config(Difficulty::Hard), Difficulty::Hard, 0, &mut rng);
        for item in puzzle.items() {
            for axis in [item.add.damage, item.add.armor, item.add.stealth] {
                assert!((-5.0..=5.0).contains(&axis));
                assert_eq!(axis, axis.trunc(), "additive rolls are whole numbers");
            }
        }
    }

    #[test]
    fn solution_size_stays_within_the_configured_range() {
        let table = DifficultyTable::standard();
        let mut rng = SplitMix64::new(41);
        for _ in 0..16 {
            let puzzle = generate(table.config(Difficulty::Medium), Difficulty::Medium, 0, &mut rng);
            assert!((4..=5).contains(&puzzle.solution_size()));
        }
    }

    #[test]
    fn handle_installs_a_puzzle_per_reset_or_advancement() {
        let generation = Generation::new(DifficultyTable::standard());
        let mut rng = SplitMix64::new(7);
        let events = [
            Event::SessionReset {
                difficulty: Difficulty::Easy,
                round: 0,
            },
            Event::SelectionChanged {
                totals: StatTriple::zero(),
            },
            Event::RoundAdvanced {
                difficulty: Difficulty::Medium,
                round: 1,
            },
        ];
        let mut commands = Vec::new();
        generation.handle(&events, &mut rng, &mut commands);

        match commands.as_slice() {
            [Command::InstallPuzzle { puzzle: first }, Command::InstallPuzzle { puzzle: second }] => {
                assert_eq!(first.difficulty(), Difficulty::Easy);
                assert_eq!(first.round(), 0);
                assert_eq!(second.difficulty(), Difficulty::Medium);
                assert_eq!(second.round(), 1);
            }
            other => panic!("expected two install commands, got {other:?}"),
        }
    }
}
