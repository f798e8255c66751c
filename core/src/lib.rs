#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Loadout Daily engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to deterministically. The puzzle generation system
//! answers reset and advancement events with freshly generated puzzles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Loadout Daily.";

/// Rounds a value to two decimal places, half away from zero.
///
/// Applied to every target and total after full aggregation so that
/// solved-state checks compare identically rounded values.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Value object carrying one number per stat axis.
///
/// The same shape serves as additive delta, multiplicative factor, running
/// total and target. The additive identity is [`StatTriple::zero`]; the
/// multiplicative identity is [`StatTriple::identity`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatTriple {
    /// Damage axis component.
    pub damage: f64,
    /// Armor axis component.
    pub armor: f64,
    /// Stealth axis component.
    pub stealth: f64,
}

impl StatTriple {
    /// Creates a triple from explicit axis components.
    #[must_use]
    pub const fn new(damage: f64, armor: f64, stealth: f64) -> Self {
        Self {
            damage,
            armor,
            stealth,
        }
    }

    /// The additive identity `{0, 0, 0}`.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// The multiplicative identity `{1, 1, 1}`.
    #[must_use]
    pub const fn identity() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Returns the triple with [`round2`] applied per axis.
    #[must_use]
    pub fn rounded2(self) -> Self {
        Self::new(round2(self.damage), round2(self.armor), round2(self.stealth))
    }
}

/// Unique identifier assigned to an item within a generated pool.
///
/// Identifiers are 1-based, sequential in draw order, and stable for the
/// lifetime of the pool that produced them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A single equipment item presented to the player.
///
/// Created once per puzzle generation and immutable thereafter; superseded
/// wholesale when the next puzzle is installed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier unique within the pool that produced the item.
    pub id: ItemId,
    /// Display name drawn from the catalog.
    pub name: String,
    /// Identifier of the artwork associated with the item.
    pub image_ref: String,
    /// Additive stat modifiers contributed when the item is selected.
    pub add: StatTriple,
    /// Multiplicative stat modifiers contributed when the item is selected.
    pub mult: StatTriple,
}

/// Static archetype from which pool items are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    name: &'static str,
    image_ref: &'static str,
}

impl CatalogEntry {
    /// Display name of the archetype.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Artwork identifier of the archetype.
    #[must_use]
    pub const fn image_ref(&self) -> &'static str {
        self.image_ref
    }

    const fn new(name: &'static str, image_ref: &'static str) -> Self {
        Self { name, image_ref }
    }
}

/// Immutable reference list of item archetypes available to the generator.
pub const CATALOG: [CatalogEntry; 15] = [
    CatalogEntry::new("Sword", "sword.png"),
    CatalogEntry::new("Dagger", "dagger.png"),
    CatalogEntry::new("Heavy Shield", "heavy shield.png"),
    CatalogEntry::new("Leather Armor", "leather armor.png"),
    CatalogEntry::new("Cloak of Shade", "cloak of shade.png"),
    CatalogEntry::new("Warhammer", "warhammer.png"),
    CatalogEntry::new("Silent Boots", "silent boots.png"),
    CatalogEntry::new("Thorns Mail", "thorn mail.png"),
    CatalogEntry::new("Blessed Charm", "blessed charm.png"),
    CatalogEntry::new("Throwing Knives", "throwing knives.png"),
    CatalogEntry::new("Tower Shield", "tower shield.png"),
    CatalogEntry::new("Feather Cape", "feather cape.png"),
    CatalogEntry::new("Spiked Gauntlet", "spiked gauntlet.png"),
    CatalogEntry::new("Plain Ring", "plain ring.png"),
    CatalogEntry::new("Adept Band", "adept band.png"),
];

/// Difficulty tiers played in ascending order within a daily session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    /// Small pool, fixed solution size, no multipliers.
    Easy,
    /// Larger pool with occasional multipliers.
    Medium,
    /// Largest stat spread and frequent multipliers.
    Hard,
}

impl Difficulty {
    /// Tiers in the fixed order a daily session visits them.
    pub const ORDER: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Zero-based position of the tier within [`Difficulty::ORDER`].
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Resolves a tier from its zero-based index, if in range.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ORDER.get(index as usize).copied()
    }

    /// Human-readable tier name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Generation parameters bound to a single difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyConfig {
    pool_size: u32,
    solution_size_range: (u32, u32),
    stat_range: (i32, i32),
    multiplier_chance: Option<f64>,
}

impl DifficultyConfig {
    /// Creates a new configuration; validated by [`DifficultyTable::new`].
    #[must_use]
    pub const fn new(
        pool_size: u32,
        solution_size_range: (u32, u32),
        stat_range: (i32, i32),
        multiplier_chance: Option<f64>,
    ) -> Self {
        Self {
            pool_size,
            solution_size_range,
            stat_range,
            multiplier_chance,
        }
    }

    /// Number of items shown to the player.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Inclusive bounds on the hidden solution cardinality.
    #[must_use]
    pub const fn solution_size_range(&self) -> (u32, u32) {
        self.solution_size_range
    }

    /// Inclusive bounds on rolled additive components.
    #[must_use]
    pub const fn stat_range(&self) -> (i32, i32) {
        self.stat_range
    }

    /// Per-axis probability of rolling a multiplier; `None` disables them.
    #[must_use]
    pub const fn multiplier_chance(&self) -> Option<f64> {
        self.multiplier_chance
    }
}

/// Process-wide table mapping every difficulty tier to its parameters.
///
/// Construction validates each tier up front so generation can never be
/// asked to truncate a misconfigured draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyTable {
    configs: [DifficultyConfig; 3],
}

impl DifficultyTable {
    /// Creates a table from per-tier configurations, validating each one.
    pub fn new(configs: [DifficultyConfig; 3]) -> Result<Self, ConfigError> {
        for (tier, config) in Difficulty::ORDER.iter().zip(configs.iter()) {
            validate_config(*tier, config)?;
        }
        Ok(Self { configs })
    }

    /// The canonical table used by the daily session.
    ///
    /// Easy shows 6 items with a fixed 3-item solution and no multipliers;
    /// Medium and Hard show 9 items with wider solution ranges and roll
    /// multipliers at 25% and 50% per axis respectively.
    #[must_use]
    pub fn standard() -> Self {
        let configs = [
            DifficultyConfig::new(6, (3, 3), (-3, 3), None),
            DifficultyConfig::new(9, (4, 5), (-3, 3), Some(0.25)),
            DifficultyConfig::new(9, (4, 6), (-5, 5), Some(0.5)),
        ];
        Self::new(configs).expect("standard difficulty table is valid")
    }

    /// Retrieves the configuration bound to the provided tier.
    #[must_use]
    pub fn config(&self, difficulty: Difficulty) -> &DifficultyConfig {
        &self.configs[difficulty.index() as usize]
    }
}

fn validate_config(tier: Difficulty, config: &DifficultyConfig) -> Result<(), ConfigError> {
    let (solution_min, solution_max) = config.solution_size_range();
    let (stat_min, stat_max) = config.stat_range();

    if config.pool_size() as usize > CATALOG.len() {
        return Err(ConfigError::PoolExceedsCatalog {
            tier,
            pool_size: config.pool_size(),
            catalog_size: CATALOG.len() as u32,
        });
    }
    if solution_min == 0 || solution_min > solution_max {
        return Err(ConfigError::InvalidSolutionRange {
            tier,
            min: solution_min,
            max: solution_max,
        });
    }
    if solution_max > config.pool_size() {
        return Err(ConfigError::SolutionExceedsPool {
            tier,
            solution_max,
            pool_size: config.pool_size(),
        });
    }
    if stat_min > stat_max {
        return Err(ConfigError::InvalidStatRange {
            tier,
            min: stat_min,
            max: stat_max,
        });
    }
    if let Some(chance) = config.multiplier_chance() {
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::InvalidMultiplierChance { tier, chance });
        }
    }
    Ok(())
}

/// Difficulty-table invariant violations rejected at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The tier requests more pool items than the catalog holds.
    #[error("{tier:?} pool size {pool_size} exceeds catalog size {catalog_size}")]
    PoolExceedsCatalog {
        /// Tier carrying the invalid configuration.
        tier: Difficulty,
        /// Requested pool size.
        pool_size: u32,
        /// Number of archetypes available in the catalog.
        catalog_size: u32,
    },
    /// The solution-size bounds are empty or start at zero.
    #[error("{tier:?} solution size range {min}..={max} is invalid")]
    InvalidSolutionRange {
        /// Tier carrying the invalid configuration.
        tier: Difficulty,
        /// Lower bound of the range.
        min: u32,
        /// Upper bound of the range.
        max: u32,
    },
    /// The solution could require more items than the pool provides.
    #[error("{tier:?} solution size {solution_max} exceeds pool size {pool_size}")]
    SolutionExceedsPool {
        /// Tier carrying the invalid configuration.
        tier: Difficulty,
        /// Upper bound of the solution-size range.
        solution_max: u32,
        /// Requested pool size.
        pool_size: u32,
    },
    /// The additive stat bounds are reversed.
    #[error("{tier:?} stat range {min}..={max} is invalid")]
    InvalidStatRange {
        /// Tier carrying the invalid configuration.
        tier: Difficulty,
        /// Lower bound of the range.
        min: i32,
        /// Upper bound of the range.
        max: i32,
    },
    /// The multiplier chance falls outside `[0, 1]`.
    #[error("{tier:?} multiplier chance {chance} is outside [0, 1]")]
    InvalidMultiplierChance {
        /// Tier carrying the invalid configuration.
        tier: Difficulty,
        /// Configured per-axis multiplier probability.
        chance: f64,
    },
}

/// A generated puzzle: the visible pool, the target, and the solution hint.
///
/// The hidden solution subset is discarded after target computation; only
/// its cardinality survives as the player-facing hint.
#[derive(Clone, Debug, PartialEq)]
pub struct Puzzle {
    items: Vec<Item>,
    target: StatTriple,
    solution_size: u32,
    difficulty: Difficulty,
    round: u32,
}

impl Puzzle {
    /// Assembles a puzzle from its generated parts.
    #[must_use]
    pub fn new(
        items: Vec<Item>,
        target: StatTriple,
        solution_size: u32,
        difficulty: Difficulty,
        round: u32,
    ) -> Self {
        Self {
            items,
            target,
            solution_size,
            difficulty,
            round,
        }
    }

    /// Items visible to the player, ordered by ascending identifier.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Target triple the selection must reproduce exactly.
    #[must_use]
    pub const fn target(&self) -> StatTriple {
        self.target
    }

    /// Cardinality of the hidden solution, surfaced as a hint.
    #[must_use]
    pub const fn solution_size(&self) -> u32 {
        self.solution_size
    }

    /// Tier the puzzle was generated for.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Zero-based round within the tier.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }
}

/// Position within the 3-tier, 3-round daily session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgressionState {
    difficulty_index: u32,
    round: u32,
}

impl ProgressionState {
    /// The opening state: Easy, round 0.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            difficulty_index: 0,
            round: 0,
        }
    }

    /// Creates a state from explicit indices, if both lie in `[0, 2]`.
    #[must_use]
    pub fn new(difficulty_index: u32, round: u32) -> Option<Self> {
        if difficulty_index <= 2 && round <= 2 {
            Some(Self {
                difficulty_index,
                round,
            })
        } else {
            None
        }
    }

    /// Zero-based index of the active difficulty tier.
    #[must_use]
    pub const fn difficulty_index(&self) -> u32 {
        self.difficulty_index
    }

    /// Zero-based round within the active tier.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Tier corresponding to the active difficulty index.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_index(self.difficulty_index)
            .expect("difficulty index validated at construction")
    }
}

/// Uniform random source injected into every generation call.
///
/// The engine never falls back to ambient randomness; composition layers
/// construct a source once and thread it through explicitly so generation
/// stays deterministic and reproducible under test.
pub trait RandomSource {
    /// Returns the next sample uniformly distributed in `[0, 1)`.
    fn draw(&mut self) -> f64;
}

/// Deterministic seedable [`RandomSource`] built on the SplitMix64 mixer.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a source from the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl RandomSource for SplitMix64 {
    fn draw(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
        let value = self.next_u64() >> 11;
        (value as f64) * SCALE
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Restarts the daily session at Easy, round 0.
    ResetSession,
    /// Resumes a same-day session from a persisted snapshot.
    RestoreSession {
        /// Puzzle reconstructed from the snapshot.
        puzzle: Puzzle,
        /// Progression indices reconstructed from the snapshot.
        progress: ProgressionState,
    },
    /// Replaces the current puzzle with a freshly generated one.
    InstallPuzzle {
        /// Puzzle produced by the generation system.
        puzzle: Puzzle,
    },
    /// Adds an item to the player's selection.
    SelectItem {
        /// Identifier of the item to select.
        item: ItemId,
    },
    /// Removes an item from the player's selection.
    DeselectItem {
        /// Identifier of the item to deselect.
        item: ItemId,
    },
    /// Empties the player's selection.
    ClearSelection,
    /// Judges the current selection against the target.
    SubmitSelection,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The session restarted; a puzzle at the given position is needed.
    SessionReset {
        /// Tier the next puzzle must be generated for.
        difficulty: Difficulty,
        /// Zero-based round of the next puzzle.
        round: u32,
    },
    /// A puzzle became the session's current puzzle.
    PuzzleInstalled {
        /// Tier of the installed puzzle.
        difficulty: Difficulty,
        /// Zero-based round of the installed puzzle.
        round: u32,
        /// Solution-size hint surfaced to the player.
        solution_size: u32,
    },
    /// The selection changed; totals are rounded per axis.
    SelectionChanged {
        /// Aggregate stats of the selection after the change.
        totals: StatTriple,
    },
    /// A selection request was ignored.
    SelectionRejected {
        /// Identifier named by the rejected request.
        item: ItemId,
        /// Specific reason the request was ignored.
        reason: SelectionError,
    },
    /// A submission was judged against the target.
    SubmissionJudged {
        /// Whether all three rounded axes matched the target.
        solved: bool,
        /// Rounded aggregate of the submitted selection.
        totals: StatTriple,
        /// Target the selection was compared against.
        target: StatTriple,
    },
    /// A solve advanced the session; a puzzle at the new position is needed.
    RoundAdvanced {
        /// Tier the next puzzle must be generated for.
        difficulty: Difficulty,
        /// Zero-based round of the next puzzle.
        round: u32,
    },
    /// The final round of the final tier was solved; the day is complete.
    DailyCompleted,
}

/// Reasons a selection request may be ignored by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionError {
    /// The named identifier does not exist in the current pool.
    UnknownItem,
    /// No puzzle is currently installed.
    NoPuzzle,
    /// The daily session already reached its terminal state.
    SessionComplete,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(-7.0), -7.0);
    }

    #[test]
    fn stat_triple_identities() {
        assert_eq!(StatTriple::zero(), StatTriple::new(0.0, 0.0, 0.0));
        assert_eq!(StatTriple::identity(), StatTriple::new(1.0, 1.0, 1.0));
        let rounded = StatTriple::new(0.125, -0.125, 3.0).rounded2();
        assert_eq!(rounded, StatTriple::new(0.13, -0.13, 3.0));
    }

    #[test]
    fn catalog_names_are_unique() {
        for (index, entry) in CATALOG.iter().enumerate() {
            for other in &CATALOG[index + 1..] {
                assert_ne!(entry.name(), other.name());
            }
        }
    }

    #[test]
    fn difficulty_indices_round_trip() {
        for tier in Difficulty::ORDER {
            assert_eq!(Difficulty::from_index(tier.index()), Some(tier));
        }
        assert_eq!(Difficulty::from_index(3), None);
    }

    #[test]
    fn standard_table_matches_canonical_tuning() {
        let table = DifficultyTable::standard();
        assert_eq!(table.config(Difficulty::Easy).pool_size(), 6);
        assert_eq!(table.config(Difficulty::Easy).multiplier_chance(), None);
        assert_eq!(table.config(Difficulty::Medium).solution_size_range(), (4, 5));
        assert_eq!(table.config(Difficulty::Hard).stat_range(), (-5, 5));
    }

    #[test]
    fn table_rejects_pool_larger_than_catalog() {
        let configs = [
            DifficultyConfig::new(16, (3, 3), (-3, 3), None),
            DifficultyConfig::new(9, (4, 5), (-3, 3), Some(0.25)),
            DifficultyConfig::new(9, (4, 6), (-5, 5), Some(0.5)),
        ];
        assert_eq!(
            DifficultyTable::new(configs),
            Err(ConfigError::PoolExceedsCatalog {
                tier: Difficulty::Easy,
                pool_size: 16,
                catalog_size: 15,
            })
        );
    }

    #[test]
    fn table_rejects_solution_larger_than_pool() {
        let configs = [
            DifficultyConfig::new(6, (3, 3), (-3, 3), None),
            DifficultyConfig::new(9, (4, 10), (-3, 3), Some(0.25)),
            DifficultyConfig::new(9, (4, 6), (-5, 5), Some(0.5)),
        ];
        assert_eq!(
            DifficultyTable::new(configs),
            Err(ConfigError::SolutionExceedsPool {
                tier: Difficulty::Medium,
                solution_max: 10,
                pool_size: 9,
            })
        );
    }

    #[test]
    fn table_rejects_out_of_range_multiplier_chance() {
        let configs = [
            DifficultyConfig::new(6, (3, 3), (-3, 3), None),
            DifficultyConfig::new(9, (4, 5), (-3, 3), Some(0.25)),
            DifficultyConfig::new(9, (4, 6), (-5, 5), Some(1.5)),
        ];
        assert_eq!(
            DifficultyTable::new(configs),
            Err(ConfigError::InvalidMultiplierChance {
                tier: Difficulty::Hard,
                chance: 1.5,
            })
        );
    }

    #[test]
    fn progression_state_rejects_out_of_range_indices() {
        assert!(ProgressionState::new(2, 2).is_some());
        assert_eq!(ProgressionState::new(3, 0), None);
        assert_eq!(ProgressionState::new(0, 3), None);
    }

    #[test]
    fn split_mix_draws_stay_in_unit_interval() {
        let mut rng = SplitMix64::new(0x5eed);
        for _ in 0..1_000 {
            let sample = rng.draw();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn split_mix_is_deterministic_per_seed() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..64 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn item_round_trips_through_bincode() {
        let item = Item {
            id: ItemId::new(3),
            name: "Sword".to_owned(),
            image_ref: "sword.png".to_owned(),
            add: StatTriple::new(1.0, 2.0, -1.0),
            mult: StatTriple::identity(),
        };
        assert_round_trip(&item);
    }
}
