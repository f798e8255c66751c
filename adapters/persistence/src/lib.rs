#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Durable snapshot gateway for the daily session.
//!
//! One JSON record per day under one well-known path, overwritten wholesale
//! on every save. `load` fails soft by contract: a missing, unreadable, or
//! malformed snapshot is indistinguishable from an absent one, so corrupt
//! state can never interrupt gameplay — the caller simply generates afresh.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use loadout_core::{Difficulty, Item, ProgressionState, Puzzle, StatTriple};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day-stamp format shared by snapshots and the boot comparison.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Today's calendar day in the fixed reference time zone (UTC).
///
/// Pinning the zone keeps the day boundary deterministic regardless of the
/// player's local clock settings.
#[must_use]
pub fn today_utc() -> String {
    Utc::now().format(DAY_FORMAT).to_string()
}

/// Serialized record of one day's in-progress session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Visible item pool of the current puzzle.
    pub items: Vec<Item>,
    /// Target the selection must reproduce.
    pub target: StatTriple,
    /// Zero-based index of the active difficulty tier.
    pub difficulty_index: u32,
    /// Zero-based round within the active tier.
    pub round: u32,
    /// Solution-size hint surfaced to the player.
    pub solution_count: u32,
    /// Calendar day the snapshot belongs to, formatted `%Y-%m-%d` (UTC).
    pub date: String,
}

impl DailySnapshot {
    /// Captures the current puzzle and progression for the given day.
    #[must_use]
    pub fn capture(puzzle: &Puzzle, progress: ProgressionState, date: impl Into<String>) -> Self {
        Self {
            items: puzzle.items().to_vec(),
            target: puzzle.target(),
            difficulty_index: progress.difficulty_index(),
            round: progress.round(),
            solution_count: puzzle.solution_size(),
            date: date.into(),
        }
    }

    /// Rebuilds the puzzle and progression, if the snapshot is for `today`
    /// and structurally valid.
    ///
    /// A day mismatch is the new-day event: the caller clears the store and
    /// starts a fresh session instead of resuming. Out-of-range indices mark
    /// the snapshot as corrupt and are likewise treated as absent.
    #[must_use]
    pub fn resume(self, today: &str) -> Option<(Puzzle, ProgressionState)> {
        if self.date != today {
            return None;
        }
        let progress = ProgressionState::new(self.difficulty_index, self.round)?;
        let difficulty = Difficulty::from_index(self.difficulty_index)?;
        let puzzle = Puzzle::new(
            self.items,
            self.target,
            self.solution_count,
            difficulty,
            self.round,
        );
        Some((puzzle, progress))
    }
}

/// Errors that can occur while writing a snapshot.
///
/// Reads never error; see [`SnapshotStore::load`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be written.
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store holding at most one snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store backed by the provided file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the snapshot, overwriting any prior record wholesale.
    pub fn save(&self, snapshot: &DailySnapshot) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// Reads back the stored snapshot.
    ///
    /// Documented fail-soft contract: a missing file, an unreadable file,
    /// and malformed JSON all yield `None`.
    #[must_use]
    pub fn load(&self) -> Option<DailySnapshot> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Removes the stored snapshot; a missing file is not an error.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_core::ItemId;

    fn sample_puzzle() -> Puzzle {
        let items = vec![Item {
            id: ItemId::new(1),
            name: "Sword".to_owned(),
            image_ref: "sword.png".to_owned(),
            add: StatTriple::new(2.0, -1.0, 0.0),
            mult: StatTriple::identity(),
        }];
        Puzzle::new(items, StatTriple::new(2.0, -1.0, 0.0), 1, Difficulty::Easy, 0)
    }

    #[test]
    fn capture_then_resume_restores_the_position() {
        let puzzle = sample_puzzle();
        let progress = ProgressionState::start();
        let snapshot = DailySnapshot::capture(&puzzle, progress, "2026-08-29");

        let (restored, restored_progress) = snapshot
            .resume("2026-08-29")
            .expect("same-day snapshot resumes");
        assert_eq!(restored, puzzle);
        assert_eq!(restored_progress, progress);
    }

    #[test]
    fn stale_day_does_not_resume() {
        let snapshot =
            DailySnapshot::capture(&sample_puzzle(), ProgressionState::start(), "2026-08-28");
        assert_eq!(snapshot.resume("2026-08-29"), None);
    }

    #[test]
    fn out_of_range_indices_mark_the_snapshot_corrupt() {
        let mut snapshot =
            DailySnapshot::capture(&sample_puzzle(), ProgressionState::start(), "2026-08-29");
        snapshot.difficulty_index = 7;
        assert_eq!(snapshot.resume("2026-08-29"), None);
    }

    #[test]
    fn today_utc_matches_the_day_format() {
        let today = today_utc();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'-');
        assert_eq!(today.as_bytes()[7], b'-');
    }
}
