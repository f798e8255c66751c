#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative daily session state.
//!
//! The session owns the current puzzle, the player's selection, and the
//! daily progression. Adapters submit [`Command`] values through [`apply`],
//! which mutates the session deterministically and broadcasts [`Event`]
//! values; the generation system answers reset and advancement events with
//! `InstallPuzzle` commands. Every `apply` call runs to completion, so
//! session state is never observed mid-mutation.

use loadout_core::{
    Command, Event, ItemId, ProgressionState, Puzzle, SelectionError, StatTriple,
};
use loadout_system_progression::{advance, Advance};
use loadout_system_scoring::{compute_totals, is_solved};

/// Represents the authoritative state of one daily session.
#[derive(Clone, Debug)]
pub struct Session {
    puzzle: Option<Puzzle>,
    selection: Vec<ItemId>,
    progress: ProgressionState,
    complete: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetSession => {
            session.puzzle = None;
            session.selection.clear();
            session.progress = ProgressionState::start();
            session.complete = false;
            out_events.push(Event::SessionReset {
                difficulty: session.progress.difficulty(),
                round: session.progress.round(),
            });
        }
        Command::RestoreSession { puzzle, progress } => {
            session.progress = progress;
            session.complete = false;
            session.install(puzzle, out_events);
        }
        Command::InstallPuzzle { puzzle } => {
            if session.complete {
                return;
            }
            session.install(puzzle, out_events);
        }
        Command::SelectItem { item } => {
            if let Some(reason) = session.selection_barrier(item) {
                out_events.push(Event::SelectionRejected { item, reason });
                return;
            }
            if session.selection.contains(&item) {
                return;
            }
            session.selection.push(item);
            out_events.push(Event::SelectionChanged {
                totals: session.totals(),
            });
        }
        Command::DeselectItem { item } => {
            let Some(position) = session.selection.iter().position(|id| *id == item) else {
                return;
            };
            let _ = session.selection.remove(position);
            out_events.push(Event::SelectionChanged {
                totals: session.totals(),
            });
        }
        Command::ClearSelection => {
            if session.complete {
                return;
            }
            session.selection.clear();
            out_events.push(Event::SelectionChanged {
                totals: session.totals(),
            });
        }
        Command::SubmitSelection => {
            if session.complete {
                return;
            }
            let Some(puzzle) = session.puzzle.as_ref() else {
                return;
            };
            let target = puzzle.target();
            let totals = compute_totals(puzzle.items(), &session.selection);
            let solved = is_solved(&target, puzzle.items(), &session.selection);
            out_events.push(Event::SubmissionJudged {
                solved,
                totals,
                target,
            });
            if !solved {
                return;
            }
            match advance(session.progress) {
                Advance::Next(next) => {
                    session.progress = next;
                    out_events.push(Event::RoundAdvanced {
                        difficulty: next.difficulty(),
                        round: next.round(),
                    });
                }
                Advance::Complete => {
                    session.puzzle = None;
                    session.selection.clear();
                    session.complete = true;
                    out_events.push(Event::DailyCompleted);
                }
            }
        }
    }
}

impl Session {
    /// Creates a new session positioned at Easy, round 0, with no puzzle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            puzzle: None,
            selection: Vec::new(),
            progress: ProgressionState::start(),
            complete: false,
        }
    }

    fn install(&mut self, puzzle: Puzzle, out_events: &mut Vec<Event>) {
        self.selection.clear();
        out_events.push(Event::PuzzleInstalled {
            difficulty: puzzle.difficulty(),
            round: puzzle.round(),
            solution_size: puzzle.solution_size(),
        });
        self.puzzle = Some(puzzle);
    }

    fn selection_barrier(&self, item: ItemId) -> Option<SelectionError> {
        if self.complete {
            return Some(SelectionError::SessionComplete);
        }
        let Some(puzzle) = self.puzzle.as_ref() else {
            return Some(SelectionError::NoPuzzle);
        };
        if puzzle.items().iter().any(|candidate| candidate.id == item) {
            None
        } else {
            Some(SelectionError::UnknownItem)
        }
    }

    fn totals(&self) -> StatTriple {
        match self.puzzle.as_ref() {
            Some(puzzle) => compute_totals(puzzle.items(), &self.selection),
            None => StatTriple::zero(),
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::Session;
    use loadout_core::{ItemId, ProgressionState, Puzzle, StatTriple};

    /// The currently installed puzzle, if any.
    #[must_use]
    pub fn puzzle(session: &Session) -> Option<&Puzzle> {
        session.puzzle.as_ref()
    }

    /// The player's selection in insertion order.
    #[must_use]
    pub fn selection(session: &Session) -> &[ItemId] {
        &session.selection
    }

    /// Rounded aggregate stats of the current selection.
    #[must_use]
    pub fn totals(session: &Session) -> StatTriple {
        session.totals()
    }

    /// Position within the daily progression.
    #[must_use]
    pub fn progress(session: &Session) -> ProgressionState {
        session.progress
    }

    /// Reports whether the daily session reached its terminal state.
    #[must_use]
    pub fn is_complete(session: &Session) -> bool {
        session.complete
    }
}
