#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure daily progression transition.
//!
//! A daily session is three rounds per tier across three tiers. Successful
//! solves walk the fixed order (0,0) → (0,1) → … → (2,2) and the session
//! terminates after the final round of the final tier.

use loadout_core::ProgressionState;

const ROUNDS_PER_TIER: u32 = 3;
const TIER_COUNT: u32 = 3;

/// Outcome of advancing the progression after a successful solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The session continues at the provided position.
    Next(ProgressionState),
    /// The final round of the final tier was just solved.
    Complete,
}

/// Advances the progression by one successful solve.
#[must_use]
pub fn advance(state: ProgressionState) -> Advance {
    if state.round() + 1 < ROUNDS_PER_TIER {
        let next = ProgressionState::new(state.difficulty_index(), state.round() + 1)
            .expect("round advanced within validated bounds");
        return Advance::Next(next);
    }
    if state.difficulty_index() + 1 < TIER_COUNT {
        let next = ProgressionState::new(state.difficulty_index() + 1, 0)
            .expect("difficulty advanced within validated bounds");
        return Advance::Next(next);
    }
    Advance::Complete
}
