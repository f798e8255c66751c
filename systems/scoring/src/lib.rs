#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure totals aggregation and exact-match checking.
//!
//! Mirrors the generator's aggregation order exactly: additive components
//! are summed and multiplicative components multiplied across the whole
//! selection per axis, and [`round2`] is applied once to the final
//! aggregate. Solved-state checks therefore compare identically rounded
//! values on both sides.

use loadout_core::{round2, Item, ItemId, StatTriple};

/// Computes the rounded aggregate stats of the selected items.
///
/// Identifiers absent from the pool are silently skipped; the session
/// clears selections on every install, so stale identifiers are a
/// defensive tolerance rather than an expected input. An empty selection
/// aggregates to `{0, 0, 0}`.
#[must_use]
pub fn compute_totals(items: &[Item], selected: &[ItemId]) -> StatTriple {
    let mut add = StatTriple::zero();
    let mut mult = StatTriple::identity();
    for id in selected {
        let Some(item) = items.iter().find(|item| item.id == *id) else {
            continue;
        };
        add.damage += item.add.damage;
        add.armor += item.add.armor;
        add.stealth += item.add.stealth;
        mult.damage *= item.mult.damage;
        mult.armor *= item.mult.armor;
        mult.stealth *= item.mult.stealth;
    }
    StatTriple::new(
        round2(add.damage * mult.damage),
        round2(add.armor * mult.armor),
        round2(add.stealth * mult.stealth),
    )
}

/// Reports whether the selection reproduces the target on all three axes.
///
/// Targets are rounded at generation time, so exact floating-point
/// comparison of the rounded totals is well-defined.
#[must_use]
pub fn is_solved(target: &StatTriple, items: &[Item], selected: &[ItemId]) -> bool {
    let totals = compute_totals(items, selected);
    totals.damage == target.damage
        && totals.armor == target.armor
        && totals.stealth == target.stealth
}
