// weft-dom/src/stats.rs
//
// Per-thread mutation counters. Tests use them to assert how much work a
// render, update or hydration pass did.

use std::cell::Cell;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationStats {
    /// Nodes constructed, cloned or parsed.
    pub created: usize,
    /// `insert_before`/`append_child` calls, including moves.
    pub inserted: usize,
    /// Nodes detached with `remove`/`remove_child`.
    pub removed: usize,
}

thread_local! {
    static STATS: Cell<MutationStats> = Cell::new(MutationStats::default());
}

pub fn snapshot() -> MutationStats {
    STATS.with(Cell::get)
}

pub fn reset() {
    STATS.with(|s| s.set(MutationStats::default()));
}

/// Counters accumulated while `f` runs.
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, MutationStats) {
    let before = snapshot();
    let out = f();
    let after = snapshot();
    (
        out,
        MutationStats {
            created: after.created - before.created,
            inserted: after.inserted - before.inserted,
            removed: after.removed - before.removed,
        },
    )
}

pub(crate) fn record(f: impl FnOnce(&mut MutationStats)) {
    STATS.with(|s| {
        let mut stats = s.get();
        f(&mut stats);
        s.set(stats);
    });
}
