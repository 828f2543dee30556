use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// CompileMetrics
/// Ephemeral, in-memory counters for existence filter compilation.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CompileMetrics {
    pub ops: CompileOps,
    pub models: BTreeMap<String, ModelCounters>,
}

///
/// CompileOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CompileOps {
    pub compile_calls: u64,
    pub failures: u64,

    // Emitted fragments, one per hop
    pub exists_fragments: u64,
    pub not_exists_fragments: u64,
    pub in_fragments: u64,
    pub not_in_fragments: u64,
    pub count_fragments: u64,

    // Failures by class
    pub invalid_input: u64,
    pub not_found: u64,
    pub unsupported: u64,
    pub conflict: u64,
}

///
/// ModelCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ModelCounters {
    pub compile_calls: u64,
    pub failures: u64,
}

thread_local! {
    static METRICS: RefCell<CompileMetrics> = RefCell::new(CompileMetrics::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&CompileMetrics) -> R) -> R {
    METRICS.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut CompileMetrics) -> R) -> R {
    METRICS.with(|m| f(&mut m.borrow_mut()))
}

/// Snapshot the current counters.
#[must_use]
pub fn report() -> CompileMetrics {
    with_state(Clone::clone)
}

/// Reset all counters (useful in tests).
pub fn reset() {
    with_state_mut(|m| *m = CompileMetrics::default());
}
