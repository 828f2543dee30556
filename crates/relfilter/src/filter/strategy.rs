use crate::query::CountOp;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// StrategyMode
///
/// Which existence form to emit when a condition reduces to plain
/// existence. One value per holder; there is no "both" state.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Correlated `EXISTS (subquery)`.
    #[default]
    #[display("exists")]
    Exists,
    /// Decorrelated `key IN (subquery)`, forcing a semi-join shape
    /// regardless of what the engine's planner would do with EXISTS.
    ///
    /// `NOT IN` is not `NOT EXISTS` once the projected key can be NULL: a
    /// single NULL `comments.post_id` makes `posts.id NOT IN (...)` match
    /// no rows at all. Keep "has none" on `Exists` for nullable keys.
    #[display("in")]
    In,
}

///
/// Strategy
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Strategy {
    #[display("count")]
    Count,
    #[display("exists")]
    Exists,
    #[display("in")]
    In,
}

impl From<StrategyMode> for Strategy {
    fn from(mode: StrategyMode) -> Self {
        match mode {
            StrategyMode::Exists => Self::Exists,
            StrategyMode::In => Self::In,
        }
    }
}

///
/// StrategyChoice
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct StrategyChoice {
    pub strategy: Strategy,
    pub negate: bool,
}

impl StrategyChoice {
    #[must_use]
    pub const fn count() -> Self {
        Self {
            strategy: Strategy::Count,
            negate: false,
        }
    }
}

/// Classify an (operator, count, mode) triple.
///
/// `>= 1` is "has any" and `< 1` is "has none"; both take the mode's form,
/// the latter negated. Any other threshold needs a real count, whatever
/// the mode says.
#[must_use]
pub fn select_strategy(op: CountOp, count: u64, mode: StrategyMode) -> StrategyChoice {
    let negate = match (op, count) {
        (CountOp::Gte, 1) => false,
        (CountOp::Lt, 1) => true,
        _ => return StrategyChoice::count(),
    };

    StrategyChoice {
        strategy: mode.into(),
        negate,
    }
}
