//! Existence filter compilation.
//!
//! Leaves first: `keys` resolves join columns, `strategy` classifies a
//! threshold, `scope` pins the mode for one call, `condition` parses the
//! path, `compose` shapes one hop, and `compile` walks the path.

mod compile;
mod compose;
mod condition;
mod keys;
mod scope;
mod strategy;

#[cfg(test)]
mod tests;

pub use compile::ExistenceCompiler;
pub use condition::{Constraint, ExistenceCondition, RelationPath};
pub use keys::{JoinKeys, resolve_keys};
pub use scope::CompileScope;
pub use strategy::{Strategy, StrategyChoice, StrategyMode, select_strategy};
