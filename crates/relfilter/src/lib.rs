//! Relation-existence filter compiler: turns "has at least N related rows
//! matching X" over a model's relation graph into EXISTS, IN, or COUNT
//! subquery predicates on a base query.
//!
//! ## Crate layout
//! - `config`: TOML schema description of models and relations.
//! - `error`: compile error taxonomy.
//! - `filter`: key resolution, strategy selection, and hop compilation.
//! - `model`: model definitions, relation descriptors, and the graph seam.
//! - `obs`: compile metrics and the sink boundary.
//! - `query`: the select-query builder and predicate tree.
//! - `session`: `ModelQuery`, the caller-facing builder surface.
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod obs;
pub mod query;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Domain vocabulary only; errors and metrics stay one module down.
///

pub mod prelude {
    pub use crate::{
        filter::{
            ExistenceCondition, RelationPath, Strategy, StrategyChoice, StrategyMode,
            resolve_keys, select_strategy,
        },
        model::{ModelDef, RelationDescriptor, RelationGraph, RelationKind, SchemaGraph},
        query::{ColumnRef, CompareOp, Conjunction, CountOp, Predicate, SelectQuery, Value},
        session::ModelQuery,
    };
}
