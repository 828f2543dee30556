//! Select-query builder and predicate tree.
//!
//! This layer is purely structural: no schema access and no dialect. The
//! `Display` impls produce a neutral SQL-like text for tests and logs.

mod column;
mod predicate;
mod render;
mod select;
mod target;


pub use column::{ColumnRef, TableRef};
pub use predicate::{CompareOp, Conjunction, CountOp, Predicate, Value, WhereClause};
pub use select::{Projection, SelectQuery};
pub use target::FilterTarget;
