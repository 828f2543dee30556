use crate::{
    error::CompileError,
    filter::StrategyMode,
    query::{Conjunction, CountOp, SelectQuery},
};
use derive_more::{Deref, IntoIterator};
use std::fmt;

///
/// Constraint
/// Caller callback that adds predicates to the terminal hop's subquery.
///

pub type Constraint<'a> = &'a dyn Fn(&mut SelectQuery);

///
/// RelationPath
///
/// Dotted relation path split into segments. Never empty, and no segment
/// is empty; compilation walks it by index and never mutates it.
///

#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
pub struct RelationPath(Vec<String>);

impl RelationPath {
    pub fn parse(path: &str) -> Result<Self, CompileError> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if path.is_empty() || segments.iter().any(String::is_empty) {
            return Err(CompileError::invalid_path(path));
        }

        Ok(Self(segments))
    }

    pub fn from_segments<I, S>(segments: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(CompileError::invalid_path(segments.join(".")));
        }

        Ok(Self(segments))
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    #[must_use]
    pub fn is_terminal(&self, index: usize) -> bool {
        index == self.last_index()
    }
}

impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

///
/// Threshold
///
/// Operator, count, and optional constraint applied at one hop. Only the
/// terminal hop carries the caller's; every other hop uses `any()`.
///

#[derive(Clone, Copy)]
pub(crate) struct Threshold<'a> {
    pub(crate) op: CountOp,
    pub(crate) count: u64,
    pub(crate) constraint: Option<Constraint<'a>>,
}

impl Threshold<'_> {
    pub(crate) const fn any() -> Self {
        Self {
            op: CountOp::Gte,
            count: 1,
            constraint: None,
        }
    }
}

///
/// ExistenceCondition
///
/// "has `op count` related rows along `path` matching `constraint`".
/// Built per call and borrowed by the compiler; nothing here outlives it.
///

#[derive(Clone)]
pub struct ExistenceCondition<'a> {
    pub path: RelationPath,
    pub op: CountOp,
    pub count: u64,
    pub constraint: Option<Constraint<'a>>,
    pub conjunction: Conjunction,

    /// Per-call mode override; wins over builder and model modes.
    pub mode: Option<StrategyMode>,
}

impl<'a> ExistenceCondition<'a> {
    /// "has at least one" along `path`, joined with AND.
    pub fn new(path: &str) -> Result<Self, CompileError> {
        Ok(Self::from_path(RelationPath::parse(path)?))
    }

    #[must_use]
    pub const fn from_path(path: RelationPath) -> Self {
        Self {
            path,
            op: CountOp::Gte,
            count: 1,
            constraint: None,
            conjunction: Conjunction::And,
            mode: None,
        }
    }

    /// "has none" along `path`.
    pub fn none(path: &str) -> Result<Self, CompileError> {
        Ok(Self::new(path)?.threshold(CountOp::Lt, 1))
    }

    #[must_use]
    pub const fn threshold(mut self, op: CountOp, count: u64) -> Self {
        self.op = op;
        self.count = count;
        self
    }

    #[must_use]
    pub const fn constrain(mut self, constraint: Constraint<'a>) -> Self {
        self.constraint = Some(constraint);
        self
    }

    #[must_use]
    pub const fn conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    #[must_use]
    pub const fn or(self) -> Self {
        self.conjunction(Conjunction::Or)
    }

    #[must_use]
    pub const fn mode(mut self, mode: StrategyMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub(crate) const fn terminal(&self) -> Threshold<'a> {
        Threshold {
            op: self.op,
            count: self.count,
            constraint: self.constraint,
        }
    }
}

impl fmt::Debug for ExistenceCondition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExistenceCondition")
            .field("path", &self.path)
            .field("op", &self.op)
            .field("count", &self.count)
            .field("constraint", &self.constraint.is_some())
            .field("conjunction", &self.conjunction)
            .field("mode", &self.mode)
            .finish()
    }
}
