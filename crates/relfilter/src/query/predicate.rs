use crate::query::{ColumnRef, SelectQuery};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Predicate tree
///
/// Schema-agnostic representation of WHERE clauses. Relation subqueries
/// are ordinary `SelectQuery` values boxed into the subquery variants, so a
/// compiled multi-hop filter is a plain tree with no back references.
///

///
/// Value
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

///
/// CompareOp
/// Scalar column comparison.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum CompareOp {
    #[display("=")]
    #[serde(rename = "=")]
    Eq,
    #[display("<>")]
    #[serde(rename = "<>")]
    Ne,
    #[display("<")]
    #[serde(rename = "<")]
    Lt,
    #[display("<=")]
    #[serde(rename = "<=")]
    Lte,
    #[display(">")]
    #[serde(rename = ">")]
    Gt,
    #[display(">=")]
    #[serde(rename = ">=")]
    Gte,
}

///
/// CountOp
///
/// Threshold operator of an existence condition. Only (`>=`, 1) and
/// (`<`, 1) reduce to plain existence; everything else compiles to a count.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum CountOp {
    #[default]
    #[display(">=")]
    #[serde(rename = ">=")]
    Gte,
    #[display(">")]
    #[serde(rename = ">")]
    Gt,
    #[display("=")]
    #[serde(rename = "=")]
    Eq,
    #[display("<")]
    #[serde(rename = "<")]
    Lt,
    #[display("<=")]
    #[serde(rename = "<=")]
    Lte,
}

///
/// Conjunction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    #[default]
    #[display("AND")]
    And,
    #[display("OR")]
    Or,
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    IsNull {
        column: ColumnRef,
    },
    IsNotNull {
        column: ColumnRef,
    },

    /// Natural join predicate between a relation subquery and its outer row.
    /// Tagged so decorrelation can drop it without positional bookkeeping.
    Correlate {
        outer: ColumnRef,
        inner: ColumnRef,
    },

    Exists {
        query: Box<SelectQuery>,
        negated: bool,
    },
    InSubquery {
        column: ColumnRef,
        query: Box<SelectQuery>,
        negated: bool,
    },
    CountCompare {
        query: Box<SelectQuery>,
        op: CountOp,
        count: u64,
    },

    /// Parenthesised clause list.
    Group(Vec<WhereClause>),
}

impl Predicate {
    #[must_use]
    pub fn compare(column: impl Into<ColumnRef>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn is_null(column: impl Into<ColumnRef>) -> Self {
        Self::IsNull {
            column: column.into(),
        }
    }

    #[must_use]
    pub fn is_not_null(column: impl Into<ColumnRef>) -> Self {
        Self::IsNotNull {
            column: column.into(),
        }
    }

    #[must_use]
    pub const fn is_correlation(&self) -> bool {
        matches!(self, Self::Correlate { .. })
    }

    /// Nested subquery carried by this predicate, if any.
    #[must_use]
    pub fn subquery(&self) -> Option<&SelectQuery> {
        match self {
            Self::Exists { query, .. }
            | Self::InSubquery { query, .. }
            | Self::CountCompare { query, .. } => Some(query),
            _ => None,
        }
    }
}

///
/// WhereClause
/// One predicate and the conjunction joining it to the clause before it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhereClause {
    pub conjunction: Conjunction,
    pub predicate: Predicate,
}

impl WhereClause {
    #[must_use]
    pub const fn new(conjunction: Conjunction, predicate: Predicate) -> Self {
        Self {
            conjunction,
            predicate,
        }
    }

    #[must_use]
    pub const fn and(predicate: Predicate) -> Self {
        Self::new(Conjunction::And, predicate)
    }

    #[must_use]
    pub const fn or(predicate: Predicate) -> Self {
        Self::new(Conjunction::Or, predicate)
    }
}
