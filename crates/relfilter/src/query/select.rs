use crate::query::{ColumnRef, Conjunction, Predicate, TableRef, WhereClause};

///
/// Projection
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<ColumnRef>),
    CountAll,
}

///
/// SelectQuery
///
/// Single-source select with an ordered WHERE clause list.
///
/// Existence filters only ever append to `wheres`; they never touch the
/// source or projection of the query they are attached to.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectQuery {
    pub from: TableRef,
    pub projection: Projection,
    pub wheres: Vec<WhereClause>,
}

impl SelectQuery {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self::from_source(TableRef::new(table))
    }

    #[must_use]
    pub const fn from_source(from: TableRef) -> Self {
        Self {
            from,
            projection: Projection::All,
            wheres: Vec::new(),
        }
    }

    /// Add a predicate joined with AND.
    pub fn and_where(&mut self, predicate: Predicate) -> &mut Self {
        self.push(WhereClause::and(predicate))
    }

    /// Add a predicate joined with OR.
    pub fn or_where(&mut self, predicate: Predicate) -> &mut Self {
        self.push(WhereClause::or(predicate))
    }

    pub fn push(&mut self, clause: WhereClause) -> &mut Self {
        self.wheres.push(clause);
        self
    }

    /// Builder-style AND filter.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.and_where(predicate);
        self
    }

    pub fn select(&mut self, columns: Vec<ColumnRef>) -> &mut Self {
        self.projection = Projection::Columns(columns);
        self
    }

    pub fn select_count(&mut self) -> &mut Self {
        self.projection = Projection::CountAll;
        self
    }

    /// Drop every top-level correlation predicate; returns how many went.
    pub fn strip_correlation(&mut self) -> usize {
        let before = self.wheres.len();
        self.wheres.retain(|clause| !clause.predicate.is_correlation());

        // the first remaining clause no longer follows anything
        if let Some(first) = self.wheres.first_mut() {
            first.conjunction = Conjunction::And;
        }

        before - self.wheres.len()
    }

    #[must_use]
    pub fn is_correlated(&self) -> bool {
        self.wheres
            .iter()
            .any(|clause| clause.predicate.is_correlation())
    }

    /// Number of nested relation subqueries along the first chain.
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        self.wheres
            .iter()
            .find_map(|clause| clause.predicate.subquery())
            .map_or(0, |sub| 1 + sub.nesting_depth())
    }
}
