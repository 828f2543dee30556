use crate::query::{ColumnRef, Conjunction, CountOp, Predicate, SelectQuery, WhereClause};

///
/// FilterTarget
///
/// Capability contract the compiler needs from a query builder. The
/// compiler depends only on these four operations, never on builder
/// internals.
///

pub trait FilterTarget {
    /// Attach `[NOT] EXISTS (subquery)`.
    fn add_exists(&mut self, subquery: SelectQuery, conjunction: Conjunction, negate: bool);

    /// Attach `outer [NOT] IN (subquery)`.
    fn add_in(
        &mut self,
        outer: ColumnRef,
        subquery: SelectQuery,
        conjunction: Conjunction,
        negate: bool,
    );

    /// Attach `(subquery) op count`.
    fn add_count_comparison(
        &mut self,
        subquery: SelectQuery,
        op: CountOp,
        count: u64,
        conjunction: Conjunction,
    );

    /// Merge another query's constraints into this one.
    fn merge_constraints(&mut self, constraints: &[WhereClause]);
}

impl FilterTarget for SelectQuery {
    fn add_exists(&mut self, subquery: SelectQuery, conjunction: Conjunction, negate: bool) {
        self.push(WhereClause::new(
            conjunction,
            Predicate::Exists {
                query: Box::new(subquery),
                negated: negate,
            },
        ));
    }

    fn add_in(
        &mut self,
        outer: ColumnRef,
        subquery: SelectQuery,
        conjunction: Conjunction,
        negate: bool,
    ) {
        self.push(WhereClause::new(
            conjunction,
            Predicate::InSubquery {
                column: outer,
                query: Box::new(subquery),
                negated: negate,
            },
        ));
    }

    fn add_count_comparison(
        &mut self,
        subquery: SelectQuery,
        op: CountOp,
        count: u64,
        conjunction: Conjunction,
    ) {
        self.push(WhereClause::new(
            conjunction,
            Predicate::CountCompare {
                query: Box::new(subquery),
                op,
                count,
            },
        ));
    }

    // An OR inside merged constraints would escape the correlation
    // predicate, so mixed lists are merged as one AND-ed group.
    fn merge_constraints(&mut self, constraints: &[WhereClause]) {
        match constraints {
            [] => {}
            [single] => {
                self.push(WhereClause::and(single.predicate.clone()));
            }
            many if many.iter().all(|c| c.conjunction == Conjunction::And) => {
                self.wheres.extend(many.iter().cloned());
            }
            many => {
                self.push(WhereClause::and(Predicate::Group(many.to_vec())));
            }
        }
    }
}
