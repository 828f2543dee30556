use crate::{
    filter::{Strategy, StrategyChoice},
    query::{ColumnRef, Conjunction, CountOp, FilterTarget, SelectQuery},
};

///
/// Fragment
///
/// One compiled hop, ready to attach to whatever query encloses it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Fragment {
    Exists {
        query: SelectQuery,
        negate: bool,
    },
    In {
        outer: ColumnRef,
        query: SelectQuery,
        negate: bool,
    },
    Count {
        query: SelectQuery,
        op: CountOp,
        count: u64,
    },
}

impl Fragment {
    pub(crate) fn attach<T: FilterTarget + ?Sized>(self, target: &mut T, conjunction: Conjunction) {
        match self {
            Self::Exists { query, negate } => target.add_exists(query, conjunction, negate),
            Self::In {
                outer,
                query,
                negate,
            } => target.add_in(outer, query, conjunction, negate),
            Self::Count { query, op, count } => {
                target.add_count_comparison(query, op, count, conjunction);
            }
        }
    }
}

///
/// HopKeys
/// Qualified key columns of one hop.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HopKeys {
    pub(crate) outer: ColumnRef,
    pub(crate) inner: ColumnRef,
}

/// Shape a fully constrained hop subquery into the chosen strategy.
///
/// The subquery arrives correlated. EXISTS and COUNT keep that; IN drops
/// it and projects the inner key instead.
pub(crate) fn compose(
    mut query: SelectQuery,
    choice: StrategyChoice,
    keys: HopKeys,
    op: CountOp,
    count: u64,
) -> Fragment {
    match choice.strategy {
        Strategy::Exists => Fragment::Exists {
            query,
            negate: choice.negate,
        },
        Strategy::In => {
            query.strip_correlation();
            query.select(vec![keys.inner]);

            Fragment::In {
                outer: keys.outer,
                query,
                negate: choice.negate,
            }
        }
        Strategy::Count => {
            query.select_count();

            Fragment::Count { query, op, count }
        }
    }
}
