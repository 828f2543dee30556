use crate::{
    error::CompileError,
    filter::{
        CompileScope, ExistenceCondition, RelationPath, resolve_keys, select_strategy,
        compose::{Fragment, HopKeys, compose},
        condition::{Constraint, Threshold},
    },
    model::{ModelDef, RelationGraph},
    obs::sink::{self, CompileEvent},
    query::{Conjunction, FilterTarget, Predicate, SelectQuery, TableRef},
};
use log::{debug, trace};

///
/// ExistenceCompiler
///
/// Compiles existence conditions against one relation graph.
///
/// A path `a.b.c` becomes three nested subqueries: `a` and `b` test
/// "at least one", only `c` carries the caller's threshold and constraint.
/// The fragment is built bottom-up in owned subqueries and attached to the
/// target in a single step, so a failure at any hop leaves the target as
/// it was.
///

pub struct ExistenceCompiler<'g, G: RelationGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: RelationGraph + ?Sized> ExistenceCompiler<'g, G> {
    #[must_use]
    pub const fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Compile `condition` over `model` and attach the result to `target`,
    /// whose rows are read from `source`.
    pub fn compile<T: FilterTarget + ?Sized>(
        &self,
        target: &mut T,
        model: &ModelDef,
        source: &TableRef,
        condition: &ExistenceCondition<'_>,
        scope: CompileScope,
    ) -> Result<(), CompileError> {
        sink::record(CompileEvent::CompileStart { model: &model.name });

        match self.compile_hop(
            &model.name,
            source,
            &condition.path,
            0,
            condition.terminal(),
            scope,
        ) {
            Ok(fragment) => {
                fragment.attach(target, condition.conjunction);
                Ok(())
            }
            Err(err) => {
                debug!(
                    "existence filter '{}' on model '{}' failed: {}",
                    condition.path,
                    model.name,
                    err.display_with_class()
                );
                sink::record(CompileEvent::CompileFailed {
                    model: &model.name,
                    class: err.class(),
                });
                Err(err)
            }
        }
    }

    // Compile path[index..] as seen from rows of `model` read via `outer`.
    fn compile_hop(
        &self,
        model: &str,
        outer: &TableRef,
        path: &RelationPath,
        index: usize,
        terminal: Threshold<'_>,
        scope: CompileScope,
    ) -> Result<Fragment, CompileError> {
        let relation = self.graph.relation(model, &path[index])?;
        let keys = resolve_keys(relation)?;
        let related = self.graph.require_model(&relation.related_model)?;

        let source = hop_source(&related.table, outer, index);
        let keys = HopKeys {
            outer: outer.column(keys.outer),
            inner: source.column(keys.inner),
        };

        let mut query = SelectQuery::from_source(source);
        query.and_where(Predicate::Correlate {
            outer: keys.outer.clone(),
            inner: keys.inner.clone(),
        });

        let threshold = if path.is_terminal(index) {
            if let Some(constraint) = terminal.constraint {
                apply_constraint(&mut query, constraint);
            }
            terminal
        } else {
            let nested =
                self.compile_hop(&related.name, &query.from, path, index + 1, terminal, scope)?;
            nested.attach(&mut query, Conjunction::And);
            Threshold::any()
        };

        query.merge_constraints(&relation.constraints);

        let choice = select_strategy(threshold.op, threshold.count, scope.mode());
        trace!(
            "hop {index} '{}' ({}): {} {} -> {} negate={}",
            relation.name,
            relation.kind,
            threshold.op,
            threshold.count,
            choice.strategy,
            choice.negate
        );
        sink::record(CompileEvent::Fragment {
            strategy: choice.strategy,
            negate: choice.negate,
            depth: index,
        });

        Ok(compose(query, choice, keys, threshold.op, threshold.count))
    }
}

// A relation back onto the table it is nested in needs an alias, or its
// correlation predicate would compare the table with itself.
fn hop_source(table: &str, outer: &TableRef, index: usize) -> TableRef {
    if table == outer.name {
        TableRef::aliased(table, format!("{table}_hop{index}"))
    } else {
        TableRef::new(table)
    }
}

// Run the caller constraint against a scratch query over the same source
// and merge what it added, so a stray OR cannot escape the correlation.
fn apply_constraint(query: &mut SelectQuery, constraint: Constraint<'_>) {
    let mut scratch = SelectQuery::from_source(query.from.clone());
    constraint(&mut scratch);
    query.merge_constraints(&scratch.wheres);
}
