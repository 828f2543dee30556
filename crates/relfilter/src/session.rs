use crate::{
    error::CompileError,
    filter::{CompileScope, Constraint, ExistenceCompiler, ExistenceCondition, StrategyMode},
    model::{ModelDef, RelationGraph},
    obs::sink::{self, CompileEvent},
    query::{CountOp, Predicate, SelectQuery},
};
use log::debug;


///
/// ModelQuery
///
/// Base query over one model plus the relation-existence surface.
///
/// Mode precedence for each call: the condition's own override, then the
/// override set on this query, then the model-level mode, then `Exists`.
/// The winner is snapshotted once per call and shared by every hop.
///

pub struct ModelQuery<'g, G: RelationGraph + ?Sized> {
    graph: &'g G,
    model: &'g ModelDef,
    query: SelectQuery,
    mode: Option<StrategyMode>,
}

impl<'g, G: RelationGraph + ?Sized> ModelQuery<'g, G> {
    pub fn new(graph: &'g G, model: &str) -> Result<Self, CompileError> {
        let model = graph.require_model(model)?;

        Ok(Self {
            graph,
            model,
            query: SelectQuery::new(model.table.as_str()),
            mode: None,
        })
    }

    #[must_use]
    pub const fn model(&self) -> &ModelDef {
        self.model
    }

    #[must_use]
    pub const fn query(&self) -> &SelectQuery {
        &self.query
    }

    #[must_use]
    pub fn into_query(self) -> SelectQuery {
        self.query
    }

    /// Override the mode for every later call on this query.
    pub const fn set_strategy_mode(&mut self, mode: StrategyMode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    /// Drop the query-level override and fall back to the model's mode.
    pub const fn clear_strategy_mode(&mut self) -> &mut Self {
        self.mode = None;
        self
    }

    /// Mode a call without its own override would compile with.
    #[must_use]
    pub fn current_strategy_mode(&self) -> StrategyMode {
        CompileScope::resolve(None, self.mode, self.model.strategy_mode()).mode()
    }

    ///
    /// EXISTENCE FILTERS
    ///

    /// Compile `condition` and merge it into the base query.
    /// On error the base query is unchanged.
    pub fn existence_filter(
        &mut self,
        condition: &ExistenceCondition<'_>,
    ) -> Result<&mut Self, CompileError> {
        let scope = CompileScope::resolve(condition.mode, self.mode, self.model.strategy_mode());
        let source = self.query.from.clone();

        ExistenceCompiler::new(self.graph).compile(
            &mut self.query,
            self.model,
            &source,
            condition,
            scope,
        )?;

        Ok(self)
    }

    pub fn has(
        &mut self,
        relation: &str,
        op: CountOp,
        count: u64,
    ) -> Result<&mut Self, CompileError> {
        self.existence_filter(&self.condition(relation)?.threshold(op, count))
    }

    pub fn or_has(
        &mut self,
        relation: &str,
        op: CountOp,
        count: u64,
    ) -> Result<&mut Self, CompileError> {
        self.existence_filter(&self.condition(relation)?.threshold(op, count).or())
    }

    pub fn doesnt_have(&mut self, relation: &str) -> Result<&mut Self, CompileError> {
        self.existence_filter(&self.condition(relation)?.threshold(CountOp::Lt, 1))
    }

    pub fn or_doesnt_have(&mut self, relation: &str) -> Result<&mut Self, CompileError> {
        self.existence_filter(
            &self
                .condition(relation)?
                .threshold(CountOp::Lt, 1)
                .or(),
        )
    }

    pub fn where_has(
        &mut self,
        relation: &str,
        constraint: impl Fn(&mut SelectQuery),
    ) -> Result<&mut Self, CompileError> {
        self.existence_filter(&self.condition(relation)?.constrain(&constraint))
    }

    pub fn or_where_has(
        &mut self,
        relation: &str,
        constraint: impl Fn(&mut SelectQuery),
    ) -> Result<&mut Self, CompileError> {
        self.existence_filter(&self.condition(relation)?.constrain(&constraint).or())
    }

    pub fn where_doesnt_have(
        &mut self,
        relation: &str,
        constraint: impl Fn(&mut SelectQuery),
    ) -> Result<&mut Self, CompileError> {
        self.existence_filter(
            &self
                .condition(relation)?
                .threshold(CountOp::Lt, 1)
                .constrain(&constraint),
        )
    }

    /// `where_has` forced into the IN form for this call only.
    pub fn where_has_in(
        &mut self,
        relation: &str,
        constraint: Option<Constraint<'_>>,
        op: CountOp,
        count: u64,
    ) -> Result<&mut Self, CompileError> {
        let mut condition = self
            .condition(relation)?
            .threshold(op, count)
            .mode(StrategyMode::In);
        condition.constraint = constraint;

        self.existence_filter(&condition)
    }

    /// "has none" in the NOT IN form for this call only.
    pub fn where_has_not_in(
        &mut self,
        relation: &str,
        constraint: Option<Constraint<'_>>,
    ) -> Result<&mut Self, CompileError> {
        self.where_has_in(relation, constraint, CountOp::Lt, 1)
    }

    // Parse `relation` into a default condition. A malformed path never
    // reaches the compiler, so its failure is recorded here instead.
    fn condition<'a>(&self, relation: &str) -> Result<ExistenceCondition<'a>, CompileError> {
        ExistenceCondition::new(relation).inspect_err(|err| {
            debug!(
                "existence filter '{relation}' on model '{}' failed: {}",
                self.model.name,
                err.display_with_class()
            );
            sink::record(CompileEvent::CompileStart {
                model: &self.model.name,
            });
            sink::record(CompileEvent::CompileFailed {
                model: &self.model.name,
                class: err.class(),
            });
        })
    }

    ///
    /// PLAIN FILTERS
    ///

    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.query.and_where(predicate);
        self
    }

    pub fn or_filter(&mut self, predicate: Predicate) -> &mut Self {
        self.query.or_where(predicate);
        self
    }
}
