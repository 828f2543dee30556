use crate::{
    error::CompileError,
    filter::StrategyMode,
    model::RelationDescriptor,
    obs::sink::{self, CompileEvent},
};
use std::{collections::BTreeMap, sync::OnceLock};

///
/// ModelDef
///
/// Runtime model: backing table, outgoing relations, and the model-level
/// strategy mode. The mode is write-once so concurrent readers always see
/// a stable value.
///

#[derive(Debug, Default)]
pub struct ModelDef {
    /// Stable model name used by relation descriptors.
    pub name: String,
    /// Backing table.
    pub table: String,
    relations: BTreeMap<String, RelationDescriptor>,
    mode: OnceLock<StrategyMode>,
}

impl ModelDef {
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            relations: BTreeMap::new(),
            mode: OnceLock::new(),
        }
    }

    /// Register a relation; a later relation with the same name replaces it.
    #[must_use]
    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.insert_relation(relation);
        self
    }

    pub(crate) fn insert_relation(
        &mut self,
        relation: RelationDescriptor,
    ) -> Option<RelationDescriptor> {
        self.relations.insert(relation.name.clone(), relation)
    }

    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.get(name)
    }

    /// Fix the model-level mode while the model is still being built.
    #[must_use]
    pub fn with_strategy_mode(mut self, mode: StrategyMode) -> Self {
        self.mode = OnceLock::from(mode);
        self
    }

    /// Set the model-level mode. Allowed once per model lifetime.
    pub fn set_strategy_mode(&self, mode: StrategyMode) -> Result<(), CompileError> {
        self.mode.set(mode).map_err(|_| {
            let err = CompileError::StrategyModeLocked {
                model: self.name.clone(),
            };
            sink::record(CompileEvent::CompileFailed {
                model: &self.name,
                class: err.class(),
            });

            err
        })
    }

    #[must_use]
    pub fn strategy_mode(&self) -> Option<StrategyMode> {
        self.mode.get().copied()
    }
}
