use crate::{
    error::CompileError,
    model::{ModelDef, RelationDescriptor},
};
use std::collections::BTreeMap;

///
/// RelationGraph
///
/// Read-only view of models and their relations. Construction policy lives
/// with the implementor; the compiler only looks things up.
///

pub trait RelationGraph {
    fn model(&self, name: &str) -> Option<&ModelDef>;

    fn require_model(&self, name: &str) -> Result<&ModelDef, CompileError> {
        self.model(name).ok_or_else(|| CompileError::UnknownModel {
            model: name.to_string(),
        })
    }

    fn relation(&self, model: &str, name: &str) -> Result<&RelationDescriptor, CompileError> {
        self.require_model(model)?
            .relation(name)
            .ok_or_else(|| CompileError::unknown_relation(model, name))
    }
}

///
/// SchemaGraph
/// In-memory graph keyed by model name.
///

#[derive(Debug, Default)]
pub struct SchemaGraph {
    models: BTreeMap<String, ModelDef>,
}

impl SchemaGraph {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: ModelDef) -> Self {
        self.insert(model);
        self
    }

    /// Insert a model, returning the one it replaced.
    pub fn insert(&mut self, model: ModelDef) -> Option<ModelDef> {
        self.models.insert(model.name.clone(), model)
    }
}

impl RelationGraph for SchemaGraph {
    fn model(&self, name: &str) -> Option<&ModelDef> {
        self.models.get(name)
    }
}
