//! TOML description of models and relations.
//!
//! ```toml
//! default_mode = "exists"
//!
//! [models.post]
//! table = "posts"
//! strategy = "in"
//!
//! [[models.post.relations]]
//! name = "comments"
//! kind = "has_one_or_many"
//! related = "comment"
//! parent_key = "id"
//! related_key = "post_id"
//! ```
use crate::{
    filter::StrategyMode,
    model::{ModelDef, RelationDescriptor, RelationKind, SchemaGraph},
    query::{ColumnRef, CompareOp, Conjunction, Predicate, Value, WhereClause},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("schema config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("model '{model}' declares relation '{relation}' more than once")]
    DuplicateRelation { model: String, relation: String },

    #[error("relation '{model}.{relation}' targets unknown model '{related}'")]
    UnknownRelatedModel {
        model: String,
        relation: String,
        related: String,
    },
}

///
/// SchemaConfig
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Applied to models that do not set their own `strategy`.
    #[serde(default)]
    pub default_mode: Option<StrategyMode>,

    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,
}

///
/// ModelConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub table: String,

    #[serde(default)]
    pub strategy: Option<StrategyMode>,

    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}

///
/// RelationConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelationConfig {
    pub name: String,
    pub kind: RelationKind,
    pub related: String,
    pub parent_key: String,
    pub related_key: String,

    #[serde(default)]
    pub constraints: Vec<ConstraintConfig>,
}

///
/// ConstraintConfig
/// One `column op value` relation constraint.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintConfig {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,

    #[serde(default)]
    pub conjunction: Conjunction,
}

impl ConstraintConfig {
    fn to_clause(&self) -> WhereClause {
        WhereClause::new(
            self.conjunction,
            Predicate::Compare {
                column: ColumnRef::from(self.column.as_str()),
                op: self.op,
                value: self.value.clone(),
            },
        )
    }
}

impl SchemaConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Build the in-memory graph, checking relation names and targets.
    pub fn into_graph(self) -> Result<SchemaGraph, ConfigError> {
        let known: BTreeSet<&str> = self.models.keys().map(String::as_str).collect();
        for (model, config) in &self.models {
            let mut seen = BTreeSet::new();
            for relation in &config.relations {
                if !seen.insert(relation.name.as_str()) {
                    return Err(ConfigError::DuplicateRelation {
                        model: model.clone(),
                        relation: relation.name.clone(),
                    });
                }
                if !known.contains(relation.related.as_str()) {
                    return Err(ConfigError::UnknownRelatedModel {
                        model: model.clone(),
                        relation: relation.name.clone(),
                        related: relation.related.clone(),
                    });
                }
            }
        }

        let mut graph = SchemaGraph::new();
        for (name, config) in self.models {
            let mut model = ModelDef::new(name, config.table);
            for relation in config.relations {
                let constraints = relation
                    .constraints
                    .iter()
                    .map(ConstraintConfig::to_clause)
                    .collect();
                model.insert_relation(RelationDescriptor {
                    name: relation.name,
                    kind: relation.kind,
                    related_model: relation.related,
                    parent_key: relation.parent_key,
                    related_key: relation.related_key,
                    constraints,
                });
            }

            if let Some(mode) = config.strategy.or(self.default_mode) {
                model = model.with_strategy_mode(mode);
            }

            debug!(
                "schema config: model '{}' table '{}' mode {:?}",
                model.name,
                model.table,
                model.strategy_mode()
            );
            graph.insert(model);
        }

        Ok(graph)
    }
}

impl SchemaGraph {
    pub fn from_config(config: SchemaConfig) -> Result<Self, ConfigError> {
        config.into_graph()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::from_config(SchemaConfig::from_toml_str(source)?)
    }
}
