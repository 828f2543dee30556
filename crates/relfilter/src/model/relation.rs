use crate::query::WhereClause;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// RelationKind
///
/// Shape of a foreign-key relationship. Only `BelongsTo` and `HasOneOrMany`
/// compile; the rest exist so schemas can describe them and the compiler
/// can reject them by name.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    #[display("belongs_to")]
    BelongsTo,
    #[display("has_one_or_many")]
    HasOneOrMany,
    #[display("belongs_to_many")]
    BelongsToMany,
    #[display("has_many_through")]
    HasManyThrough,
    #[display("morph_to")]
    MorphTo,
    #[display("morph_one_or_many")]
    MorphOneOrMany,
}

impl RelationKind {
    /// Kinds with a single key pair, which is all the key resolver handles.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOneOrMany)
    }
}

///
/// RelationDescriptor
///
/// Immutable relation metadata owned by the relation graph.
///
/// Key columns by kind:
/// - `BelongsTo`: `parent_key` is the foreign key on the referencing table,
///   `related_key` the owner key on the referenced table.
/// - `HasOneOrMany`: `parent_key` is the local key on the parent table,
///   `related_key` the foreign key on the related table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelationDescriptor {
    pub name: String,
    pub kind: RelationKind,
    pub related_model: String,
    pub parent_key: String,
    pub related_key: String,
    pub constraints: Vec<WhereClause>,
}

impl RelationDescriptor {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: RelationKind,
        related_model: impl Into<String>,
        parent_key: impl Into<String>,
        related_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            related_model: related_model.into(),
            parent_key: parent_key.into(),
            related_key: related_key.into(),
            constraints: Vec::new(),
        }
    }

    /// `self.foreign_key` references `related.owner_key`.
    #[must_use]
    pub fn belongs_to(
        name: impl Into<String>,
        related_model: impl Into<String>,
        foreign_key: impl Into<String>,
        owner_key: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            RelationKind::BelongsTo,
            related_model,
            foreign_key,
            owner_key,
        )
    }

    /// `related.foreign_key` references `self.local_key`.
    #[must_use]
    pub fn has_many(
        name: impl Into<String>,
        related_model: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            RelationKind::HasOneOrMany,
            related_model,
            local_key,
            foreign_key,
        )
    }

    /// Relation-level constraint merged into every subquery over it.
    #[must_use]
    pub fn with_constraint(mut self, clause: WhereClause) -> Self {
        self.constraints.push(clause);
        self
    }
}
