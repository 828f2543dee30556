use crate::model::RelationKind;
use std::fmt;
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Every failure is fatal to the current compilation and leaves the base
/// query untouched. Nothing here is retryable: the compiler performs no I/O,
/// so each variant reflects a schema or caller mistake.
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    #[error("invalid relation path '{path}': path and every segment must be non-empty")]
    InvalidPath { path: String },

    #[error("unknown model '{model}'")]
    UnknownModel { model: String },

    #[error("unknown relation '{relation}' on model '{model}'")]
    UnknownRelation { model: String, relation: String },

    #[error("relation '{relation}' has unsupported kind '{kind}' for existence filtering")]
    UnsupportedRelationKind { relation: String, kind: RelationKind },

    #[error("strategy mode for model '{model}' is already set")]
    StrategyModeLocked { model: String },
}

impl CompileError {
    pub(crate) fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    pub(crate) fn unknown_relation(model: impl Into<String>, relation: impl Into<String>) -> Self {
        Self::UnknownRelation {
            model: model.into(),
            relation: relation.into(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidPath { .. } => ErrorClass::InvalidInput,
            Self::UnknownModel { .. } | Self::UnknownRelation { .. } => ErrorClass::NotFound,
            Self::UnsupportedRelationKind { .. } => ErrorClass::Unsupported,
            Self::StrategyModeLocked { .. } => ErrorClass::Conflict,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Coarse classification used by metrics and diagnostics.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidInput,
    NotFound,
    Unsupported,
    Conflict,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::Conflict => "conflict",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_labels_are_snake_case() {
        let err = CompileError::unknown_relation("post", "ghost");

        assert_eq!(err.class(), ErrorClass::NotFound);
        assert_eq!(
            err.display_with_class(),
            "not_found: unknown relation 'ghost' on model 'post'"
        );
    }

    #[test]
    fn unsupported_kind_renders_kind_name() {
        let err = CompileError::UnsupportedRelationKind {
            relation: "tags".to_string(),
            kind: RelationKind::BelongsToMany,
        };

        assert_eq!(err.class(), ErrorClass::Unsupported);
        assert_eq!(
            err.to_string(),
            "relation 'tags' has unsupported kind 'belongs_to_many' for existence filtering"
        );
    }
}
