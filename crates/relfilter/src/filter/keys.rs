use crate::{error::CompileError, model::RelationDescriptor};

///
/// JoinKeys
///
/// Column pair linking an outer row to its related rows: `outer` lives on
/// the query being filtered, `inner` on the relation subquery.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JoinKeys<'a> {
    pub outer: &'a str,
    pub inner: &'a str,
}

/// Resolve the semi-join columns for one relation.
pub fn resolve_keys(relation: &RelationDescriptor) -> Result<JoinKeys<'_>, CompileError> {
    if !relation.kind.is_supported() {
        return Err(CompileError::UnsupportedRelationKind {
            relation: relation.name.clone(),
            kind: relation.kind,
        });
    }

    // BelongsTo: referencing foreign key -> referenced owner key.
    // HasOneOrMany: parent key -> related foreign key.
    // Descriptors store both in parent/related order already.
    Ok(JoinKeys {
        outer: &relation.parent_key,
        inner: &relation.related_key,
    })
}
