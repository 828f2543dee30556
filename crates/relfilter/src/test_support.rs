use crate::{
    model::{ModelDef, RelationDescriptor, RelationKind, SchemaGraph},
    query::{Predicate, WhereClause},
};

/// Blog-shaped graph shared by compiler and session tests.
///
/// post -> comments -> votes, post -> author, user -> posts,
/// category -> children/parent (self relation), post -> tags (unsupported).
pub(crate) fn blog_graph() -> SchemaGraph {
    SchemaGraph::new()
        .with_model(
            ModelDef::new("post", "posts")
                .with_relation(RelationDescriptor::has_many(
                    "comments", "comment", "post_id", "id",
                ))
                .with_relation(
                    RelationDescriptor::has_many("approved_comments", "comment", "post_id", "id")
                        .with_constraint(WhereClause::and(Predicate::eq("approved", true))),
                )
                .with_relation(RelationDescriptor::belongs_to(
                    "author", "user", "author_id", "id",
                ))
                .with_relation(RelationDescriptor::new(
                    "tags",
                    RelationKind::BelongsToMany,
                    "tag",
                    "id",
                    "post_id",
                ))
                .with_relation(RelationDescriptor::has_many(
                    "orphans", "missing", "post_id", "id",
                )),
        )
        .with_model(
            ModelDef::new("comment", "comments")
                .with_relation(RelationDescriptor::has_many(
                    "votes",
                    "vote",
                    "comment_id",
                    "id",
                ))
                .with_relation(RelationDescriptor::belongs_to(
                    "post", "post", "post_id", "id",
                )),
        )
        .with_model(ModelDef::new("vote", "votes"))
        .with_model(ModelDef::new("tag", "tags"))
        .with_model(
            ModelDef::new("user", "users").with_relation(RelationDescriptor::has_many(
                "posts",
                "post",
                "author_id",
                "id",
            )),
        )
        .with_model(
            ModelDef::new("category", "categories")
                .with_relation(RelationDescriptor::has_many(
                    "children",
                    "category",
                    "parent_id",
                    "id",
                ))
                .with_relation(RelationDescriptor::belongs_to(
                    "parent",
                    "category",
                    "parent_id",
                    "id",
                )),
        )
}
