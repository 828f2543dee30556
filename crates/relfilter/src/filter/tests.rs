use crate::{
    error::CompileError,
    filter::{
        CompileScope, ExistenceCompiler, ExistenceCondition, JoinKeys, RelationPath,
        Strategy as FilterStrategy, StrategyChoice, StrategyMode, resolve_keys, select_strategy,
    },
    model::{RelationDescriptor, RelationGraph, RelationKind},
    query::{CountOp, Predicate, SelectQuery},
    test_support::blog_graph,
};
use proptest::prelude::*;

///
/// HELPERS
///

fn compile_on(
    model: &str,
    condition: &ExistenceCondition<'_>,
    mode: StrategyMode,
) -> (SelectQuery, Result<(), CompileError>) {
    let graph = blog_graph();
    let model = graph.require_model(model).unwrap();
    let mut base = SelectQuery::new(model.table.as_str());
    let source = base.from.clone();

    let result = ExistenceCompiler::new(&graph).compile(
        &mut base,
        model,
        &source,
        condition,
        CompileScope::new(mode),
    );

    (base, result)
}

fn compile_post(path: &str, op: CountOp, count: u64, mode: StrategyMode) -> SelectQuery {
    let condition = ExistenceCondition::new(path).unwrap().threshold(op, count);
    let (base, result) = compile_on("post", &condition, mode);
    result.unwrap();

    base
}

// Strategy label of every hop along the first subquery chain, outermost first.
fn hop_labels(query: &SelectQuery) -> Vec<&'static str> {
    let mut labels = Vec::new();
    let mut current = query;

    while let Some(predicate) = current
        .wheres
        .iter()
        .map(|clause| &clause.predicate)
        .find(|predicate| predicate.subquery().is_some())
    {
        labels.push(match predicate {
            Predicate::Exists { negated: false, .. } => "exists",
            Predicate::Exists { negated: true, .. } => "not_exists",
            Predicate::InSubquery { negated: false, .. } => "in",
            Predicate::InSubquery { negated: true, .. } => "not_in",
            Predicate::CountCompare { .. } => "count",
            _ => unreachable!("subquery() only matches subquery predicates"),
        });
        current = predicate.subquery().unwrap();
    }

    labels
}

const fn mode_label(mode: StrategyMode) -> &'static str {
    match mode {
        StrategyMode::Exists => "exists",
        StrategyMode::In => "in",
    }
}

///
/// STRATEGY SELECTOR
///

#[test]
fn at_least_one_follows_mode() {
    assert_eq!(
        select_strategy(CountOp::Gte, 1, StrategyMode::Exists),
        StrategyChoice {
            strategy: FilterStrategy::Exists,
            negate: false,
        }
    );
    assert_eq!(
        select_strategy(CountOp::Gte, 1, StrategyMode::In),
        StrategyChoice {
            strategy: FilterStrategy::In,
            negate: false,
        }
    );
}

#[test]
fn less_than_one_is_negated_existence() {
    for mode in [StrategyMode::Exists, StrategyMode::In] {
        let choice = select_strategy(CountOp::Lt, 1, mode);

        assert_eq!(choice.strategy, FilterStrategy::from(mode));
        assert!(choice.negate);
    }
}

#[test]
fn other_thresholds_fall_back_to_count() {
    for (op, count) in [
        (CountOp::Gte, 2),
        (CountOp::Eq, 3),
        (CountOp::Gt, 0),
        (CountOp::Lte, 0),
        (CountOp::Eq, 0),
        (CountOp::Lt, 2),
        (CountOp::Gte, 0),
    ] {
        for mode in [StrategyMode::Exists, StrategyMode::In] {
            assert_eq!(
                select_strategy(op, count, mode),
                StrategyChoice::count(),
                "{op} {count} in {mode} mode"
            );
        }
    }
}

///
/// KEY RESOLVER
///

#[test]
fn belongs_to_keys_are_foreign_then_owner() {
    let rel = RelationDescriptor::belongs_to("author", "user", "author_id", "id");

    assert_eq!(
        resolve_keys(&rel).unwrap(),
        JoinKeys {
            outer: "author_id",
            inner: "id",
        }
    );
}

#[test]
fn has_one_or_many_keys_are_parent_then_foreign() {
    let rel = RelationDescriptor::has_many("comments", "comment", "post_id", "id");

    assert_eq!(
        resolve_keys(&rel).unwrap(),
        JoinKeys {
            outer: "id",
            inner: "post_id",
        }
    );
}

#[test]
fn other_kinds_are_unsupported() {
    for kind in [
        RelationKind::BelongsToMany,
        RelationKind::HasManyThrough,
        RelationKind::MorphTo,
        RelationKind::MorphOneOrMany,
    ] {
        let rel = RelationDescriptor::new("rel", kind, "other", "id", "rel_id");
        let err = resolve_keys(&rel).unwrap_err();

        assert!(
            matches!(err, CompileError::UnsupportedRelationKind { kind: k, .. } if k == kind),
            "{kind}"
        );
    }
}

///
/// CONDITION PARSER
///

#[test]
fn dotted_path_splits_into_segments() {
    let path = RelationPath::parse("posts.comments.votes").unwrap();

    assert_eq!(path.len(), 3);
    assert_eq!(path[0], "posts");
    assert_eq!(path.last_index(), 2);
    assert!(path.is_terminal(2));
    assert!(!path.is_terminal(1));
    assert_eq!(path.to_string(), "posts.comments.votes");
}

#[test]
fn empty_paths_and_segments_are_invalid() {
    for path in ["", ".", "a..b", ".a", "a."] {
        let err = RelationPath::parse(path).unwrap_err();

        assert!(
            matches!(err, CompileError::InvalidPath { path: ref p } if p == path),
            "{path:?}"
        );
    }

    assert!(RelationPath::from_segments(Vec::<String>::new()).is_err());
    assert!(RelationPath::from_segments(["a", ""]).is_err());
    assert_eq!(
        RelationPath::from_segments(["a", "b"]).unwrap(),
        RelationPath::parse("a.b").unwrap()
    );
}

#[test]
fn condition_defaults_to_has_any_with_and() {
    let condition = ExistenceCondition::new("comments").unwrap();

    assert_eq!(condition.op, CountOp::Gte);
    assert_eq!(condition.count, 1);
    assert!(condition.constraint.is_none());
    assert!(condition.mode.is_none());

    let none = ExistenceCondition::none("comments").unwrap();
    assert_eq!((none.op, none.count), (CountOp::Lt, 1));
}

///
/// COMPOSITION
///

#[test]
fn has_many_in_scenario_renders_semi_join() {
    let approved = |q: &mut SelectQuery| {
        q.and_where(Predicate::eq("approved", true));
    };
    let condition = ExistenceCondition::new("comments")
        .unwrap()
        .constrain(&approved);
    let (base, result) = compile_on("post", &condition, StrategyMode::In);
    result.unwrap();

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE posts.id IN (SELECT comments.post_id FROM comments WHERE approved = true)"
    );
}

#[test]
fn exists_keeps_correlation() {
    let base = compile_post("comments", CountOp::Gte, 1, StrategyMode::Exists);

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE EXISTS (SELECT * FROM comments WHERE posts.id = comments.post_id)"
    );
}

#[test]
fn has_none_renders_not_exists_and_not_in() {
    let exists = compile_post("comments", CountOp::Lt, 1, StrategyMode::Exists);
    let in_ = compile_post("comments", CountOp::Lt, 1, StrategyMode::In);

    assert_eq!(
        exists.to_string(),
        "SELECT * FROM posts WHERE NOT EXISTS (SELECT * FROM comments WHERE posts.id = comments.post_id)"
    );
    assert_eq!(
        in_.to_string(),
        "SELECT * FROM posts WHERE posts.id NOT IN (SELECT comments.post_id FROM comments)"
    );
}

#[test]
fn belongs_to_in_projects_owner_key() {
    let base = compile_post("author", CountOp::Gte, 1, StrategyMode::In);

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE posts.author_id IN (SELECT users.id FROM users)"
    );
}

#[test]
fn count_threshold_ignores_in_mode() {
    let base = compile_post("comments", CountOp::Gte, 2, StrategyMode::In);

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE (SELECT COUNT(*) FROM comments WHERE posts.id = comments.post_id) >= 2"
    );
}

#[test]
fn constraint_then_relation_constraints_follow_correlation() {
    let scored = |q: &mut SelectQuery| {
        q.and_where(Predicate::gt("score", 3));
    };
    let condition = ExistenceCondition::new("approved_comments")
        .unwrap()
        .constrain(&scored);
    let (base, result) = compile_on("post", &condition, StrategyMode::Exists);
    result.unwrap();

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE EXISTS (SELECT * FROM comments WHERE posts.id = comments.post_id \
         AND score > 3 AND approved = true)"
    );
}

#[test]
fn or_inside_constraint_stays_grouped() {
    let either = |q: &mut SelectQuery| {
        q.and_where(Predicate::eq("approved", true))
            .or_where(Predicate::eq("pinned", true));
    };
    let condition = ExistenceCondition::new("comments")
        .unwrap()
        .constrain(&either);
    let (base, result) = compile_on("post", &condition, StrategyMode::Exists);
    result.unwrap();

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE EXISTS (SELECT * FROM comments WHERE posts.id = comments.post_id \
         AND (approved = true OR pinned = true))"
    );
}

///
/// NESTED PATHS
///

#[test]
fn three_hop_path_nests_and_only_innermost_counts() {
    let condition = ExistenceCondition::new("posts.comments.votes")
        .unwrap()
        .threshold(CountOp::Eq, 3);
    let (base, result) = compile_on("user", &condition, StrategyMode::Exists);
    result.unwrap();

    assert_eq!(base.nesting_depth(), 3);
    assert_eq!(hop_labels(&base), ["exists", "exists", "count"]);
    assert_eq!(
        base.to_string(),
        "SELECT * FROM users WHERE EXISTS (SELECT * FROM posts WHERE users.id = posts.author_id \
         AND EXISTS (SELECT * FROM comments WHERE posts.id = comments.post_id \
         AND (SELECT COUNT(*) FROM votes WHERE comments.id = votes.comment_id) = 3))"
    );
}

#[test]
fn constraint_applies_to_innermost_hop_only() {
    let recent = |q: &mut SelectQuery| {
        q.and_where(Predicate::gt("created_at", 100));
    };
    let condition = ExistenceCondition::new("comments.votes")
        .unwrap()
        .constrain(&recent);
    let (base, result) = compile_on("post", &condition, StrategyMode::Exists);
    result.unwrap();

    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE EXISTS (SELECT * FROM comments WHERE posts.id = comments.post_id \
         AND EXISTS (SELECT * FROM votes WHERE comments.id = votes.comment_id AND created_at > 100))"
    );
}

#[test]
fn in_mode_reaches_every_hop() {
    let base = compile_post("comments.votes", CountOp::Gte, 1, StrategyMode::In);

    assert_eq!(hop_labels(&base), ["in", "in"]);
    assert_eq!(
        base.to_string(),
        "SELECT * FROM posts WHERE posts.id IN (SELECT comments.post_id FROM comments \
         WHERE comments.id IN (SELECT votes.comment_id FROM votes))"
    );
}

#[test]
fn negation_applies_to_innermost_hop_only() {
    let base = compile_post("comments.votes", CountOp::Lt, 1, StrategyMode::In);

    assert_eq!(hop_labels(&base), ["in", "not_in"]);
}

///
/// SELF RELATIONS
///

#[test]
fn self_relation_aliases_subquery_source() {
    let condition = ExistenceCondition::new("children").unwrap();
    let (base, result) = compile_on("category", &condition, StrategyMode::Exists);
    result.unwrap();

    assert_eq!(
        base.to_string(),
        "SELECT * FROM categories WHERE EXISTS (SELECT * FROM categories AS categories_hop0 \
         WHERE categories.id = categories_hop0.parent_id)"
    );
}

#[test]
fn nested_self_relation_gets_one_alias_per_hop() {
    let condition = ExistenceCondition::new("children.parent").unwrap();
    let (base, result) = compile_on("category", &condition, StrategyMode::In);
    result.unwrap();

    assert_eq!(
        base.to_string(),
        "SELECT * FROM categories WHERE categories.id IN (SELECT categories_hop0.parent_id \
         FROM categories AS categories_hop0 WHERE categories_hop0.parent_id IN \
         (SELECT categories_hop1.id FROM categories AS categories_hop1))"
    );
}

///
/// FAILURES
///

#[test]
fn unknown_relation_leaves_base_untouched() {
    for path in ["ghost", "comments.ghost", "comments.votes.ghost"] {
        let condition = ExistenceCondition::new(path).unwrap();
        let (base, result) = compile_on("post", &condition, StrategyMode::In);

        assert!(
            matches!(result, Err(CompileError::UnknownRelation { ref relation, .. }) if relation == "ghost"),
            "{path}"
        );
        assert_eq!(base, SelectQuery::new("posts"), "{path}");
    }
}

#[test]
fn unsupported_kind_fails_in_every_mode() {
    for mode in [StrategyMode::Exists, StrategyMode::In] {
        let condition = ExistenceCondition::new("tags").unwrap();
        let (base, result) = compile_on("post", &condition, mode);

        assert!(matches!(
            result,
            Err(CompileError::UnsupportedRelationKind {
                kind: RelationKind::BelongsToMany,
                ..
            })
        ));
        assert!(base.wheres.is_empty());
    }
}

#[test]
fn missing_related_model_is_reported() {
    let condition = ExistenceCondition::new("orphans").unwrap();
    let (base, result) = compile_on("post", &condition, StrategyMode::Exists);

    assert!(matches!(result, Err(CompileError::UnknownModel { ref model }) if model == "missing"));
    assert!(base.wheres.is_empty());
}

///
/// PROPERTIES
///

fn arb_op() -> impl Strategy<Value = CountOp> {
    prop_oneof![
        Just(CountOp::Gte),
        Just(CountOp::Gt),
        Just(CountOp::Eq),
        Just(CountOp::Lt),
        Just(CountOp::Lte),
    ]
}

fn arb_mode() -> impl Strategy<Value = StrategyMode> {
    prop_oneof![Just(StrategyMode::Exists), Just(StrategyMode::In)]
}

fn arb_post_path() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("comments"),
        Just("author"),
        Just("approved_comments"),
        Just("comments.votes"),
        Just("comments.post"),
        Just("comments.post.author"),
    ]
}

proptest! {
    #[test]
    fn selector_matches_threshold_table(op in arb_op(), count in 0u64..5, mode in arb_mode()) {
        let choice = select_strategy(op, count, mode);

        match (op, count) {
            (CountOp::Gte, 1) => {
                prop_assert_eq!(choice.strategy, FilterStrategy::from(mode));
                prop_assert!(!choice.negate);
            }
            (CountOp::Lt, 1) => {
                prop_assert_eq!(choice.strategy, FilterStrategy::from(mode));
                prop_assert!(choice.negate);
            }
            _ => prop_assert_eq!(choice, StrategyChoice::count()),
        }
    }

    #[test]
    fn compiling_twice_is_structurally_identical(
        path in arb_post_path(),
        op in arb_op(),
        count in 0u64..4,
        mode in arb_mode(),
    ) {
        let first = compile_post(path, op, count, mode);
        let second = compile_post(path, op, count, mode);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn intermediate_hops_always_use_the_call_mode(
        path in arb_post_path(),
        op in arb_op(),
        count in 0u64..4,
        mode in arb_mode(),
    ) {
        let base = compile_post(path, op, count, mode);
        let labels = hop_labels(&base);
        let hops = RelationPath::parse(path).unwrap().len();

        prop_assert_eq!(labels.len(), hops);
        for label in &labels[..hops - 1] {
            prop_assert_eq!(*label, mode_label(mode));
        }

        let expected_last = match select_strategy(op, count, mode) {
            StrategyChoice { strategy: FilterStrategy::Count, .. } => "count",
            StrategyChoice { negate: false, .. } => mode_label(mode),
            StrategyChoice { negate: true, .. } => match mode {
                StrategyMode::Exists => "not_exists",
                StrategyMode::In => "not_in",
            },
        };
        prop_assert_eq!(labels[hops - 1], expected_last);
    }
}
