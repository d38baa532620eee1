// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Name resolution across nested scopes, driven the way a query compiler
//! would drive it while walking a statement.

use sqltype_catalog::{Catalog, Model, SchemaTable};
use sqltype_ir::{ColumnName, CoreColumnType, ObjectName, SourceSpan};
use sqltype_semantic::{
    found_at, ErrorKind, InferredFromClause, InferredQuery, InferredQueryColumn, InferredSelectScope,
    InferredType,
};
use sqltype_test_utils::{init_tracing, MockCatalogBuilder, ModelFixtures, ResolutionAssertions};

/// Resolve each `(alias, table)` pair and register it as a FROM source
fn from_tables(scope: &InferredSelectScope<'_>, sources: &[(&str, &str)]) -> InferredFromClause {
    let mut from = InferredFromClause::new();
    for (alias, table) in sources {
        let query = ResolutionAssertions::assert_found(
            scope.resolve_table_reference(&ObjectName::new(*table), &mut |_| {}),
        );
        from.add_source(*alias, query).unwrap();
    }
    from
}

fn touched_tables(scope: &InferredSelectScope<'_>, name: &ObjectName) -> Vec<String> {
    let mut touched = Vec::new();
    let result = scope.resolve_table_reference(name, &mut |table: &SchemaTable| {
        touched.push(table.table_name.clone())
    });
    assert!(result.is_found(), "{}: {:?}", name, result);
    touched
}

#[test]
fn test_select_alias_shadows_from_column() {
    init_tracing();
    let model = ModelFixtures::sample_model();

    // SELECT count(*) AS total FROM orders ORDER BY total
    let mut scope = InferredSelectScope::root(&model);
    scope.set_from_clause(from_tables(&scope, &[("orders", "orders")]));
    scope.set_select_clause(InferredQuery::new(vec![InferredQueryColumn::new(
        "total",
        InferredType::not_null(CoreColumnType::Integer),
    )]));

    let total = ResolutionAssertions::assert_found(scope.resolve_column_reference(&ColumnName::new("total")));
    assert_eq!(total.from_alias, None);
    assert_eq!(total.inferred_type, InferredType::not_null(CoreColumnType::Integer));
}

#[test]
fn test_ambiguous_select_alias_is_final() {
    let model = ModelFixtures::sample_model();

    let mut scope = InferredSelectScope::root(&model);
    scope.set_from_clause(from_tables(&scope, &[("users", "users")]));
    scope.set_select_clause(
        InferredQuery::new(vec![
            InferredQueryColumn::new("email", InferredType::not_null(CoreColumnType::String)),
            InferredQueryColumn::new("email", InferredType::not_null(CoreColumnType::String)),
        ]),
    );

    let result = scope.resolve_column_reference(&ColumnName::new("email"));
    assert!(result.is_ambiguous());
}

#[test]
fn test_correlated_subquery() {
    init_tracing();
    let model = ModelFixtures::sample_model();

    // SELECT u.name, (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) FROM users u
    let mut outer = InferredSelectScope::root(&model);
    outer.set_from_clause(from_tables(&outer, &[("u", "users")]));

    let mut inner = outer.child();
    inner.set_from_clause(from_tables(&inner, &[("o", "orders")]));

    let user_id = ResolutionAssertions::assert_found(
        inner.resolve_column_reference(&ColumnName::qualified("o", "user_id")),
    );
    assert_eq!(user_id.qualified_name(), "o.user_id");

    let outer_id =
        ResolutionAssertions::assert_found(inner.resolve_column_reference(&ColumnName::qualified("u", "id")));
    assert!(outer_id.primary_key);

    let email = ResolutionAssertions::assert_found(inner.resolve_column_reference(&ColumnName::new("email")));
    assert_eq!(email.qualified_name(), "u.email");
}

#[test]
fn test_ambiguity_in_child_does_not_reach_parent() {
    let model = ModelFixtures::sample_model();

    let mut outer = InferredSelectScope::root(&model);
    outer.set_from_clause(from_tables(&outer, &[("p", "products")]));

    let mut inner = outer.child();
    inner.set_from_clause(from_tables(&inner, &[("u", "users"), ("o", "orders")]));

    let result = inner.resolve_column_reference(&ColumnName::new("id"));
    ResolutionAssertions::assert_ambiguous(&result, &["u.id", "o.id"]);
    assert!(!result.message().unwrap().contains("p.id"));
}

#[test]
fn test_view_touches_underlying_tables() {
    let model = ModelFixtures::sample_model();
    let scope = InferredSelectScope::root(&model);

    assert_eq!(touched_tables(&scope, &ObjectName::new("user_orders")), vec!["users", "orders"]);
    assert_eq!(touched_tables(&scope, &ObjectName::new("big_spenders")), vec!["users", "orders"]);
    assert_eq!(touched_tables(&scope, &ObjectName::new("products")), vec!["products"]);
}

#[test]
fn test_view_columns_carry_view_alias() {
    let model = ModelFixtures::sample_model();
    let scope = InferredSelectScope::root(&model);

    let query = ResolutionAssertions::assert_found(
        scope.resolve_table_reference(&ObjectName::new("user_orders"), &mut |_| {}),
    );
    assert!(query.columns().iter().all(|c| c.from_alias.as_deref() == Some("user_orders")));
    assert!(query.columns().iter().all(|c| !c.primary_key));
}

#[test]
fn test_cte_visible_in_subquery_but_not_for_qualified_names() {
    let model = ModelFixtures::sample_model();

    // WITH users AS (SELECT 1 AS n) SELECT * FROM (SELECT * FROM users)
    let mut root = InferredSelectScope::root(&model);
    let cte = InferredQuery::new(vec![InferredQueryColumn::new(
        "n",
        InferredType::of_literal(&sqltype_ir::Literal::integer(1)),
    )]);
    root.add_cte("users", cte.clone()).unwrap();

    let subquery = root.child();
    let resolved =
        ResolutionAssertions::assert_found(subquery.resolve_table_reference(&ObjectName::new("users"), &mut |_| {}));
    assert_eq!(resolved, cte);

    assert_eq!(touched_tables(&subquery, &ObjectName::qualified("main", "users")), vec!["users"]);
    let archived = ResolutionAssertions::assert_found(
        subquery.resolve_table_reference(&ObjectName::qualified("archive", "users"), &mut |_| {}),
    );
    assert_eq!(archived.column_names().collect::<Vec<_>>(), vec!["legacy_id", "full_name"]);
}

#[test]
fn test_unknown_names_are_located_not_found_errors() {
    let model = ModelFixtures::sample_model();
    let mut scope = InferredSelectScope::root(&model);
    scope.set_from_clause(from_tables(&scope, &[("u", "users")]));

    let table = scope.resolve_table_reference(&ObjectName::new("userz"), &mut |_| {});
    ResolutionAssertions::assert_not_found(&table, "userz");
    ResolutionAssertions::assert_message_contains(&table, "did you mean: users");

    let span = SourceSpan::new(7, 11);
    let error = found_at(span, scope.resolve_column_reference(&ColumnName::new("nmae"))).unwrap_err();
    ResolutionAssertions::assert_error_kind(&error, ErrorKind::NotFound);
    assert_eq!(error.span(), span);
    assert!(error.to_string().contains("did you mean: name"));
}

#[test]
fn test_schema_qualified_column_reference_is_ambiguous() {
    let model = ModelFixtures::sample_model();
    let mut scope = InferredSelectScope::root(&model);
    scope.set_from_clause(from_tables(&scope, &[("users", "users")]));

    let column = ColumnName::qualified(ObjectName::qualified("main", "users"), "id");
    let error = found_at(SourceSpan::point(0), scope.resolve_column_reference(&column)).unwrap_err();
    ResolutionAssertions::assert_error_kind(&error, ErrorKind::Ambiguous);
}

#[tokio::test]
async fn test_resolution_against_loaded_catalog() {
    init_tracing();
    let catalog = MockCatalogBuilder::new().with_standard_schema().build();
    let model: Model = catalog.load_model().await.unwrap();

    let scope = InferredSelectScope::root(&model);
    assert_eq!(touched_tables(&scope, &ObjectName::new("orders")), vec!["orders"]);
}
