// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Select scope
//!
//! One [`InferredSelectScope`] exists per SELECT being type-checked,
//! including every subquery and CTE body. A child scope borrows its
//! parent, so the chain always points outward and a scope can never
//! outlive the query that encloses it.
//!
//! ## Table references
//!
//! Unqualified names are looked up in this scope's CTEs, then in the parent
//! scope, and finally (at the root) in the catalog's default schema.
//! Schema-qualified names skip CTEs and parents and go straight to the
//! named schema. In both schema cases a base table wins over a view.
//!
//! ## Column references
//!
//! Unqualified names see the SELECT list first when one is active (ORDER
//! BY). Otherwise resolution goes through the FROM clause, and a `NotFound`
//! at this level (including a SELECT without FROM) is retried in the parent
//! scope for correlated subqueries. An
//! `Ambiguous` result is final at the level it occurs.

use std::collections::{BTreeMap, BTreeSet};

use sqltype_catalog::{Model, SchemaObject, SchemaTable, SchemaView};
use sqltype_ir::{ColumnName, ObjectName};
use tracing::{debug, instrument, trace};

use crate::error::{TypeError, TypeResult};
use crate::from_clause::InferredFromClause;
use crate::query::{InferredQuery, InferredQueryColumn};
use crate::resolution::{NameResolution, ResolutionConfig, suggest, with_suggestions};

/// Lexical scope of one SELECT
#[derive(Debug, Clone)]
pub struct InferredSelectScope<'a> {
    parent: Option<&'a InferredSelectScope<'a>>,
    model: &'a Model,
    cte_variables: BTreeMap<String, InferredQuery>,
    from_clause: Option<InferredFromClause>,
    select_clause: Option<InferredQuery>,
    config: ResolutionConfig,
}

impl<'a> InferredSelectScope<'a> {
    /// Create the scope of a top-level statement
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_catalog::{Model, SchemaTable};
    /// use sqltype_ir::{ColumnName, ColumnType, CoreColumnType};
    /// use sqltype_semantic::{InferredFromClause, InferredQuery, InferredSelectScope};
    ///
    /// let users = SchemaTable::new("users").with_column("id", ColumnType::not_null(CoreColumnType::Integer));
    /// let model = Model::new("main").with_table(users.clone());
    ///
    /// let mut from = InferredFromClause::new();
    /// from.add_source("users", InferredQuery::from_table(&users)).unwrap();
    ///
    /// let mut root = InferredSelectScope::root(&model);
    /// root.set_from_clause(from);
    ///
    /// // A subquery with its own, empty FROM clause still sees `users.id`
    /// let mut child = root.child();
    /// child.set_from_clause(InferredFromClause::new());
    /// assert!(child.resolve_column_reference(&ColumnName::new("id")).is_found());
    /// ```
    pub fn root(model: &'a Model) -> Self {
        Self {
            parent: None,
            model,
            cte_variables: BTreeMap::new(),
            from_clause: None,
            select_clause: None,
            config: ResolutionConfig::default(),
        }
    }

    /// Builder method: override suggestion settings; children inherit them
    pub fn with_config(mut self, config: ResolutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the scope of a nested SELECT
    pub fn child(&self) -> InferredSelectScope<'_> {
        InferredSelectScope {
            parent: Some(self),
            model: self.model,
            cte_variables: BTreeMap::new(),
            from_clause: None,
            select_clause: None,
            config: self.config.clone(),
        }
    }

    pub fn parent(&self) -> Option<&'a InferredSelectScope<'a>> {
        self.parent
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Number of enclosing scopes; zero for the root
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Declare a CTE visible to this scope and its children
    ///
    /// # Errors
    ///
    /// `TypeError::DuplicateSource` if this scope already declares `name`.
    pub fn add_cte(&mut self, name: impl Into<String>, query: InferredQuery) -> TypeResult<()> {
        let name = name.into();
        if self.cte_variables.contains_key(&name) {
            return Err(TypeError::DuplicateSource { name });
        }
        self.cte_variables.insert(name, query);
        Ok(())
    }

    pub fn cte(&self, name: &str) -> Option<&InferredQuery> {
        self.cte_variables.get(name)
    }

    pub fn set_from_clause(&mut self, from_clause: InferredFromClause) {
        self.from_clause = Some(from_clause);
    }

    pub fn from_clause(&self) -> Option<&InferredFromClause> {
        self.from_clause.as_ref()
    }

    /// Make SELECT-list names visible to unqualified column references
    pub fn set_select_clause(&mut self, select_clause: InferredQuery) {
        self.select_clause = Some(select_clause);
    }

    pub fn clear_select_clause(&mut self) {
        self.select_clause = None;
    }

    pub fn select_clause(&self) -> Option<&InferredQuery> {
        self.select_clause.as_ref()
    }

    fn ancestors(&self) -> impl Iterator<Item = &InferredSelectScope<'a>> {
        std::iter::successors(Some(self), |scope| scope.parent)
    }

    /// Resolve a table name to its columns
    ///
    /// `on_table_touched` is called for every base table the reference
    /// depends on; for a view that is every table the view reads,
    /// transitively through nested views.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_catalog::{Model, SchemaTable, SchemaView};
    /// use sqltype_ir::{ColumnType, CoreColumnType, ObjectName};
    /// use sqltype_semantic::InferredSelectScope;
    ///
    /// let int = ColumnType::not_null(CoreColumnType::Integer);
    /// let model = Model::new("main")
    ///     .with_table(SchemaTable::new("users").with_column("id", int))
    ///     .with_view(SchemaView::new("active_users").with_column("id", int).with_reference("users"));
    ///
    /// let scope = InferredSelectScope::root(&model);
    /// let mut touched = Vec::new();
    /// let query = scope
    ///     .resolve_table_reference(&ObjectName::new("active_users"), &mut |t| touched.push(t.table_name.clone()))
    ///     .found()
    ///     .unwrap();
    ///
    /// assert_eq!(query.columns()[0].qualified_name(), "active_users.id");
    /// assert_eq!(touched, vec!["users".to_string()]);
    /// ```
    #[instrument(skip_all, fields(table = %name, depth = self.depth()))]
    pub fn resolve_table_reference(
        &self,
        name: &ObjectName,
        on_table_touched: &mut dyn FnMut(&SchemaTable),
    ) -> NameResolution<InferredQuery> {
        let schema_name = match &name.schema_name {
            Some(schema_name) => schema_name,
            None => {
                if let Some(query) = self.cte_variables.get(&name.object_name) {
                    debug!("Resolved to CTE");
                    return NameResolution::Found(query.clone());
                }
                if let Some(parent) = self.parent {
                    trace!("Not a CTE here, trying parent scope");
                    return parent.resolve_table_reference(name, on_table_touched);
                }
                &self.model.default_schema
            }
        };

        self.resolve_schema_object(schema_name, &name.object_name, on_table_touched)
    }

    fn resolve_schema_object(
        &self,
        schema_name: &str,
        object_name: &str,
        on_table_touched: &mut dyn FnMut(&SchemaTable),
    ) -> NameResolution<InferredQuery> {
        let Some(schema) = self.model.schema(schema_name) else {
            return NameResolution::NotFound(format!("no such schema: {}", schema_name));
        };

        match schema.object(object_name) {
            Some(SchemaObject::Table(table)) => {
                debug!(schema = schema_name, "Resolved to base table");
                on_table_touched(table);
                NameResolution::Found(InferredQuery::from_table(table))
            }
            Some(SchemaObject::View(view)) => {
                debug!(schema = schema_name, "Resolved to view");
                let mut visited = BTreeSet::new();
                visited.insert(ObjectName::qualified(schema_name, &view.view_name));
                self.touch_view_tables(schema_name, view, &mut visited, on_table_touched);
                NameResolution::Found(InferredQuery::from_view(view))
            }
            None => {
                let candidates = schema
                    .tables
                    .keys()
                    .chain(schema.views.keys())
                    .map(String::as_str);
                let message = format!("no such table: {}.{}", schema_name, object_name);
                NameResolution::NotFound(with_suggestions(
                    message,
                    &suggest(object_name, candidates, &self.config),
                ))
            }
        }
    }

    /// Touch every base table `view` reads, following nested views once each
    fn touch_view_tables(
        &self,
        schema_name: &str,
        view: &SchemaView,
        visited: &mut BTreeSet<ObjectName>,
        on_table_touched: &mut dyn FnMut(&SchemaTable),
    ) {
        for reference in &view.references {
            // unqualified names inside a view belong to the view's schema
            let reference_schema = reference.schema_name.as_deref().unwrap_or(schema_name);
            let key = ObjectName::qualified(reference_schema, &reference.object_name);
            if !visited.insert(key) {
                continue;
            }

            match self.model.object(reference_schema, &reference.object_name) {
                Some(SchemaObject::Table(table)) => on_table_touched(table),
                Some(SchemaObject::View(inner)) => {
                    self.touch_view_tables(reference_schema, inner, visited, on_table_touched)
                }
                None => trace!(reference = %reference, "View reference not in catalog"),
            }
        }
    }

    /// Resolve a column reference in this scope or, failing that, an enclosing one
    #[instrument(skip(self), fields(depth = self.depth()))]
    pub fn resolve_column_reference(
        &self,
        column: &ColumnName,
    ) -> NameResolution<&InferredQueryColumn> {
        match self.resolve_column_in_chain(column) {
            NameResolution::NotFound(message) => {
                debug!(%message, "Column not found in any scope");
                NameResolution::NotFound(with_suggestions(message, &self.column_suggestions(column)))
            }
            resolved => resolved,
        }
    }

    fn resolve_column_in_chain(&self, column: &ColumnName) -> NameResolution<&InferredQueryColumn> {
        if column.table.is_none() {
            if let Some(select) = &self.select_clause {
                let result = select.column_by_name(&column.column_name);
                if !result.is_not_found() {
                    trace!("Resolved against SELECT list");
                    return result;
                }
            }
        }

        let result = match &self.from_clause {
            Some(from) => from.resolve_column_reference(column),
            None => NameResolution::NotFound(format!(
                "no such column: {} (query has no FROM clause)",
                column
            )),
        };

        match self.parent {
            Some(parent) => result.or_else_not_found(|_| {
                trace!("Not found at this level, trying parent scope");
                parent.resolve_column_in_chain(column)
            }),
            None => result,
        }
    }

    fn column_suggestions(&self, column: &ColumnName) -> Vec<String> {
        let mut candidates: Vec<&str> = Vec::new();
        for scope in self.ancestors() {
            match &column.table {
                None => {
                    if let Some(select) = &scope.select_clause {
                        candidates.extend(select.column_names());
                    }
                    if let Some(from) = &scope.from_clause {
                        candidates.extend(from.wildcard().column_names());
                    }
                }
                Some(table) => {
                    let source = scope
                        .from_clause
                        .as_ref()
                        .and_then(|from| from.source(&table.object_name));
                    if let Some(source) = source {
                        candidates.extend(source.column_names());
                    }
                }
            }
        }
        candidates.sort_unstable();
        candidates.dedup();
        suggest(&column.column_name, candidates, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqltype_catalog::Schema;
    use sqltype_ir::{ColumnType, CoreColumnType};

    use crate::types::InferredType;

    fn int() -> ColumnType {
        ColumnType::not_null(CoreColumnType::Integer)
    }

    fn model() -> Model {
        Model::new("main")
            .with_table(
                SchemaTable::new("users")
                    .with_primary_key("id", int())
                    .with_column("name", ColumnType::nullable(CoreColumnType::String)),
            )
            .with_table(
                SchemaTable::new("orders")
                    .with_primary_key("id", int())
                    .with_column("user_id", int())
                    .with_column("total", ColumnType::not_null(CoreColumnType::Float)),
            )
            .with_view(
                SchemaView::new("user_orders")
                    .with_column("name", ColumnType::nullable(CoreColumnType::String))
                    .with_column("total", ColumnType::not_null(CoreColumnType::Float))
                    .with_reference("users")
                    .with_reference("orders"),
            )
            .with_view(
                SchemaView::new("big_spenders")
                    .with_column("name", ColumnType::nullable(CoreColumnType::String))
                    .with_reference("user_orders")
                    .with_reference("users"),
            )
            .with_schema(
                Schema::new("archive").with_table(SchemaTable::new("users").with_column("legacy_id", int())),
            )
    }

    fn touched(scope: &InferredSelectScope<'_>, name: ObjectName) -> (NameResolution<InferredQuery>, Vec<String>) {
        let mut tables = Vec::new();
        let result = scope.resolve_table_reference(&name, &mut |t| tables.push(t.table_name.clone()));
        (result, tables)
    }

    fn from_table(model: &Model, alias: &str, table: &str) -> InferredFromClause {
        let mut from = InferredFromClause::new();
        let table = model.default_schema().unwrap().table(table).unwrap();
        from.add_source(alias, InferredQuery::from_table(table)).unwrap();
        from
    }

    #[test]
    fn test_base_table_touches_itself() {
        let model = model();
        let scope = InferredSelectScope::root(&model);
        let (result, tables) = touched(&scope, ObjectName::new("users"));
        assert_eq!(result.found().unwrap().len(), 2);
        assert_eq!(tables, vec!["users"]);
    }

    #[test]
    fn test_view_touches_tables_transitively_once() {
        let model = model();
        let scope = InferredSelectScope::root(&model);
        let (result, tables) = touched(&scope, ObjectName::new("big_spenders"));

        let query = result.found().unwrap();
        assert_eq!(query.columns()[0].qualified_name(), "big_spenders.name");
        assert!(!query.columns()[0].primary_key);
        assert_eq!(tables, vec!["users", "orders"]);
    }

    #[test]
    fn test_cyclic_views_terminate() {
        let model = Model::new("main")
            .with_table(SchemaTable::new("t").with_column("x", int()))
            .with_view(SchemaView::new("a").with_column("x", int()).with_reference("b"))
            .with_view(
                SchemaView::new("b")
                    .with_column("x", int())
                    .with_reference("a")
                    .with_reference("t"),
            );
        let scope = InferredSelectScope::root(&model);
        let (result, tables) = touched(&scope, ObjectName::new("a"));
        assert!(result.is_found());
        assert_eq!(tables, vec!["t"]);
    }

    #[test]
    fn test_qualified_reference_uses_named_schema() {
        let model = model();
        let scope = InferredSelectScope::root(&model);
        let (result, _) = touched(&scope, ObjectName::qualified("archive", "users"));
        assert_eq!(
            result.found().unwrap().column_names().collect::<Vec<_>>(),
            vec!["legacy_id"]
        );

        let (missing, tables) = touched(&scope, ObjectName::qualified("nope", "users"));
        assert_eq!(missing.message(), Some("no such schema: nope"));
        assert!(tables.is_empty());
    }

    #[test]
    fn test_cte_shadows_table_and_is_visible_to_children() {
        let model = model();
        let mut root = InferredSelectScope::root(&model);
        let cte = InferredQuery::new(vec![InferredQueryColumn::new(
            "n",
            InferredType::not_null(CoreColumnType::Integer),
        )]);
        root.add_cte("users", cte.clone()).unwrap();
        assert!(root.add_cte("users", cte.clone()).is_err());

        let child = root.child();
        let grandchild = child.child();
        assert_eq!(grandchild.depth(), 2);

        let (result, tables) = touched(&grandchild, ObjectName::new("users"));
        assert_eq!(result.found().unwrap(), cte);
        assert!(tables.is_empty());

        // a schema qualifier bypasses CTEs
        let (result, tables) = touched(&grandchild, ObjectName::qualified("main", "users"));
        assert_eq!(result.found().unwrap().len(), 2);
        assert_eq!(tables, vec!["users"]);
    }

    #[test]
    fn test_unknown_table_suggests_nearby_names() {
        let model = model();
        let scope = InferredSelectScope::root(&model);
        let (result, _) = touched(&scope, ObjectName::new("user"));
        let message = result.message().unwrap();
        assert!(message.starts_with("no such table: main.user"));
        assert!(message.contains("users"));
    }

    #[test]
    fn test_select_alias_takes_precedence_over_from() {
        let model = model();
        let mut scope = InferredSelectScope::root(&model);
        scope.set_from_clause(from_table(&model, "orders", "orders"));
        scope.set_select_clause(InferredQuery::new(vec![InferredQueryColumn::new(
            "total",
            InferredType::nullable(CoreColumnType::Integer),
        )]));

        let total = scope.resolve_column_reference(&ColumnName::new("total")).found().unwrap();
        assert_eq!(total.from_alias, None);

        let qualified = scope
            .resolve_column_reference(&ColumnName::qualified("orders", "total"))
            .found()
            .unwrap();
        assert_eq!(qualified.from_alias.as_deref(), Some("orders"));

        scope.clear_select_clause();
        let total = scope.resolve_column_reference(&ColumnName::new("total")).found().unwrap();
        assert_eq!(total.from_alias.as_deref(), Some("orders"));
    }

    #[test]
    fn test_missing_from_clause_at_root() {
        let model = model();
        let scope = InferredSelectScope::root(&model);
        let result = scope.resolve_column_reference(&ColumnName::new("id"));
        assert!(result.is_not_found());
        assert!(result.message().unwrap().contains("no FROM clause"));
    }

    #[test]
    fn test_subquery_without_from_sees_outer_columns() {
        // SELECT (SELECT u.name) FROM users u
        let model = model();
        let mut root = InferredSelectScope::root(&model);
        root.set_from_clause(from_table(&model, "u", "users"));
        let child = root.child();

        let name = child
            .resolve_column_reference(&ColumnName::qualified("u", "name"))
            .found()
            .unwrap();
        assert_eq!(name.qualified_name(), "u.name");

        let missing = child.resolve_column_reference(&ColumnName::new("total"));
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_correlated_reference_falls_back_to_parent() {
        let model = model();
        let mut root = InferredSelectScope::root(&model);
        root.set_from_clause(from_table(&model, "u", "users"));

        let mut child = root.child();
        child.set_from_clause(from_table(&model, "o", "orders"));

        let name = child.resolve_column_reference(&ColumnName::new("name")).found().unwrap();
        assert_eq!(name.qualified_name(), "u.name");

        let qualified = child
            .resolve_column_reference(&ColumnName::qualified("u", "id"))
            .found()
            .unwrap();
        assert!(qualified.primary_key);
    }

    #[test]
    fn test_ambiguity_is_not_retried_in_parent() {
        let model = model();
        let mut root = InferredSelectScope::root(&model);
        root.set_from_clause(from_table(&model, "p", "users"));

        let mut child = root.child();
        let mut from = from_table(&model, "u", "users");
        let orders = model.default_schema().unwrap().table("orders").unwrap();
        from.add_source("o", InferredQuery::from_table(orders)).unwrap();
        child.set_from_clause(from);

        let result = child.resolve_column_reference(&ColumnName::new("id"));
        assert!(result.is_ambiguous());
        assert!(result.message().unwrap().contains("u.id"));
        assert!(result.message().unwrap().contains("o.id"));
    }

    #[test]
    fn test_not_found_suggestions_cover_every_scope() {
        let model = model();
        let mut root = InferredSelectScope::root(&model);
        root.set_from_clause(from_table(&model, "u", "users"));
        let mut child = root.child();
        child.set_from_clause(from_table(&model, "o", "orders"));

        let result = child.resolve_column_reference(&ColumnName::new("nme"));
        assert!(result.is_not_found());
        assert!(result.message().unwrap().contains("did you mean: name"));

        let mut quiet = InferredSelectScope::root(&model).with_config(ResolutionConfig {
            suggestions: false,
            ..ResolutionConfig::default()
        });
        quiet.set_from_clause(from_table(&model, "u", "users"));
        let result = quiet.resolve_column_reference(&ColumnName::new("nme"));
        assert_eq!(result.message(), Some("no such column: nme"));
    }
}
