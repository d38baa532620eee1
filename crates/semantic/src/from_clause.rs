// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # FROM clause
//!
//! [`InferredFromClause`] maps each source of a FROM clause (keyed by alias,
//! else by table or CTE name) to its columns and keeps the flattened
//! `SELECT *` projection in FROM-clause order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqltype_ir::{ColumnName, ObjectName};
use tracing::trace;

use crate::error::{TypeError, TypeResult};
use crate::query::{InferredQuery, InferredQueryColumn};
use crate::resolution::NameResolution;

/// Sources of one FROM clause
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InferredFromClause {
    from_variables: BTreeMap<String, InferredQuery>,
    wildcard: InferredQuery,
}

impl InferredFromClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under `name`
    ///
    /// The source's columns are re-tagged with `name` as their alias, so
    /// `FROM users AS u` exposes `u.id` rather than `users.id`.
    ///
    /// # Errors
    ///
    /// `TypeError::DuplicateSource` if `name` is already taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_catalog::SchemaTable;
    /// use sqltype_ir::{ColumnType, CoreColumnType};
    /// use sqltype_semantic::{InferredFromClause, InferredQuery};
    ///
    /// let users = SchemaTable::new("users").with_column("id", ColumnType::not_null(CoreColumnType::Integer));
    ///
    /// let mut from = InferredFromClause::new();
    /// from.add_source("u", InferredQuery::from_table(&users)).unwrap();
    /// assert!(from.add_source("u", InferredQuery::from_table(&users)).is_err());
    /// assert_eq!(from.wildcard().columns()[0].qualified_name(), "u.id");
    /// ```
    pub fn add_source(&mut self, name: impl Into<String>, query: InferredQuery) -> TypeResult<()> {
        let name = name.into();
        if self.from_variables.contains_key(&name) {
            return Err(TypeError::DuplicateSource { name });
        }

        let query = query.with_alias(&name);
        trace!(source = %name, columns = query.len(), "Adding FROM source");
        self.wildcard = self.wildcard.append(&query);
        self.from_variables.insert(name, query);
        Ok(())
    }

    pub fn source(&self, name: &str) -> Option<&InferredQuery> {
        self.from_variables.get(name)
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.from_variables.keys().map(String::as_str)
    }

    /// Every column of every source, in FROM-clause order
    pub fn wildcard(&self) -> &InferredQuery {
        &self.wildcard
    }

    /// Find the source a qualified column reference points at
    ///
    /// Schema-qualified names are not supported at this level and come back
    /// as `Ambiguous`.
    pub fn resolve_table(&self, table_name: &ObjectName) -> NameResolution<&InferredQuery> {
        if let Some(schema) = &table_name.schema_name {
            return NameResolution::Ambiguous(format!(
                "schema-qualified table reference {}.{} is not supported in column references; use a table alias instead",
                schema, table_name.object_name
            ));
        }

        match self.from_variables.get(&table_name.object_name) {
            Some(query) => NameResolution::Found(query),
            None => NameResolution::NotFound(format!("no such table: {}", table_name.object_name)),
        }
    }

    /// Resolve a column against this FROM clause only
    pub fn resolve_column_reference(
        &self,
        column: &ColumnName,
    ) -> NameResolution<&InferredQueryColumn> {
        match &column.table {
            None => self.wildcard.column_by_name(&column.column_name),
            Some(table) => self
                .resolve_table(table)
                .and_then(|query| query.column_by_name(&column.column_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqltype_catalog::SchemaTable;
    use sqltype_ir::{ColumnType, CoreColumnType};

    fn users() -> SchemaTable {
        SchemaTable::new("users")
            .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
            .with_column("name", ColumnType::nullable(CoreColumnType::String))
    }

    fn orders() -> SchemaTable {
        SchemaTable::new("orders")
            .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
            .with_column("user_id", ColumnType::not_null(CoreColumnType::Integer))
    }

    fn users_and_orders() -> InferredFromClause {
        let mut from = InferredFromClause::new();
        from.add_source("u", InferredQuery::from_table(&users())).unwrap();
        from.add_source("orders", InferredQuery::from_table(&orders())).unwrap();
        from
    }

    #[test]
    fn test_wildcard_follows_from_order() {
        let from = users_and_orders();
        let names: Vec<_> = from
            .wildcard()
            .columns()
            .iter()
            .map(|c| c.qualified_name())
            .collect();
        assert_eq!(names, vec!["u.id", "u.name", "orders.id", "orders.user_id"]);
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut from = users_and_orders();
        let err = from
            .add_source("u", InferredQuery::from_table(&orders()))
            .unwrap_err();
        assert_eq!(err, TypeError::DuplicateSource { name: "u".to_string() });
        assert_eq!(from.wildcard().len(), 4);
    }

    #[test]
    fn test_resolve_table() {
        let from = users_and_orders();
        assert!(from.resolve_table(&ObjectName::new("u")).is_found());
        assert!(from.source("users").is_none());

        let missing = from.resolve_table(&ObjectName::new("users"));
        assert!(missing.is_not_found());
        assert!(missing.message().unwrap().contains("users"));
    }

    #[test]
    fn test_schema_qualified_table_is_ambiguous() {
        let from = users_and_orders();
        let result = from.resolve_table(&ObjectName::qualified("main", "orders"));
        assert!(result.is_ambiguous());
        assert!(result.message().unwrap().contains("alias"));
    }

    #[test]
    fn test_unqualified_column_uses_wildcard() {
        let from = users_and_orders();

        let name = from.resolve_column_reference(&ColumnName::new("name"));
        assert_eq!(name.found().unwrap().qualified_name(), "u.name");

        let id = from.resolve_column_reference(&ColumnName::new("id"));
        assert!(id.is_ambiguous());
        assert!(id.message().unwrap().contains("u.id"));
        assert!(id.message().unwrap().contains("orders.id"));
    }

    #[test]
    fn test_qualified_column() {
        let from = users_and_orders();

        let id = from.resolve_column_reference(&ColumnName::qualified("orders", "id"));
        assert_eq!(id.found().unwrap().from_alias.as_deref(), Some("orders"));

        let missing_column = from.resolve_column_reference(&ColumnName::qualified("u", "total"));
        assert!(missing_column.is_not_found());

        let missing_table = from.resolve_column_reference(&ColumnName::qualified("x", "id"));
        assert_eq!(missing_table.message(), Some("no such table: x"));
    }
}
