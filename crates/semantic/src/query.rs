// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Query columns
//!
//! [`InferredQuery`] is the typed, ordered column list of a table, view,
//! CTE or SELECT. Column order is positional SELECT order and only changes
//! through [`InferredQuery::rename_columns`] (same arity) or
//! [`InferredQuery::append`] (concatenation).

use serde::{Deserialize, Serialize};
use sqltype_catalog::{SchemaTable, SchemaView};

use crate::error::{TypeError, TypeResult};
use crate::resolution::NameResolution;
use crate::types::InferredType;

/// One projected column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredQueryColumn {
    /// Table name or alias the column is reachable through, if any
    pub from_alias: Option<String>,

    pub column_name: String,

    pub inferred_type: InferredType,

    /// Part of the originating base table's primary key; never set for views or subqueries
    pub primary_key: bool,
}

impl InferredQueryColumn {
    /// Create an unaliased, non-key column
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_ir::CoreColumnType;
    /// use sqltype_semantic::{InferredQueryColumn, InferredType};
    ///
    /// let col = InferredQueryColumn::new("total", InferredType::nullable(CoreColumnType::Float))
    ///     .with_alias("o");
    /// assert_eq!(col.qualified_name(), "o.total");
    /// ```
    pub fn new(column_name: impl Into<String>, inferred_type: InferredType) -> Self {
        Self {
            from_alias: None,
            column_name: column_name.into(),
            inferred_type,
            primary_key: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.from_alias = Some(alias.into());
        self
    }

    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// `alias.column`, or just `column` without an alias
    pub fn qualified_name(&self) -> String {
        match &self.from_alias {
            Some(alias) => format!("{}.{}", alias, self.column_name),
            None => self.column_name.clone(),
        }
    }
}

/// Ordered column list of a query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InferredQuery {
    columns: Vec<InferredQueryColumn>,
}

impl InferredQuery {
    pub fn new(columns: Vec<InferredQueryColumn>) -> Self {
        Self { columns }
    }

    /// Columns of a base table, aliased by the table name
    pub fn from_table(table: &SchemaTable) -> Self {
        table
            .columns
            .iter()
            .map(|column| InferredQueryColumn {
                from_alias: Some(table.table_name.clone()),
                column_name: column.column_name.clone(),
                inferred_type: InferredType::Concrete(column.column_type),
                primary_key: column.primary_key,
            })
            .collect()
    }

    /// Declared output columns of a view, aliased by the view name
    pub fn from_view(view: &SchemaView) -> Self {
        view.columns
            .iter()
            .map(|column| {
                InferredQueryColumn::new(
                    column.column_name.clone(),
                    InferredType::Concrete(column.column_type),
                )
                .with_alias(view.view_name.clone())
            })
            .collect()
    }

    pub fn columns(&self) -> &[InferredQueryColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.column_name.as_str())
    }

    /// Same columns, all reachable through `alias`
    pub fn with_alias(&self, alias: &str) -> Self {
        self.columns
            .iter()
            .cloned()
            .map(|column| column.with_alias(alias))
            .collect()
    }

    /// Find the column called `name`
    ///
    /// Two or more matches are ambiguous. The message names both qualified
    /// candidates when they are reachable through different aliases.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_ir::CoreColumnType;
    /// use sqltype_semantic::{InferredQuery, InferredQueryColumn, InferredType};
    ///
    /// let int = InferredType::not_null(CoreColumnType::Integer);
    /// let query = InferredQuery::new(vec![
    ///     InferredQueryColumn::new("x", int.clone()).with_alias("a"),
    ///     InferredQueryColumn::new("x", int).with_alias("b"),
    /// ]);
    ///
    /// let result = query.column_by_name("x");
    /// assert!(result.is_ambiguous());
    /// assert!(result.message().unwrap().contains("a.x"));
    /// assert!(result.message().unwrap().contains("b.x"));
    /// ```
    pub fn column_by_name(&self, name: &str) -> NameResolution<&InferredQueryColumn> {
        // a third match cannot change the outcome
        let mut matches = self.columns.iter().filter(|c| c.column_name == name);

        match (matches.next(), matches.next()) {
            (None, _) => NameResolution::NotFound(format!("no such column: {}", name)),
            (Some(column), None) => NameResolution::Found(column),
            (Some(first), Some(second)) => match (&first.from_alias, &second.from_alias) {
                (Some(a), Some(b)) if a != b => NameResolution::Ambiguous(format!(
                    "ambiguous column name: {} (could be {} or {})",
                    name,
                    first.qualified_name(),
                    second.qualified_name()
                )),
                _ => NameResolution::Ambiguous(format!("ambiguous column name: {}", name)),
            },
        }
    }

    /// Rename columns positionally, e.g. for `WITH t(a, b) AS (...)`
    ///
    /// # Errors
    ///
    /// `TypeError::ArityMismatch` when `names` and the column list differ in length.
    pub fn rename_columns<S: AsRef<str>>(&self, names: &[S]) -> TypeResult<InferredQuery> {
        if names.len() != self.columns.len() {
            return Err(TypeError::ArityMismatch {
                expected: self.columns.len(),
                found: names.len(),
            });
        }

        Ok(self
            .columns
            .iter()
            .zip(names)
            .map(|(column, name)| InferredQueryColumn {
                column_name: name.as_ref().to_string(),
                ..column.clone()
            })
            .collect())
    }

    /// This query's columns followed by `other`'s
    ///
    /// No type or arity checking happens here; compound-query checking is
    /// the caller's job.
    pub fn append(&self, other: &InferredQuery) -> InferredQuery {
        self.columns
            .iter()
            .chain(other.columns.iter())
            .cloned()
            .collect()
    }
}

impl FromIterator<InferredQueryColumn> for InferredQuery {
    fn from_iter<I: IntoIterator<Item = InferredQueryColumn>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a InferredQuery {
    type Item = &'a InferredQueryColumn;
    type IntoIter = std::slice::Iter<'a, InferredQueryColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
