// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema model
//!
//! The in-memory catalog the type checker resolves names against:
//!
//! - [`Model`]: every attached schema plus the name of the default one
//! - [`Schema`]: tables and views of one schema, keyed by name
//! - [`SchemaTable`] / [`SchemaColumn`]: base tables and their declared columns
//! - [`SchemaView`]: a view's declared output columns and the objects its query reads
//!
//! Models are plain data and can be written as YAML or JSON:
//!
//! ```yaml
//! default_schema: main
//! schemas:
//!   main:
//!     tables:
//!       users:
//!         columns:
//!           - column_name: id
//!             column_type: { type: Integer, nullable: false }
//!             primary_key: true
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqltype_ir::{ColumnType, ObjectName};
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// A declared column of a base table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    /// Owning table; filled in from the table when loaded from a file
    #[serde(default)]
    pub table_name: String,

    pub column_name: String,

    pub column_type: ColumnType,

    /// Whether this column is part of the table's primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl SchemaColumn {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            column_type,
            primary_key: false,
        }
    }

    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// A base table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTable {
    #[serde(default)]
    pub table_name: String,

    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
}

impl SchemaTable {
    /// Create a table with no columns
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_catalog::SchemaTable;
    /// use sqltype_ir::{ColumnType, CoreColumnType};
    ///
    /// let users = SchemaTable::new("users")
    ///     .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
    ///     .with_column("name", ColumnType::nullable(CoreColumnType::String));
    ///
    /// assert_eq!(users.columns.len(), 2);
    /// assert_eq!(users.primary_key_columns().count(), 1);
    /// ```
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Builder method: append a column
    pub fn with_column(mut self, column_name: impl Into<String>, column_type: ColumnType) -> Self {
        let column = SchemaColumn::new(self.table_name.clone(), column_name, column_type);
        self.columns.push(column);
        self
    }

    /// Builder method: append a primary key column
    pub fn with_primary_key(
        mut self,
        column_name: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        let column = SchemaColumn::new(self.table_name.clone(), column_name, column_type)
            .with_primary_key();
        self.columns.push(column);
        self
    }

    /// Get column by name
    pub fn column(&self, column_name: &str) -> Option<&SchemaColumn> {
        self.columns.iter().find(|c| c.column_name == column_name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &SchemaColumn> {
        self.columns.iter().filter(|c| c.primary_key)
    }
}

/// A declared output column of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewColumn {
    pub column_name: String,
    pub column_type: ColumnType,
}

/// A view
///
/// The catalog keeps what the type checker needs from a view's query: its
/// output columns and the tables or views that query reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaView {
    #[serde(default)]
    pub view_name: String,

    /// Output columns in SELECT order
    #[serde(default)]
    pub columns: Vec<ViewColumn>,

    /// Tables and views referenced by the view's query; unqualified names
    /// live in the view's own schema
    #[serde(default)]
    pub references: Vec<ObjectName>,
}

impl SchemaView {
    pub fn new(view_name: impl Into<String>) -> Self {
        Self {
            view_name: view_name.into(),
            columns: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Builder method: append an output column
    pub fn with_column(mut self, column_name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(ViewColumn {
            column_name: column_name.into(),
            column_type,
        });
        self
    }

    /// Builder method: record an object the view's query reads from
    pub fn with_reference(mut self, name: impl Into<ObjectName>) -> Self {
        self.references.push(name.into());
        self
    }
}

/// A table-or-view lookup result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaObject<'a> {
    Table(&'a SchemaTable),
    View(&'a SchemaView),
}

/// One schema (`main`, `temp`, an attached database, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub schema_name: String,

    #[serde(default)]
    pub tables: BTreeMap<String, SchemaTable>,

    #[serde(default)]
    pub views: BTreeMap<String, SchemaView>,
}

impl Schema {
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: SchemaTable) -> Self {
        self.tables.insert(table.table_name.clone(), table);
        self
    }

    pub fn with_view(mut self, view: SchemaView) -> Self {
        self.views.insert(view.view_name.clone(), view);
        self
    }

    pub fn table(&self, name: &str) -> Option<&SchemaTable> {
        self.tables.get(name)
    }

    pub fn view(&self, name: &str) -> Option<&SchemaView> {
        self.views.get(name)
    }

    /// Look up a base table first, then a view
    pub fn object(&self, name: &str) -> Option<SchemaObject<'_>> {
        self.table(name)
            .map(SchemaObject::Table)
            .or_else(|| self.view(name).map(SchemaObject::View))
    }

    /// Fill in names that are implied by map keys in a definition file
    fn normalize(&mut self, schema_name: &str) {
        if self.schema_name.is_empty() {
            self.schema_name = schema_name.to_string();
        }
        for (name, table) in self.tables.iter_mut() {
            if table.table_name.is_empty() {
                table.table_name = name.clone();
            }
            for column in table.columns.iter_mut() {
                if column.table_name.is_empty() {
                    column.table_name = table.table_name.clone();
                }
            }
        }
        for (name, view) in self.views.iter_mut() {
            if view.view_name.is_empty() {
                view.view_name = name.clone();
            }
        }
    }
}

/// The whole catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Schema searched for unqualified names
    pub default_schema: String,

    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
}

impl Model {
    /// Create a model with an empty default schema
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_catalog::{Model, SchemaTable};
    /// use sqltype_ir::{ColumnType, CoreColumnType};
    ///
    /// let model = Model::new("main")
    ///     .with_table(SchemaTable::new("users").with_column("id", ColumnType::not_null(CoreColumnType::Integer)));
    ///
    /// assert!(model.default_schema().unwrap().table("users").is_some());
    /// ```
    pub fn new(default_schema: impl Into<String>) -> Self {
        let default_schema = default_schema.into();
        let mut schemas = BTreeMap::new();
        schemas.insert(default_schema.clone(), Schema::new(default_schema.clone()));
        Self {
            default_schema,
            schemas,
        }
    }

    /// Builder method: attach or replace a schema
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.insert(schema.schema_name.clone(), schema);
        self
    }

    /// Builder method: add a table to the default schema
    pub fn with_table(mut self, table: SchemaTable) -> Self {
        self.default_schema_mut().tables.insert(table.table_name.clone(), table);
        self
    }

    /// Builder method: add a view to the default schema
    pub fn with_view(mut self, view: SchemaView) -> Self {
        self.default_schema_mut().views.insert(view.view_name.clone(), view);
        self
    }

    fn default_schema_mut(&mut self) -> &mut Schema {
        let name = self.default_schema.clone();
        self.schemas
            .entry(name.clone())
            .or_insert_with(|| Schema::new(name))
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn default_schema(&self) -> Option<&Schema> {
        self.schema(&self.default_schema)
    }

    /// Look up `name` in `schema_name`, base tables before views
    pub fn object(&self, schema_name: &str, name: &str) -> Option<SchemaObject<'_>> {
        self.schema(schema_name).and_then(|schema| schema.object(name))
    }

    /// Check that the default schema exists and that every view reference resolves
    pub fn validate(&self) -> CatalogResult<()> {
        if self.default_schema().is_none() {
            return Err(CatalogError::InvalidSchema(self.default_schema.clone()));
        }

        for schema in self.schemas.values() {
            for view in schema.views.values() {
                for reference in &view.references {
                    let schema_name = reference
                        .schema_name
                        .as_deref()
                        .unwrap_or(&schema.schema_name);
                    if self.object(schema_name, &reference.object_name).is_none() {
                        return Err(CatalogError::TableNotFound(
                            reference.object_name.clone(),
                            schema_name.to_string(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Parse a YAML catalog definition
    pub fn from_yaml_str(text: &str) -> CatalogResult<Self> {
        let model: Model = serde_yaml::from_str(text)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        model.finish_loading()
    }

    /// Parse a JSON catalog definition
    pub fn from_json_str(text: &str) -> CatalogResult<Self> {
        let model: Model = serde_json::from_str(text)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        model.finish_loading()
    }

    fn finish_loading(mut self) -> CatalogResult<Self> {
        for (name, schema) in self.schemas.iter_mut() {
            schema.normalize(name);
        }
        self.validate()?;
        debug!(
            default_schema = %self.default_schema,
            schemas = self.schemas.len(),
            "Loaded catalog model"
        );
        Ok(self)
    }
}
