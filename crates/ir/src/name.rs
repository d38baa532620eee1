// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Object and column names
//!
//! Names as written in SQL text, with their optional qualifiers:
//!
//! ```sql
//! -- ObjectName without and with a schema qualifier
//! users
//! main.users
//!
//! -- ColumnName without and with a table qualifier
//! id
//! u.id
//! main.users.id
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A possibly schema-qualified table, view or CTE name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectName {
    /// Explicit schema qualifier (e.g., `main` in `main.users`)
    pub schema_name: Option<String>,

    /// Object name
    pub object_name: String,
}

impl ObjectName {
    /// Create an unqualified object name
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_ir::ObjectName;
    ///
    /// let name = ObjectName::new("users");
    /// assert!(!name.is_qualified());
    /// assert_eq!(name.to_string(), "users");
    /// ```
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            object_name: object_name.into(),
        }
    }

    /// Create a schema-qualified object name
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_ir::ObjectName;
    ///
    /// let name = ObjectName::qualified("main", "users");
    /// assert!(name.is_qualified());
    /// assert_eq!(name.to_string(), "main.users");
    /// ```
    pub fn qualified(schema_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            schema_name: Some(schema_name.into()),
            object_name: object_name.into(),
        }
    }

    /// Whether an explicit schema qualifier was written
    pub fn is_qualified(&self) -> bool {
        self.schema_name.is_some()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema_name {
            Some(schema) => write!(f, "{}.{}", schema, self.object_name),
            None => write!(f, "{}", self.object_name),
        }
    }
}

impl From<&str> for ObjectName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A possibly table-qualified column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnName {
    /// Table part (e.g., `u` in `u.id`), itself possibly schema-qualified
    pub table: Option<ObjectName>,

    /// Column name
    pub column_name: String,
}

impl ColumnName {
    /// Create an unqualified column reference
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            table: None,
            column_name: column_name.into(),
        }
    }

    /// Create a table-qualified column reference
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_ir::{ColumnName, ObjectName};
    ///
    /// let col = ColumnName::qualified("u", "id");
    /// assert_eq!(col.table, Some(ObjectName::new("u")));
    /// assert_eq!(col.to_string(), "u.id");
    /// ```
    pub fn qualified(table: impl Into<ObjectName>, column_name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column_name: column_name.into(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.table.is_some()
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column_name),
            None => write!(f, "{}", self.column_name),
        }
    }
}
