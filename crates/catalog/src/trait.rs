// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for schema sources
//!
//! The type checker works on an in-memory [`Model`]. Where that model comes
//! from (a definition file, a live database, a test fixture) is hidden behind
//! this async trait.

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Model, SchemaTable};

/// Source of a schema [`Model`]
///
/// # Examples
///
/// ```rust,ignore
/// use sqltype_catalog::{Catalog, CatalogError};
///
/// async fn table_names(catalog: &impl Catalog) -> Result<Vec<String>, CatalogError> {
///     let tables = catalog.list_tables("main").await?;
///     Ok(tables.into_iter().map(|t| t.table_name).collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Load the full model
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SerializationError` if the source cannot be decoded.
    /// Returns `CatalogError::InvalidSchema` if the default schema is missing.
    async fn load_model(&self) -> CatalogResult<Model>;

    /// List the base tables of one schema
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSchema` if the schema doesn't exist.
    async fn list_tables(&self, schema: &str) -> CatalogResult<Vec<SchemaTable>> {
        let model = self.load_model().await?;
        model
            .schema(schema)
            .map(|s| s.tables.values().cloned().collect())
            .ok_or_else(|| CatalogError::InvalidSchema(schema.to_string()))
    }
}
