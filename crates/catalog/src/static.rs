// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! A catalog backed by a fixed model, built in code or loaded from a YAML/JSON
//! definition file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sqltype_catalog::{Catalog, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_file("schema.yaml")?;
//! let model = catalog.load_model().await?;
//! ```

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::model::Model;
use crate::{Catalog, CatalogError, CatalogResult};

/// Catalog with a predefined model
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    model: Model,
}

impl StaticCatalog {
    /// Wrap an existing model
    pub fn new(model: Model) -> CatalogResult<Self> {
        model.validate()?;
        Ok(Self { model })
    }

    /// Parse a YAML definition
    pub fn from_yaml_str(text: &str) -> CatalogResult<Self> {
        Ok(Self {
            model: Model::from_yaml_str(text)?,
        })
    }

    /// Parse a JSON definition
    pub fn from_json_str(text: &str) -> CatalogResult<Self> {
        Ok(Self {
            model: Model::from_json_str(text)?,
        })
    }

    /// Load a definition file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::ConfigurationError(format!("cannot read {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loading static catalog");

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn load_model(&self) -> CatalogResult<Model> {
        Ok(self.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaTable;
    use sqltype_ir::{ColumnType, CoreColumnType};
    use std::io::Write;

    const YAML: &str = r#"
default_schema: main
schemas:
  main:
    tables:
      users:
        columns:
          - column_name: id
            column_type: { type: Integer, nullable: false }
"#;

    #[tokio::test]
    async fn test_static_catalog_load_model() {
        let catalog = StaticCatalog::from_yaml_str(YAML).unwrap();
        let model = catalog.load_model().await.unwrap();
        assert_eq!(model.default_schema, "main");
    }

    #[tokio::test]
    async fn test_static_catalog_list_tables() {
        let model = Model::new("main").with_table(
            SchemaTable::new("users").with_column("id", ColumnType::not_null(CoreColumnType::Integer)),
        );
        let catalog = StaticCatalog::new(model).unwrap();
        let tables = catalog.list_tables("main").await.unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table_name, "users");
    }

    #[tokio::test]
    async fn test_static_catalog_unknown_schema() {
        let catalog = StaticCatalog::from_yaml_str(YAML).unwrap();
        let result = catalog.list_tables("temp").await;
        assert!(matches!(result, Err(CatalogError::InvalidSchema(_))));
    }

    #[test]
    fn test_static_catalog_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"default_schema":"main","schemas":{{"main":{{"tables":{{}}}}}}}}"#
        )
        .unwrap();

        let catalog = StaticCatalog::from_file(file.path()).unwrap();
        assert!(catalog.model().default_schema().is_some());
    }

    #[test]
    fn test_static_catalog_missing_file() {
        let result = StaticCatalog::from_file("/nonexistent/schema.yaml");
        assert!(matches!(result, Err(CatalogError::ConfigurationError(_))));
    }
}
