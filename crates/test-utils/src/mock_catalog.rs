// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup

use sqltype_catalog::{Catalog, CatalogError, CatalogResult, Model, Schema, SchemaTable, SchemaView};

use crate::fixtures::ModelFixtures;

/// In-memory mock catalog for testing
#[derive(Debug, Clone)]
pub struct MockCatalog {
    model: Model,
    fail_with: Option<CatalogError>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a catalog with an empty `main` schema
    pub fn new() -> Self {
        Self {
            model: Model::new("main"),
            fail_with: None,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn load_model(&self) -> CatalogResult<Model> {
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(self.model.clone()),
        }
    }
}

/// Builder for creating mock catalogs with a fluent API
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            catalog: MockCatalog::new(),
        }
    }

    /// Use [`ModelFixtures::sample_model`]
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog.model = ModelFixtures::sample_model();
        self
    }

    /// Add a table to the default schema
    pub fn with_table(mut self, table: SchemaTable) -> Self {
        self.catalog.model = self.catalog.model.with_table(table);
        self
    }

    /// Add a view to the default schema
    pub fn with_view(mut self, view: SchemaView) -> Self {
        self.catalog.model = self.catalog.model.with_view(view);
        self
    }

    /// Attach or replace a whole schema
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.catalog.model = self.catalog.model.with_schema(schema);
        self
    }

    /// Make every load fail with `error`
    pub fn failing_with(mut self, error: CatalogError) -> Self {
        self.catalog.fail_with = Some(error);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}
