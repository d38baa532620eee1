// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqltype - Catalog Layer
//!
//! This crate provides the schema catalog the type checker resolves table
//! and view names against.
//!
//! ## Architecture
//!
//! - **Model**: [`Model`] → [`Schema`] → [`SchemaTable`] / [`SchemaView`], plain data
//! - **Sources**: the async [`Catalog`] trait produces a [`Model`]
//! - **Static catalogs**: [`StaticCatalog`] loads a model from YAML or JSON
//!
//! ## Usage
//!
//! ```rust
//! use sqltype_catalog::{Model, SchemaObject, SchemaTable, SchemaView};
//! use sqltype_ir::{ColumnType, CoreColumnType};
//!
//! let int = ColumnType::not_null(CoreColumnType::Integer);
//! let model = Model::new("main")
//!     .with_table(SchemaTable::new("users").with_primary_key("id", int))
//!     .with_view(SchemaView::new("user_ids").with_column("id", int).with_reference("users"));
//!
//! assert!(model.validate().is_ok());
//! assert!(matches!(model.object("main", "user_ids"), Some(SchemaObject::View(_))));
//! ```

pub mod error;
pub mod model;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use model::{Model, Schema, SchemaColumn, SchemaObject, SchemaTable, SchemaView, ViewColumn};
pub use r#static::StaticCatalog;
pub use r#trait::Catalog;
