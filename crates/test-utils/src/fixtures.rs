// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Sample catalog models for testing
//!
//! The `main` schema holds a small shop:
//!
//! | object        | kind  | reads                  |
//! |---------------|-------|------------------------|
//! | `users`       | table |                        |
//! | `orders`      | table |                        |
//! | `products`    | table |                        |
//! | `user_orders` | view  | `users`, `orders`      |
//! | `big_spenders`| view  | `user_orders`, `users` |
//!
//! The `archive` schema holds an older `users` table with different columns,
//! so qualified and unqualified lookups of `users` can be told apart.

use sqltype_catalog::{Model, Schema, SchemaTable, SchemaView};
use sqltype_ir::{ColumnType, CoreColumnType};

/// Sample schema models
pub struct ModelFixtures;

impl ModelFixtures {
    pub fn users() -> SchemaTable {
        SchemaTable::new("users")
            .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
            .with_column("email", ColumnType::not_null(CoreColumnType::String))
            .with_column("name", ColumnType::nullable(CoreColumnType::String))
            .with_column("created_at", ColumnType::nullable(CoreColumnType::String))
    }

    pub fn orders() -> SchemaTable {
        SchemaTable::new("orders")
            .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
            .with_column("user_id", ColumnType::not_null(CoreColumnType::Integer))
            .with_column("total", ColumnType::nullable(CoreColumnType::Float))
            .with_column("status", ColumnType::not_null(CoreColumnType::String))
    }

    pub fn products() -> SchemaTable {
        SchemaTable::new("products")
            .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
            .with_column("name", ColumnType::not_null(CoreColumnType::String))
            .with_column("price", ColumnType::not_null(CoreColumnType::Float))
            .with_column("image", ColumnType::nullable(CoreColumnType::Blob))
    }

    /// `SELECT u.name, o.total FROM users u JOIN orders o ON u.id = o.user_id`
    pub fn user_orders() -> SchemaView {
        SchemaView::new("user_orders")
            .with_column("name", ColumnType::nullable(CoreColumnType::String))
            .with_column("total", ColumnType::nullable(CoreColumnType::Float))
            .with_reference("users")
            .with_reference("orders")
    }

    /// A view over another view
    pub fn big_spenders() -> SchemaView {
        SchemaView::new("big_spenders")
            .with_column("name", ColumnType::nullable(CoreColumnType::String))
            .with_column("email", ColumnType::not_null(CoreColumnType::String))
            .with_reference("user_orders")
            .with_reference("users")
    }

    pub fn archive_schema() -> Schema {
        Schema::new("archive").with_table(
            SchemaTable::new("users")
                .with_primary_key("legacy_id", ColumnType::not_null(CoreColumnType::Integer))
                .with_column("full_name", ColumnType::nullable(CoreColumnType::String)),
        )
    }

    /// Everything above in one model with `main` as the default schema
    pub fn sample_model() -> Model {
        Model::new("main")
            .with_table(Self::users())
            .with_table(Self::orders())
            .with_table(Self::products())
            .with_view(Self::user_orders())
            .with_view(Self::big_spenders())
            .with_schema(Self::archive_schema())
    }

    /// A definition file describing a subset of [`ModelFixtures::sample_model`]
    pub const fn sample_model_yaml() -> &'static str {
        r#"
default_schema: main
schemas:
  main:
    tables:
      users:
        columns:
          - column_name: id
            column_type: { type: Integer, nullable: false }
            primary_key: true
          - column_name: email
            column_type: { type: String, nullable: false }
      orders:
        columns:
          - column_name: id
            column_type: { type: Integer, nullable: false }
            primary_key: true
          - column_name: user_id
            column_type: { type: Integer, nullable: false }
          - column_name: total
            column_type: { type: Float, nullable: true }
    views:
      user_orders:
        columns:
          - column_name: email
            column_type: { type: String, nullable: false }
          - column_name: total
            column_type: { type: Float, nullable: true }
        references:
          - object_name: users
          - object_name: orders
  archive:
    tables:
      users:
        columns:
          - column_name: legacy_id
            column_type: { type: Integer, nullable: false }
            primary_key: true
"#
    }
}
