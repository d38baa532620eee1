// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # sqltype - Semantic Analysis Layer
//!
//! This crate assigns types to result columns and resolves table and column
//! names for SQL queries in a SQLite-like dialect.
//!
//! ## Overview
//!
//! - **Type model**: [`InferredType`] may still contain type variables;
//!   [`affinity`] maps free-form type names onto a [`CoreColumnType`](sqltype_ir::CoreColumnType)
//! - **Inference**: [`TypeInferenceContext`] is the only contact point with a
//!   unification engine; [`UnificationContext`] is the bundled one
//! - **Query columns**: [`InferredQuery`] with ambiguity-aware lookup
//! - **FROM clauses**: [`InferredFromClause`] maps sources to their columns
//! - **Scopes**: [`InferredSelectScope`] resolves names across subqueries,
//!   CTEs and schemas
//!
//! Lookups return a [`NameResolution`], operations that can fail return a
//! [`TypeResult`]. Neither is ever turned into a located [`SemanticError`]
//! inside this crate; callers do that with [`result_at`] and [`found_at`].
//!
//! ## Example
//!
//! ```rust
//! use sqltype_catalog::{Model, SchemaTable};
//! use sqltype_ir::{ColumnName, ColumnType, CoreColumnType, ObjectName, SourceSpan};
//! use sqltype_semantic::{found_at, ErrorKind, InferredFromClause, InferredSelectScope};
//!
//! let model = Model::new("main").with_table(
//!     SchemaTable::new("users")
//!         .with_primary_key("id", ColumnType::not_null(CoreColumnType::Integer))
//!         .with_column("email", ColumnType::nullable(CoreColumnType::String)),
//! );
//!
//! // SELECT email FROM users AS u
//! let mut scope = InferredSelectScope::root(&model);
//! let users = scope
//!     .resolve_table_reference(&ObjectName::new("users"), &mut |_| {})
//!     .found()
//!     .unwrap();
//! let mut from = InferredFromClause::new();
//! from.add_source("u", users).unwrap();
//! scope.set_from_clause(from);
//!
//! let email = found_at(SourceSpan::new(7, 12), scope.resolve_column_reference(&ColumnName::new("email"))).unwrap();
//! assert_eq!(email.qualified_name(), "u.email");
//!
//! let err = found_at(SourceSpan::new(7, 12), scope.resolve_column_reference(&ColumnName::new("emial"))).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! assert!(err.to_string().contains("did you mean: email?"));
//! ```

pub mod error;
pub mod from_clause;
pub mod inference;
pub mod query;
pub mod resolution;
pub mod scope;
pub mod types;

// Re-export commonly used types
pub use error::{found_at, result_at, ErrorKind, SemanticError, SemanticResult, TypeError, TypeResult};
pub use from_clause::InferredFromClause;
pub use inference::{TypeInferenceContext, UnificationContext};
pub use query::{InferredQuery, InferredQueryColumn};
pub use resolution::{suggest, NameResolution, ResolutionConfig};
pub use scope::InferredSelectScope;
pub use types::{affinity, InferredType, VariableId, AFFINITY_RULES};
