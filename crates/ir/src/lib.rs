// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqltype - Parser Vocabulary
//!
//! The node types the SQL parser hands to the type checker. The type
//! checker never walks raw syntax; it only sees:
//!
//! - **Names**: [`ObjectName`] and [`ColumnName`] with optional qualifiers
//! - **Leaves**: [`Literal`], [`BindParameter`] and [`TypeName`]
//! - **Locations**: [`SourceSpan`] for error reporting
//! - **Column types**: [`CoreColumnType`] and [`ColumnType`], shared with the catalog

pub mod expr;
pub mod name;
pub mod span;
pub mod types;

// Re-export commonly used types
pub use expr::{BindParameter, Literal, NumericLiteral, TypeName};
pub use name::{ColumnName, ObjectName};
pub use span::SourceSpan;
pub use types::{ColumnType, CoreColumnType};
