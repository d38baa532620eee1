// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Column types
//!
//! The closed set of core storage types and the fully resolved column type.
//! Shared by the catalog (declared column types) and the type checker
//! (the target every inferred type resolves to).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Core storage type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoreColumnType {
    Integer,
    Float,
    String,
    Blob,
    Boolean,
    /// Unconstrained; compatible with every other core type
    Any,
}

impl fmt::Display for CoreColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoreColumnType::Integer => "INTEGER",
            CoreColumnType::Float => "REAL",
            CoreColumnType::String => "TEXT",
            CoreColumnType::Blob => "BLOB",
            CoreColumnType::Boolean => "BOOLEAN",
            CoreColumnType::Any => "ANY",
        };
        f.write_str(name)
    }
}

/// A fully resolved column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnType {
    pub nullable: bool,
    #[serde(rename = "type")]
    pub ty: CoreColumnType,
}

impl ColumnType {
    pub fn new(ty: CoreColumnType, nullable: bool) -> Self {
        Self { nullable, ty }
    }

    /// Nullable column of the given core type
    pub fn nullable(ty: CoreColumnType) -> Self {
        Self::new(ty, true)
    }

    /// `NOT NULL` column of the given core type
    pub fn not_null(ty: CoreColumnType) -> Self {
        Self::new(ty, false)
    }

    /// Same nullability, different core type
    pub fn with_type(self, ty: CoreColumnType) -> Self {
        Self { ty, ..self }
    }

    /// Same core type, different nullability
    pub fn with_nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{} NULL", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}
