// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Inferred types
//!
//! [`InferredType`] is what the type checker knows about an expression while
//! it is still checking the statement. Every inferred type eventually resolves
//! to a [`ColumnType`] through a [`TypeInferenceContext`].
//!
//! ## Affinity
//!
//! Declared type names are free-form (`VARCHAR(10)`, `UNSIGNED BIG INT`,
//! `DOUBLE PRECISION`). Their core type is derived by scanning
//! [`AFFINITY_RULES`] in order for the first rule whose substring occurs in
//! the upper-cased name:
//!
//! ```
//! use sqltype_ir::{CoreColumnType, TypeName};
//! use sqltype_semantic::affinity;
//!
//! assert_eq!(affinity(&TypeName::parse("VARCHAR(10)")), CoreColumnType::String);
//! assert_eq!(affinity(&TypeName::parse("BIGINT")), CoreColumnType::Integer);
//! assert_eq!(affinity(&TypeName::parse("NUMERIC")), CoreColumnType::Float);
//! ```
//!
//! [`TypeInferenceContext`]: crate::inference::TypeInferenceContext

use serde::{Deserialize, Serialize};
use sqltype_ir::{ColumnType, CoreColumnType, Literal, NumericLiteral, TypeName};
use std::fmt;

/// Identifier of a type variable
pub type VariableId = u64;

/// What is known about an expression's type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferredType {
    /// Fully known
    Concrete(ColumnType),

    /// One of several alternatives, narrowed by later unification
    OneOf(Vec<ColumnType>),

    /// Core type fixed by `then_null`, nullability taken from `if_null` once resolved
    DependentlyNull {
        if_null: Box<InferredType>,
        then_null: Box<InferredType>,
    },

    /// Unresolved placeholder owned by an inference context
    Variable(VariableId),
}

/// Type-name substrings and the affinity they select, in match order
///
/// Order matters: `"INT"` is checked before `"CHAR"`, so a name containing
/// both (e.g. `CHARINT`) has integer affinity.
pub const AFFINITY_RULES: [(&str, CoreColumnType); 8] = [
    ("INT", CoreColumnType::Integer),
    ("CHAR", CoreColumnType::String),
    ("CLOB", CoreColumnType::String),
    ("TEXT", CoreColumnType::String),
    ("BLOB", CoreColumnType::Blob),
    ("REAL", CoreColumnType::Float),
    ("FLOA", CoreColumnType::Float),
    ("DOUB", CoreColumnType::Float),
];

/// Core type selected by a declared type name
///
/// Falls back to `Float` (numeric affinity) when no rule matches.
pub fn affinity(type_name: &TypeName) -> CoreColumnType {
    let name = type_name.joined().to_ascii_uppercase();
    AFFINITY_RULES
        .iter()
        .find(|(pattern, _)| name.contains(pattern))
        .map(|(_, affinity)| *affinity)
        .unwrap_or(CoreColumnType::Float)
}

impl InferredType {
    pub fn concrete(ty: ColumnType) -> Self {
        InferredType::Concrete(ty)
    }

    pub fn not_null(ty: CoreColumnType) -> Self {
        InferredType::Concrete(ColumnType::not_null(ty))
    }

    pub fn nullable(ty: CoreColumnType) -> Self {
        InferredType::Concrete(ColumnType::nullable(ty))
    }

    pub fn dependently_null(if_null: InferredType, then_null: InferredType) -> Self {
        InferredType::DependentlyNull {
            if_null: Box::new(if_null),
            then_null: Box::new(then_null),
        }
    }

    /// Type of a literal constant
    pub fn of_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Null => InferredType::nullable(CoreColumnType::Any),
            Literal::CurrentTime
            | Literal::CurrentDate
            | Literal::CurrentTimestamp
            | Literal::String(_) => InferredType::not_null(CoreColumnType::String),
            Literal::Blob(_) => InferredType::not_null(CoreColumnType::Blob),
            Literal::Numeric(NumericLiteral::Integer(_)) => InferredType::OneOf(vec![
                ColumnType::not_null(CoreColumnType::Integer),
                ColumnType::not_null(CoreColumnType::Float),
            ]),
            Literal::Numeric(NumericLiteral::Float(_)) => {
                InferredType::not_null(CoreColumnType::Float)
            }
        }
    }

    /// Type of `CAST(input AS type_name)`
    ///
    /// The core type always comes from the type name's affinity. Nullability
    /// follows the input; while the input is unresolved the result stays tied
    /// to it through [`InferredType::DependentlyNull`].
    pub fn of_type_name(type_name: &TypeName, input: InferredType) -> Self {
        let affinity = affinity(type_name);
        match input {
            InferredType::Variable(_) | InferredType::DependentlyNull { .. } => {
                InferredType::dependently_null(input, InferredType::not_null(affinity))
            }
            InferredType::OneOf(alternatives) => InferredType::Concrete(ColumnType::new(
                affinity,
                alternatives.iter().any(|alt| alt.nullable),
            )),
            InferredType::Concrete(ty) => InferredType::Concrete(ty.with_type(affinity)),
        }
    }

    /// Whether `id` occurs anywhere in this type, without following bindings
    pub fn mentions(&self, id: VariableId) -> bool {
        match self {
            InferredType::Variable(other) => *other == id,
            InferredType::Concrete(_) | InferredType::OneOf(_) => false,
            InferredType::DependentlyNull { if_null, then_null } => {
                if_null.mentions(id) || then_null.mentions(id)
            }
        }
    }
}

impl From<ColumnType> for InferredType {
    fn from(ty: ColumnType) -> Self {
        InferredType::Concrete(ty)
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredType::Concrete(ty) => write!(f, "{}", ty),
            InferredType::OneOf(alternatives) => {
                let names: Vec<String> = alternatives.iter().map(ToString::to_string).collect();
                write!(f, "one of ({})", names.join(", "))
            }
            InferredType::DependentlyNull { if_null, then_null } => {
                write!(f, "{} (null if {} is null)", then_null, if_null)
            }
            InferredType::Variable(id) => write!(f, "'t{}", id),
        }
    }
}
