// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expression leaves
//!
//! The parts of an expression tree the type checker looks at directly:
//!
//! - [`Literal`]: constants (`NULL`, `'text'`, `x'00ff'`, `42`, `1.5`, `CURRENT_DATE`)
//! - [`BindParameter`]: query parameters (`?`, `?3`, `:name`, `@name`, `$name`)
//! - [`TypeName`]: the free-form type name of a `CAST(... AS <type-name>)` or a
//!   column definition, kept as its raw tokens

use serde::{Deserialize, Serialize};
use std::fmt;

/// A SQL literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// `NULL`
    Null,
    /// `CURRENT_TIME`
    CurrentTime,
    /// `CURRENT_DATE`
    CurrentDate,
    /// `CURRENT_TIMESTAMP`
    CurrentTimestamp,
    /// `'text'`
    String(String),
    /// `x'00ff'`
    Blob(Vec<u8>),
    /// Numeric constant
    Numeric(NumericLiteral),
}

/// A numeric literal, split by whether it was written with a fractional part or exponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericLiteral {
    Integer(i64),
    Float(f64),
}

impl Literal {
    pub fn integer(value: i64) -> Self {
        Literal::Numeric(NumericLiteral::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Literal::Numeric(NumericLiteral::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }
}

/// A bind parameter
///
/// Identity is the variant plus its payload: every `:name` in a statement is
/// the same parameter, and so is every `?3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindParameter {
    /// `?` or `?NNN`; the parser numbers bare `?` markers left to right
    Positional(u32),
    /// `:name`, `@name` or `$name` (prefix included)
    Named(String),
}

impl fmt::Display for BindParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindParameter::Positional(index) => write!(f, "?{}", index),
            BindParameter::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A free-form SQL type name, as the tokens the parser saw
///
/// `VARCHAR(10)`, `UNSIGNED BIG INT` and `DOUBLE PRECISION` are all valid
/// type names; none of them is interpreted until affinity derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    pub tokens: Vec<String>,
}

impl TypeName {
    /// Create a type name from its tokens
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a written type name on whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use sqltype_ir::TypeName;
    ///
    /// let name = TypeName::parse("UNSIGNED  BIG INT");
    /// assert_eq!(name.tokens, vec!["UNSIGNED", "BIG", "INT"]);
    /// assert_eq!(name.joined(), "UNSIGNED BIG INT");
    /// ```
    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    /// Tokens concatenated with single spaces
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}
