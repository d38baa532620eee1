// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for semantic analysis
//!
//! Two layers of errors:
//!
//! - [`TypeError`]: returned by operations with a binary outcome (unification,
//!   column renaming, FROM-clause construction). Never carries a location.
//! - [`SemanticError`]: a failure pinned to a [`SourceSpan`]. Produced only by
//!   [`result_at`] and [`found_at`], at the boundary to the rest of the compiler.
//!
//! Name lookups return [`NameResolution`] rather than an error type, since a
//! missing name and an ambiguous one are handled differently by callers.

use sqltype_ir::SourceSpan;
use thiserror::Error;

use crate::resolution::NameResolution;

/// Result type alias for type-level operations
pub type TypeResult<T> = Result<T, TypeError>;

/// Result type alias for located semantic operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Failure of a type-level operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Two types cannot describe the same value
    #[error("Type mismatch: {left} is not compatible with {right}")]
    Incompatible { left: String, right: String },

    /// Column list length differs from the query's column count
    #[error("Column count mismatch: query has {expected} columns but {found} names were given")]
    ArityMismatch { expected: usize, found: usize },

    /// Two FROM-clause sources share a name
    #[error("Duplicate table name or alias in FROM clause: {name}")]
    DuplicateSource { name: String },
}

/// Failure category, as seen by callers that need to branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Ambiguous,
    Incompatible,
    ArityMismatch,
}

impl TypeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeError::Incompatible { .. } => ErrorKind::Incompatible,
            TypeError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            // a repeated source name makes that name ambiguous
            TypeError::DuplicateSource { .. } => ErrorKind::Ambiguous,
        }
    }
}

/// A fatal, source-located error reported to the surrounding compiler
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Name lookup found nothing
    #[error("{span}: {message}")]
    NotFound { span: SourceSpan, message: String },

    /// Name lookup found more than one candidate
    #[error("{span}: {message}")]
    Ambiguous { span: SourceSpan, message: String },

    /// A type-level operation failed
    #[error("{span}: {error}")]
    Type { span: SourceSpan, error: TypeError },
}

impl SemanticError {
    pub fn span(&self) -> SourceSpan {
        match self {
            SemanticError::NotFound { span, .. }
            | SemanticError::Ambiguous { span, .. }
            | SemanticError::Type { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SemanticError::NotFound { .. } => ErrorKind::NotFound,
            SemanticError::Ambiguous { .. } => ErrorKind::Ambiguous,
            SemanticError::Type { error, .. } => error.kind(),
        }
    }
}

/// Attach `span` to the failure branch of a type-level result
///
/// # Examples
///
/// ```
/// use sqltype_ir::SourceSpan;
/// use sqltype_semantic::{result_at, ErrorKind, TypeError};
///
/// let failed: Result<(), TypeError> = Err(TypeError::ArityMismatch { expected: 2, found: 3 });
/// let err = result_at(SourceSpan::new(7, 12), failed).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::ArityMismatch);
/// assert_eq!(err.span(), SourceSpan::new(7, 12));
/// ```
pub fn result_at<T>(span: SourceSpan, result: TypeResult<T>) -> SemanticResult<T> {
    result.map_err(|error| SemanticError::Type { span, error })
}

/// Attach `span` to the failure branches of a name lookup
pub fn found_at<T>(span: SourceSpan, resolution: NameResolution<T>) -> SemanticResult<T> {
    match resolution {
        NameResolution::Found(value) => Ok(value),
        NameResolution::NotFound(message) => Err(SemanticError::NotFound { span, message }),
        NameResolution::Ambiguous(message) => Err(SemanticError::Ambiguous { span, message }),
    }
}
