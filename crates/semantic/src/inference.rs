// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Type inference context
//!
//! [`TypeInferenceContext`] is the only contact point between inferred types
//! and the constraint solver. Expression typing allocates variables, records
//! constraints through [`TypeInferenceContext::unify`], and finally forces
//! every result column and parameter to a [`ColumnType`].
//!
//! [`UnificationContext`] is the solver used by this crate: a substitution
//! map from variable ids to the type each variable was bound to.
//!
//! ```
//! use sqltype_ir::{BindParameter, ColumnType, CoreColumnType, Literal};
//! use sqltype_semantic::{InferredType, TypeInferenceContext, UnificationContext};
//!
//! let mut ctx = UnificationContext::new();
//! let param = ctx.variable(&BindParameter::Named(":limit".into()));
//! ctx.unify(&param, &InferredType::of_literal(&Literal::integer(10))).unwrap();
//!
//! assert_eq!(ctx.concrete(&param), ColumnType::not_null(CoreColumnType::Integer));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use sqltype_ir::{BindParameter, ColumnType, CoreColumnType};
use tracing::trace;

use crate::error::{TypeError, TypeResult};
use crate::types::{InferredType, VariableId};

/// Source of variable ids; shared by every context so ids are never reused
static NEXT_VARIABLE: AtomicU64 = AtomicU64::new(0);

/// Contract of a unification engine
///
/// Methods that record constraints take `&mut self`: a context belongs to one
/// statement's type-checking pass and is not shared between concurrent
/// compilations. An implementation that wants to be shared must synchronize
/// internally and say so.
pub trait TypeInferenceContext {
    /// Allocate a fresh, unconstrained variable
    fn anonymous_variable(&mut self) -> InferredType;

    /// The variable standing for a bind parameter, created on first use
    ///
    /// Repeated calls with the same parameter return types that resolve identically.
    fn variable(&mut self, parameter: &BindParameter) -> InferredType;

    /// Constrain `a` and `b` to describe the same value
    ///
    /// Returns the most specific combined type, or `TypeError::Incompatible`
    /// when no value can have both types.
    fn unify(&mut self, a: &InferredType, b: &InferredType) -> TypeResult<InferredType>;

    /// Force full resolution; total and deterministic
    fn concrete(&self, inferred: &InferredType) -> ColumnType;

    /// Bind parameters seen so far, in first-use order
    fn parameters(&self) -> Vec<BindParameter>;
}

/// Substitution-based [`TypeInferenceContext`]
///
/// Resolution policy for [`TypeInferenceContext::concrete`]:
///
/// - an unbound variable is a nullable `Any`
/// - `OneOf` resolves to its first alternative
/// - `DependentlyNull` takes its core type from `then_null` and its
///   nullability from `if_null`
#[derive(Debug, Default, Clone)]
pub struct UnificationContext {
    bindings: HashMap<VariableId, InferredType>,
    parameters: Vec<(BindParameter, InferredType)>,
}

impl UnificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind parameters with their resolved types, in first-use order
    pub fn parameter_types(&self) -> Vec<(BindParameter, ColumnType)> {
        self.parameters
            .iter()
            .map(|(parameter, ty)| (parameter.clone(), self.concrete(ty)))
            .collect()
    }

    /// Follow variable bindings until reaching a non-variable or an unbound variable
    fn resolve(&self, ty: &InferredType) -> InferredType {
        let mut current = ty.clone();
        while let InferredType::Variable(id) = current {
            match self.bindings.get(&id) {
                Some(bound) => current = bound.clone(),
                None => break,
            }
        }
        current
    }

    /// Whether `id` occurs in `ty`, following the bindings of every other variable
    fn occurs(&self, id: VariableId, ty: &InferredType) -> bool {
        match ty {
            InferredType::Variable(other) if *other == id => true,
            InferredType::Variable(other) => self
                .bindings
                .get(other)
                .is_some_and(|bound| self.occurs(id, bound)),
            InferredType::Concrete(_) | InferredType::OneOf(_) => false,
            InferredType::DependentlyNull { if_null, then_null } => {
                self.occurs(id, if_null) || self.occurs(id, then_null)
            }
        }
    }

    /// Last variable of the binding chain starting at `ty`, if `ty` is a variable
    fn root_variable(&self, ty: &InferredType) -> Option<VariableId> {
        let &InferredType::Variable(mut root) = ty else {
            return None;
        };
        while let Some(InferredType::Variable(next)) = self.bindings.get(&root) {
            root = *next;
        }
        Some(root)
    }

    fn unify_resolved(&mut self, a: InferredType, b: InferredType) -> TypeResult<InferredType> {
        trace!(left = %a, right = %b, "Unifying");

        match (a, b) {
            (InferredType::Variable(x), InferredType::Variable(y)) if x == y => {
                Ok(InferredType::Variable(x))
            }
            (InferredType::Variable(x), other) | (other, InferredType::Variable(x)) => {
                self.bind(x, other)
            }
            (InferredType::Concrete(left), InferredType::Concrete(right)) => {
                unify_columns(left, right)
                    .map(InferredType::Concrete)
                    .ok_or_else(|| incompatible(&left, &right))
            }
            (InferredType::OneOf(alternatives), InferredType::Concrete(ty))
            | (InferredType::Concrete(ty), InferredType::OneOf(alternatives)) => {
                narrow(&alternatives, &[ty])
                    .ok_or_else(|| incompatible(&InferredType::OneOf(alternatives.clone()), &ty))
            }
            (InferredType::OneOf(left), InferredType::OneOf(right)) => narrow(&left, &right)
                .ok_or_else(|| {
                    incompatible(&InferredType::OneOf(left.clone()), &InferredType::OneOf(right.clone()))
                }),
            // Two casts nest: the result is null if either cast input is null
            (InferredType::DependentlyNull { if_null, then_null }, other)
            | (other, InferredType::DependentlyNull { if_null, then_null }) => {
                let then_null = self.unify(&then_null, &other)?;
                Ok(InferredType::DependentlyNull {
                    if_null,
                    then_null: Box::new(then_null),
                })
            }
        }
    }

    fn bind(&mut self, id: VariableId, ty: InferredType) -> TypeResult<InferredType> {
        if self.occurs(id, &ty) {
            return Err(TypeError::Incompatible {
                left: InferredType::Variable(id).to_string(),
                right: ty.to_string(),
            });
        }
        trace!(variable = id, bound = %ty, "Binding type variable");
        self.bindings.insert(id, ty.clone());
        Ok(ty)
    }
}

impl TypeInferenceContext for UnificationContext {
    fn anonymous_variable(&mut self) -> InferredType {
        InferredType::Variable(NEXT_VARIABLE.fetch_add(1, Ordering::Relaxed))
    }

    fn variable(&mut self, parameter: &BindParameter) -> InferredType {
        if let Some((_, ty)) = self.parameters.iter().find(|(p, _)| p == parameter) {
            return ty.clone();
        }
        let ty = self.anonymous_variable();
        self.parameters.push((parameter.clone(), ty.clone()));
        ty
    }

    fn unify(&mut self, a: &InferredType, b: &InferredType) -> TypeResult<InferredType> {
        let roots = [self.root_variable(a), self.root_variable(b)];
        let combined = self.unify_resolved(self.resolve(a), self.resolve(b))?;

        // every variable on either side now stands for the combined type
        for id in roots.into_iter().flatten() {
            if combined == InferredType::Variable(id) {
                continue;
            }
            if self.occurs(id, &combined) {
                trace!(variable = id, combined = %combined, "Keeping binding, combined type refers to it");
                continue;
            }
            trace!(variable = id, bound = %combined, "Rebinding type variable");
            self.bindings.insert(id, combined.clone());
        }
        Ok(combined)
    }

    fn concrete(&self, inferred: &InferredType) -> ColumnType {
        match self.resolve(inferred) {
            InferredType::Concrete(ty) => ty,
            InferredType::OneOf(alternatives) => alternatives
                .first()
                .copied()
                .unwrap_or(ColumnType::nullable(CoreColumnType::Any)),
            InferredType::DependentlyNull { if_null, then_null } => {
                let inner = self.concrete(&then_null);
                // a nested cast contributes its own input's nullability
                let inherited = inner.nullable
                    && matches!(self.resolve(&then_null), InferredType::DependentlyNull { .. });
                inner.with_nullable(self.concrete(&if_null).nullable || inherited)
            }
            InferredType::Variable(_) => ColumnType::nullable(CoreColumnType::Any),
        }
    }

    fn parameters(&self) -> Vec<BindParameter> {
        self.parameters.iter().map(|(p, _)| p.clone()).collect()
    }
}

/// Core types are compatible when equal or when either is `Any`
fn unify_core(left: CoreColumnType, right: CoreColumnType) -> Option<CoreColumnType> {
    match (left, right) {
        (CoreColumnType::Any, other) | (other, CoreColumnType::Any) => Some(other),
        (l, r) if l == r => Some(l),
        _ => None,
    }
}

fn unify_columns(left: ColumnType, right: ColumnType) -> Option<ColumnType> {
    unify_core(left.ty, right.ty).map(|ty| ColumnType::new(ty, left.nullable || right.nullable))
}

/// Pairwise intersection of two alternative lists, in `left` order
fn narrow(left: &[ColumnType], right: &[ColumnType]) -> Option<InferredType> {
    let mut matches: Vec<ColumnType> = Vec::new();
    for l in left {
        for r in right {
            if let Some(ty) = unify_columns(*l, *r) {
                if !matches.contains(&ty) {
                    matches.push(ty);
                }
            }
        }
    }

    match matches.len() {
        0 => None,
        1 => Some(InferredType::Concrete(matches[0])),
        _ => Some(InferredType::OneOf(matches)),
    }
}

fn incompatible(left: &impl ToString, right: &impl ToString) -> TypeError {
    TypeError::Incompatible {
        left: left.to_string(),
        right: right.to_string(),
    }
}
