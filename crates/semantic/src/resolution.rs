// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Name resolution results
//!
//! Every lookup (column in a query, table in a FROM clause, table or column
//! in a scope chain) returns a [`NameResolution`]:
//!
//! - `Found`: exactly one match
//! - `NotFound`: no match; a caller may retry in an enclosing scope
//! - `Ambiguous`: more than one match; final, never retried elsewhere
//!
//! This module also provides "did you mean" suggestions for names that were
//! not found, using Levenshtein distance over the names that were visible.

use serde::{Deserialize, Serialize};
use std::cmp::min;

/// Tri-state result of a name lookup
#[derive(Debug, Clone, PartialEq)]
pub enum NameResolution<T> {
    /// Exactly one match
    Found(T),
    /// No match
    NotFound(String),
    /// Several matches
    Ambiguous(String),
}

impl<T> NameResolution<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, NameResolution::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NameResolution::NotFound(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, NameResolution::Ambiguous(_))
    }

    /// Extract the match, dropping any failure message
    pub fn found(self) -> Option<T> {
        match self {
            NameResolution::Found(value) => Some(value),
            NameResolution::NotFound(_) | NameResolution::Ambiguous(_) => None,
        }
    }

    /// Failure message, if this is not `Found`
    pub fn message(&self) -> Option<&str> {
        match self {
            NameResolution::Found(_) => None,
            NameResolution::NotFound(message) | NameResolution::Ambiguous(message) => {
                Some(message)
            }
        }
    }

    pub fn as_ref(&self) -> NameResolution<&T> {
        match self {
            NameResolution::Found(value) => NameResolution::Found(value),
            NameResolution::NotFound(message) => NameResolution::NotFound(message.clone()),
            NameResolution::Ambiguous(message) => NameResolution::Ambiguous(message.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NameResolution<U> {
        match self {
            NameResolution::Found(value) => NameResolution::Found(f(value)),
            NameResolution::NotFound(message) => NameResolution::NotFound(message),
            NameResolution::Ambiguous(message) => NameResolution::Ambiguous(message),
        }
    }

    /// Chain a second lookup on success; failures propagate unchanged
    pub fn and_then<U>(self, f: impl FnOnce(T) -> NameResolution<U>) -> NameResolution<U> {
        match self {
            NameResolution::Found(value) => f(value),
            NameResolution::NotFound(message) => NameResolution::NotFound(message),
            NameResolution::Ambiguous(message) => NameResolution::Ambiguous(message),
        }
    }

    /// Retry on `NotFound` only; `Found` and `Ambiguous` are returned as is
    pub fn or_else_not_found(self, f: impl FnOnce(String) -> NameResolution<T>) -> Self {
        match self {
            NameResolution::NotFound(message) => f(message),
            other => other,
        }
    }
}

/// Configuration for "did you mean" suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Append suggestions to not-found messages (default: true)
    pub suggestions: bool,
    /// Maximum Levenshtein distance for a suggestion (default: 2)
    pub max_distance: usize,
    /// Maximum number of suggestions per message (default: 3)
    pub max_suggestions: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            suggestions: true,
            max_distance: 2,
            max_suggestions: 3,
        }
    }
}

/// Visible names close to `name`, nearest first
///
/// Comparison is case-insensitive, so a name that differs only in case is
/// always suggested.
pub fn suggest<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    config: &ResolutionConfig,
) -> Vec<String> {
    if !config.suggestions || config.max_suggestions == 0 {
        return Vec::new();
    }

    let wanted = name.to_lowercase();
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .map(|candidate| (levenshtein_distance(&wanted, &candidate.to_lowercase()), candidate))
        .filter(|(distance, _)| *distance <= config.max_distance)
        .collect();

    scored.sort();
    scored.dedup_by(|a, b| a.1 == b.1);

    scored
        .into_iter()
        .take(config.max_suggestions)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Append suggestions to a not-found message
pub(crate) fn with_suggestions(message: String, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        message
    } else {
        format!("{} (did you mean: {}?)", message, suggestions.join(", "))
    }
}

/// Levenshtein edit distance
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    // Use the smaller string for the inner array to save space
    if m < n {
        return levenshtein_distance(b, a);
    }

    let mut previous: Vec<usize> = (0..=n).collect();

    for (i, &ca) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1];

        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            current.push(min(
                min(previous[j + 1] + 1, current[j] + 1),
                previous[j] + cost,
            ));
        }

        previous = current;
    }

    previous[n]
}
