// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertions over name-lookup outcomes

use std::fmt::Debug;

use sqltype_semantic::{ErrorKind, NameResolution, SemanticError};

/// Custom assertion helpers for name resolution
pub struct ResolutionAssertions;

impl ResolutionAssertions {
    /// Assert that a lookup succeeded and return the match
    pub fn assert_found<T: Debug>(resolution: NameResolution<T>) -> T {
        match resolution {
            NameResolution::Found(value) => value,
            other => panic!("Expected Found, got {:?}", other),
        }
    }

    /// Assert that a lookup found nothing and its message mentions `name`
    pub fn assert_not_found<T: Debug>(resolution: &NameResolution<T>, name: &str) {
        assert!(resolution.is_not_found(), "Expected NotFound, got {:?}", resolution);
        Self::assert_message_contains(resolution, name);
    }

    /// Assert that a lookup was ambiguous and its message mentions every candidate
    pub fn assert_ambiguous<T: Debug>(resolution: &NameResolution<T>, candidates: &[&str]) {
        assert!(resolution.is_ambiguous(), "Expected Ambiguous, got {:?}", resolution);
        for candidate in candidates {
            Self::assert_message_contains(resolution, candidate);
        }
    }

    /// Assert that the failure message contains `text`
    pub fn assert_message_contains<T: Debug>(resolution: &NameResolution<T>, text: &str) {
        let message = resolution.message().unwrap_or_default();
        assert!(
            message.contains(text),
            "Expected message to contain '{}', found '{}'",
            text,
            message
        );
    }

    /// Assert that a located error has the given kind
    pub fn assert_error_kind(error: &SemanticError, kind: ErrorKind) {
        assert_eq!(error.kind(), kind, "Error kind mismatch for '{}'", error);
    }
}
