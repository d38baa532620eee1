// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sqltype
//!
//! This crate provides common testing components including:
//! - A mock catalog with a builder for quick test setup
//! - Sample schema models, in code and as a YAML definition
//! - Assertions over name-lookup outcomes
//! - One-call tracing setup for tests

pub mod assertions;
pub mod fixtures;
pub mod logging;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::ResolutionAssertions;
pub use fixtures::ModelFixtures;
pub use logging::init_tracing;
pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
