// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Tracing setup for tests
//!
//! Output is filtered by `RUST_LOG` and captured by the test harness, so a
//! failing test shows the resolution trace that led to it:
//!
//! ```text
//! RUST_LOG=sqltype_semantic=trace cargo test -p sqltype-semantic
//! ```

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a global `fmt` subscriber
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();

    // Another test may already have installed one
    let _ = tracing::subscriber::set_global_default(subscriber);
}
