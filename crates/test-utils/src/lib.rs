//! Shared helpers for smake's integration tests.
//!
//! - [`builders::GraphBuilder`] assembles recipe graphs over a
//!   [`smake::fs::mock::MockFileSystem`].
//! - [`recording_action::RecordingAction`] logs every invocation so tests
//!   can assert what was rebuilt and in which order.

pub mod builders;
pub mod recording_action;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Route engine logs into the test harness' captured output.
///
/// Captured output only shows up for failing tests (or with
/// `--nocapture`). `SMAKE_TEST_LOG` takes filter directives, default
/// `smake=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = std::env::var("SMAKE_TEST_LOG")
            .ok()
            .and_then(|s| EnvFilter::try_new(s).ok())
            .unwrap_or_else(|| EnvFilter::new("smake=debug"));

        // Another test binary helper may already have installed one.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
