//! One-time tracing setup for unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Filter directive from `TEST_LOG`, then `RUST_LOG`, then `warn`.
fn test_filter() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install the test subscriber. Safe to call from every test binary and
/// every test; only the first call does anything.
///
/// Output goes through the test writer so the harness captures it per test.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        // Another subscriber may already be installed; keep it.
        let _ = fmt()
            .with_env_filter(test_filter())
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init();
    });
}
