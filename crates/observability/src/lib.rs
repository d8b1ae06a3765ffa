//! Tracing and logging setup shared by binaries and tests.
//!
//! Basket operations log through `tracing` macros only; nothing is printed
//! until a subscriber is installed with one of these functions.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LOG_FORMAT_ENV, LogFormat};

/// Initialize process-wide logging (JSON unless `STOW_LOG_FORMAT` says
/// otherwise).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}

/// Install a human-readable subscriber writing through the test harness.
pub fn init_for_tests() {
    self::tracing::init_test();
}
