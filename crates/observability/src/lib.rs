//! Process-wide tracing setup.

/// Tracing subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{DEFAULT_FILTER, LogFormat};

/// Initialize JSON tracing for the process, filtered by `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}
