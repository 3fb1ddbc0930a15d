//! Tracing setup and failure-record sinks (shared setup).

/// Initialize process-wide tracing with the format from `MISHAP_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
/// An unknown format falls back to JSON and is reported once the subscriber is up.
pub fn init() {
    let format = tracing::LogFormat::from_env();
    tracing::init(format.as_ref().copied().unwrap_or_default());
    if let Err(raw) = format {
        ::tracing::warn!(value = %raw, "unknown MISHAP_LOG_FORMAT; using json");
    }
}

/// Tracing configuration (filters, formats).
pub mod tracing;

/// Sinks for structured failure records.
pub mod sink;

pub use sink::{FailureSink, MemorySink, TracingSink};
