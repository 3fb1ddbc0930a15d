//! Write-only sinks for structured failure records.

use std::sync::{Arc, Mutex};

use mishap_core::{FailureRecord, Severity};

/// Consumer of [`FailureRecord`]s.
///
/// Sinks are shared between threads and must never fail the caller; a sink that
/// cannot write drops the record.
pub trait FailureSink: Send + Sync {
    fn write(&self, record: &FailureRecord);
}

impl<S: FailureSink + ?Sized> FailureSink for Arc<S> {
    fn write(&self, record: &FailureRecord) {
        (**self).write(record)
    }
}

/// Emits each record as a `tracing` event, levelled by severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn write(&self, record: &FailureRecord) {
        let detail = record.technical_detail.as_deref().unwrap_or("");
        match record.severity {
            Severity::Low => tracing::info!(
                record_id = %record.record_id,
                boundary = %record.boundary,
                code = %record.code,
                severity = %record.severity,
                technical_detail = %detail,
                "{}",
                record.technical_message
            ),
            Severity::Medium => tracing::warn!(
                record_id = %record.record_id,
                boundary = %record.boundary,
                code = %record.code,
                severity = %record.severity,
                technical_detail = %detail,
                "{}",
                record.technical_message
            ),
            Severity::High | Severity::Critical => tracing::error!(
                record_id = %record.record_id,
                boundary = %record.boundary,
                code = %record.code,
                severity = %record.severity,
                technical_detail = %detail,
                "{}",
                record.technical_message
            ),
        }
    }
}

/// Collects records in memory (tests and crash-report batching).
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<FailureRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every collected record, leaving the sink empty.
    pub fn drain(&self) -> Vec<FailureRecord> {
        match self.records.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl FailureSink for MemorySink {
    fn write(&self, record: &FailureRecord) {
        match self.records.lock() {
            Ok(mut guard) => guard.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mishap_core::{ErrorCode, ErrorValue};

    #[test]
    fn memory_sink_collects_and_drains() {
        let sink = MemorySink::new();
        let record = ErrorValue::new(ErrorCode::NetworkTimeout, "read timed out").record("sync");
        sink.write(&record);
        sink.write(&record);

        assert_eq!(sink.len(), 2);
        let drained = sink.drain();
        assert_eq!(drained[0].code, ErrorCode::NetworkTimeout);
        assert!(sink.is_empty());
    }

    #[test]
    fn arc_sink_forwards() {
        let inner = Arc::new(MemorySink::new());
        let shared: Arc<dyn FailureSink> = inner.clone();
        shared.write(&ErrorValue::new(ErrorCode::UnknownError, "boom").record("test"));
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn tracing_sink_accepts_every_severity() {
        for code in [ErrorCode::ValidationRequired, ErrorCode::NetworkTimeout, ErrorCode::UnknownError] {
            TracingSink.write(&ErrorValue::new(code, "msg").record("test"));
        }
    }
}
