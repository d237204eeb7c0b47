//! Recorder implementations.
//!
//! A recorder receives every sampled annotation. Storage and transport are
//! the recorder's business; the tracer only calls `record` and moves on.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::trace::{Annotation, Record};

/// Sink for annotation records.
pub trait Recorder: Send + Sync + 'static {
    fn record(&self, record: Record);
}

impl<R: Recorder + ?Sized> Recorder for Arc<R> {
    fn record(&self, record: Record) {
        (**self).record(record)
    }
}

/// Emits each record as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRecorder;

impl Recorder for LoggingRecorder {
    fn record(&self, record: Record) {
        let annotation = serde_json::to_string(&record.annotation)
            .unwrap_or_else(|_| record.annotation.to_string());
        tracing::info!(
            target: "zipkin",
            trace_id = %record.trace_id.trace_id(),
            span_id = %record.trace_id.span_id(),
            parent_id = ?record.trace_id.parent_id().map(|p| p.as_str()),
            timestamp = record.timestamp,
            annotation = %annotation,
            "annotation"
        );
    }
}

/// Keeps records in memory, in arrival order.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecorder {
    records: Arc<Mutex<Vec<Record>>>,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Record> {
        self.buffer().clone()
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.buffer().iter().map(|r| r.annotation.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }
}

impl Recorder for InMemoryRecorder {
    fn record(&self, record: Record) {
        self.buffer().push(record);
    }
}
