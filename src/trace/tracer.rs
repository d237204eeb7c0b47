//! Tracer: the recording front end used by the middleware and by handlers.

use std::fmt;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;

use crate::observability::metrics;
use crate::propagation::Extracted;
use crate::trace::context::{ContextProvider, ContextProviderExt, Scoped};
use crate::trace::{Annotation, Record, Recorder, SamplingFlags, TraceContext};

/// Records annotations against the ambient trace context.
///
/// Cheap to clone; clones share the recorder and the context provider.
#[derive(Clone)]
pub struct Tracer {
    recorder: Arc<dyn Recorder>,
    ctx_impl: Arc<dyn ContextProvider>,
    trace_id_128bit: bool,
}

impl Tracer {
    pub fn new(recorder: impl Recorder, ctx_impl: impl ContextProvider) -> Self {
        Self {
            recorder: Arc::new(recorder),
            ctx_impl: Arc::new(ctx_impl),
            trace_id_128bit: false,
        }
    }

    /// Generate 128-bit trace ids for new traces.
    pub fn with_128bit_trace_ids(mut self, enabled: bool) -> Self {
        self.trace_id_128bit = enabled;
        self
    }

    /// The active trace context, if any.
    pub fn id(&self) -> Option<TraceContext> {
        self.ctx_impl.get_context()
    }

    /// Run `f` with `ctx` active, restoring the previous context afterwards.
    pub fn let_id<R>(&self, ctx: TraceContext, f: impl FnOnce() -> R) -> R {
        self.ctx_impl.let_context(ctx, f)
    }

    /// Run `f` in a fresh scope boundary.
    pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        self.ctx_impl.scoped(f)
    }

    /// Wrap `future` so that every poll runs with `ctx` active.
    pub fn instrument<F: Future>(&self, ctx: TraceContext, future: F) -> Scoped<F> {
        Scoped::new(Arc::clone(&self.ctx_impl), ctx, future)
    }

    /// Start a new trace.
    pub fn create_root_id(&self, flags: SamplingFlags) -> TraceContext {
        TraceContext::new_root(flags, self.trace_id_128bit)
    }

    /// Turn decoded propagation headers into the context to serve under.
    ///
    /// A child context keeps the caller's span id: client and server share
    /// the span.
    pub fn join(&self, extracted: Extracted) -> TraceContext {
        match extracted {
            Extracted::Root(flags) => self.create_root_id(flags),
            Extracted::Child(ctx) => ctx,
        }
    }

    /// Record `annotation` under the active context.
    ///
    /// Dropped when there is no active context or the trace was explicitly
    /// not sampled.
    pub fn record_annotation(&self, annotation: Annotation) {
        let Some(ctx) = self.id() else {
            tracing::debug!(
                annotation = annotation.kind(),
                "No active trace context, annotation dropped"
            );
            metrics::record_annotation_dropped(annotation.kind());
            return;
        };
        if ctx.flags().sampled() == Some(false) {
            metrics::record_annotation_dropped(annotation.kind());
            return;
        }

        metrics::record_annotation(annotation.kind());
        self.recorder.record(Record::new(ctx, annotation));
    }

    pub fn record_service_name(&self, service_name: impl Into<String>) {
        self.record_annotation(Annotation::ServiceName {
            service_name: service_name.into(),
        });
    }

    pub fn record_rpc(&self, name: impl Into<String>) {
        self.record_annotation(Annotation::Rpc { name: name.into() });
    }

    pub fn record_binary(&self, key: impl Into<String>, value: impl Into<String>) {
        self.record_annotation(Annotation::binary(key, value));
    }

    pub fn record_local_addr(&self, host: Option<IpAddr>, port: u16) {
        self.record_annotation(Annotation::LocalAddr { host, port });
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("trace_id_128bit", &self.trace_id_128bit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{ExplicitContext, InMemoryRecorder, SpanId, TraceId};

    fn setup() -> (InMemoryRecorder, Tracer) {
        let recorder = InMemoryRecorder::new();
        let tracer = Tracer::new(recorder.clone(), ExplicitContext::new());
        (recorder, tracer)
    }

    fn child(sampled: Option<bool>) -> TraceContext {
        TraceContext::new(
            TraceId::parse("aaa").unwrap(),
            SpanId::parse("bbb").unwrap(),
            None,
            SamplingFlags::new(sampled, false),
        )
    }

    #[test]
    fn records_under_active_context() {
        let (recorder, tracer) = setup();
        tracer.let_id(child(None), || tracer.record_binary("message", "hello"));

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].trace_id.trace_id().as_str(), "aaa");
        assert_eq!(records[0].annotation, Annotation::binary("message", "hello"));
    }

    #[test]
    fn scoped_sees_the_outer_context() {
        let (_, tracer) = setup();
        let seen = tracer.let_id(child(None), || tracer.scoped(|| tracer.id()));
        assert_eq!(seen, Some(child(None)));
        assert!(tracer.id().is_none());
    }

    #[test]
    fn drops_without_context() {
        let (recorder, tracer) = setup();
        tracer.record_binary("message", "lost");
        assert!(recorder.is_empty());
    }

    #[test]
    fn drops_unsampled() {
        let (recorder, tracer) = setup();
        tracer.let_id(child(Some(false)), || tracer.record_annotation(Annotation::ServerRecv));
        assert!(recorder.is_empty());
    }

    #[test]
    fn join_keeps_child_and_generates_root() {
        let (_, tracer) = setup();
        assert_eq!(tracer.join(Extracted::Child(child(None))), child(None));

        let root = tracer.join(Extracted::Root(SamplingFlags::debug()));
        assert!(root.parent_id().is_none());
        assert!(root.is_debug());
        assert_eq!(root.trace_id().as_str().len(), 16);

        let tracer = tracer.with_128bit_trace_ids(true);
        let root = tracer.join(Extracted::Root(SamplingFlags::default()));
        assert!(root.trace_id().is_128bit());
    }
}
