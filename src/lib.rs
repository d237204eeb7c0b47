//! B3 server-side HTTP tracing middleware.
//!
//! Decodes `X-B3-*` propagation headers, serves each request under its trace
//! context, and records a fixed sequence of annotations when the request
//! arrives and when its response has been sent.
//!
//! The bundled `ExplicitContext` is a single process-wide slot: serve from a
//! current-thread runtime so requests never run in parallel.
//!
//! ```ignore
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let recorder = InMemoryRecorder::new();
//!     let tracer = Tracer::new(recorder.clone(), ExplicitContext::new());
//!     let app = Router::new()
//!         .route("/foo", post(handler))
//!         .layer(ZipkinLayer::new(HttpTracing::new(tracer, "service-a")));
//!     // axum::serve(listener, app).await
//! }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod propagation;
pub mod trace;

pub use config::AppConfig;
pub use middleware::{trace_requests, HttpTracing, TracedHyperService, ZipkinLayer};
pub use propagation::{decode, Extracted, HeaderSet};
pub use trace::{
    Annotation, ContextProvider, ContextProviderExt, ExplicitContext, InMemoryRecorder,
    LoggingRecorder, Record, Recorder, SamplingFlags, SpanId, TraceContext, TraceId, Tracer,
};
