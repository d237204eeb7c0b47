//! Trace model and recording.
//!
//! # Data Flow
//! ```text
//! TraceContext (id.rs)
//!     → active via ContextProvider (context.rs)
//!     → Tracer::record_* (tracer.rs) builds a Record (annotation.rs)
//!     → Recorder::record (recorder.rs)
//! ```

pub mod annotation;
pub mod context;
pub mod id;
pub mod recorder;
pub mod tracer;

pub use annotation::{Annotation, Record};
pub use context::{ContextProvider, ContextProviderExt, ExplicitContext, Scoped};
pub use id::{SamplingFlags, SpanId, TraceContext, TraceId};
pub use recorder::{InMemoryRecorder, LoggingRecorder, Recorder};
pub use tracer::Tracer;
