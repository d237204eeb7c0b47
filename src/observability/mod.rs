//! Observability of the middleware itself.
//!
//! # Data Flow
//! ```text
//! middleware / tracer
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, optional Prometheus endpoint)
//! ```
//!
//! Span annotations themselves go to the injected recorder, not here.

pub mod logging;
pub mod metrics;
