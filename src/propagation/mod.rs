//! B3 propagation.
//!
//! # Responsibilities
//! - Name the B3 headers (`X-B3-TraceId`, `X-B3-SpanId`,
//!   `X-B3-ParentSpanId`, `X-B3-Sampled`, `X-B3-Flags`)
//! - Decode them into a root or child trace context
//!
//! Injection into outgoing requests is not handled here.

pub mod decode;
pub mod headers;

pub use decode::{decode, Extracted};
pub use headers::HeaderSet;
