//! Decoding B3 headers into a trace context.
//!
//! # Design Decisions
//! - Pure: no I/O, no randomness. Fresh ids for a new trace are generated
//!   by the tracer, not here
//! - Malformed headers never fail the request; they count as absent

use crate::propagation::headers::{self as b3, HeaderSet};
use crate::trace::{SamplingFlags, SpanId, TraceContext, TraceId};

/// What the propagation headers say about the incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// No usable trace/span ids: a new trace begins, honoring any flags.
    Root(SamplingFlags),
    /// Continue the caller's trace.
    Child(TraceContext),
}

impl Extracted {
    pub fn flags(&self) -> SamplingFlags {
        match self {
            Self::Root(flags) => *flags,
            Self::Child(ctx) => ctx.flags(),
        }
    }
}

/// Decode B3 propagation headers.
pub fn decode<H: HeaderSet + ?Sized>(headers: &H) -> Extracted {
    let flags = decode_flags(headers);
    let trace_id = headers.header(b3::TRACE_ID).and_then(TraceId::parse);
    let span_id = headers.header(b3::SPAN_ID).and_then(SpanId::parse);

    match (trace_id, span_id) {
        (Some(trace_id), Some(span_id)) => {
            let parent_id = headers
                .header(b3::PARENT_SPAN_ID)
                .and_then(SpanId::parse);
            Extracted::Child(TraceContext::new(trace_id, span_id, parent_id, flags))
        }
        (trace_id, span_id) => {
            if headers.header(b3::TRACE_ID).is_some() || headers.header(b3::SPAN_ID).is_some() {
                tracing::debug!(
                    trace_id_valid = trace_id.is_some(),
                    span_id_valid = span_id.is_some(),
                    "Incomplete or malformed B3 headers, starting a new trace"
                );
            }
            Extracted::Root(flags)
        }
    }
}

fn decode_flags<H: HeaderSet + ?Sized>(headers: &H) -> SamplingFlags {
    let debug = headers.header(b3::FLAGS).map(str::trim) == Some("1");
    let sampled = headers.header(b3::SAMPLED).and_then(parse_sampled);
    SamplingFlags::new(sampled, debug)
}

fn parse_sampled(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn no_headers_is_root() {
        assert_eq!(decode(&headers(&[])), Extracted::Root(SamplingFlags::default()));
    }

    #[test]
    fn trace_and_span_make_a_child() {
        let h = headers(&[
            ("X-B3-TraceId", "aaa"),
            ("X-B3-SpanId", "bbb"),
            ("X-B3-ParentSpanId", "ccc"),
            ("X-B3-Sampled", "1"),
        ]);
        let Extracted::Child(ctx) = decode(&h) else {
            panic!("expected child context");
        };
        assert_eq!(ctx.trace_id().as_str(), "aaa");
        assert_eq!(ctx.span_id().as_str(), "bbb");
        assert_eq!(ctx.parent_id().map(|p| p.as_str()), Some("ccc"));
        assert_eq!(ctx.flags().sampled(), Some(true));
        assert!(!ctx.is_debug());
    }

    #[test]
    fn trace_id_round_trips_ignoring_case() {
        for id in ["48485A3953BB6124", "863ac35c9f6413ad48485a3953bb6124"] {
            let h = headers(&[("x-b3-traceid", id), ("x-b3-spanid", "48485a3953bb6124")]);
            let Extracted::Child(ctx) = decode(&h) else {
                panic!("expected child context for {id}");
            };
            assert_eq!(ctx.trace_id().as_str(), id.to_ascii_lowercase());
        }
    }

    #[test]
    fn missing_trace_id_is_root() {
        let h = headers(&[("X-B3-SpanId", "bbb"), ("X-B3-Sampled", "0")]);
        assert_eq!(decode(&h), Extracted::Root(SamplingFlags::new(Some(false), false)));
    }

    #[test]
    fn malformed_trace_id_is_root() {
        let too_long = "a".repeat(33);
        for bad in ["not-hex", "", too_long.as_str()] {
            let h = headers(&[("X-B3-TraceId", bad), ("X-B3-SpanId", "bbb")]);
            assert!(matches!(decode(&h), Extracted::Root(_)), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn malformed_parent_is_dropped() {
        let h = headers(&[
            ("X-B3-TraceId", "aaa"),
            ("X-B3-SpanId", "bbb"),
            ("X-B3-ParentSpanId", "zzz"),
        ]);
        let Extracted::Child(ctx) = decode(&h) else {
            panic!("expected child context");
        };
        assert!(ctx.parent_id().is_none());
    }

    #[test]
    fn debug_flag_forces_sampling() {
        let h = headers(&[
            ("X-B3-TraceId", "aaa"),
            ("X-B3-SpanId", "bbb"),
            ("X-B3-Sampled", "0"),
            ("X-B3-Flags", "1"),
        ]);
        let flags = decode(&h).flags();
        assert!(flags.is_debug());
        assert_eq!(flags.sampled(), Some(true));

        let root = decode(&headers(&[("X-B3-Flags", "1")]));
        assert_eq!(root, Extracted::Root(SamplingFlags::debug()));
    }

    #[test]
    fn decoding_is_deterministic() {
        let h = headers(&[("X-B3-TraceId", "aaa"), ("X-B3-SpanId", "bbb")]);
        assert_eq!(decode(&h), decode(&h));
        let empty = headers(&[]);
        assert_eq!(decode(&empty), decode(&empty));
    }
}
