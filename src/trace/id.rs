//! Trace and span identifiers.
//!
//! # Design Decisions
//! - Identifiers are kept as lower-case hex strings, exactly as received
//! - Received trace ids may be shorter than 64 bits (legacy callers);
//!   generated ones are always 16 or 32 hex digits
//! - Root spans reuse the span id as the 64-bit trace id

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse a hex identifier of at most `max_len` digits, lower-casing it.
fn parse_hex(raw: &str, max_len: usize) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > max_len || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(raw.to_ascii_lowercase())
}

fn random_hex64() -> String {
    format!("{:016x}", rand::random::<u64>())
}

/// Identifier shared by every span of one trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Longest accepted trace id (128 bits).
    pub const MAX_LEN: usize = 32;

    /// Parse a trace id received from a caller. Returns `None` when the value
    /// is empty, not hex, or wider than 128 bits.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_hex(raw, Self::MAX_LEN).map(Self)
    }

    /// Generate a random 128-bit trace id.
    pub fn random_128() -> Self {
        Self(format!("{}{}", random_hex64(), random_hex64()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id carries more than 64 bits.
    pub fn is_128bit(&self) -> bool {
        self.0.len() > 16
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SpanId> for TraceId {
    fn from(span_id: SpanId) -> Self {
        Self(span_id.0)
    }
}

/// Identifier of a single span (64 bits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanId(String);

impl SpanId {
    pub const MAX_LEN: usize = 16;

    /// Parse a span id received from a caller.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_hex(raw, Self::MAX_LEN).map(Self)
    }

    /// Generate a random 64-bit span id.
    pub fn random() -> Self {
        Self(random_hex64())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sampling decision carried with a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingFlags {
    sampled: Option<bool>,
    debug: bool,
}

impl SamplingFlags {
    /// Debug forces the trace to be sampled.
    pub fn new(sampled: Option<bool>, debug: bool) -> Self {
        let sampled = if debug { Some(true) } else { sampled };
        Self { sampled, debug }
    }

    /// Flags with the debug bit set.
    pub fn debug() -> Self {
        Self::new(Some(true), true)
    }

    /// `None` means no upstream decision was made.
    pub fn sampled(&self) -> Option<bool> {
        self.sampled
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

/// Immutable identity of the span a request is served under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceContext {
    trace_id: TraceId,
    span_id: SpanId,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<SpanId>,
    #[serde(flatten)]
    flags: SamplingFlags,
}

impl TraceContext {
    pub fn new(
        trace_id: TraceId,
        span_id: SpanId,
        parent_id: Option<SpanId>,
        flags: SamplingFlags,
    ) -> Self {
        Self {
            trace_id,
            span_id,
            parent_id,
            flags,
        }
    }

    /// Start a new trace. The span id doubles as the trace id unless a
    /// 128-bit trace id is requested.
    pub fn new_root(flags: SamplingFlags, trace_id_128bit: bool) -> Self {
        let span_id = SpanId::random();
        let trace_id = if trace_id_128bit {
            TraceId::random_128()
        } else {
            TraceId::from(span_id.clone())
        };
        Self::new(trace_id, span_id, None, flags)
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn span_id(&self) -> &SpanId {
        &self.span_id
    }

    pub fn parent_id(&self) -> Option<&SpanId> {
        self.parent_id.as_ref()
    }

    pub fn flags(&self) -> SamplingFlags {
        self.flags
    }

    pub fn is_debug(&self) -> bool {
        self.flags.is_debug()
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trace_id, self.span_id)
    }
}
