//! B3 header names and header lookup.

use std::collections::HashMap;

pub const TRACE_ID: &str = "x-b3-traceid";
pub const SPAN_ID: &str = "x-b3-spanid";
pub const PARENT_SPAN_ID: &str = "x-b3-parentspanid";
pub const SAMPLED: &str = "x-b3-sampled";
pub const FLAGS: &str = "x-b3-flags";

/// Read-only view over request headers with case-insensitive names.
pub trait HeaderSet {
    /// Value of the header named `name` (lower-case), if present and textual.
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSet for http::HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl HeaderSet for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value.as_str());
        }
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn header_map_lookup_ignores_case() {
        let mut headers = http::HeaderMap::new();
        headers.insert("X-B3-TraceId", HeaderValue::from_static("aaa"));
        assert_eq!(headers.header(TRACE_ID), Some("aaa"));
    }

    #[test]
    fn hash_map_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("X-B3-SpanId".to_string(), "bbb".to_string());
        assert_eq!(headers.header(SPAN_ID), Some("bbb"));
        assert_eq!(headers.header(TRACE_ID), None);
    }
}
