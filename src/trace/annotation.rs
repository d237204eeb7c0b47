//! Annotations and the records handed to a recorder.

use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::trace::TraceContext;

/// A fact attached to a span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "annotationType")]
pub enum Annotation {
    ServiceName {
        #[serde(rename = "serviceName")]
        service_name: String,
    },
    Rpc {
        name: String,
    },
    BinaryAnnotation {
        key: String,
        value: String,
    },
    ServerRecv,
    ServerSend,
    LocalAddr {
        #[serde(skip_serializing_if = "Option::is_none")]
        host: Option<IpAddr>,
        port: u16,
    },
}

impl Annotation {
    pub fn binary(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::BinaryAnnotation {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Variant name, used as a log field and metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceName { .. } => "ServiceName",
            Self::Rpc { .. } => "Rpc",
            Self::BinaryAnnotation { .. } => "BinaryAnnotation",
            Self::ServerRecv => "ServerRecv",
            Self::ServerSend => "ServerSend",
            Self::LocalAddr { .. } => "LocalAddr",
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceName { service_name } => write!(f, "ServiceName({service_name})"),
            Self::Rpc { name } => write!(f, "Rpc({name})"),
            Self::BinaryAnnotation { key, value } => write!(f, "BinaryAnnotation({key}={value})"),
            Self::LocalAddr {
                host: Some(host),
                port,
            } => write!(f, "LocalAddr({host}:{port})"),
            Self::LocalAddr { host: None, port } => write!(f, "LocalAddr(:{port})"),
            other => f.write_str(other.kind()),
        }
    }
}

/// One annotation bound to the span it was recorded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub trace_id: TraceContext,
    /// Microseconds since the Unix epoch.
    pub timestamp: u64,
    pub annotation: Annotation,
}

impl Record {
    pub fn new(trace_id: TraceContext, annotation: Annotation) -> Self {
        Self {
            trace_id,
            timestamp: now_micros(),
            annotation,
        }
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}
