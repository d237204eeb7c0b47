//! Per-request span lifecycle.
//!
//! # Responsibilities
//! - Emit the request-start annotations under the request's context
//! - Emit the response-end annotations exactly once, whichever completion
//!   signal arrives first
//!
//! # State machine
//! ```text
//! START ──(start annotations)──▶ AWAITING_RESPONSE ──(first finish)──▶ ENDED
//!                                        │                               ▲
//!                                        └──(dropped, no status)─────────┘
//! ```

use http::{Method, StatusCode};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::trace::{Annotation, TraceContext, Tracer};

pub const HTTP_PATH: &str = "http.path";
pub const HTTP_STATUS_CODE: &str = "http.status_code";
pub const ERROR: &str = "error";

/// Value of the `error` annotation when no status code was ever produced.
pub const ABORTED: &str = "aborted";

/// Value of the `error` annotation when the response body failed mid-stream.
pub const BODY_FAILED: &str = "body failed";

/// True when `status` falls outside the successful window `200..=399`.
pub fn is_error_status(status: StatusCode) -> bool {
    let code = status.as_u16();
    code < 200 || code > 399
}

/// Phase of a request span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingResponse,
    Ended,
}

/// What the START annotations describe.
#[derive(Debug, Clone)]
pub struct RequestInfo<'a> {
    pub service_name: &'a str,
    pub method: &'a Method,
    pub path: &'a str,
    pub local_host: Option<IpAddr>,
    pub local_port: u16,
}

/// The span of one request, from arrival until the response is sent.
///
/// Dropping a scope that never finished ends it without a status code.
#[derive(Debug)]
pub struct RequestScope {
    tracer: Tracer,
    context: TraceContext,
    ended: AtomicBool,
}

impl RequestScope {
    /// Enter START: record the request-start annotations under `context`.
    pub fn start(tracer: Tracer, context: TraceContext, info: RequestInfo<'_>) -> Self {
        tracer.let_id(context.clone(), || {
            tracer.record_service_name(info.service_name);
            tracer.record_rpc(info.method.as_str().to_ascii_uppercase());
            tracer.record_binary(HTTP_PATH, info.path);
            tracer.record_annotation(Annotation::ServerRecv);
            tracer.record_local_addr(info.local_host, info.local_port);
        });
        tracing::trace!(
            context = %context,
            method = %info.method,
            path = info.path,
            "Request span started"
        );

        Self {
            tracer,
            context,
            ended: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &TraceContext {
        &self.context
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn phase(&self) -> Phase {
        if self.ended.load(Ordering::Acquire) {
            Phase::Ended
        } else {
            Phase::AwaitingResponse
        }
    }

    /// Enter ENDED with the final status, if one is known.
    ///
    /// Returns `false` when the span had already ended; nothing is recorded
    /// in that case.
    pub fn finish(&self, status: Option<StatusCode>) -> bool {
        let error = match status {
            Some(status) if is_error_status(status) => Some(status.as_u16().to_string()),
            Some(_) => None,
            None => Some(ABORTED.to_string()),
        };
        self.end(status, error)
    }

    /// Enter ENDED for a response that failed after its status was sent.
    ///
    /// `error` replaces the status-derived `error` annotation.
    pub fn fail(&self, status: StatusCode, error: &str) -> bool {
        self.end(Some(status), Some(error.to_string()))
    }

    fn end(&self, status: Option<StatusCode>, error: Option<String>) -> bool {
        if self.ended.swap(true, Ordering::AcqRel) {
            return false;
        }

        let tracer = &self.tracer;
        tracer.let_id(self.context.clone(), || {
            if let Some(status) = status {
                tracer.record_binary(HTTP_STATUS_CODE, status.as_u16().to_string());
            }
            if let Some(error) = &error {
                tracer.record_binary(ERROR, error.as_str());
            }
            tracer.record_annotation(Annotation::ServerSend);
        });
        tracing::trace!(
            context = %self.context,
            status = ?status.map(|s| s.as_u16()),
            error = ?error,
            "Request span ended"
        );
        true
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if self.phase() == Phase::AwaitingResponse {
            tracing::debug!(
                context = %self.context,
                "Request dropped before a response was produced"
            );
            self.finish(None);
        }
    }
}
