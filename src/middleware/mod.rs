//! HTTP server tracing middleware.
//!
//! # Data Flow
//! ```text
//! Request
//!     → propagation::decode (B3 headers → root/child)
//!     → Tracer::join (context for this request)
//!     → lifecycle.rs START annotations
//!     → handler runs inside Tracer::instrument (context active on each poll)
//!     → future.rs wraps the response body (body.rs)
//!     → last frame sent / body dropped → lifecycle.rs ENDED annotations
//! ```
//!
//! # Adapters
//! - `layer.rs`: tower `Layer`/`Service` (axum `Router::layer`, tower stacks)
//! - `from_fn.rs`: function middleware for `axum::middleware::from_fn_with_state`
//! - `hyper_service.rs`: wrapper for `hyper::service::Service` implementations
//!
//! # Design Decisions
//! - The middleware never alters status, headers or body
//! - One `RequestScope` per request, shared by the response future and the
//!   response body; whichever observes completion first ends it

pub mod body;
pub mod from_fn;
pub mod future;
pub mod hyper_service;
pub mod layer;
pub mod lifecycle;

pub use body::TracedBody;
pub use from_fn::trace_requests;
pub use future::ResponseFuture;
pub use hyper_service::TracedHyperService;
pub use layer::{ZipkinLayer, ZipkinService};
pub use lifecycle::{is_error_status, Phase, RequestInfo, RequestScope};

use http::Request;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;

use crate::config::TracingConfig;
use crate::observability::metrics;
use crate::propagation;
use crate::trace::Tracer;

/// Server-side HTTP tracing, shared by every adapter.
///
/// With [`ExplicitContext`](crate::trace::ExplicitContext) the server must
/// run on a current-thread runtime (`#[tokio::main(flavor = "current_thread")]`).
/// The slot is process-wide, so requests polled in parallel on a
/// multi-thread runtime read each other's context.
#[derive(Debug, Clone)]
pub struct HttpTracing {
    tracer: Tracer,
    service_name: String,
    local_host: Option<IpAddr>,
    port: u16,
}

impl HttpTracing {
    pub fn new(tracer: Tracer, service_name: impl Into<String>) -> Self {
        Self {
            tracer,
            service_name: service_name.into(),
            local_host: None,
            port: 0,
        }
    }

    /// Build from the `[tracing]` configuration section.
    pub fn from_config(tracer: Tracer, config: &TracingConfig) -> Self {
        Self::new(tracer.with_128bit_trace_ids(config.trace_id_128bit), &config.service_name)
            .with_port(config.port)
    }

    /// Port reported in the `LocalAddr` annotation.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Host reported in the `LocalAddr` annotation.
    pub fn with_local_host(mut self, host: IpAddr) -> Self {
        self.local_host = Some(host);
        self
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Decode the request's B3 headers and record the START annotations.
    pub fn on_request_start<B>(&self, request: &Request<B>) -> RequestScope {
        let extracted = propagation::decode(request.headers());
        let context = self.tracer.join(extracted);
        metrics::record_request_traced();

        RequestScope::start(
            self.tracer.clone(),
            context,
            RequestInfo {
                service_name: &self.service_name,
                method: request.method(),
                path: request.uri().path(),
                local_host: self.local_host,
                local_port: self.port,
            },
        )
    }

    /// Trace one call into an inner service.
    ///
    /// `call` runs synchronously with the request's context active, and the
    /// future it returns is polled with the same context.
    pub(crate) fn trace_call<B, F, Fut>(&self, request: Request<B>, call: F) -> ResponseFuture<Fut>
    where
        F: FnOnce(Request<B>) -> Fut,
        Fut: Future,
    {
        let scope = Arc::new(self.on_request_start(&request));
        let context = scope.context().clone();
        let inner = self.tracer.let_id(context.clone(), || call(request));
        ResponseFuture::new(self.tracer.instrument(context, inner), scope)
    }
}
