//! Hyper adapter, for servers built directly on `hyper::server::conn`.

use http::{Request, Response};
use hyper::service::Service;
use std::sync::Arc;

use crate::middleware::{HttpTracing, ResponseFuture, TracedBody};

/// Wraps a `hyper::service::Service` (for example one made with
/// `hyper::service::service_fn`) so every request it serves is traced.
#[derive(Debug, Clone)]
pub struct TracedHyperService<S> {
    inner: S,
    tracing: Arc<HttpTracing>,
}

impl<S> TracedHyperService<S> {
    pub fn new(inner: S, tracing: HttpTracing) -> Self {
        Self::with_shared(inner, Arc::new(tracing))
    }

    /// Share one `HttpTracing` between connections.
    pub fn with_shared(inner: S, tracing: Arc<HttpTracing>) -> Self {
        Self { inner, tracing }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TracedHyperService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<TracedBody<ResBody>>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn call(&self, request: Request<ReqBody>) -> Self::Future {
        self.tracing.trace_call(request, |request| self.inner.call(request))
    }
}
