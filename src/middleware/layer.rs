//! Tower adapter.

use http::{Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::middleware::{HttpTracing, ResponseFuture, TracedBody};

/// Layer that traces every request passing through the wrapped service.
///
/// Serve it from a current-thread runtime when the tracer uses
/// `ExplicitContext`; see [`HttpTracing`].
///
/// ```ignore
/// let app = Router::new()
///     .route("/foo", post(handler))
///     .layer(ZipkinLayer::new(HttpTracing::new(tracer, "service-a")));
/// ```
#[derive(Debug, Clone)]
pub struct ZipkinLayer {
    tracing: Arc<HttpTracing>,
}

impl ZipkinLayer {
    pub fn new(tracing: HttpTracing) -> Self {
        Self {
            tracing: Arc::new(tracing),
        }
    }
}

impl<S> Layer<S> for ZipkinLayer {
    type Service = ZipkinService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ZipkinService {
            inner,
            tracing: Arc::clone(&self.tracing),
        }
    }
}

/// Service produced by [`ZipkinLayer`].
#[derive(Debug, Clone)]
pub struct ZipkinService<S> {
    inner: S,
    tracing: Arc<HttpTracing>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ZipkinService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<TracedBody<ResBody>>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let inner = &mut self.inner;
        self.tracing.trace_call(request, |request| inner.call(request))
    }
}
