//! Axum function-middleware adapter.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::middleware::{HttpTracing, TracedBody};

/// Trace a request, for use with `axum::middleware::from_fn_with_state`.
///
/// ```ignore
/// let tracing = Arc::new(HttpTracing::new(tracer, "service-a"));
/// let app = Router::new()
///     .route("/foo", post(handler))
///     .layer(middleware::from_fn_with_state(tracing, trace_requests));
/// ```
pub async fn trace_requests(
    State(tracing): State<Arc<HttpTracing>>,
    request: Request,
    next: Next,
) -> Response {
    let scope = Arc::new(tracing.on_request_start(&request));
    let response = tracing
        .tracer()
        .instrument(scope.context().clone(), next.run(request))
        .await;

    let status = response.status();
    response.map(|body| Body::new(TracedBody::new(body, Some(scope), status)))
}
