//! Response future shared by the tower and hyper adapters.

use http::Response;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use crate::middleware::body::TracedBody;
use crate::middleware::lifecycle::RequestScope;
use crate::trace::Scoped;

pin_project! {
    /// Resolves to the inner response with its body wrapped in [`TracedBody`].
    pub struct ResponseFuture<F> {
        #[pin]
        inner: Scoped<F>,
        scope: Option<Arc<RequestScope>>,
    }
}

impl<F> ResponseFuture<F> {
    pub(crate) fn new(inner: Scoped<F>, scope: Arc<RequestScope>) -> Self {
        Self {
            inner,
            scope: Some(scope),
        }
    }
}

impl<F, B, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<TracedBody<B>>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));
        let scope = this.scope.take();

        match result {
            Ok(response) => {
                let status = response.status();
                Poll::Ready(Ok(response.map(|body| TracedBody::new(body, scope, status))))
            }
            Err(err) => {
                if let Some(scope) = scope {
                    scope.finish(None);
                }
                Poll::Ready(Err(err))
            }
        }
    }
}
