//! Response body wrapper that ends the request span.
//!
//! The span ends when the last frame is handed to the server, when the body
//! fails, or when the server drops the body early (client went away),
//! whichever happens first. A failing body is marked with an `error`
//! annotation even when the status was a success.

use http::StatusCode;
use http_body::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use crate::middleware::lifecycle::{RequestScope, BODY_FAILED};

/// Ends its scope with the response status when dropped.
#[derive(Debug)]
struct EndGuard {
    scope: Arc<RequestScope>,
    status: StatusCode,
}

impl EndGuard {
    fn fail(self) {
        self.scope.fail(self.status, BODY_FAILED);
    }
}

impl Drop for EndGuard {
    fn drop(&mut self) {
        self.scope.finish(Some(self.status));
    }
}

pin_project! {
    /// Body that reports completion of the response to its request span.
    #[derive(Debug)]
    pub struct TracedBody<B> {
        #[pin]
        inner: B,
        guard: Option<EndGuard>,
    }
}

impl<B> TracedBody<B> {
    pub fn new(inner: B, scope: Option<Arc<RequestScope>>, status: StatusCode) -> Self {
        Self {
            inner,
            guard: scope.map(|scope| EndGuard { scope, status }),
        }
    }
}

impl<B: Body> Body for TracedBody<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();
        let frame = ready!(this.inner.as_mut().poll_frame(cx));
        match &frame {
            Some(Ok(_)) if !this.inner.is_end_stream() => {}
            Some(Err(_)) => {
                if let Some(guard) = this.guard.take() {
                    guard.fail();
                }
            }
            _ => drop(this.guard.take()),
        }
        Poll::Ready(frame)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
