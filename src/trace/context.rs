//! Ambient trace context.
//!
//! # Responsibilities
//! - Hold the "current" trace context for code that does not receive it
//!   explicitly
//! - Scope a context to a closure or to every poll of a future, restoring
//!   whatever was active before
//!
//! # Design Decisions
//! - The provider is an injected object, not thread-local or task-local
//!   storage; callers capture with `get_context` and replay with
//!   `let_context` across suspension points they schedule themselves
//! - Restoration happens in a drop guard so it also runs on unwind
//! - `ExplicitContext` is one shared slot: correct for interleaved tasks on
//!   a single-threaded executor, which is the model this crate targets

use pin_project_lite::pin_project;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context as TaskContext, Poll};

use crate::trace::TraceContext;

/// Storage for the active trace context.
pub trait ContextProvider: Send + Sync + 'static {
    /// Snapshot of the active context.
    fn get_context(&self) -> Option<TraceContext>;

    /// Install `ctx` as the active context, returning the one it replaced.
    fn replace_context(&self, ctx: Option<TraceContext>) -> Option<TraceContext>;
}

/// Scoping helpers available on every provider, including `dyn ContextProvider`.
pub trait ContextProviderExt: ContextProvider {
    /// Run `f` with `ctx` active.
    fn let_context<R>(&self, ctx: TraceContext, f: impl FnOnce() -> R) -> R {
        let _restore = Restore::enter(self, Some(ctx));
        f()
    }

    /// Run `f` without changing the context, undoing anything `f` installs.
    fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        let _restore = Restore::save(self);
        f()
    }
}

impl<P: ContextProvider + ?Sized> ContextProviderExt for P {}

/// Puts the saved context back when dropped.
struct Restore<'a, P: ContextProvider + ?Sized> {
    provider: &'a P,
    previous: Option<TraceContext>,
}

impl<'a, P: ContextProvider + ?Sized> Restore<'a, P> {
    fn enter(provider: &'a P, ctx: Option<TraceContext>) -> Self {
        let previous = provider.replace_context(ctx);
        Self { provider, previous }
    }

    fn save(provider: &'a P) -> Self {
        let previous = provider.get_context();
        Self { provider, previous }
    }
}

impl<P: ContextProvider + ?Sized> Drop for Restore<'_, P> {
    fn drop(&mut self) {
        self.provider.replace_context(self.previous.take());
    }
}

/// A single shared slot holding the current context.
///
/// Clones refer to the same slot.
#[derive(Debug, Clone, Default)]
pub struct ExplicitContext {
    current: Arc<Mutex<Option<TraceContext>>>,
}

impl ExplicitContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<TraceContext>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContextProvider for ExplicitContext {
    fn get_context(&self) -> Option<TraceContext> {
        self.slot().clone()
    }

    fn replace_context(&self, ctx: Option<TraceContext>) -> Option<TraceContext> {
        std::mem::replace(&mut *self.slot(), ctx)
    }
}

pin_project! {
    /// Future that runs every poll of `inner` with a fixed context active.
    ///
    /// Created by [`Tracer::instrument`](crate::trace::Tracer::instrument).
    pub struct Scoped<F> {
        #[pin]
        inner: F,
        provider: Arc<dyn ContextProvider>,
        context: TraceContext,
    }
}

impl<F> Scoped<F> {
    pub fn new(provider: Arc<dyn ContextProvider>, context: TraceContext, inner: F) -> Self {
        Self {
            inner,
            provider,
            context,
        }
    }
}

impl<F: Future> Future for Scoped<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _restore = Restore::enter(&**this.provider, Some(this.context.clone()));
        this.inner.poll(cx)
    }
}

impl<F> fmt::Debug for Scoped<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scoped")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
