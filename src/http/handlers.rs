//! Demo request handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::time::Duration;

use crate::trace::Tracer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tracer: Tracer,
}

/// Responds after deferred work that re-enters the captured trace context.
pub async fn deferred(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let ctx = state.tracer.id();
    let tracer = state.tracer.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        match ctx {
            Some(ctx) => tracer.let_id(ctx, || {
                tracer.record_binary("message", "hello from within app")
            }),
            None => tracing::warn!("Deferred work ran without a trace context"),
        }
        let _ = tx.send(());
    });

    if rx.await.is_err() {
        tracing::warn!("Deferred work was cancelled");
    }
    (StatusCode::ACCEPTED, Json(json!({ "status": "OK" })))
}

/// Responds with the status code given in the path.
pub async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

pub async fn health() -> &'static str {
    "OK"
}
