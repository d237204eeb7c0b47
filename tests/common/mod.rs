//! Shared utilities for the integration tests.
#![allow(dead_code)]

use axum::{http::StatusCode, routing::post, Router};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{server::conn::http1, service::service_fn, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use zipkin_middleware::{
    Annotation, ExplicitContext, HttpTracing, InMemoryRecorder, Record, TracedHyperService, Tracer,
};

pub const SERVICE_NAME: &str = "service-a";
pub const DEFERRED_MESSAGE: &str = "hello from within app";

/// A recorder and a tracer writing to it.
pub fn setup() -> (InMemoryRecorder, Tracer) {
    let recorder = InMemoryRecorder::new();
    let tracer = Tracer::new(recorder.clone(), ExplicitContext::new());
    (recorder, tracer)
}

/// Handler body: defer 10ms on another task, re-enter the captured context
/// there to record a message, then reply with `status`.
pub async fn deferred_reply(tracer: Tracer, status: StatusCode) -> (StatusCode, &'static str) {
    let ctx = tracer.id();
    let (tx, rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if let Some(ctx) = ctx {
            tracer.let_id(ctx, || tracer.record_binary("message", DEFERRED_MESSAGE));
        }
        let _ = tx.send(());
    });

    rx.await.unwrap();
    (status, "OK")
}

/// Router with `POST /foo` answering `status` after deferred work.
pub fn deferred_router(tracer: Tracer, status: StatusCode) -> Router {
    Router::new().route(
        "/foo",
        post(move || deferred_reply(tracer.clone(), status)),
    )
}

/// Serve `router` on an ephemeral port.
pub async fn spawn_axum(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serve a plain hyper `service_fn`, wrapped in `TracedHyperService`, on an
/// ephemeral port. Every request gets the deferred handler.
pub async fn spawn_hyper(tracing: HttpTracing, status: StatusCode) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let tracing = Arc::new(tracing);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let tracer = tracing.tracer().clone();
            let handler = service_fn(move |_request: Request<Incoming>| {
                let tracer = tracer.clone();
                async move {
                    let (code, body) = deferred_reply(tracer, status).await;
                    let response = Response::builder()
                        .status(code)
                        .body(Full::new(Bytes::from_static(body.as_bytes())))
                        .unwrap();
                    Ok::<_, Infallible>(response)
                }
            });
            let service = TracedHyperService::with_shared(handler, tracing.clone());
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });
    addr
}

/// POST `/foo` with the given headers.
pub async fn post_foo(addr: SocketAddr, headers: &[(&str, &str)]) -> reqwest::Response {
    let client = reqwest::Client::new();
    let mut request = client.post(format!("http://{addr}/foo"));
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request.send().await.unwrap()
}

/// Poll until `recorder` holds at least `count` records, or give up after 2s.
pub async fn wait_for_records(recorder: &InMemoryRecorder, count: usize) -> Vec<Record> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while recorder.len() < count && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    recorder.records()
}

/// The full annotation sequence for `POST /foo` through the deferred handler.
pub fn expected_sequence(status: u16) -> Vec<Annotation> {
    let mut expected = vec![
        Annotation::ServiceName {
            service_name: SERVICE_NAME.into(),
        },
        Annotation::Rpc { name: "POST".into() },
        Annotation::binary("http.path", "/foo"),
        Annotation::ServerRecv,
        Annotation::LocalAddr { host: None, port: 0 },
        Annotation::binary("message", DEFERRED_MESSAGE),
        Annotation::binary("http.status_code", status.to_string()),
    ];
    if !(200..=399).contains(&status) {
        expected.push(Annotation::binary("error", status.to_string()));
    }
    expected.push(Annotation::ServerSend);
    expected
}

/// Every record carries `trace_id`/`span_id`.
pub fn assert_ids(records: &[Record], trace_id: &str, span_id: &str) {
    for record in records {
        assert_eq!(record.trace_id.trace_id().as_str(), trace_id, "{record:?}");
        assert_eq!(record.trace_id.span_id().as_str(), span_id, "{record:?}");
    }
}

pub fn annotations(records: &[Record]) -> Vec<Annotation> {
    records.iter().map(|r| r.annotation.clone()).collect()
}
