//! Demo HTTP server.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → tls.rs (rustls handshake when `[server.tls]` is set)
//!     → server.rs (Axum setup, middleware stack)
//!     → ZipkinLayer (span per request)
//!     → handlers.rs
//!     → response body sent → span ends
//! ```

pub mod handlers;
pub mod server;
pub mod tls;

pub use server::HttpServer;
