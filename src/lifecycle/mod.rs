//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Ctrl+C → Shutdown::trigger → every subscriber's recv() completes
//!        → HttpServer stops accepting and drains in-flight requests
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
