//! Configuration for the demo server and the middleware.
//!
//! # Data Flow
//! ```text
//! TOML file
//!     → loader.rs (read + toml::from_str)
//!     → validation.rs (every semantic error collected)
//!     → AppConfig
//!     → TracingConfig handed to HttpTracing::from_config
//! ```
//!
//! Every section and field is defaulted; an empty file is valid.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, ObservabilityConfig, ServerConfig, TlsConfig, TracingConfig};
pub use validation::ValidationError;
