//! HTTP/JSON API server for the user service.
//!
//! Every service handler is exposed as a versioned route under `/api/v1`.
//! Service status codes map onto HTTP statuses and a JSON error body.

mod config;
mod error;
mod logging;
mod routes;
mod state;

pub use config::{Config, ConfigError, CorsConfig, LogFormat, LoggingConfig};
pub use error::{ApiError, http_status};
pub use logging::{LoggingError, init as init_logging};
pub use routes::router;
pub use state::{AppState, StateError, close_store};
