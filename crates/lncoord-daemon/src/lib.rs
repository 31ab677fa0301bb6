//! The lncoord daemon: configuration, the JSON/HTTPS gateway, and process
//! lifecycle plumbing around the aggregation engine.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod shutdown;

pub use cli::Cli;
pub use config::{default_app_dir, DaemonConfig};
pub use error::{ApiError, DaemonError};
pub use routes::router;
