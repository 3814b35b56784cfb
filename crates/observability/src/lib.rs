//! tasklane observability — tracing setup shared by the CLI and TUI.
//!
//! Console output is fine for one-shot commands; TUI sessions draw on the
//! alternate screen, so they log to a rolling file under the data dir instead.
//!
//! ```no_run
//! use tasklane_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("tasklane").with_log_level("info");
//! init(config)?;
//! tracing::info!("client started");
//! # Ok::<(), tasklane_observability::ObservabilityError>(())
//! ```

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env};
