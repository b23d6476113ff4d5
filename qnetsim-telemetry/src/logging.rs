//! ## qnetsim-telemetry::logging
//! **Human-readable `tracing` output for simulation runs**
//!
//! ### Expectations:
//! - `RUST_LOG` wins over the configured level
//! - Span close events carry timeline `init`/`run` durations
//!
//! ### Future:
//! - JSON output for post-processing traces

use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Why the global subscriber could not be installed.
pub type TryInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimLogger;

impl SimLogger {
    /// Installs the global subscriber; fails if one is already set.
    pub fn try_init(level: &str) -> Result<(), TryInitError> {
        fmt()
            .with_env_filter(Self::filter(level))
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()?;
        info!(level, "logging initialized");
        Ok(())
    }

    /// Like [`try_init`](Self::try_init) but ignores an already installed subscriber.
    pub fn init(level: &str) {
        let _ = Self::try_init(level);
    }

    fn filter(level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}
