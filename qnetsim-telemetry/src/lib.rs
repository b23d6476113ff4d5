//! # qnetsim Telemetry
//!
//! Crate for logging and metrics around simulation runs.

pub mod logging;
pub mod metrics;

pub use logging::SimLogger;
pub use metrics::SimulationMetrics;
