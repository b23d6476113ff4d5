//! Run-level simulation parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Seeding and cutoff for one timeline run.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Master seed every default-seeded entity derives its stream from.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Events at or after this time (picoseconds) are discarded. Unbounded when absent.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub stop_time: Option<u64>,

    /// Keep every dispatched event for inspection, not just the digest.
    #[serde(default)]
    pub record_trace: bool,
}

fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            stop_time: None,
            record_trace: false,
        }
    }
}
