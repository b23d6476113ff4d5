//! Traffic driven through the topology once it is initialized.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct WorkloadConfig {
    /// Classical messages the hub sends to every spoke.
    #[serde(default = "default_messages")]
    #[validate(range(max = 1000000))]
    pub messages_per_spoke: u32,

    /// Photons every spoke emits towards its relay.
    #[serde(default = "default_photons")]
    #[validate(range(max = 1000000))]
    pub photons_per_relay: u32,

    /// Gap between consecutive sends from one node, in picoseconds.
    #[serde(default = "default_interval")]
    #[validate(range(min = 1))]
    pub send_interval: u64,
}

fn default_messages() -> u32 {
    10
}

fn default_photons() -> u32 {
    1000
}

fn default_interval() -> u64 {
    1_000
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            messages_per_spoke: default_messages(),
            photons_per_relay: default_photons(),
            send_interval: default_interval(),
        }
    }
}
