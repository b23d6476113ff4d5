//! Star network layout.
//!
//! One hub router connected to `spokes` peer routers, each through its own relay node.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TopologyConfig {
    /// Name of the hub router. Spokes are named `<hub>_spoke_<i>`.
    #[serde(default = "default_hub")]
    #[validate(custom(function = validation::validate_entity_name))]
    pub hub: String,

    /// Number of peer routers around the hub.
    #[serde(default = "default_spokes")]
    #[validate(range(min = 1, max = 4096))]
    pub spokes: usize,

    /// Length in metres of each router-to-relay fibre.
    #[serde(default = "default_distance")]
    #[validate(range(min = 0.0, max = 1.0e7))]
    pub quantum_distance: f64,

    /// Fibre attenuation in dB per metre.
    #[serde(default = "default_attenuation")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub attenuation: f64,

    /// Length in metres of the classical link between hub and spoke.
    #[serde(default = "default_distance")]
    #[validate(range(min = 0.0, max = 1.0e7))]
    pub classical_distance: f64,
}

fn default_hub() -> String {
    "hub".into()
}

fn default_spokes() -> usize {
    4
}

fn default_distance() -> f64 {
    1.0e3
}

fn default_attenuation() -> f64 {
    2.0e-4
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            hub: default_hub(),
            spokes: default_spokes(),
            quantum_distance: default_distance(),
            attenuation: default_attenuation(),
            classical_distance: default_distance(),
        }
    }
}
