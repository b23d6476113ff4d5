//! # qnetsim Configuration System
//!
//! Layered configuration for simulation runs driven from the command line.
//!
//! ## Features
//! - **Unified Configuration**: one document covers seeding, topology, workload and telemetry
//! - **Validation**: every section is checked field by field before use
//! - **Environment Awareness**: per-environment overrides and `QNETSIM_*` variables

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod simulation;
mod telemetry;
mod topology;
mod validation;
mod workload;

pub use error::ConfigError;
pub use simulation::SimulationConfig;
pub use telemetry::TelemetryConfig;
pub use topology::TopologyConfig;
pub use workload::WorkloadConfig;

const BASE_FILE: &str = "config/qnetsim.yaml";
const ENV_PREFIX: &str = "QNETSIM_";

/// Top‑level configuration container for a simulation run.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct QnetsimConfig {
    /// Seed, stop time and trace recording.
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,

    /// Star network layout.
    #[serde(default)]
    #[validate(nested)]
    pub topology: TopologyConfig,

    /// Traffic sent once the network is initialized.
    #[serde(default)]
    #[validate(nested)]
    pub workload: WorkloadConfig,

    /// Logging and metrics.
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl QnetsimConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/qnetsim.yaml`, if present.
    /// 3. `config/<QNETSIM_ENV>.yaml`, if present.
    /// 4. `QNETSIM_*` environment variables, `__` separating nested keys.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(QnetsimConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        if let Ok(env) = std::env::var("QNETSIM_ENV") {
            let env_file = format!("config/{}.yaml", env);
            if Path::new(&env_file).exists() {
                figment = figment.merge(Yaml::file(env_file));
            }
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring `QNETSIM_*` overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment = Figment::from(Serialized::defaults(QnetsimConfig::default()))
            .merge(Yaml::file(path));
        Self::extract(figment)
    }

    /// The resolved configuration as a YAML document.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
