//! # qnetsim-core
//!
//! Discrete-event kernel for simulating quantum networks.
//! Nodes exchange classical messages and photons over delayed, lossy channels on a single
//! virtual clock measured in picoseconds.
//!
//! ### Expectations:
//! - Same seeds and same wiring give the same dispatch order, the same random draws and
//!   the same trace digest
//! - Events with equal timestamps run in the order they were scheduled
//! - Topology is frozen once the timeline initializes
//!
//! ### Key Submodules:
//! - `time`: `Timeline` arena, `Scheduler` queue and the per-callback `Context`
//! - `channel`: classical and quantum point-to-point links
//! - `topology`: node behaviours, routers and relay inference
//! - `network`: propagation delay and fibre loss models
//! - `random`: per-entity seeded streams
//!
//! ### Future:
//! - Memory and entanglement-generation components on top of the router

pub mod channel;
pub mod error;
pub mod events;
pub mod network;
pub mod random;
pub mod time;
pub mod topology;

pub mod prelude {
    pub use crate::channel::{
        ChannelId, ChannelKind, ClassicalChannel, ClassicalChannelId, QuantumChannel,
        QuantumChannelId, Transmission,
    };
    pub use crate::error::SimulationError;
    pub use crate::events::{EventPayload, Photon};
    pub use crate::random::RandomStream;
    pub use crate::time::{Context, EntityId, RunStats, Time, Timeline};
    pub use crate::topology::{
        BsmNode, Node, NodeCore, NodeId, NodeKind, PlainNode, QuantumRouter, RouterState, Topology,
    };
}

pub use error::SimulationError;
pub use time::Timeline;
