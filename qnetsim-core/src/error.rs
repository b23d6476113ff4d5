use thiserror::Error;

use crate::channel::ChannelKind;
use crate::time::Time;

/// Errors raised by the simulation kernel.
///
/// Every variant is a programmer or topology-construction mistake detected at the point of
/// misuse. Photon loss is a simulation outcome and never shows up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("cannot schedule at {requested}ps, current time is {now}ps")]
    InvalidTime { requested: Time, now: Time },

    #[error("cannot advance clock to {requested}ps, an event is pending at {pending}ps")]
    WouldSkipEvents { requested: Time, pending: Time },

    #[error("channel '{channel}' already has its ends bound")]
    AlreadyBound { channel: String },

    #[error("channel '{channel}' has no ends bound")]
    UnboundChannel { channel: String },

    #[error("node '{node}' has no {kind} channel to '{peer}'")]
    UnassignedChannel {
        node: String,
        peer: String,
        kind: ChannelKind,
    },

    #[error("channel '{channel}' does not match its assignment: {reason}")]
    ChannelMismatch { channel: String, reason: String },

    #[error("invalid channel '{channel}': {reason}")]
    InvalidChannel { channel: String, reason: String },

    #[error("entity name '{0}' is already registered")]
    DuplicateName(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("timeline has not been initialized")]
    NotInitialized,

    #[error("timeline was already initialized")]
    AlreadyInitialized,

    #[error("topology is frozen after init, cannot {0}")]
    TopologyFrozen(&'static str),
}
