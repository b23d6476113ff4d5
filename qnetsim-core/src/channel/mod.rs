//! ## qnetsim-core::channel
//! **Unidirectional classical and quantum links**
//!
//! Channels are registered with the timeline and referenced by typed index handles. Each channel
//! binds its sender and receiver once; sends look the channel up in the sender's peer map and
//! schedule the delivery event.
//!
//! ### Key Submodules:
//! - `classical`: certain delivery after the propagation delay
//! - `quantum`: delivery decided by one draw from the sender's random stream

mod classical;
mod quantum;

use std::fmt;

use bytes::Bytes;

pub use classical::ClassicalChannel;
pub use quantum::QuantumChannel;

use crate::error::SimulationError;
use crate::events::Photon;
use crate::time::{Scheduler, Time};
use crate::topology::{NodeCore, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Classical,
    Quantum,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Classical => f.write_str("classical"),
            ChannelKind::Quantum => f.write_str("quantum"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassicalChannelId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantumChannelId(usize);

/// Either kind of channel handle, for operations that treat both alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Classical(ClassicalChannelId),
    Quantum(QuantumChannelId),
}

impl From<ClassicalChannelId> for ChannelId {
    fn from(id: ClassicalChannelId) -> Self {
        ChannelId::Classical(id)
    }
}

impl From<QuantumChannelId> for ChannelId {
    fn from(id: QuantumChannelId) -> Self {
        ChannelId::Quantum(id)
    }
}

/// Directional binding of a channel, immutable once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEnds {
    pub sender: NodeId,
    pub receiver: NodeId,
}

/// Outcome of a photon transmission. Loss is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transmission {
    Scheduled { at: Time },
    Lost,
}

impl Transmission {
    pub fn is_lost(&self) -> bool {
        matches!(self, Transmission::Lost)
    }
}

/// Arena of every channel registered with a timeline.
#[derive(Debug, Default)]
pub struct ChannelTable {
    classical: Vec<ClassicalChannel>,
    quantum: Vec<QuantumChannel>,
}

impl ChannelTable {
    pub(crate) fn insert_classical(&mut self, channel: ClassicalChannel) -> ClassicalChannelId {
        self.classical.push(channel);
        ClassicalChannelId(self.classical.len() - 1)
    }

    pub(crate) fn insert_quantum(&mut self, channel: QuantumChannel) -> QuantumChannelId {
        self.quantum.push(channel);
        QuantumChannelId(self.quantum.len() - 1)
    }

    pub fn classical(&self, id: ClassicalChannelId) -> Result<&ClassicalChannel, SimulationError> {
        self.classical
            .get(id.0)
            .ok_or_else(|| SimulationError::UnknownEntity(format!("classical channel #{}", id.0)))
    }

    pub fn quantum(&self, id: QuantumChannelId) -> Result<&QuantumChannel, SimulationError> {
        self.quantum
            .get(id.0)
            .ok_or_else(|| SimulationError::UnknownEntity(format!("quantum channel #{}", id.0)))
    }

    pub(crate) fn name(&self, id: ChannelId) -> Result<&str, SimulationError> {
        match id {
            ChannelId::Classical(id) => self.classical(id).map(ClassicalChannel::name),
            ChannelId::Quantum(id) => self.quantum(id).map(QuantumChannel::name),
        }
    }

    pub(crate) fn ends(&self, id: ChannelId) -> Result<Option<ChannelEnds>, SimulationError> {
        match id {
            ChannelId::Classical(id) => self.classical(id).map(ClassicalChannel::ends),
            ChannelId::Quantum(id) => self.quantum(id).map(QuantumChannel::ends),
        }
    }

    pub(crate) fn bind(&mut self, id: ChannelId, ends: ChannelEnds) -> Result<(), SimulationError> {
        let missing = || SimulationError::UnknownEntity(format!("{id:?}"));
        match id {
            ChannelId::Classical(id) => self
                .classical
                .get_mut(id.0)
                .ok_or_else(missing)?
                .set_ends(ends),
            ChannelId::Quantum(id) => self
                .quantum
                .get_mut(id.0)
                .ok_or_else(missing)?
                .set_ends(ends),
        }
    }

    pub(crate) fn transmit_message(
        &self,
        sender: &NodeCore,
        scheduler: &mut Scheduler,
        peer: &str,
        message: Bytes,
    ) -> Result<(), SimulationError> {
        let id = sender
            .cchannel(peer)
            .ok_or_else(|| SimulationError::UnassignedChannel {
                node: sender.name().to_owned(),
                peer: peer.to_owned(),
                kind: ChannelKind::Classical,
            })?;
        self.classical(id)?.transmit(sender, scheduler, message)
    }

    pub(crate) fn transmit_qubit(
        &self,
        sender: &mut NodeCore,
        scheduler: &mut Scheduler,
        peer: &str,
        photon: Photon,
    ) -> Result<Transmission, SimulationError> {
        let id = sender
            .qchannel(peer)
            .ok_or_else(|| SimulationError::UnassignedChannel {
                node: sender.name().to_owned(),
                peer: peer.to_owned(),
                kind: ChannelKind::Quantum,
            })?;
        self.quantum(id)?.transmit(sender, scheduler, photon)
    }
}

// Shared by both channel kinds.
fn check_sender(
    channel: &str,
    ends: Option<ChannelEnds>,
    sender: &NodeCore,
) -> Result<ChannelEnds, SimulationError> {
    let ends = ends.ok_or_else(|| SimulationError::UnboundChannel {
        channel: channel.to_owned(),
    })?;
    if ends.sender != sender.id() {
        return Err(SimulationError::ChannelMismatch {
            channel: channel.to_owned(),
            reason: format!("'{}' is not the bound sender", sender.name()),
        });
    }
    Ok(ends)
}

fn check_distance(channel: &str, distance: f64) -> Result<(), SimulationError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidChannel {
            channel: channel.to_owned(),
            reason: format!("distance must be finite and non-negative, got {distance}"),
        })
    }
}

fn bind_once(
    slot: &mut Option<ChannelEnds>,
    channel: &str,
    ends: ChannelEnds,
) -> Result<(), SimulationError> {
    if slot.is_some() {
        return Err(SimulationError::AlreadyBound {
            channel: channel.to_owned(),
        });
    }
    *slot = Some(ends);
    Ok(())
}
