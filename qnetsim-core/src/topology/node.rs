use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;

use super::{NodeKind, Topology};
use crate::channel::{ClassicalChannelId, QuantumChannelId};
use crate::error::SimulationError;
use crate::events::Photon;
use crate::random::RandomStream;
use crate::time::Context;

/// Index of a node in its timeline's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// State every node carries regardless of its behaviour: identity, random stream and the
/// channel maps keyed by the remote peer's name.
#[derive(Debug)]
pub struct NodeCore {
    id: NodeId,
    name: String,
    rng: RandomStream,
    cchannels: BTreeMap<String, ClassicalChannelId>,
    qchannels: BTreeMap<String, QuantumChannelId>,
}

impl NodeCore {
    pub(crate) fn new(id: NodeId, name: String, rng: RandomStream) -> Self {
        Self {
            id,
            name,
            rng,
            cchannels: BTreeMap::new(),
            qchannels: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generator(&self) -> &RandomStream {
        &self.rng
    }

    pub fn generator_mut(&mut self) -> &mut RandomStream {
        &mut self.rng
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng.set_seed(seed);
    }

    pub fn cchannels(&self) -> &BTreeMap<String, ClassicalChannelId> {
        &self.cchannels
    }

    pub fn qchannels(&self) -> &BTreeMap<String, QuantumChannelId> {
        &self.qchannels
    }

    pub fn cchannel(&self, peer: &str) -> Option<ClassicalChannelId> {
        self.cchannels.get(peer).copied()
    }

    pub fn qchannel(&self, peer: &str) -> Option<QuantumChannelId> {
        self.qchannels.get(peer).copied()
    }

    /// Later assignments for the same peer overwrite earlier ones.
    pub(crate) fn assign_cchannel(
        &mut self,
        channel: ClassicalChannelId,
        peer: impl Into<String>,
    ) -> Option<ClassicalChannelId> {
        self.cchannels.insert(peer.into(), channel)
    }

    pub(crate) fn assign_qchannel(
        &mut self,
        channel: QuantumChannelId,
        peer: impl Into<String>,
    ) -> Option<QuantumChannelId> {
        self.qchannels.insert(peer.into(), channel)
    }
}

/// Downcasting support for node behaviours stored as trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour of a node. Every hook defaults to a no-op.
///
/// Hooks run inside the timeline's dispatch loop and receive a [`Context`] instead of the
/// timeline itself, so a callback can schedule and send but never re-enter `run()`. Returning an
/// error aborts the run.
pub trait Node: AsAny {
    /// Role the node plays in topology inference.
    fn kind(&self) -> NodeKind {
        NodeKind::Plain
    }

    /// One-time setup, called after all wiring and before the first dispatch.
    fn init(
        &mut self,
        _ctx: &mut Context<'_>,
        _topology: &Topology,
    ) -> Result<(), SimulationError> {
        Ok(())
    }

    fn receive_message(
        &mut self,
        _ctx: &mut Context<'_>,
        _src: &str,
        _message: Bytes,
    ) -> Result<(), SimulationError> {
        Ok(())
    }

    /// Only called for photons that survived their channel.
    fn receive_qubit(
        &mut self,
        _ctx: &mut Context<'_>,
        _src: &str,
        _photon: Photon,
    ) -> Result<(), SimulationError> {
        Ok(())
    }

    fn on_timer(&mut self, _ctx: &mut Context<'_>, _token: u64) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// A node with no behaviour of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainNode;

impl Node for PlainNode {}
