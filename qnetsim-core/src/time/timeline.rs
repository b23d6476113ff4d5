//! The timeline: entity arena plus the `init()`/`run()` lifecycle.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bytes::Bytes;
use tracing::{debug, info, instrument};

use crate::channel::{
    ChannelEnds, ChannelId, ChannelTable, ClassicalChannel, ClassicalChannelId, QuantumChannel,
    QuantumChannelId, Transmission,
};
use crate::error::SimulationError;
use crate::events::{DispatchRecord, Event, EventPayload, Photon};
use crate::random::RandomStream;
use crate::time::{Context, RunStats, Scheduler, Time};
use crate::topology::{Node, NodeCore, NodeId, Topology};

/// Handle of any registered entity, as returned by [`Timeline::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Node(NodeId),
    Channel(ChannelId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Wiring,
    Initialized,
    /// A node's `init` hook failed; the timeline cannot run.
    Failed,
}

struct NodeSlot {
    core: NodeCore,
    behavior: Box<dyn Node>,
}

/// Virtual-clock scheduler owning the event queue and every registered entity.
///
/// A run has two passes: wire nodes and channels, then [`init`](Self::init) once and
/// [`run`](Self::run). Application code keeps the returned handles and reads node state back
/// through [`node`](Self::node) and [`node_core`](Self::node_core).
pub struct Timeline {
    master_seed: u64,
    scheduler: Scheduler,
    nodes: Vec<NodeSlot>,
    channels: ChannelTable,
    names: HashMap<String, EntityId>,
    phase: Phase,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Timeline whose default-seeded entities derive their streams from `master_seed`.
    pub fn with_seed(master_seed: u64) -> Self {
        Self {
            master_seed,
            scheduler: Scheduler::new(),
            nodes: Vec::new(),
            channels: ChannelTable::default(),
            names: HashMap::new(),
            phase: Phase::Wiring,
        }
    }

    /// Events at or beyond `stop_time` are discarded instead of executed.
    pub fn with_stop_time(mut self, stop_time: Time) -> Self {
        self.scheduler.set_stop_time(Some(stop_time));
        self
    }

    /// Keeps every dispatched `(time, target, payload)` triple, see [`trace`](Self::trace).
    pub fn with_trace(mut self) -> Self {
        self.scheduler.enable_trace();
        self
    }

    pub fn set_stop_time(&mut self, stop_time: Option<Time>) {
        self.scheduler.set_stop_time(stop_time);
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    #[inline]
    pub fn now(&self) -> Time {
        self.scheduler.now()
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == Phase::Initialized
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn stats(&self) -> RunStats {
        self.scheduler.stats()
    }

    pub fn trace(&self) -> Option<&[DispatchRecord]> {
        self.scheduler.trace()
    }

    pub fn trace_digest(&self) -> String {
        self.scheduler.digest_hex()
    }

    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Registers a node whose stream is derived from the master seed and its name.
    pub fn add_node<N: Node>(
        &mut self,
        name: impl Into<String>,
        behavior: N,
    ) -> Result<NodeId, SimulationError> {
        let name = name.into();
        let rng = RandomStream::derived(self.master_seed, &name);
        self.insert_node(name, rng, Box::new(behavior))
    }

    /// Registers a node with an explicit stream seed.
    pub fn add_node_with_seed<N: Node>(
        &mut self,
        name: impl Into<String>,
        behavior: N,
        seed: u64,
    ) -> Result<NodeId, SimulationError> {
        self.insert_node(name.into(), RandomStream::new(seed), Box::new(behavior))
    }

    fn insert_node(
        &mut self,
        name: String,
        rng: RandomStream,
        behavior: Box<dyn Node>,
    ) -> Result<NodeId, SimulationError> {
        self.ensure_wiring("add a node")?;
        let id = NodeId::new(self.nodes.len());
        self.register_name(&name, EntityId::Node(id))?;
        debug!(node = %name, %id, seed = rng.seed(), "node registered");
        self.nodes.push(NodeSlot {
            core: NodeCore::new(id, name, rng),
            behavior,
        });
        Ok(id)
    }

    pub fn add_classical_channel(
        &mut self,
        channel: ClassicalChannel,
    ) -> Result<ClassicalChannelId, SimulationError> {
        self.ensure_wiring("add a channel")?;
        let name = channel.name().to_owned();
        self.ensure_name_free(&name)?;
        let id = self.channels.insert_classical(channel);
        self.register_name(&name, EntityId::Channel(id.into()))?;
        Ok(id)
    }

    pub fn add_quantum_channel(
        &mut self,
        channel: QuantumChannel,
    ) -> Result<QuantumChannelId, SimulationError> {
        self.ensure_wiring("add a channel")?;
        let name = channel.name().to_owned();
        self.ensure_name_free(&name)?;
        let id = self.channels.insert_quantum(channel);
        self.register_name(&name, EntityId::Channel(id.into()))?;
        Ok(id)
    }

    /// Binds a channel's direction once and assigns it to the sender under the receiver's name.
    pub fn set_ends(
        &mut self,
        channel: impl Into<ChannelId>,
        sender: NodeId,
        receiver: NodeId,
    ) -> Result<(), SimulationError> {
        self.ensure_wiring("bind channel ends")?;
        let channel = channel.into();
        let receiver_name = self.slot(receiver)?.core.name().to_owned();
        self.slot(sender)?;

        self.channels
            .bind(channel, ChannelEnds { sender, receiver })?;
        debug!(
            channel = self.channels.name(channel)?,
            sender = %sender,
            receiver = %receiver_name,
            "channel ends bound"
        );

        let core = &mut self.nodes[sender.index()].core;
        match channel {
            ChannelId::Classical(id) => {
                core.assign_cchannel(id, receiver_name);
            }
            ChannelId::Quantum(id) => {
                core.assign_qchannel(id, receiver_name);
            }
        }
        Ok(())
    }

    /// Stores `channel` in `node`'s classical map under `peer`, replacing any previous entry.
    pub fn assign_cchannel(
        &mut self,
        node: NodeId,
        channel: ClassicalChannelId,
        peer: &str,
    ) -> Result<(), SimulationError> {
        self.ensure_wiring("assign a classical channel")?;
        self.check_assignment(channel.into(), node, peer)?;
        self.slot_mut(node)?.core.assign_cchannel(channel, peer);
        Ok(())
    }

    /// Stores `channel` in `node`'s quantum map under `peer`, replacing any previous entry.
    pub fn assign_qchannel(
        &mut self,
        node: NodeId,
        channel: QuantumChannelId,
        peer: &str,
    ) -> Result<(), SimulationError> {
        self.ensure_wiring("assign a quantum channel")?;
        self.check_assignment(channel.into(), node, peer)?;
        self.slot_mut(node)?.core.assign_qchannel(channel, peer);
        Ok(())
    }

    // An unbound channel may go anywhere; a bound one must agree with its ends.
    fn check_assignment(
        &self,
        channel: ChannelId,
        node: NodeId,
        peer: &str,
    ) -> Result<(), SimulationError> {
        self.slot(node)?;
        let Some(ends) = self.channels.ends(channel)? else {
            return Ok(());
        };
        let name = self.channels.name(channel)?;
        if ends.sender != node {
            return Err(SimulationError::ChannelMismatch {
                channel: name.to_owned(),
                reason: format!("'{}' is not the bound sender", self.nodes[node.index()].core.name()),
            });
        }
        let receiver = self.nodes[ends.receiver.index()].core.name();
        if receiver != peer {
            return Err(SimulationError::ChannelMismatch {
                channel: name.to_owned(),
                reason: format!("bound receiver is '{receiver}', not '{peer}'"),
            });
        }
        Ok(())
    }

    pub fn classical_channel(
        &self,
        id: ClassicalChannelId,
    ) -> Result<&ClassicalChannel, SimulationError> {
        self.channels.classical(id)
    }

    pub fn quantum_channel(&self, id: QuantumChannelId) -> Result<&QuantumChannel, SimulationError> {
        self.channels.quantum(id)
    }

    pub fn node_core(&self, id: NodeId) -> Result<&NodeCore, SimulationError> {
        self.slot(id).map(|slot| &slot.core)
    }

    /// The node's behaviour, if it is an `N`.
    pub fn node<N: Node>(&self, id: NodeId) -> Option<&N> {
        let slot = self.nodes.get(id.index())?;
        <dyn Node as crate::topology::AsAny>::as_any(slot.behavior.as_ref()).downcast_ref::<N>()
    }

    pub fn node_mut<N: Node>(&mut self, id: NodeId) -> Option<&mut N> {
        let slot = self.nodes.get_mut(id.index())?;
        <dyn Node as crate::topology::AsAny>::as_any_mut(slot.behavior.as_mut())
            .downcast_mut::<N>()
    }

    /// The node's random stream.
    pub fn generator(&mut self, id: NodeId) -> Result<&mut RandomStream, SimulationError> {
        self.slot_mut(id).map(|slot| slot.core.generator_mut())
    }

    pub fn set_seed(&mut self, id: NodeId, seed: u64) -> Result<(), SimulationError> {
        self.slot_mut(id)?.core.set_seed(seed);
        Ok(())
    }

    /// Enqueues `payload` for `target` at `time`.
    pub fn schedule(
        &mut self,
        time: Time,
        target: NodeId,
        payload: EventPayload,
    ) -> Result<(), SimulationError> {
        self.slot(target)?;
        self.scheduler.schedule(time, target, payload)?;
        Ok(())
    }

    /// Moves the clock forward between externally driven sends.
    pub fn advance_to(&mut self, time: Time) -> Result<(), SimulationError> {
        self.scheduler.advance_to(time)
    }

    /// Sends `message` from `node` to `peer` at the current time.
    pub fn send_message(
        &mut self,
        node: NodeId,
        peer: &str,
        message: impl Into<Bytes>,
    ) -> Result<(), SimulationError> {
        let slot = self.nodes.get(node.index()).ok_or_else(|| unknown(node))?;
        self.channels
            .transmit_message(&slot.core, &mut self.scheduler, peer, message.into())
    }

    /// Sends `photon` from `node` to `peer` at the current time.
    pub fn send_qubit(
        &mut self,
        node: NodeId,
        peer: &str,
        photon: Photon,
    ) -> Result<Transmission, SimulationError> {
        let slot = self
            .nodes
            .get_mut(node.index())
            .ok_or_else(|| unknown(node))?;
        self.channels
            .transmit_qubit(&mut slot.core, &mut self.scheduler, peer, photon)
    }

    /// Runs every node's `init` hook once, in registration order.
    ///
    /// Events scheduled from `init` are kept for the first `run()`.
    #[instrument(skip(self), fields(nodes = self.nodes.len()))]
    pub fn init(&mut self) -> Result<(), SimulationError> {
        if self.phase != Phase::Wiring {
            return Err(SimulationError::AlreadyInitialized);
        }
        self.phase = Phase::Failed;

        let topology = Topology::snapshot(
            self.nodes.iter().map(|slot| {
                let behavior: &dyn Node = slot.behavior.as_ref();
                (&slot.core, behavior)
            }),
        );
        for NodeSlot { core, behavior } in self.nodes.iter_mut() {
            let mut ctx = Context::new(core, &mut self.scheduler, &self.channels);
            behavior.init(&mut ctx, &topology)?;
        }
        self.phase = Phase::Initialized;

        info!(
            nodes = self.nodes.len(),
            pending = self.scheduler.len(),
            "timeline initialized"
        );
        Ok(())
    }

    /// Drains the queue in `(time, sequence)` order, dispatching each event to its node.
    ///
    /// Stops when the queue is empty, the stop time is reached, or a callback calls
    /// [`Context::stop`]. Returns the accumulated run statistics.
    #[instrument(skip(self), fields(start = self.scheduler.now(), pending = self.scheduler.len()))]
    pub fn run(&mut self) -> Result<RunStats, SimulationError> {
        if self.phase != Phase::Initialized {
            return Err(SimulationError::NotInitialized);
        }

        while let Some(event) = self.scheduler.pop_due() {
            let NodeSlot { core, behavior } = self
                .nodes
                .get_mut(event.target.index())
                .ok_or_else(|| unknown(event.target))?;
            self.scheduler.record_dispatch(&event, core.name());

            let Event { payload, .. } = event;
            let mut ctx = Context::new(core, &mut self.scheduler, &self.channels);
            match payload {
                EventPayload::Message { src, message } => {
                    behavior.receive_message(&mut ctx, &src, message)?
                }
                EventPayload::Qubit { src, photon } => behavior.receive_qubit(&mut ctx, &src, photon)?,
                EventPayload::Timer { token } => behavior.on_timer(&mut ctx, token)?,
            }

            if self.scheduler.take_stop_request() {
                let discarded = self.scheduler.discard_pending();
                debug!(discarded, "run stopped by callback");
                break;
            }
        }

        let stats = self.scheduler.stats();
        info!(
            dispatched = stats.events_dispatched,
            lost = stats.qubits_lost,
            now = stats.final_time,
            "timeline run finished"
        );
        Ok(stats)
    }

    fn ensure_wiring(&self, operation: &'static str) -> Result<(), SimulationError> {
        match self.phase {
            Phase::Wiring => Ok(()),
            Phase::Initialized | Phase::Failed => Err(SimulationError::TopologyFrozen(operation)),
        }
    }

    fn ensure_name_free(&self, name: &str) -> Result<(), SimulationError> {
        if self.names.contains_key(name) {
            return Err(SimulationError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    fn register_name(&mut self, name: &str, id: EntityId) -> Result<(), SimulationError> {
        match self.names.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(SimulationError::DuplicateName(name.to_owned())),
            Entry::Vacant(entry) => {
                entry.insert(id);
                Ok(())
            }
        }
    }

    fn slot(&self, id: NodeId) -> Result<&NodeSlot, SimulationError> {
        self.nodes.get(id.index()).ok_or_else(|| unknown(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot, SimulationError> {
        self.nodes.get_mut(id.index()).ok_or_else(|| unknown(id))
    }
}

fn unknown(id: NodeId) -> SimulationError {
    SimulationError::UnknownEntity(id.to_string())
}
