use bytes::Bytes;

use crate::channel::{ChannelTable, Transmission};
use crate::error::SimulationError;
use crate::events::{EventPayload, Photon};
use crate::random::RandomStream;
use crate::time::{Scheduler, Time};
use crate::topology::{NodeCore, NodeId};

/// What a node can do from inside one of its hooks.
///
/// Borrows the node's own state, the scheduler and the channel table for the duration of a
/// single callback.
pub struct Context<'a> {
    node: &'a mut NodeCore,
    scheduler: &'a mut Scheduler,
    channels: &'a ChannelTable,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        node: &'a mut NodeCore,
        scheduler: &'a mut Scheduler,
        channels: &'a ChannelTable,
    ) -> Self {
        Self {
            node,
            scheduler,
            channels,
        }
    }

    /// Time of the event being dispatched.
    #[inline]
    pub fn now(&self) -> Time {
        self.scheduler.now()
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn node(&self) -> &NodeCore {
        self.node
    }

    pub fn generator(&mut self) -> &mut RandomStream {
        self.node.generator_mut()
    }

    pub fn send_message(
        &mut self,
        peer: &str,
        message: impl Into<Bytes>,
    ) -> Result<(), SimulationError> {
        self.channels
            .transmit_message(self.node, self.scheduler, peer, message.into())
    }

    pub fn send_qubit(
        &mut self,
        peer: &str,
        photon: Photon,
    ) -> Result<Transmission, SimulationError> {
        self.channels
            .transmit_qubit(self.node, self.scheduler, peer, photon)
    }

    /// Schedules `on_timer(token)` on this node at absolute time `at`.
    pub fn schedule_timer(&mut self, at: Time, token: u64) -> Result<(), SimulationError> {
        let target = self.node.id();
        self.scheduler
            .schedule(at, target, EventPayload::Timer { token })?;
        Ok(())
    }

    /// Schedules `on_timer(token)` on this node `delay` picoseconds from now.
    pub fn schedule_timer_after(&mut self, delay: Time, token: u64) -> Result<(), SimulationError> {
        let at = self.now().saturating_add(delay);
        self.schedule_timer(at, token)
    }

    /// Ends the run once the current callback returns; pending events are discarded.
    pub fn stop(&mut self) {
        self.scheduler.request_stop();
    }
}
