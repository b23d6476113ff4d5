use bytes::Bytes;
use tracing::trace;

use super::{bind_once, check_distance, check_sender, ChannelEnds};
use crate::error::SimulationError;
use crate::events::EventPayload;
use crate::network::propagation_delay;
use crate::time::{Scheduler, Time};
use crate::topology::NodeCore;

/// A link that always delivers, after a fixed propagation delay.
#[derive(Debug, Clone)]
pub struct ClassicalChannel {
    name: String,
    distance: f64,
    delay: Time,
    ends: Option<ChannelEnds>,
}

impl ClassicalChannel {
    /// Channel whose delay is derived from its length.
    pub fn new(name: impl Into<String>, distance: f64) -> Result<Self, SimulationError> {
        let name = name.into();
        check_distance(&name, distance)?;
        Ok(Self {
            delay: propagation_delay(distance),
            name,
            distance,
            ends: None,
        })
    }

    /// Channel with an explicit delay that overrides the distance-derived one.
    pub fn with_delay(
        name: impl Into<String>,
        distance: f64,
        delay: Time,
    ) -> Result<Self, SimulationError> {
        let mut channel = Self::new(name, distance)?;
        channel.delay = delay;
        Ok(channel)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn delay(&self) -> Time {
        self.delay
    }

    pub fn ends(&self) -> Option<ChannelEnds> {
        self.ends
    }

    pub(crate) fn set_ends(&mut self, ends: ChannelEnds) -> Result<(), SimulationError> {
        bind_once(&mut self.ends, &self.name, ends)
    }

    /// Schedules `(sender, message)` on the receiver at `now + delay`.
    pub(crate) fn transmit(
        &self,
        sender: &NodeCore,
        scheduler: &mut Scheduler,
        message: Bytes,
    ) -> Result<(), SimulationError> {
        let ends = check_sender(&self.name, self.ends, sender)?;
        let at = scheduler.now().saturating_add(self.delay);
        trace!(channel = %self.name, at, len = message.len(), "message in flight");
        scheduler.schedule(
            at,
            ends.receiver,
            EventPayload::Message {
                src: sender.name().to_owned(),
                message,
            },
        )?;
        Ok(())
    }
}
