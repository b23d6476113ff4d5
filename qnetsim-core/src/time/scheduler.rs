//! Event queue and virtual clock.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::SimulationError;
use crate::events::{DispatchRecord, Event, EventKey, EventPayload};
use crate::time::Time;
use crate::topology::NodeId;

/// Counters accumulated over every `run()` of a timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub events_dispatched: u64,
    pub messages_delivered: u64,
    pub qubits_delivered: u64,
    pub qubits_lost: u64,
    pub timers_fired: u64,
    pub events_discarded: u64,
    /// Clock value when the snapshot was taken.
    pub final_time: Time,
}

/// Min-heap of events keyed by `(time, sequence)` plus the clock it advances.
pub struct Scheduler {
    now: Time,
    next_sequence: u64,
    queue: BinaryHeap<Reverse<Event>>,
    stop_time: Option<Time>,
    stop_requested: bool,
    digest: blake3::Hasher,
    trace: Option<Vec<DispatchRecord>>,
    stats: RunStats,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_sequence: 0,
            queue: BinaryHeap::new(),
            stop_time: None,
            stop_requested: false,
            digest: blake3::Hasher::new(),
            trace: None,
            stats: RunStats::default(),
        }
    }

    #[inline]
    pub fn now(&self) -> Time {
        self.now
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time of the next pending event, if any.
    pub fn peek_time(&self) -> Option<Time> {
        self.queue.peek().map(|Reverse(event)| event.time())
    }

    pub fn stop_time(&self) -> Option<Time> {
        self.stop_time
    }

    pub(crate) fn set_stop_time(&mut self, stop_time: Option<Time>) {
        self.stop_time = stop_time;
    }

    /// Snapshot of the run counters with `final_time` set to the current clock.
    pub fn stats(&self) -> RunStats {
        RunStats {
            final_time: self.now,
            ..self.stats.clone()
        }
    }

    pub(crate) fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(Vec::new);
    }

    pub fn trace(&self) -> Option<&[DispatchRecord]> {
        self.trace.as_deref()
    }

    /// Hex BLAKE3 digest over every dispatched `(time, target, payload)` triple so far.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest.finalize().as_bytes())
    }

    pub(crate) fn schedule(
        &mut self,
        time: Time,
        target: NodeId,
        payload: EventPayload,
    ) -> Result<EventKey, SimulationError> {
        if time < self.now {
            return Err(SimulationError::InvalidTime {
                requested: time,
                now: self.now,
            });
        }

        let key = EventKey {
            time,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        trace!(
            time,
            sequence = key.sequence,
            %target,
            kind = payload.kind(),
            "event scheduled"
        );
        self.queue.push(Reverse(Event {
            key,
            target,
            payload,
        }));
        Ok(key)
    }

    pub(crate) fn advance_to(&mut self, time: Time) -> Result<(), SimulationError> {
        if time < self.now {
            return Err(SimulationError::InvalidTime {
                requested: time,
                now: self.now,
            });
        }
        if let Some(pending) = self.peek_time() {
            if pending < time {
                return Err(SimulationError::WouldSkipEvents {
                    requested: time,
                    pending,
                });
            }
        }
        self.now = time;
        Ok(())
    }

    /// Pops the next event and moves the clock to it.
    ///
    /// Returns `None` when the queue is empty or the next event is at or beyond the stop time;
    /// in the latter case every pending event is discarded.
    pub(crate) fn pop_due(&mut self) -> Option<Event> {
        let next_time = self.peek_time()?;
        if let Some(stop_time) = self.stop_time {
            if next_time >= stop_time {
                let discarded = self.discard_pending();
                debug!(stop_time, discarded, "stop time reached");
                return None;
            }
        }

        let Reverse(event) = self.queue.pop()?;
        debug_assert!(event.time() >= self.now, "clock must never move backwards");
        self.now = event.time();
        Some(event)
    }

    pub(crate) fn discard_pending(&mut self) -> usize {
        let discarded = self.queue.len();
        self.queue.clear();
        self.stats.events_discarded += discarded as u64;
        discarded
    }

    pub(crate) fn record_loss(&mut self) {
        self.stats.qubits_lost += 1;
    }

    pub(crate) fn record_dispatch(&mut self, event: &Event, target: &str) {
        self.stats.events_dispatched += 1;
        match event.payload {
            EventPayload::Message { .. } => self.stats.messages_delivered += 1,
            EventPayload::Qubit { .. } => self.stats.qubits_delivered += 1,
            EventPayload::Timer { .. } => self.stats.timers_fired += 1,
        }

        let kind = event.payload.kind();
        let src = event.payload.src();
        let body = event.payload.body();

        self.digest.update(&event.time().to_le_bytes());
        absorb(&mut self.digest, target.as_bytes());
        absorb(&mut self.digest, kind.as_bytes());
        absorb(&mut self.digest, src.unwrap_or_default().as_bytes());
        absorb(&mut self.digest, &body);

        if let Some(trace) = self.trace.as_mut() {
            trace.push(DispatchRecord {
                time: event.time(),
                target: target.to_owned(),
                kind,
                src: src.map(str::to_owned),
                body,
            });
        }
    }

    pub(crate) fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub(crate) fn take_stop_request(&mut self) -> bool {
        std::mem::take(&mut self.stop_requested)
    }
}

// Length-prefixed so adjacent fields cannot run into each other.
fn absorb(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
