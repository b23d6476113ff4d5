//! Event records with deterministic ordering.

use std::cmp::Ordering;

use bytes::{BufMut, Bytes, BytesMut};

use super::Photon;
use crate::time::Time;
use crate::topology::NodeId;

/// Key for ordering events in the queue.
///
/// Events are ordered by:
/// 1. Time (earlier first)
/// 2. Sequence number (FIFO for the same time)
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct EventKey {
    /// When this event should be dispatched, in picoseconds.
    pub time: Time,
    /// Assigned at schedule time from a monotonically increasing counter, never reused.
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What a dispatched event delivers to its target node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// A classical message, fired into `receive_message`.
    Message { src: String, message: Bytes },
    /// A photon that survived its channel, fired into `receive_qubit`.
    Qubit { src: String, photon: Photon },
    /// A wake-up the node scheduled for itself, fired into `on_timer`.
    Timer { token: u64 },
}

impl EventPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            EventPayload::Message { .. } => "message",
            EventPayload::Qubit { .. } => "qubit",
            EventPayload::Timer { .. } => "timer",
        }
    }

    /// Sender name, if the payload travelled over a channel.
    pub fn src(&self) -> Option<&str> {
        match self {
            EventPayload::Message { src, .. } | EventPayload::Qubit { src, .. } => Some(src),
            EventPayload::Timer { .. } => None,
        }
    }

    /// Bytes that identify the payload in traces and the run digest.
    pub fn body(&self) -> Bytes {
        match self {
            EventPayload::Message { message, .. } => message.clone(),
            EventPayload::Qubit { photon, .. } => {
                let name = photon.name().as_bytes();
                let encoding = photon.encoding();
                let mut body = BytesMut::with_capacity(16 + name.len() + encoding.len());
                body.put_u64_le(name.len() as u64);
                body.put_slice(name);
                body.put_u64_le(encoding.len() as u64);
                body.put_slice(encoding);
                body.freeze()
            }
            EventPayload::Timer { token } => Bytes::copy_from_slice(&token.to_le_bytes()),
        }
    }
}

/// A scheduled callback: the target node's hook selected by the payload variant.
#[derive(Debug, Clone)]
pub struct Event {
    pub key: EventKey,
    pub target: NodeId,
    pub payload: EventPayload,
}

impl Event {
    pub fn time(&self) -> Time {
        self.key.time
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One dispatched `(time, target, payload)` triple, as kept in the optional run trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub time: Time,
    pub target: String,
    pub kind: &'static str,
    pub src: Option<String>,
    pub body: Bytes,
}
