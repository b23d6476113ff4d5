#![allow(dead_code)]

use bytes::Bytes;
use qnetsim_core::prelude::*;

/// What a [`Recorder`] saw, in dispatch order.
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Message { at: Time, src: String, message: Bytes },
    Qubit { at: Time, src: String, photon: String },
    Timer { at: Time, token: u64 },
}

/// Node that logs every delivery and otherwise does nothing.
#[derive(Debug, Default)]
pub struct Recorder {
    pub log: Vec<Received>,
}

impl Recorder {
    pub fn messages(&self) -> Vec<(Time, String, Bytes)> {
        self.log
            .iter()
            .filter_map(|entry| match entry {
                Received::Message { at, src, message } => Some((*at, src.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn qubits(&self) -> Vec<(Time, String)> {
        self.log
            .iter()
            .filter_map(|entry| match entry {
                Received::Qubit { at, src, .. } => Some((*at, src.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn timers(&self) -> Vec<u64> {
        self.log
            .iter()
            .filter_map(|entry| match entry {
                Received::Timer { token, .. } => Some(*token),
                _ => None,
            })
            .collect()
    }
}

impl Node for Recorder {
    fn receive_message(
        &mut self,
        ctx: &mut Context<'_>,
        src: &str,
        message: Bytes,
    ) -> Result<(), SimulationError> {
        self.log.push(Received::Message {
            at: ctx.now(),
            src: src.to_owned(),
            message,
        });
        Ok(())
    }

    fn receive_qubit(
        &mut self,
        ctx: &mut Context<'_>,
        src: &str,
        photon: Photon,
    ) -> Result<(), SimulationError> {
        self.log.push(Received::Qubit {
            at: ctx.now(),
            src: src.to_owned(),
            photon: photon.name().to_owned(),
        });
        Ok(())
    }

    fn on_timer(&mut self, ctx: &mut Context<'_>, token: u64) -> Result<(), SimulationError> {
        self.log.push(Received::Timer {
            at: ctx.now(),
            token,
        });
        Ok(())
    }
}

/// Two recorders joined by one channel of each kind in each direction.
pub struct Pair {
    pub timeline: Timeline,
    pub node1: NodeId,
    pub node2: NodeId,
}

pub fn classical_pair(distance: f64) -> Pair {
    let mut timeline = Timeline::with_seed(1);
    let node1 = timeline.add_node("node1", Recorder::default()).unwrap();
    let node2 = timeline.add_node("node2", Recorder::default()).unwrap();
    let cc0 = timeline
        .add_classical_channel(ClassicalChannel::new("cc0", distance).unwrap())
        .unwrap();
    let cc1 = timeline
        .add_classical_channel(ClassicalChannel::new("cc1", distance).unwrap())
        .unwrap();
    timeline.set_ends(cc0, node1, node2).unwrap();
    timeline.set_ends(cc1, node2, node1).unwrap();
    Pair {
        timeline,
        node1,
        node2,
    }
}

pub fn quantum_pair(seed: u64, attenuation: f64, distance: f64) -> Pair {
    let mut timeline = Timeline::with_seed(seed);
    let node1 = timeline.add_node("node1", Recorder::default()).unwrap();
    let node2 = timeline.add_node("node2", Recorder::default()).unwrap();
    let qc0 = timeline
        .add_quantum_channel(QuantumChannel::new("qc0", attenuation, distance).unwrap())
        .unwrap();
    let qc1 = timeline
        .add_quantum_channel(QuantumChannel::new("qc1", attenuation, distance).unwrap())
        .unwrap();
    timeline.set_ends(qc0, node1, node2).unwrap();
    timeline.set_ends(qc1, node2, node1).unwrap();
    Pair {
        timeline,
        node1,
        node2,
    }
}

pub fn recorder(timeline: &Timeline, id: NodeId) -> &Recorder {
    timeline.node::<Recorder>(id).unwrap()
}
