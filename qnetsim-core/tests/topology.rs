mod common;

use bytes::Bytes;
use qnetsim_core::prelude::*;

use common::{classical_pair, quantum_pair, recorder, Recorder};

#[test]
fn assign_channels_keyed_by_peer() {
    let mut timeline = Timeline::new();
    let node = timeline.add_node("node1", PlainNode).unwrap();
    let peer = timeline.add_node("node2", PlainNode).unwrap();
    let cc = timeline
        .add_classical_channel(ClassicalChannel::new("cc", 1e3).unwrap())
        .unwrap();
    let qc = timeline
        .add_quantum_channel(QuantumChannel::new("qc", 2e-4, 1e3).unwrap())
        .unwrap();

    timeline.assign_cchannel(node, cc, "node2").unwrap();
    timeline.assign_qchannel(node, qc, "node2").unwrap();

    let core = timeline.node_core(node).unwrap();
    assert_eq!(core.cchannel("node2"), Some(cc));
    assert_eq!(core.qchannel("node2"), Some(qc));
    assert!(timeline.node_core(peer).unwrap().cchannels().is_empty());
}

#[test]
fn later_assignment_replaces_earlier_one() {
    let mut timeline = Timeline::new();
    let node = timeline.add_node("node1", PlainNode).unwrap();
    let first = timeline
        .add_classical_channel(ClassicalChannel::new("first", 1.0).unwrap())
        .unwrap();
    let second = timeline
        .add_classical_channel(ClassicalChannel::new("second", 1.0).unwrap())
        .unwrap();

    timeline.assign_cchannel(node, first, "node2").unwrap();
    timeline.assign_cchannel(node, second, "node2").unwrap();
    assert_eq!(
        timeline.node_core(node).unwrap().cchannel("node2"),
        Some(second)
    );
}

#[test]
fn set_ends_assigns_to_sender_once() {
    let mut pair = classical_pair(1e3);
    let timeline = &mut pair.timeline;
    let cc0 = match timeline.lookup("cc0") {
        Some(EntityId::Channel(ChannelId::Classical(id))) => id,
        other => panic!("unexpected lookup result {other:?}"),
    };

    assert_eq!(
        timeline.node_core(pair.node1).unwrap().cchannel("node2"),
        Some(cc0)
    );
    assert!(timeline.node_core(pair.node2).unwrap().cchannel("node2").is_none());
    assert!(matches!(
        timeline.set_ends(cc0, pair.node2, pair.node1),
        Err(SimulationError::AlreadyBound { .. })
    ));
    assert_eq!(timeline.classical_channel(cc0).unwrap().delay(), 5_000_000);
}

#[test]
fn send_message_delivers_after_delay_in_order() {
    let mut pair = classical_pair(1e3);
    let timeline = &mut pair.timeline;
    timeline.init().unwrap();

    let delay = 5_000_000;
    for i in 0..10u64 {
        timeline.advance_to(i).unwrap();
        timeline
            .send_message(pair.node1, "node2", format!("to node2 {i}"))
            .unwrap();
    }
    for i in 0..10u64 {
        timeline.advance_to(10 + i).unwrap();
        timeline
            .send_message(pair.node2, "node1", format!("to node1 {i}"))
            .unwrap();
    }
    let stats = timeline.run().unwrap();
    assert_eq!(stats.messages_delivered, 20);

    let at_node2 = recorder(timeline, pair.node2).messages();
    assert_eq!(at_node2.len(), 10);
    for (i, (at, src, message)) in at_node2.into_iter().enumerate() {
        assert_eq!(at, delay + i as u64);
        assert_eq!(src, "node1");
        assert_eq!(message, Bytes::from(format!("to node2 {i}")));
    }

    let at_node1 = recorder(timeline, pair.node1).messages();
    assert_eq!(at_node1.len(), 10);
    for (i, (at, src, _)) in at_node1.into_iter().enumerate() {
        assert_eq!(at, delay + 10 + i as u64);
        assert_eq!(src, "node2");
    }
}

#[test]
fn send_qubit_matches_fibre_loss() {
    let mut pair = quantum_pair(0, 2e-4, 2e4);
    let timeline = &mut pair.timeline;
    timeline.init().unwrap();

    let qc0 = timeline.node_core(pair.node1).unwrap().qchannel("node2").unwrap();
    let channel = timeline.quantum_channel(qc0).unwrap();
    let (loss, delay) = (channel.loss(), channel.delay());
    assert!((loss - 0.602).abs() < 1e-3);
    assert_eq!(delay, 100_000_000);

    const PHOTONS: u64 = 1000;
    for i in 0..PHOTONS {
        timeline.advance_to(i).unwrap();
        timeline
            .send_qubit(pair.node1, "node2", Photon::new(format!("a{i}")))
            .unwrap();
    }
    for i in 0..PHOTONS {
        timeline.advance_to(PHOTONS + i).unwrap();
        timeline
            .send_qubit(pair.node2, "node1", Photon::new(format!("b{i}")))
            .unwrap();
    }
    let stats = timeline.run().unwrap();
    assert_eq!(stats.qubits_delivered + stats.qubits_lost, 2 * PHOTONS);

    let expected = 1.0 - loss;
    for (receiver, offset) in [(pair.node2, 0), (pair.node1, PHOTONS)] {
        let qubits = recorder(timeline, receiver).qubits();
        let rate = qubits.len() as f64 / PHOTONS as f64;
        assert!(
            (rate - expected).abs() < 0.1,
            "delivery rate {rate} too far from {expected}"
        );
        for (at, _) in qubits {
            assert!(at >= delay + offset && at < delay + offset + PHOTONS);
        }
    }
}

#[test]
fn unassigned_peer_fails_without_scheduling() {
    let mut pair = classical_pair(1e3);
    let timeline = &mut pair.timeline;
    timeline.init().unwrap();

    assert!(matches!(
        timeline.send_message(pair.node1, "node3", "lost"),
        Err(SimulationError::UnassignedChannel {
            kind: ChannelKind::Classical,
            ..
        })
    ));
    assert!(matches!(
        timeline.send_qubit(pair.node1, "node2", Photon::new("p")),
        Err(SimulationError::UnassignedChannel {
            kind: ChannelKind::Quantum,
            ..
        })
    ));
    assert_eq!(timeline.pending_events(), 0);
}

#[test]
fn assigned_but_unbound_channel_is_rejected() {
    let mut timeline = Timeline::new();
    let node = timeline.add_node("node1", PlainNode).unwrap();
    timeline.add_node("node2", PlainNode).unwrap();
    let cc = timeline
        .add_classical_channel(ClassicalChannel::new("cc", 1.0).unwrap())
        .unwrap();
    timeline.assign_cchannel(node, cc, "node2").unwrap();
    timeline.init().unwrap();

    assert!(matches!(
        timeline.send_message(node, "node2", "hello"),
        Err(SimulationError::UnboundChannel { .. })
    ));
}

#[test]
fn seeds_control_random_streams() {
    let mut timeline = Timeline::with_seed(5);
    let node0 = timeline.add_node_with_seed("node0", PlainNode, 0).unwrap();
    let node1 = timeline.add_node_with_seed("node1", PlainNode, 0).unwrap();
    let node10 = timeline.add_node_with_seed("node10", PlainNode, 10).unwrap();
    let node11 = timeline.add_node_with_seed("node11", PlainNode, 11).unwrap();
    let node20 = timeline.add_node("node20", PlainNode).unwrap();
    let node21 = timeline.add_node("node21", PlainNode).unwrap();

    assert_eq!(draws(&mut timeline, node0), draws(&mut timeline, node1));
    assert_ne!(draws(&mut timeline, node10), draws(&mut timeline, node11));
    assert_ne!(draws(&mut timeline, node20), draws(&mut timeline, node21));

    timeline.set_seed(node20, 111).unwrap();
    timeline.set_seed(node21, 111).unwrap();
    assert_eq!(draws(&mut timeline, node20), draws(&mut timeline, node21));
}

fn draws(timeline: &mut Timeline, id: NodeId) -> Vec<f64> {
    let stream = timeline.generator(id).unwrap();
    (0..10).map(|_| stream.random()).collect()
}

fn star(routers: usize) -> (Timeline, Vec<NodeId>) {
    let mut timeline = Timeline::new();
    let hub = timeline.add_node("node1", QuantumRouter::new()).unwrap();
    let mut ids = vec![hub];

    for i in 2..routers + 2 {
        let router = timeline
            .add_node(format!("node{i}"), QuantumRouter::new())
            .unwrap();
        let relay = timeline
            .add_node(format!("mid_{i}"), BsmNode::new("node1", format!("node{i}")))
            .unwrap();
        let left = timeline
            .add_quantum_channel(QuantumChannel::new(format!("qc_l_{i}"), 0.0, 1e3).unwrap())
            .unwrap();
        let right = timeline
            .add_quantum_channel(QuantumChannel::new(format!("qc_r_{i}"), 0.0, 1e3).unwrap())
            .unwrap();
        timeline.set_ends(left, hub, relay).unwrap();
        timeline.set_ends(right, router, relay).unwrap();
        ids.push(router);
    }
    (timeline, ids)
}

#[test]
fn router_infers_relay_map_at_init() {
    let (mut timeline, ids) = star(48);
    let hub = ids[0];
    assert!(timeline
        .node::<QuantumRouter>(hub)
        .unwrap()
        .map_to_middle_node()
        .is_empty());

    timeline.init().unwrap();

    let router = timeline.node::<QuantumRouter>(hub).unwrap();
    assert_eq!(router.state(), RouterState::Wired);
    let map = router.map_to_middle_node();
    assert_eq!(map.len(), 48);
    for i in 2..50 {
        assert_eq!(map[&format!("node{i}")], format!("mid_{i}"));
    }

    let spoke = timeline.node::<QuantumRouter>(ids[1]).unwrap();
    assert_eq!(spoke.middle_node("node1"), Some("mid_2"));
    assert_eq!(spoke.map_to_middle_node().len(), 1);
}

#[test]
fn relay_without_second_router_is_skipped() {
    let mut timeline = Timeline::new();
    let router = timeline.add_node("node1", QuantumRouter::new()).unwrap();
    timeline.add_node("node2", PlainNode).unwrap();
    let dangling = timeline
        .add_node("mid_a", BsmNode::new("node1", "node2"))
        .unwrap();
    let unwired = timeline
        .add_node("mid_b", BsmNode::new("node1", "node3"))
        .unwrap();
    for (name, relay) in [("qc_a", dangling), ("qc_b", unwired)] {
        let qc = timeline
            .add_quantum_channel(QuantumChannel::new(name, 0.0, 1.0).unwrap())
            .unwrap();
        timeline.set_ends(qc, router, relay).unwrap();
    }
    timeline.init().unwrap();

    let router = timeline.node::<QuantumRouter>(router).unwrap();
    assert!(router.map_to_middle_node().is_empty());
    assert_eq!(router.state(), RouterState::Wired);
}

#[test]
fn downcast_to_wrong_type_is_none() {
    let mut timeline = Timeline::new();
    let id = timeline.add_node("node1", Recorder::default()).unwrap();
    assert!(timeline.node::<QuantumRouter>(id).is_none());
    assert!(timeline.node_mut::<Recorder>(id).is_some());
}
