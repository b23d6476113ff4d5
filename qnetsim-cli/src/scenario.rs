//! Star scenario: one hub router, `spokes` peer routers, one relay per pair.
//!
//! The hub sends classical messages to every spoke while each spoke fires photons at its
//! relay, all on timers so the whole workload runs inside a single `run()`.

use std::collections::BTreeMap;

use qnetsim_config::QnetsimConfig;
use qnetsim_core::prelude::*;
use tracing::{debug, info};

/// What a finished scenario reports back.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub hub: String,
    pub relay_map: BTreeMap<String, String>,
    pub stats: RunStats,
    pub digest: String,
}

#[derive(Debug)]
enum Traffic {
    Messages { peers: Vec<String> },
    Photons { relay: String },
}

/// A router that also generates traffic, one round per timer.
#[derive(Debug)]
struct TrafficRouter {
    router: QuantumRouter,
    traffic: Traffic,
    rounds: u32,
    interval: Time,
}

impl TrafficRouter {
    fn new(traffic: Traffic, rounds: u32, interval: Time) -> Self {
        Self {
            router: QuantumRouter::new(),
            traffic,
            rounds,
            interval,
        }
    }
}

impl Node for TrafficRouter {
    fn kind(&self) -> NodeKind {
        self.router.kind()
    }

    fn init(&mut self, ctx: &mut Context<'_>, topology: &Topology) -> Result<(), SimulationError> {
        self.router.init(ctx, topology)?;
        if self.rounds > 0 {
            ctx.schedule_timer(ctx.now(), 0)?;
        }
        Ok(())
    }

    fn on_timer(&mut self, ctx: &mut Context<'_>, round: u64) -> Result<(), SimulationError> {
        match &self.traffic {
            Traffic::Messages { peers } => {
                for peer in peers {
                    ctx.send_message(peer, format!("round {round}"))?;
                }
            }
            Traffic::Photons { relay } => {
                let photon = Photon::new(format!("{}-{round}", ctx.name()));
                ctx.send_qubit(relay, photon)?;
            }
        }
        if round + 1 < u64::from(self.rounds) {
            ctx.schedule_timer_after(self.interval, round + 1)?;
        }
        Ok(())
    }
}

fn spoke_name(hub: &str, index: usize) -> String {
    format!("{hub}_spoke_{index}")
}

fn relay_name(hub: &str, index: usize) -> String {
    format!("{hub}_relay_{index}")
}

/// Wires the star described by `config` and returns the timeline with the hub's id.
pub fn build(config: &QnetsimConfig) -> Result<(Timeline, NodeId), SimulationError> {
    let sim = &config.simulation;
    let topo = &config.topology;
    let load = &config.workload;

    let mut timeline = Timeline::with_seed(sim.seed);
    timeline.set_stop_time(sim.stop_time);
    if sim.record_trace {
        timeline = timeline.with_trace();
    }

    let spokes: Vec<String> = (1..=topo.spokes).map(|i| spoke_name(&topo.hub, i)).collect();
    let hub = timeline.add_node(
        topo.hub.clone(),
        TrafficRouter::new(
            Traffic::Messages {
                peers: spokes.clone(),
            },
            load.messages_per_spoke,
            load.send_interval,
        ),
    )?;

    for (index, spoke_name) in (1..).zip(spokes) {
        let relay_name = relay_name(&topo.hub, index);
        let spoke = timeline.add_node(
            spoke_name.clone(),
            TrafficRouter::new(
                Traffic::Photons {
                    relay: relay_name.clone(),
                },
                load.photons_per_relay,
                load.send_interval,
            ),
        )?;
        let relay = timeline.add_node(
            relay_name.clone(),
            BsmNode::new(topo.hub.clone(), spoke_name.clone()),
        )?;

        let hub_fibre = timeline.add_quantum_channel(QuantumChannel::new(
            format!("qc_{}_{}", topo.hub, relay_name),
            topo.attenuation,
            topo.quantum_distance,
        )?)?;
        let spoke_fibre = timeline.add_quantum_channel(QuantumChannel::new(
            format!("qc_{spoke_name}_{relay_name}"),
            topo.attenuation,
            topo.quantum_distance,
        )?)?;
        timeline.set_ends(hub_fibre, hub, relay)?;
        timeline.set_ends(spoke_fibre, spoke, relay)?;

        let down = timeline.add_classical_channel(ClassicalChannel::new(
            format!("cc_{}_{}", topo.hub, spoke_name),
            topo.classical_distance,
        )?)?;
        let up = timeline.add_classical_channel(ClassicalChannel::new(
            format!("cc_{}_{}", spoke_name, topo.hub),
            topo.classical_distance,
        )?)?;
        timeline.set_ends(down, hub, spoke)?;
        timeline.set_ends(up, spoke, hub)?;
        debug!(spoke = %spoke_name, relay = %relay_name, "spoke wired");
    }

    Ok((timeline, hub))
}

/// Builds, initializes and runs the scenario.
pub fn run(config: &QnetsimConfig) -> Result<ScenarioReport, SimulationError> {
    let (mut timeline, hub) = build(config)?;
    timeline.init()?;
    let stats = timeline.run()?;

    let relay_map = timeline
        .node::<TrafficRouter>(hub)
        .map(|node| node.router.map_to_middle_node().clone())
        .unwrap_or_default();
    info!(
        relays = relay_map.len(),
        digest = %timeline.trace_digest(),
        "scenario finished"
    );

    Ok(ScenarioReport {
        hub: config.topology.hub.clone(),
        relay_map,
        stats,
        digest: timeline.trace_digest(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn small() -> QnetsimConfig {
        let mut config = QnetsimConfig::default();
        config.topology.spokes = 3;
        config.workload.messages_per_spoke = 4;
        config.workload.photons_per_relay = 50;
        config
    }

    #[traced_test]
    #[test]
    fn hub_learns_every_relay() {
        let report = run(&small()).unwrap();
        assert_eq!(report.relay_map.len(), 3);
        assert_eq!(report.relay_map["hub_spoke_2"], "hub_relay_2");
        assert!(logs_contain("scenario finished"));
    }

    #[test]
    fn workload_is_fully_accounted() {
        let report = run(&small()).unwrap();
        let stats = &report.stats;
        assert_eq!(stats.messages_delivered, 3 * 4);
        assert_eq!(stats.qubits_delivered + stats.qubits_lost, 3 * 50);
        assert_eq!(stats.timers_fired, 4 + 3 * 50);
        assert_eq!(stats.events_discarded, 0);
    }

    #[test]
    fn same_seed_same_digest() {
        let first = run(&small()).unwrap();
        let second = run(&small()).unwrap();
        assert_eq!(first.digest, second.digest);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn stop_time_cuts_the_run_short() {
        let mut config = small();
        config.simulation.stop_time = Some(2_500);
        let report = run(&config).unwrap();
        assert!(report.stats.events_discarded > 0);
        assert!(report.stats.final_time < 2_500);
        assert_eq!(report.relay_map.len(), 3);
    }
}
