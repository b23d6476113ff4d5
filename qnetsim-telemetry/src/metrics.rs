//! ## qnetsim-telemetry::metrics
//! **Prometheus registry fed from timeline run statistics**
//!
//! ### Expectations:
//! - Counters only move forward: recording a later snapshot adds the difference
//! - Text exposition is available without an HTTP endpoint

use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use qnetsim_core::time::RunStats;

#[derive(Clone)]
pub struct SimulationMetrics {
    pub registry: Registry,
    pub events_dispatched: IntCounter,
    pub deliveries: IntCounterVec,
    pub qubits_lost: IntCounter,
    pub events_discarded: IntCounter,
    pub final_time: Gauge,
    last: RunStats,
}

impl SimulationMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let events_dispatched = IntCounter::new(
            "qnetsim_events_dispatched_total",
            "Events delivered to node callbacks",
        )?;
        let deliveries = IntCounterVec::new(
            Opts::new("qnetsim_deliveries_total", "Deliveries by payload kind"),
            &["kind"],
        )?;
        let qubits_lost = IntCounter::new(
            "qnetsim_qubits_lost_total",
            "Photons dropped by quantum channel loss",
        )?;
        let events_discarded = IntCounter::new(
            "qnetsim_events_discarded_total",
            "Pending events dropped at the stop time or on a stop request",
        )?;
        let final_time = Gauge::new(
            "qnetsim_simulation_time_seconds",
            "Simulation clock at the last recorded snapshot",
        )?;

        registry.register(Box::new(events_dispatched.clone()))?;
        registry.register(Box::new(deliveries.clone()))?;
        registry.register(Box::new(qubits_lost.clone()))?;
        registry.register(Box::new(events_discarded.clone()))?;
        registry.register(Box::new(final_time.clone()))?;

        Ok(Self {
            registry,
            events_dispatched,
            deliveries,
            qubits_lost,
            events_discarded,
            final_time,
            last: RunStats::default(),
        })
    }

    /// Folds a cumulative stats snapshot into the counters.
    pub fn record(&mut self, stats: &RunStats) {
        let last = &self.last;
        self.events_dispatched
            .inc_by(stats.events_dispatched.saturating_sub(last.events_dispatched));
        for (kind, now, before) in [
            ("message", stats.messages_delivered, last.messages_delivered),
            ("qubit", stats.qubits_delivered, last.qubits_delivered),
            ("timer", stats.timers_fired, last.timers_fired),
        ] {
            self.deliveries
                .with_label_values(&[kind])
                .inc_by(now.saturating_sub(before));
        }
        self.qubits_lost
            .inc_by(stats.qubits_lost.saturating_sub(last.qubits_lost));
        self.events_discarded
            .inc_by(stats.events_discarded.saturating_sub(last.events_discarded));
        self.final_time.set(stats.final_time as f64 * 1e-12);
        self.last = stats.clone();
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
