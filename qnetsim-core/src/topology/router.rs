use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::{Node, NodeKind, Topology};
use crate::error::SimulationError;
use crate::time::Context;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouterState {
    /// Constructed, relay map empty.
    #[default]
    Unwired,
    /// Relay map populated by `init`. Terminal.
    Wired,
}

/// A router that learns, at init, which relay node mediates each peer router.
#[derive(Debug, Default)]
pub struct QuantumRouter {
    state: RouterState,
    map_to_middle_node: BTreeMap<String, String>,
}

impl QuantumRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    /// Peer router name to relay node name. Empty until the timeline has initialized.
    pub fn map_to_middle_node(&self) -> &BTreeMap<String, String> {
        &self.map_to_middle_node
    }

    /// Relay that connects this router to `peer`.
    pub fn middle_node(&self, peer: &str) -> Option<&str> {
        self.map_to_middle_node.get(peer).map(String::as_str)
    }
}

impl Node for QuantumRouter {
    fn kind(&self) -> NodeKind {
        NodeKind::Router
    }

    fn init(&mut self, ctx: &mut Context<'_>, topology: &Topology) -> Result<(), SimulationError> {
        let name = ctx.name();
        for relay in ctx.node().qchannels().keys() {
            let Some(endpoints) = topology.relay_endpoints(relay) else {
                continue;
            };
            let Some(remote) = endpoints.other(name) else {
                trace!(router = name, relay = %relay, "relay does not list this router");
                continue;
            };
            if remote == name || !topology.is_router(remote) || !topology.has_qchannel(remote, relay)
            {
                trace!(router = name, relay = %relay, remote, "relay has no second router");
                continue;
            }
            self.map_to_middle_node
                .insert(remote.to_owned(), relay.clone());
        }

        self.state = RouterState::Wired;
        debug!(
            router = name,
            relays = self.map_to_middle_node.len(),
            "relay map built"
        );
        Ok(())
    }
}
