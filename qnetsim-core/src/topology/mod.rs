//! ## qnetsim-core::topology
//! **Nodes, routers, relays and the wiring snapshot used during init**
//!
//! Topology inference is a two-pass build: all nodes and channels are wired first, then
//! `Timeline::init` takes a read-only [`Topology`] snapshot and hands it to every node's `init`
//! hook in registration order. Routers read relay adjacency from the snapshot; nothing mutates
//! the wiring afterwards.

mod bsm;
mod node;
mod router;

use std::collections::{BTreeSet, HashMap};

pub use bsm::BsmNode;
pub use node::{AsAny, Node, NodeCore, NodeId, PlainNode};
pub use router::{QuantumRouter, RouterState};

/// Role a node plays in topology inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Plain,
    Router,
    Relay(RelayEndpoints),
}

/// The two router names a relay connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoints([String; 2]);

impl RelayEndpoints {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self([first.into(), second.into()])
    }

    pub fn names(&self) -> &[String; 2] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|end| end == name)
    }

    /// The endpoint that is not `name`, if `name` is one of the two.
    pub fn other(&self, name: &str) -> Option<&str> {
        let [first, second] = &self.0;
        if first == name {
            Some(second.as_str())
        } else if second == name {
            Some(first.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct NodeSummary {
    kind: NodeKind,
    qchannel_peers: BTreeSet<String>,
}

/// Read-only view of the wired network, taken once when the timeline initializes.
#[derive(Debug, Default)]
pub struct Topology {
    nodes: HashMap<String, NodeSummary>,
}

impl Topology {
    pub(crate) fn snapshot<'a>(nodes: impl IntoIterator<Item = (&'a NodeCore, &'a dyn Node)>) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|(core, behavior)| {
                let summary = NodeSummary {
                    kind: behavior.kind(),
                    qchannel_peers: core.qchannels().keys().cloned().collect(),
                };
                (core.name().to_owned(), summary)
            })
            .collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, name: &str) -> Option<&NodeKind> {
        self.nodes.get(name).map(|summary| &summary.kind)
    }

    pub fn relay_endpoints(&self, name: &str) -> Option<&RelayEndpoints> {
        match self.kind(name)? {
            NodeKind::Relay(endpoints) => Some(endpoints),
            _ => None,
        }
    }

    pub fn is_router(&self, name: &str) -> bool {
        matches!(self.kind(name), Some(NodeKind::Router))
    }

    /// Whether `from` holds a quantum channel keyed by `to`.
    pub fn has_qchannel(&self, from: &str, to: &str) -> bool {
        self.nodes
            .get(from)
            .is_some_and(|summary| summary.qchannel_peers.contains(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_endpoints_other() {
        let endpoints = RelayEndpoints::new("a", "b");
        assert_eq!(endpoints.other("a"), Some("b"));
        assert_eq!(endpoints.other("b"), Some("a"));
        assert_eq!(endpoints.other("c"), None);
        assert!(endpoints.contains("a"));
        assert!(!endpoints.contains("c"));
    }

    #[test]
    fn empty_snapshot() {
        let topology = Topology::snapshot(std::iter::empty());
        assert!(topology.is_empty());
        assert!(!topology.is_router("a"));
        assert!(!topology.has_qchannel("a", "b"));
    }
}
