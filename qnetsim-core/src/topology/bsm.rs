use super::{Node, NodeKind, RelayEndpoints};

/// Relay node sitting between exactly two routers.
///
/// It originates no traffic; its only job here is to mark which router pair it connects so
/// routers can infer their relay map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsmNode {
    endpoints: RelayEndpoints,
}

impl BsmNode {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            endpoints: RelayEndpoints::new(first, second),
        }
    }

    pub fn endpoints(&self) -> &RelayEndpoints {
        &self.endpoints
    }
}

impl Node for BsmNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Relay(self.endpoints.clone())
    }
}
