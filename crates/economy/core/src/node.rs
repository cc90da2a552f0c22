//! Capability declarations for world nodes.
//!
//! The host's production graph is built from heterogeneous node types
//! (generators, upgraders, collectors). Instead of probing a node for a
//! facet at runtime, each node declares its capabilities once at
//! construction time and collaborators branch on the flags.

use crate::boost::TargetId;

bitflags::bitflags! {
    /// What a node is allowed to do in the economy.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeCapabilities: u8 {
        /// Emits resource units carrying a base bundle.
        const PRODUCER = 1;
        /// Contributes boosts to aggregation targets.
        const MODIFIER = 1 << 1;
        /// Can itself be the target of boost contributions.
        const AGGREGATOR_TARGET = 1 << 2;
    }
}

/// A node's identity plus its declared capability set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeProfile {
    pub id: TargetId,
    pub capabilities: NodeCapabilities,
}

impl NodeProfile {
    pub fn new(id: TargetId, capabilities: NodeCapabilities) -> Self {
        Self { id, capabilities }
    }

    pub fn is_producer(&self) -> bool {
        self.capabilities.contains(NodeCapabilities::PRODUCER)
    }

    pub fn is_modifier(&self) -> bool {
        self.capabilities.contains(NodeCapabilities::MODIFIER)
    }

    pub fn is_aggregator_target(&self) -> bool {
        self.capabilities
            .contains(NodeCapabilities::AGGREGATOR_TARGET)
    }
}
