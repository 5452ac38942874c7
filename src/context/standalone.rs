//! Standalone contexts backed by the static topology.
//!
//! Only nodes exist in a standalone deployment. Group and cluster queries
//! answer empty so callers never need to branch on the mode.

use super::{bare_name, Cluster, ClusterContexts, Group, GroupContexts, GroupWithNodes, Node, NodeContexts, Scope};
use crate::error::ContextError;
use crate::topology::TopologyCache;
use std::sync::Arc;

pub struct StandaloneNodes {
    topology: Arc<TopologyCache>,
}

impl StandaloneNodes {
    pub fn new(topology: Arc<TopologyCache>) -> Self {
        Self { topology }
    }
}

impl NodeContexts for StandaloneNodes {
    fn find(&self, id: &str) -> Result<Option<Node>, ContextError> {
        Ok(self.topology.find_node(bare_name(id))?)
    }

    /// The scope is ignored: there is at most one implicit cluster
    fn list(&self, _scope: &Scope) -> Result<Vec<Node>, ContextError> {
        Ok(self.topology.all_nodes()?)
    }
}

pub struct StandaloneGroups;

impl GroupContexts for StandaloneGroups {
    fn find(&self, _id: &str) -> Result<Option<Group>, ContextError> {
        Ok(None)
    }

    fn list(&self, _scope: &Scope) -> Result<Vec<Group>, ContextError> {
        Ok(Vec::new())
    }

    fn find_including_nodes(&self, id: &str) -> Result<Option<GroupWithNodes>, ContextError> {
        Ok(self.find(id)?.map(|group| GroupWithNodes {
            group,
            nodes: Vec::new(),
        }))
    }
}

pub struct StandaloneClusters;

impl ClusterContexts for StandaloneClusters {
    fn find(&self, _cluster_id: &str) -> Result<Option<Cluster>, ContextError> {
        Ok(None)
    }

    fn list(&self, _scope: &Scope) -> Result<Vec<Cluster>, ContextError> {
        Ok(Vec::new())
    }
}
