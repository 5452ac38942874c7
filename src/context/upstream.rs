//! Upstream contexts backed by the inventory registry.
//!
//! Node and group names are qualified as `<cluster>.<name>` before they reach
//! the registry. A 404 from the registry is absence; any other failure is
//! propagated as [`ContextError::Transport`].

use super::{bare_name, Cluster, ClusterContexts, Group, GroupContexts, GroupWithNodes, Node, NodeContexts, Scope};
use crate::error::ContextError;
use crate::registry::RegistryClient;
use std::sync::Arc;

pub struct UpstreamNodes {
    client: Arc<dyn RegistryClient>,
    scope: Scope,
}

impl UpstreamNodes {
    pub fn new(client: Arc<dyn RegistryClient>, scope: Scope) -> Self {
        Self { client, scope }
    }
}

impl NodeContexts for UpstreamNodes {
    fn find(&self, id: &str) -> Result<Option<Node>, ContextError> {
        Ok(self.client.find_node(&self.scope.cluster_id, bare_name(id))?)
    }

    fn list(&self, scope: &Scope) -> Result<Vec<Node>, ContextError> {
        Ok(self.client.list_nodes(&scope.cluster_id)?)
    }
}

pub struct UpstreamGroups {
    client: Arc<dyn RegistryClient>,
    scope: Scope,
}

impl UpstreamGroups {
    pub fn new(client: Arc<dyn RegistryClient>, scope: Scope) -> Self {
        Self { client, scope }
    }
}

impl GroupContexts for UpstreamGroups {
    fn find(&self, id: &str) -> Result<Option<Group>, ContextError> {
        let found = self
            .client
            .find_group(&self.scope.cluster_id, bare_name(id), false)?;
        Ok(found.map(|with_nodes| with_nodes.group))
    }

    fn list(&self, scope: &Scope) -> Result<Vec<Group>, ContextError> {
        Ok(self.client.list_groups(&scope.cluster_id)?)
    }

    fn find_including_nodes(&self, id: &str) -> Result<Option<GroupWithNodes>, ContextError> {
        Ok(self
            .client
            .find_group(&self.scope.cluster_id, bare_name(id), true)?)
    }
}

pub struct UpstreamClusters {
    client: Arc<dyn RegistryClient>,
}

impl UpstreamClusters {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self { client }
    }
}

impl ClusterContexts for UpstreamClusters {
    fn find(&self, cluster_id: &str) -> Result<Option<Cluster>, ContextError> {
        Ok(self.client.find_cluster(cluster_id)?)
    }

    fn list(&self, scope: &Scope) -> Result<Vec<Cluster>, ContextError> {
        Ok(self.find(&scope.cluster_id)?.into_iter().collect())
    }
}
