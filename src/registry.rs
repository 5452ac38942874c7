//! Inventory registry client contract
//!
//! The registry owns node, group and cluster data in upstream mode. This crate
//! only reads from it. `Ok(None)` means the registry answered "not found";
//! `Err` is a transport or protocol failure.

use crate::context::{Cluster, Group, GroupWithNodes, Node};
use crate::error::RegistryError;

mod http;

pub use http::HttpRegistryClient;

/// Read-only access to the registry, keyed by registry cluster id
pub trait RegistryClient: Send + Sync {
    fn find_node(&self, cluster: &str, name: &str) -> Result<Option<Node>, RegistryError>;

    fn list_nodes(&self, cluster: &str) -> Result<Vec<Node>, RegistryError>;

    /// Find a group; with `include_nodes` the member nodes are loaded too
    fn find_group(
        &self,
        cluster: &str,
        name: &str,
        include_nodes: bool,
    ) -> Result<Option<GroupWithNodes>, RegistryError>;

    fn list_groups(&self, cluster: &str) -> Result<Vec<Group>, RegistryError>;

    fn find_cluster(&self, cluster: &str) -> Result<Option<Cluster>, RegistryError>;
}
