//! Context domain: nodes, groups and the cluster.
//!
//! A context is the parameter source for rendering. Contexts are read-only here;
//! they come either from the upstream inventory registry or from the static
//! topology. [`ContextSource`] hides which one is active behind one small query
//! interface per kind.

use crate::config::RenderConfig;
use crate::error::{ApiError, ContextError};
use crate::registry::{HttpRegistryClient, RegistryClient};
use crate::topology::TopologyCache;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::info;

pub mod standalone;
pub mod upstream;

pub use standalone::{StandaloneClusters, StandaloneGroups, StandaloneNodes};
pub use upstream::{UpstreamClusters, UpstreamGroups, UpstreamNodes};

/// External identifier of the singleton cluster context
pub const CLUSTER_ID: &str = "default";

/// Rendering parameters keyed by marker name
pub type Params = BTreeMap<String, String>;

/// The three context kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Node,
    Group,
    Cluster,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextKind::Node => "node",
            ContextKind::Group => "group",
            ContextKind::Cluster => "cluster",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub member_node_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub params: Params,
}

/// A group resolved together with its member nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupWithNodes {
    pub group: Group,
    pub nodes: Vec<Node>,
}

/// Any context a template can be rendered against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Context {
    Node(Node),
    Group(Group),
    Cluster(Cluster),
}

impl Context {
    pub fn kind(&self) -> ContextKind {
        match self {
            Context::Node(_) => ContextKind::Node,
            Context::Group(_) => ContextKind::Group,
            Context::Cluster(_) => ContextKind::Cluster,
        }
    }

    /// External id: the bare name for nodes and groups, `default` for the cluster
    pub fn id(&self) -> &str {
        match self {
            Context::Node(node) => &node.name,
            Context::Group(group) => &group.name,
            Context::Cluster(_) => CLUSTER_ID,
        }
    }

    pub fn params(&self) -> &Params {
        match self {
            Context::Node(node) => &node.params,
            Context::Group(group) => &group.params,
            Context::Cluster(cluster) => &cluster.params,
        }
    }
}

impl From<Node> for Context {
    fn from(node: Node) -> Self {
        Context::Node(node)
    }
}

impl From<Group> for Context {
    fn from(group: Group) -> Self {
        Context::Group(group)
    }
}

impl From<Cluster> for Context {
    fn from(cluster: Cluster) -> Self {
        Context::Cluster(cluster)
    }
}

/// Scope for `list` queries: the registry cluster everything belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub cluster_id: String,
}

impl Scope {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
        }
    }
}

/// Strip a `<cluster>.` qualification from an id
pub fn bare_name(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

fn unsupported(kind: ContextKind, operation: &'static str) -> ContextError {
    ContextError::Unsupported { kind, operation }
}

/// Node queries
///
/// The defaults report [`ContextError::Unsupported`]; every variant overrides them.
pub trait NodeContexts: Send + Sync {
    /// Find one node by bare or cluster-qualified name
    fn find(&self, _id: &str) -> Result<Option<Node>, ContextError> {
        Err(unsupported(ContextKind::Node, "find"))
    }

    /// All nodes within the scope
    fn list(&self, _scope: &Scope) -> Result<Vec<Node>, ContextError> {
        Err(unsupported(ContextKind::Node, "where"))
    }
}

/// Group queries
pub trait GroupContexts: Send + Sync {
    fn find(&self, _id: &str) -> Result<Option<Group>, ContextError> {
        Err(unsupported(ContextKind::Group, "find"))
    }

    fn list(&self, _scope: &Scope) -> Result<Vec<Group>, ContextError> {
        Err(unsupported(ContextKind::Group, "where"))
    }

    /// Find one group with its member nodes eagerly loaded
    fn find_including_nodes(&self, _id: &str) -> Result<Option<GroupWithNodes>, ContextError> {
        Err(unsupported(ContextKind::Group, "includes"))
    }
}

/// Cluster queries
pub trait ClusterContexts: Send + Sync {
    /// Find the cluster by its registry id
    fn find(&self, _cluster_id: &str) -> Result<Option<Cluster>, ContextError> {
        Err(unsupported(ContextKind::Cluster, "find"))
    }

    fn list(&self, _scope: &Scope) -> Result<Vec<Cluster>, ContextError> {
        Err(unsupported(ContextKind::Cluster, "where"))
    }
}

/// Where context data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Remote inventory registry over HTTP
    Upstream,
    /// Local static topology; nodes only
    Standalone,
}

impl Mode {
    /// Upstream iff a remote endpoint is configured
    pub fn from_config(config: &RenderConfig) -> Self {
        match config.remote_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Mode::Upstream,
            _ => Mode::Standalone,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Upstream => f.write_str("upstream"),
            Mode::Standalone => f.write_str("standalone"),
        }
    }
}

/// Mode-independent resolver for all three context kinds
///
/// Built once at startup; the mode is fixed for the lifetime of the value and
/// shared by every kind.
pub struct ContextSource {
    mode: Mode,
    scope: Scope,
    nodes: Box<dyn NodeContexts>,
    groups: Box<dyn GroupContexts>,
    clusters: Box<dyn ClusterContexts>,
}

impl ContextSource {
    /// Registry-backed source scoped to `cluster_id`
    pub fn upstream(client: Arc<dyn RegistryClient>, cluster_id: impl Into<String>) -> Self {
        let scope = Scope::new(cluster_id);
        Self {
            mode: Mode::Upstream,
            nodes: Box::new(UpstreamNodes::new(client.clone(), scope.clone())),
            groups: Box::new(UpstreamGroups::new(client.clone(), scope.clone())),
            clusters: Box::new(UpstreamClusters::new(client)),
            scope,
        }
    }

    /// Topology-backed source; groups and the cluster are always empty
    pub fn standalone(topology: Arc<TopologyCache>) -> Self {
        Self {
            mode: Mode::Standalone,
            scope: Scope::new(CLUSTER_ID),
            nodes: Box::new(StandaloneNodes::new(topology)),
            groups: Box::new(StandaloneGroups),
            clusters: Box::new(StandaloneClusters),
        }
    }

    /// Select and build the variant named by the configuration
    pub fn from_config(config: &RenderConfig) -> Result<Self, ApiError> {
        let mode = Mode::from_config(config);
        info!(mode = %mode, "Selected context source");
        match (mode, config.remote_url.as_deref()) {
            (Mode::Upstream, Some(url)) => {
                let client = HttpRegistryClient::new(url, config.remote_jwt.clone())?;
                Ok(Self::upstream(Arc::new(client), config.remote_cluster.clone()))
            }
            _ => Ok(Self::standalone(Arc::new(TopologyCache::new(
                config.topology_path.clone(),
            )))),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn nodes(&self) -> &dyn NodeContexts {
        self.nodes.as_ref()
    }

    pub fn groups(&self) -> &dyn GroupContexts {
        self.groups.as_ref()
    }

    pub fn clusters(&self) -> &dyn ClusterContexts {
        self.clusters.as_ref()
    }

    /// The singleton cluster of the current scope, if there is one
    pub fn default_cluster(&self) -> Result<Option<Cluster>, ContextError> {
        self.clusters.find(&self.scope.cluster_id)
    }
}

impl fmt::Debug for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSource")
            .field("mode", &self.mode)
            .field("scope", &self.scope)
            .finish()
    }
}
