//! Static topology for standalone deployments
//!
//! The topology is a TOML document declaring nodes and their params:
//!
//! ```toml
//! [nodes.node01]
//! ip = "10.10.0.1"
//! gpus = 2
//! ```
//!
//! It holds no groups and no cluster. [`TopologyCache`] parses the document at
//! most once and then serves an immutable index.

use crate::context::{Node, Params};
use crate::error::TopologyError;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
struct TopologyDocument {
    #[serde(default)]
    nodes: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

/// Parsed, immutable node index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    nodes: BTreeMap<String, Node>,
}

impl Topology {
    pub fn from_toml_str(source: &str) -> Result<Self, TopologyError> {
        let document: TopologyDocument = toml::from_str(source)?;

        let mut nodes = BTreeMap::new();
        for (name, values) in document.nodes {
            let mut params = Params::new();
            for (key, value) in values {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Datetime(d) => d.to_string(),
                    toml::Value::Array(_) | toml::Value::Table(_) => {
                        return Err(TopologyError::InvalidParam { node: name, key });
                    }
                };
                params.insert(key, value);
            }
            nodes.insert(name.clone(), Node { name, params });
        }

        Ok(Self { nodes })
    }

    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Nodes in name order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lazily built topology index
///
/// The first lookup reads and parses the document under a lock, so concurrent
/// first access builds it exactly once. A missing document is an empty topology.
pub struct TopologyCache {
    source: Option<PathBuf>,
    index: Mutex<Option<Arc<Topology>>>,
}

impl TopologyCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Some(path.as_ref().to_path_buf()),
            index: Mutex::new(None),
        }
    }

    /// A cache holding an already-built topology
    pub fn from_topology(topology: Topology) -> Self {
        Self {
            source: None,
            index: Mutex::new(Some(Arc::new(topology))),
        }
    }

    pub fn get(&self) -> Result<Arc<Topology>, TopologyError> {
        let mut index = self.index.lock();
        if let Some(topology) = index.as_ref() {
            return Ok(topology.clone());
        }

        let topology = Arc::new(self.build()?);
        *index = Some(topology.clone());
        Ok(topology)
    }

    pub fn find_node(&self, name: &str) -> Result<Option<Node>, TopologyError> {
        Ok(self.get()?.find_node(name).cloned())
    }

    pub fn all_nodes(&self) -> Result<Vec<Node>, TopologyError> {
        Ok(self.get()?.nodes().cloned().collect())
    }

    /// Drop the built index so the next lookup re-reads the document
    #[cfg(any(test, feature = "test-support"))]
    pub fn invalidate(&self) {
        if self.source.is_some() {
            *self.index.lock() = None;
        }
    }

    fn build(&self) -> Result<Topology, TopologyError> {
        let path = match &self.source {
            Some(path) => path,
            None => return Ok(Topology::default()),
        };

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Topology not found; no nodes are defined");
                return Ok(Topology::default());
            }
            Err(e) => {
                return Err(TopologyError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let topology = Topology::from_toml_str(&source)?;
        info!(path = %path.display(), nodes = topology.len(), "Loaded topology");
        Ok(topology)
    }
}
