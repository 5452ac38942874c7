//! Shared test utilities for integration tests
//!
//! Provides the demo cluster fixture used across upstream tests, plus isolated
//! environment setup for configuration tests.

use render_server::context::{Cluster, ContextSource, Group, GroupWithNodes, Node, Params};
use render_server::error::RegistryError;
use render_server::registry::RegistryClient;
use render_server::template::{Template, TemplateStore};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const DEMO_CLUSTER: &str = "demo";

/// Global mutex to serialize environment variable access across all tests
/// This prevents race conditions when tests run in parallel
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const CAPTURED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "RENDER_ENV",
    "RENDER_REMOTE_URL",
    "RENDER_REMOTE_JWT",
    "RENDER_REMOTE_CLUSTER",
    "RENDER_TEMPLATES_DIR",
    "RENDER_TOPOLOGY_PATH",
];

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            vars: CAPTURED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME inside `test_dir` and every
/// `RENDER_*` override cleared. The original environment is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    for name in CAPTURED_VARS {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    env_state.restore();

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn params(pairs: &[(&str, String)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn demo_node(n: usize) -> Node {
    Node {
        name: format!("node{}", n),
        params: params(&[
            ("name", format!("node{}", n)),
            ("ip", format!("10.10.0.{}", n)),
            ("key", format!("node{}", n)),
        ]),
    }
}

fn demo_group(name: &str, members: impl Iterator<Item = usize>) -> GroupWithNodes {
    let nodes: Vec<Node> = members.map(demo_node).collect();
    let member_node_ids: BTreeSet<String> = nodes.iter().map(|n| n.name.clone()).collect();
    GroupWithNodes {
        group: Group {
            name: name.to_string(),
            params: params(&[("key", name.to_string())]),
            member_node_ids,
        },
        nodes,
    }
}

/// In-memory registry holding the demo cluster
///
/// Ten nodes `node1..node10`; groups `even`, `odd` and `subnet` (`node1..node5`).
/// Every request is recorded so tests can assert on registry traffic.
pub struct DemoRegistry {
    nodes: Vec<Node>,
    groups: Vec<GroupWithNodes>,
    cluster: Cluster,
    calls: parking_lot::Mutex<Vec<String>>,
}

impl DemoRegistry {
    pub fn new() -> Self {
        Self {
            nodes: (1..=10).map(demo_node).collect(),
            groups: vec![
                demo_group("even", (1..=10).filter(|n| n % 2 == 0)),
                demo_group("odd", (1..=10).filter(|n| n % 2 == 1)),
                demo_group("subnet", 1..=5),
            ],
            cluster: Cluster {
                params: params(&[
                    ("key", "cluster".to_string()),
                    ("domain", "demo.cluster.local".to_string()),
                ]),
            },
            calls: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl RegistryClient for DemoRegistry {
    fn find_node(&self, cluster: &str, name: &str) -> Result<Option<Node>, RegistryError> {
        self.record(format!("find_node {}.{}", cluster, name));
        if cluster != DEMO_CLUSTER {
            return Ok(None);
        }
        Ok(self.nodes.iter().find(|n| n.name == name).cloned())
    }

    fn list_nodes(&self, cluster: &str) -> Result<Vec<Node>, RegistryError> {
        self.record(format!("list_nodes {}", cluster));
        if cluster != DEMO_CLUSTER {
            return Ok(Vec::new());
        }
        Ok(self.nodes.clone())
    }

    fn find_group(
        &self,
        cluster: &str,
        name: &str,
        include_nodes: bool,
    ) -> Result<Option<GroupWithNodes>, RegistryError> {
        self.record(format!("find_group {}.{} {}", cluster, name, include_nodes));
        if cluster != DEMO_CLUSTER {
            return Ok(None);
        }
        Ok(self
            .groups
            .iter()
            .find(|g| g.group.name == name)
            .map(|g| GroupWithNodes {
                group: g.group.clone(),
                nodes: if include_nodes { g.nodes.clone() } else { Vec::new() },
            }))
    }

    fn list_groups(&self, cluster: &str) -> Result<Vec<Group>, RegistryError> {
        self.record(format!("list_groups {}", cluster));
        if cluster != DEMO_CLUSTER {
            return Ok(Vec::new());
        }
        Ok(self.groups.iter().map(|g| g.group.clone()).collect())
    }

    fn find_cluster(&self, cluster: &str) -> Result<Option<Cluster>, RegistryError> {
        self.record(format!("find_cluster {}", cluster));
        if cluster != DEMO_CLUSTER {
            return Ok(None);
        }
        Ok(Some(self.cluster.clone()))
    }
}

/// Upstream context source over the demo registry
pub fn demo_upstream() -> (Arc<DemoRegistry>, ContextSource) {
    let registry = Arc::new(DemoRegistry::new());
    let source = ContextSource::upstream(registry.clone(), DEMO_CLUSTER);
    (registry, source)
}

/// Template store under `dir` seeded with the given `(name, type, payload)` triples
pub fn seeded_store(dir: &Path, templates: &[(&str, &str, &str)]) -> TemplateStore {
    let store = TemplateStore::new(dir.join("templates"));
    for (name, template_type, payload) in templates {
        store
            .save(&Template::new(*name, *template_type, *payload))
            .unwrap();
    }
    store
}
