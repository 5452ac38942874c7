//! Standalone mode: topology-backed nodes, no groups, no cluster

use render_server::api::RenderApi;
use render_server::config::RenderConfig;
use render_server::context::{ContextSource, Mode};
use render_server::files::FileFilters;
use render_server::topology::TopologyCache;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

use crate::integration::{demo_upstream, seeded_store};

const TOPOLOGY: &str = r#"
[nodes.node1]
ip = "192.168.1.1"
key = "standalone-node1"

[nodes.node2]
ip = "192.168.1.2"
cores = 64
"#;

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("topology.toml"), TOPOLOGY).unwrap();
    seeded_store(temp.path(), &[("hosts", "conf", "%ip% %key%")]);
    temp
}

fn standalone_api(temp: &TempDir) -> RenderApi {
    let config = RenderConfig::default().resolve_paths(temp.path());
    RenderApi::from_config(&config).unwrap()
}

#[test]
fn test_config_without_remote_is_standalone() {
    let temp = workspace();
    let api = standalone_api(&temp);
    assert_eq!(api.mode(), Mode::Standalone);

    let nodes = api.list_nodes().unwrap();
    let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["node1", "node2"]);
    assert_eq!(nodes[1].params.get("cores").map(String::as_str), Some("64"));

    assert!(api.list_groups().unwrap().is_empty());
    assert!(api.find_group("even").unwrap().is_none());
    assert!(api.cluster().unwrap().is_none());
}

#[test]
fn test_only_node_files_exist() {
    let temp = workspace();
    let api = standalone_api(&temp);

    let filters = FileFilters::from_pairs([
        ("ids", "hosts.conf"),
        ("node.all", ""),
        ("node.group_ids", "even"),
        ("group.all", ""),
        ("cluster", ""),
    ])
    .unwrap();
    let ids: Vec<String> = api.list_files(&filters).unwrap().iter().map(|f| f.id()).collect();
    assert_eq!(ids, vec!["hosts.conf.node1.nodes", "hosts.conf.node2.nodes"]);

    let file = api.resolve_file("hosts.conf.node1.nodes").unwrap().unwrap();
    assert_eq!(api.render(&file), "192.168.1.1 standalone-node1");
    assert!(api.resolve_file("hosts.conf.cluster").unwrap().is_none());
    assert!(api.resolve_file("hosts.conf.even.groups").unwrap().is_none());
}

#[test]
fn test_modes_do_not_mix() {
    let temp = workspace();
    let store = seeded_store(temp.path(), &[("hosts", "conf", "%ip% %key%")]);

    let standalone = ContextSource::standalone(Arc::new(TopologyCache::new(
        temp.path().join("topology.toml"),
    )));
    let local_api = RenderApi::new(store.clone(), standalone);
    let local = local_api
        .resolve_file("hosts.conf.node1.nodes")
        .unwrap()
        .unwrap();
    assert_eq!(local.payload(), "192.168.1.1 standalone-node1");

    let (registry, upstream) = demo_upstream();
    let upstream_api = RenderApi::new(store, upstream);
    assert_eq!(upstream_api.mode(), Mode::Upstream);
    let remote = upstream_api
        .resolve_file("hosts.conf.node1.nodes")
        .unwrap()
        .unwrap();
    assert_eq!(remote.payload(), "10.10.0.1 node1");

    // Only the upstream lookup reached the registry
    assert_eq!(registry.calls(), vec!["find_node demo.node1".to_string()]);
    assert!(upstream_api.find_group("even").unwrap().is_some());
    assert!(local_api.find_group("even").unwrap().is_none());
}

#[test]
fn test_missing_topology_is_empty() {
    let temp = TempDir::new().unwrap();
    let config = RenderConfig::default().resolve_paths(temp.path());
    let api = RenderApi::from_config(&config).unwrap();
    assert!(api.list_nodes().unwrap().is_empty());
    assert!(api.find_node("node1").unwrap().is_none());
}

#[test]
fn test_malformed_topology_is_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("topology.toml"),
        "[nodes.node1]\ninterfaces = [\"eth0\", \"eth1\"]\n",
    )
    .unwrap();
    let api = standalone_api(&temp);
    assert!(api.find_node("node1").is_err());
}

#[test]
fn test_topology_is_built_once_under_concurrent_first_access() {
    let temp = workspace();
    let cache = Arc::new(TopologyCache::new(temp.path().join("topology.toml")));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get().unwrap())
        })
        .collect();
    let built: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for topology in &built[1..] {
        assert!(Arc::ptr_eq(topology, &built[0]));
    }

    // Later edits are not observed until the index is rebuilt
    fs::write(temp.path().join("topology.toml"), "[nodes.node9]\n").unwrap();
    assert_eq!(cache.all_nodes().unwrap().len(), 2);
}
