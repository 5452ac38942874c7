//! Composite file id resolution end to end

use render_server::context::ContextKind;
use render_server::files::{resolve_file, ContextRef, FileId, TemplateId};
use tempfile::TempDir;

use crate::integration::{demo_upstream, seeded_store};

#[test]
fn test_resolves_each_context_kind() {
    let temp = TempDir::new().unwrap();
    let store = seeded_store(temp.path(), &[("hosts", "conf", "%key%@%domain%")]);
    let (_, contexts) = demo_upstream();

    let node = resolve_file(&store, &contexts, "hosts.conf.node3.nodes")
        .unwrap()
        .unwrap();
    assert_eq!(node.context.kind(), ContextKind::Node);
    assert_eq!(node.payload(), "node3@%domain%");

    let group = resolve_file(&store, &contexts, "hosts.conf.even.groups")
        .unwrap()
        .unwrap();
    assert_eq!(group.context.kind(), ContextKind::Group);
    assert_eq!(group.payload(), "even@%domain%");

    let cluster = resolve_file(&store, &contexts, "hosts.conf.cluster")
        .unwrap()
        .unwrap();
    assert_eq!(cluster.context.id(), "default");
    assert_eq!(cluster.payload(), "cluster@demo.cluster.local");
}

#[test]
fn test_unresolvable_ids_are_absent() {
    let temp = TempDir::new().unwrap();
    let store = seeded_store(temp.path(), &[("hosts", "conf", "x")]);
    let (registry, contexts) = demo_upstream();

    for id in [
        "hosts.conf.node1",
        "hosts.conf.node1.racks",
        "hosts.conf",
        "hosts..node1.nodes",
        "hosts.conf.node1.nodes.extra",
        "",
        "missing.conf.node1.nodes",
        "hosts.conf.node99.nodes",
        "hosts.conf.nosuch.groups",
    ] {
        assert!(
            resolve_file(&store, &contexts, id).unwrap().is_none(),
            "{} should not resolve",
            id
        );
    }

    // Only the two well-formed ids with an existing template reach the registry
    assert_eq!(
        registry.calls(),
        vec![
            "find_node demo.node99".to_string(),
            "find_group demo.nosuch false".to_string(),
        ]
    );
}

#[test]
fn test_file_id_display_matches_parse() {
    let id = FileId::new(
        TemplateId::new("kickstart", "cfg"),
        ContextRef::Node("node07".to_string()),
    );
    assert_eq!(id.to_string(), "kickstart.cfg.node07.nodes");
    assert_eq!("kickstart.cfg.node07.nodes".parse::<FileId>().unwrap(), id);

    let cluster: FileId = "kickstart.cfg.cluster".parse().unwrap();
    assert_eq!(cluster.context, ContextRef::Cluster);
    assert_eq!(cluster.to_string(), "kickstart.cfg.cluster");
}
