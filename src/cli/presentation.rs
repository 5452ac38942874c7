//! CLI presentation: text and json formatters per command family.

use crate::cli::parse::OutputFormat;
use crate::context::{Cluster, Group, Node, Params, CLUSTER_ID};
use crate::files::FileResource;
use crate::template::Template;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;
use serde_json::json;

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn params_table(params: &Params) -> String {
    if params.is_empty() {
        return "(no params)".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Param", "Value"]);
    for (key, value) in params {
        table.add_row(vec![key.clone(), value.clone()]);
    }
    table.to_string()
}

pub fn format_template_list(templates: &[Template], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(&json!({ "templates": templates, "total": templates.len() }));
    }
    if templates.is_empty() {
        return "No templates found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Name", "Type", "Bytes"]);
    for template in templates {
        table.add_row(vec![
            template.id(),
            template.name.clone(),
            template.template_type.clone(),
            template.payload.len().to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} template(s)", table, templates.len())
}

pub fn format_template(template: &Template, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(template),
        OutputFormat::Text => template.payload.clone(),
    }
}

pub fn format_file_list(files: &[FileResource], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        let entries: Vec<_> = files
            .iter()
            .map(|file| {
                json!({
                    "id": file.id(),
                    "template": file.template.id(),
                    "context": { "kind": file.context.kind(), "id": file.context.id() },
                })
            })
            .collect();
        return to_json(&json!({ "files": entries, "total": files.len() }));
    }
    if files.is_empty() {
        return "No files matched.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "Template", "Kind", "Context"]);
    for file in files {
        table.add_row(vec![
            file.id(),
            file.template.id(),
            file.context.kind().to_string(),
            file.context.id().to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} file(s)", table, files.len())
}

/// Rendered payload; json wraps it with the file id
pub fn format_rendered_file(file: &FileResource, payload: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&json!({ "id": file.id(), "payload": payload })),
        OutputFormat::Text => payload.to_string(),
    }
}

pub fn format_node_list(nodes: &[Node], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(&json!({ "nodes": nodes, "total": nodes.len() }));
    }
    if nodes.is_empty() {
        return "No nodes found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Node", "Params"]);
    for node in nodes {
        table.add_row(vec![node.name.clone(), node.params.len().to_string()]);
    }
    format!("{}\n\nTotal: {} node(s)", table, nodes.len())
}

pub fn format_node(node: &Node, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(node),
        OutputFormat::Text => format!("Node: {}\n{}", node.name, params_table(&node.params)),
    }
}

pub fn format_group_list(groups: &[Group], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(&json!({ "groups": groups, "total": groups.len() }));
    }
    if groups.is_empty() {
        return "No groups found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Group", "Params", "Members"]);
    for group in groups {
        table.add_row(vec![
            group.name.clone(),
            group.params.len().to_string(),
            group.member_node_ids.len().to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} group(s)", table, groups.len())
}

pub fn format_group(group: &Group, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(group),
        OutputFormat::Text => {
            let members: Vec<&str> = group.member_node_ids.iter().map(String::as_str).collect();
            format!(
                "Group: {}\nMembers: {}\n{}",
                group.name,
                if members.is_empty() { "(none)".to_string() } else { members.join(", ") },
                params_table(&group.params)
            )
        }
    }
}

pub fn format_cluster(cluster: &Cluster, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&json!({ "id": CLUSTER_ID, "params": cluster.params })),
        OutputFormat::Text => format!("Cluster: {}\n{}", CLUSTER_ID, params_table(&cluster.params)),
    }
}
