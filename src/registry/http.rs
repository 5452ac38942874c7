//! JSON:API registry client over blocking HTTP.

use super::RegistryClient;
use crate::context::{bare_name, Cluster, Group, GroupWithNodes, Node, Params};
use crate::error::RegistryError;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::debug;

const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";
const REGISTRY_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REGISTRY_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Registry client speaking JSON:API
///
/// Routes, relative to the base URL:
/// - `nodes/{cluster}.{name}`
/// - `clusters/.{cluster}/nodes`
/// - `groups/{cluster}.{name}` (optionally `?include=nodes`)
/// - `groups?filter[cluster_id]=.{cluster}`
/// - `clusters/.{cluster}`
pub struct HttpRegistryClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpRegistryClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(REGISTRY_HTTP_CONNECT_TIMEOUT)
            .timeout(REGISTRY_HTTP_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.unwrap_or_default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<Document>, RegistryError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Registry request");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request
            .bearer_auth(&self.token)
            .header(ACCEPT, JSONAPI_MEDIA_TYPE)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        let document: Document = serde_json::from_str(&text)
            .map_err(|e| RegistryError::Decode(format!("{}: {}", url, e)))?;
        Ok(Some(document))
    }
}

impl RegistryClient for HttpRegistryClient {
    fn find_node(&self, cluster: &str, name: &str) -> Result<Option<Node>, RegistryError> {
        let path = format!("nodes/{}.{}", cluster, name);
        match self.get(&path, &[])? {
            Some(document) => Ok(document.primary().first().map(|r| r.to_node())),
            None => Ok(None),
        }
    }

    fn list_nodes(&self, cluster: &str) -> Result<Vec<Node>, RegistryError> {
        let path = format!("clusters/.{}/nodes", cluster);
        Ok(self
            .get(&path, &[])?
            .map(|document| document.primary().into_iter().map(Resource::to_node).collect())
            .unwrap_or_default())
    }

    fn find_group(
        &self,
        cluster: &str,
        name: &str,
        include_nodes: bool,
    ) -> Result<Option<GroupWithNodes>, RegistryError> {
        let path = format!("groups/{}.{}", cluster, name);
        let query: &[(&str, &str)] = if include_nodes {
            &[("include", "nodes")]
        } else {
            &[]
        };

        let document = match self.get(&path, query)? {
            Some(document) => document,
            None => return Ok(None),
        };
        let resource = match document.primary().first() {
            Some(resource) => *resource,
            None => return Ok(None),
        };

        let group = resource.to_group();
        let nodes = if include_nodes {
            let included: HashMap<&str, &Resource> = document
                .included
                .iter()
                .filter(|r| r.resource_type == "nodes")
                .map(|r| (r.id.as_str(), r))
                .collect();
            resource
                .linked_ids("nodes")
                .into_iter()
                .filter_map(|id| included.get(id).map(|r| r.to_node()))
                .collect()
        } else {
            Vec::new()
        };

        Ok(Some(GroupWithNodes { group, nodes }))
    }

    fn list_groups(&self, cluster: &str) -> Result<Vec<Group>, RegistryError> {
        let scope = format!(".{}", cluster);
        Ok(self
            .get("groups", &[("filter[cluster_id]", scope.as_str())])?
            .map(|document| document.primary().into_iter().map(Resource::to_group).collect())
            .unwrap_or_default())
    }

    fn find_cluster(&self, cluster: &str) -> Result<Option<Cluster>, RegistryError> {
        let path = format!("clusters/.{}", cluster);
        match self.get(&path, &[])? {
            Some(document) => Ok(document.primary().first().map(|r| Cluster {
                params: r.params(),
            })),
            None => Ok(None),
        }
    }
}

// JSON:API document structures
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    data: Option<PrimaryData>,
    #[serde(default)]
    included: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PrimaryData {
    Many(Vec<Resource>),
    One(Resource),
}

#[derive(Debug, Deserialize)]
struct Resource {
    id: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    relationships: HashMap<String, Relationship>,
}

#[derive(Debug, Default, Deserialize)]
struct Attributes {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    params: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(default)]
    data: Option<Linkage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Linkage {
    Many(Vec<Identifier>),
    One(Identifier),
}

#[derive(Debug, Deserialize)]
struct Identifier {
    id: String,
}

impl Document {
    fn primary(&self) -> Vec<&Resource> {
        match &self.data {
            Some(PrimaryData::Many(resources)) => resources.iter().collect(),
            Some(PrimaryData::One(resource)) => vec![resource],
            None => Vec::new(),
        }
    }
}

impl Resource {
    /// Records are addressed as `<cluster>.<name>`; fall back to that when
    /// the name attribute is missing
    fn name(&self) -> String {
        self.attributes
            .name
            .clone()
            .unwrap_or_else(|| bare_name(&self.id).to_string())
    }

    fn params(&self) -> Params {
        self.attributes
            .params
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), param_to_string(value)))
            .collect()
    }

    fn linked_ids(&self, relation: &str) -> Vec<&str> {
        match self.relationships.get(relation).and_then(|r| r.data.as_ref()) {
            Some(Linkage::Many(ids)) => ids.iter().map(|i| i.id.as_str()).collect(),
            Some(Linkage::One(id)) => vec![id.id.as_str()],
            None => Vec::new(),
        }
    }

    fn to_node(&self) -> Node {
        Node {
            name: self.name(),
            params: self.params(),
        }
    }

    fn to_group(&self) -> Group {
        let member_node_ids: BTreeSet<String> = self
            .linked_ids("nodes")
            .into_iter()
            .map(|id| bare_name(id).to_string())
            .collect();
        Group {
            name: self.name(),
            params: self.params(),
            member_node_ids,
        }
    }
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
