//! Typed file filters
//!
//! Filters arrive as string key/value pairs (`ids`, `node.ids`, ...). They are
//! parsed once into [`FileFilters`] and handed to the selector as a value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const KEY_IDS: &str = "ids";
pub const KEY_NODE_IDS: &str = "node.ids";
pub const KEY_NODE_GROUP_IDS: &str = "node.group_ids";
pub const KEY_NODE_ALL: &str = "node.all";
pub const KEY_GROUP_IDS: &str = "group.ids";
pub const KEY_GROUP_ALL: &str = "group.all";
pub const KEY_CLUSTER: &str = "cluster";

/// Every recognised filter key
pub const FILTER_KEYS: [&str; 7] = [
    KEY_IDS,
    KEY_NODE_IDS,
    KEY_NODE_GROUP_IDS,
    KEY_NODE_ALL,
    KEY_GROUP_IDS,
    KEY_GROUP_ALL,
    KEY_CLUSTER,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognised filter key '{0}'")]
pub struct UnknownFilterKey(pub String);

/// Filter set for a file collection query
///
/// The `*_all` and `cluster` flags are set by key presence alone; the value is
/// not inspected, so `cluster=false` still includes the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilters {
    /// Template ids (`<name>.<type>`)
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub node_group_ids: Vec<String>,
    #[serde(default)]
    pub node_all: bool,
    #[serde(default)]
    pub group_ids: Vec<String>,
    #[serde(default)]
    pub group_all: bool,
    #[serde(default)]
    pub cluster: bool,
}

impl FileFilters {
    /// Parse raw `key=value` filters, rejecting unknown keys
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, UnknownFilterKey>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = FileFilters::default();
        for (key, value) in pairs {
            match key {
                KEY_IDS => filters.ids.extend(split_ids(value)),
                KEY_NODE_IDS => filters.node_ids.extend(split_ids(value)),
                KEY_NODE_GROUP_IDS => filters.node_group_ids.extend(split_ids(value)),
                KEY_NODE_ALL => filters.node_all = true,
                KEY_GROUP_IDS => filters.group_ids.extend(split_ids(value)),
                KEY_GROUP_ALL => filters.group_all = true,
                KEY_CLUSTER => filters.cluster = true,
                other => return Err(UnknownFilterKey(other.to_string())),
            }
        }
        Ok(filters)
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

/// Comma-separated list; blank entries are dropped
pub fn split_ids(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
