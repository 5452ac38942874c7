//! Template and composite file identifiers
//!
//! - Template id: `<name>.<type>`, split on the first dot. Persisted names and
//!   types cannot contain dots, so the split is unambiguous for anything the
//!   store can hold.
//! - File id: `<name>.<type>.<context>.nodes`, `<name>.<type>.<context>.groups`
//!   or `<name>.<type>.cluster`. The context name must be a safe identifier.

use crate::context::{Context, ContextKind};
use crate::template::is_valid_identifier;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NODES_SEGMENT: &str = "nodes";
const GROUPS_SEGMENT: &str = "groups";
const CLUSTER_SEGMENT: &str = "cluster";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unparseable id: '{0}'")]
pub struct ParseIdError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    pub name: String,
    pub template_type: String,
}

impl TemplateId {
    pub fn new(name: impl Into<String>, template_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_type: template_type.into(),
        }
    }
}

impl FromStr for TemplateId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((name, template_type)) if !name.is_empty() && !template_type.is_empty() => {
                Ok(TemplateId::new(name, template_type))
            }
            _ => Err(ParseIdError(s.to_string())),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.template_type)
    }
}

/// The context half of a file id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextRef {
    Node(String),
    Group(String),
    Cluster,
}

impl ContextRef {
    pub fn kind(&self) -> ContextKind {
        match self {
            ContextRef::Node(_) => ContextKind::Node,
            ContextRef::Group(_) => ContextKind::Group,
            ContextRef::Cluster => ContextKind::Cluster,
        }
    }
}

impl From<&Context> for ContextRef {
    fn from(context: &Context) -> Self {
        match context {
            Context::Node(node) => ContextRef::Node(node.name.clone()),
            Context::Group(group) => ContextRef::Group(group.name.clone()),
            Context::Cluster(_) => ContextRef::Cluster,
        }
    }
}

/// Composite identifier naming a (template, context) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId {
    pub template: TemplateId,
    pub context: ContextRef,
}

impl FileId {
    pub fn new(template: TemplateId, context: ContextRef) -> Self {
        Self { template, context }
    }
}

impl FromStr for FileId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ParseIdError(s.to_string()));
        }

        let template = TemplateId::new(segments[0], segments.get(1).copied().unwrap_or_default());
        let context = match segments.as_slice() {
            [_, _, CLUSTER_SEGMENT] => ContextRef::Cluster,
            [_, _, name, NODES_SEGMENT] if is_valid_identifier(name) => {
                ContextRef::Node(name.to_string())
            }
            [_, _, name, GROUPS_SEGMENT] if is_valid_identifier(name) => {
                ContextRef::Group(name.to_string())
            }
            _ => return Err(ParseIdError(s.to_string())),
        };

        Ok(FileId { template, context })
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            ContextRef::Node(name) => write!(f, "{}.{}.{}", self.template, name, NODES_SEGMENT),
            ContextRef::Group(name) => write!(f, "{}.{}.{}", self.template, name, GROUPS_SEGMENT),
            ContextRef::Cluster => write!(f, "{}.{}", self.template, CLUSTER_SEGMENT),
        }
    }
}
