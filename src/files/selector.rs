//! File selection: filters to (context, template) pairs
//!
//! Individual ids that do not resolve are skipped, never reported, so a
//! collection query over partially valid input still answers. Transport and
//! storage failures are not skipped.

use super::{FileFilters, FileResource};
use crate::context::{Cluster, Context, ContextSource, Group, Node};
use crate::error::ApiError;
use crate::template::{Template, TemplateStore};
use std::collections::HashSet;
use tracing::debug;

/// Resolves filter sets against a template store and a context source
pub struct FileSelector<'a> {
    templates: &'a TemplateStore,
    contexts: &'a ContextSource,
}

impl<'a> FileSelector<'a> {
    pub fn new(templates: &'a TemplateStore, contexts: &'a ContextSource) -> Self {
        Self {
            templates,
            contexts,
        }
    }

    /// Every (context, template) pair the filters name
    ///
    /// Empty when no template resolves, whatever the context filters say.
    /// Contexts are ordered nodes, groups, cluster; templates follow `ids` order.
    pub fn select(&self, filters: &FileFilters) -> Result<Vec<FileResource>, ApiError> {
        let templates = self.templates(filters)?;
        if templates.is_empty() {
            return Ok(Vec::new());
        }

        let contexts = self.contexts(filters)?;
        let mut files = Vec::with_capacity(contexts.len() * templates.len());
        for context in &contexts {
            for template in &templates {
                files.push(FileResource::new(context.clone(), template.clone()));
            }
        }
        Ok(files)
    }

    pub fn templates(&self, filters: &FileFilters) -> Result<Vec<Template>, ApiError> {
        let mut templates = Vec::new();
        for id in &filters.ids {
            match self.templates.load_by_id(id)? {
                Some(template) => templates.push(template),
                None => debug!(template = %id, "Skipping unresolved template"),
            }
        }
        Ok(templates)
    }

    pub fn contexts(&self, filters: &FileFilters) -> Result<Vec<Context>, ApiError> {
        let mut contexts: Vec<Context> = Vec::new();
        contexts.extend(self.nodes(filters)?.into_iter().map(Context::from));
        contexts.extend(self.groups(filters)?.into_iter().map(Context::from));
        contexts.extend(self.clusters(filters)?.into_iter().map(Context::from));
        Ok(contexts)
    }

    /// `node.all`, or `node.ids` plus members of `node.group_ids`, deduplicated
    /// by name with the first occurrence kept
    pub fn nodes(&self, filters: &FileFilters) -> Result<Vec<Node>, ApiError> {
        let nodes = self.contexts.nodes();
        if filters.node_all {
            return Ok(nodes.list(self.contexts.scope())?);
        }

        let mut accum = Vec::new();
        for id in &filters.node_ids {
            match nodes.find(id)? {
                Some(node) => accum.push(node),
                None => debug!(node = %id, "Skipping unresolved node"),
            }
        }
        for id in &filters.node_group_ids {
            match self.contexts.groups().find_including_nodes(id)? {
                Some(found) => accum.extend(found.nodes),
                None => debug!(group = %id, "Skipping unresolved group"),
            }
        }

        let mut seen = HashSet::new();
        accum.retain(|node| seen.insert(node.name.clone()));
        Ok(accum)
    }

    pub fn groups(&self, filters: &FileFilters) -> Result<Vec<Group>, ApiError> {
        let groups = self.contexts.groups();
        if filters.group_all {
            return Ok(groups.list(self.contexts.scope())?);
        }

        let mut found = Vec::new();
        for id in &filters.group_ids {
            match groups.find(id)? {
                Some(group) => found.push(group),
                None => debug!(group = %id, "Skipping unresolved group"),
            }
        }
        Ok(found)
    }

    pub fn clusters(&self, filters: &FileFilters) -> Result<Vec<Cluster>, ApiError> {
        if !filters.cluster {
            return Ok(Vec::new());
        }
        Ok(self.contexts.default_cluster()?.into_iter().collect())
    }
}
