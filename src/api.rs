//! Core Render APIs
//!
//! The facade the outer layers (CLI, HTTP) call into. It owns the Template
//! Store and the Context Source, both built once from configuration.

use crate::config::RenderConfig;
use crate::context::{Cluster, ContextSource, Group, Mode, Node};
use crate::error::ApiError;
use crate::files::{resolve_file, FileFilters, FileResource, FileSelector};
use crate::template::{Template, TemplateStore};
use std::collections::HashMap;
use tracing::info;

/// Render API service
pub struct RenderApi {
    templates: TemplateStore,
    contexts: ContextSource,
}

impl RenderApi {
    pub fn new(templates: TemplateStore, contexts: ContextSource) -> Self {
        Self {
            templates,
            contexts,
        }
    }

    /// Build the store and context source named by `config`
    pub fn from_config(config: &RenderConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let templates = TemplateStore::new(&config.templates_dir);
        let contexts = ContextSource::from_config(config)?;
        info!(
            templates = %templates.root().display(),
            mode = %contexts.mode(),
            "Render API initialized"
        );
        Ok(Self::new(templates, contexts))
    }

    pub fn mode(&self) -> Mode {
        self.contexts.mode()
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn contexts(&self) -> &ContextSource {
        &self.contexts
    }

    /// Resolve one file by composite id; `None` for any unresolvable id
    pub fn resolve_file(&self, id: &str) -> Result<Option<FileResource>, ApiError> {
        resolve_file(&self.templates, &self.contexts, id)
    }

    pub fn list_files(&self, filters: &FileFilters) -> Result<Vec<FileResource>, ApiError> {
        FileSelector::new(&self.templates, &self.contexts).select(filters)
    }

    /// List files from raw filter pairs as received at the boundary
    pub fn list_files_from_params(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Vec<FileResource>, ApiError> {
        let filters = FileFilters::from_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .map_err(|e| ApiError::InvalidFilter(e.to_string()))?;
        self.list_files(&filters)
    }

    pub fn render(&self, file: &FileResource) -> String {
        file.payload()
    }

    pub fn load_template(&self, id: &str) -> Result<Option<Template>, ApiError> {
        Ok(self.templates.load_by_id(id)?)
    }

    pub fn glob_templates(&self, name: &str, template_type: &str) -> Result<Vec<Template>, ApiError> {
        Ok(self.templates.glob(name, template_type)?)
    }

    pub fn save_template(&self, template: &Template) -> Result<(), ApiError> {
        Ok(self.templates.save(template)?)
    }

    pub fn delete_template(&self, template: &Template) -> Result<(), ApiError> {
        Ok(self.templates.delete(template)?)
    }

    pub fn find_node(&self, id: &str) -> Result<Option<Node>, ApiError> {
        Ok(self.contexts.nodes().find(id)?)
    }

    pub fn list_nodes(&self) -> Result<Vec<Node>, ApiError> {
        Ok(self.contexts.nodes().list(self.contexts.scope())?)
    }

    pub fn find_group(&self, id: &str) -> Result<Option<Group>, ApiError> {
        Ok(self.contexts.groups().find(id)?)
    }

    pub fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        Ok(self.contexts.groups().list(self.contexts.scope())?)
    }

    /// The cluster, addressed externally as `default`
    pub fn cluster(&self) -> Result<Option<Cluster>, ApiError> {
        Ok(self.contexts.default_cluster()?)
    }
}
