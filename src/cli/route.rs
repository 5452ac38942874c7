//! CLI route: single route table and run context. Dispatches to the Render API and presentation.

use crate::api::RenderApi;
use crate::cli::parse::{
    ClusterCommands, Commands, FileCommands, GroupCommands, NodeCommands, OutputFormat,
    TemplateCommands,
};
use crate::cli::presentation::{
    format_cluster, format_file_list, format_group, format_group_list, format_node,
    format_node_list, format_rendered_file, format_template, format_template_list,
};
use crate::config::{ConfigLoader, RenderConfig};
use crate::error::{ApiError, TemplateError};
use crate::files::{filter::split_ids, FileFilters, TemplateId};
use crate::template::Template;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runtime context for CLI execution: loaded configuration and the Render API.
pub struct RunContext {
    api: RenderApi,
    workspace_root: PathBuf,
    format: OutputFormat,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        format: OutputFormat,
    ) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?.resolve_paths(&workspace_root)
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(workspace_root, &config, format)
    }

    pub fn from_config(
        workspace_root: PathBuf,
        config: &RenderConfig,
        format: OutputFormat,
    ) -> Result<Self, ApiError> {
        let api = RenderApi::from_config(config)?;
        Ok(Self {
            api,
            workspace_root,
            format,
        })
    }

    /// Reference to the underlying Render API.
    pub fn api(&self) -> &RenderApi {
        &self.api
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Template { command } => self.handle_template_command(command),
            Commands::File { command } => self.handle_file_command(command),
            Commands::Node { command } => self.handle_node_command(command),
            Commands::Group { command } => self.handle_group_command(command),
            Commands::Cluster { command } => self.handle_cluster_command(command),
        }
    }

    fn handle_template_command(&self, command: &TemplateCommands) -> Result<String, ApiError> {
        match command {
            TemplateCommands::List {
                name,
                template_type,
            } => {
                let templates = self.api.glob_templates(name, template_type)?;
                Ok(format_template_list(&templates, self.format))
            }
            TemplateCommands::Show { id } => {
                let template = self
                    .api
                    .load_template(id)?
                    .ok_or_else(|| ApiError::NotFound(format!("template {}", id)))?;
                Ok(format_template(&template, self.format))
            }
            TemplateCommands::Save { id, payload, file } => {
                let template_id = parse_template_id(id)?;
                let payload = match (payload, file) {
                    (Some(payload), _) => payload.clone(),
                    (None, Some(path)) => std::fs::read_to_string(path).map_err(TemplateError::Io)?,
                    (None, None) => String::new(),
                };
                let existed = self.api.load_template(id)?.is_some();
                let template = Template::new(template_id.name, template_id.template_type, payload);
                self.api.save_template(&template)?;
                let verb = if existed { "Updated" } else { "Created" };
                Ok(format!("{} template {}", verb, template.id()))
            }
            TemplateCommands::Delete { id } => {
                let template_id = parse_template_id(id)?;
                let template = Template::new(template_id.name, template_id.template_type, "");
                self.api.delete_template(&template)?;
                Ok(format!("Deleted template {}", template.id()))
            }
        }
    }

    fn handle_file_command(&self, command: &FileCommands) -> Result<String, ApiError> {
        match command {
            FileCommands::Show { id } => {
                let file = self
                    .api
                    .resolve_file(id)?
                    .ok_or_else(|| ApiError::NotFound(format!("file {}", id)))?;
                let payload = self.api.render(&file);
                Ok(format_rendered_file(&file, &payload, self.format))
            }
            FileCommands::List {
                ids,
                node_ids,
                node_group_ids,
                node_all,
                group_ids,
                group_all,
                cluster,
            } => {
                let filters = FileFilters {
                    ids: split_ids(ids).collect(),
                    node_ids: node_ids.as_deref().map(collect_ids).unwrap_or_default(),
                    node_group_ids: node_group_ids.as_deref().map(collect_ids).unwrap_or_default(),
                    node_all: *node_all,
                    group_ids: group_ids.as_deref().map(collect_ids).unwrap_or_default(),
                    group_all: *group_all,
                    cluster: *cluster,
                };
                debug!(?filters, "Listing files");
                let files = self.api.list_files(&filters)?;
                Ok(format_file_list(&files, self.format))
            }
        }
    }

    fn handle_node_command(&self, command: &NodeCommands) -> Result<String, ApiError> {
        match command {
            NodeCommands::List => Ok(format_node_list(&self.api.list_nodes()?, self.format)),
            NodeCommands::Show { name } => {
                let node = self
                    .api
                    .find_node(name)?
                    .ok_or_else(|| ApiError::NotFound(format!("node {}", name)))?;
                Ok(format_node(&node, self.format))
            }
        }
    }

    fn handle_group_command(&self, command: &GroupCommands) -> Result<String, ApiError> {
        match command {
            GroupCommands::List => Ok(format_group_list(&self.api.list_groups()?, self.format)),
            GroupCommands::Show { name } => {
                let group = self
                    .api
                    .find_group(name)?
                    .ok_or_else(|| ApiError::NotFound(format!("group {}", name)))?;
                Ok(format_group(&group, self.format))
            }
        }
    }

    fn handle_cluster_command(&self, command: &ClusterCommands) -> Result<String, ApiError> {
        match command {
            ClusterCommands::Show => {
                let cluster = self
                    .api
                    .cluster()?
                    .ok_or_else(|| ApiError::NotFound("cluster default".to_string()))?;
                Ok(format_cluster(&cluster, self.format))
            }
        }
    }
}

fn collect_ids(value: &str) -> Vec<String> {
    split_ids(value).collect()
}

fn parse_template_id(id: &str) -> Result<TemplateId, ApiError> {
    id.parse::<TemplateId>().map_err(|e| {
        ApiError::Template(TemplateError::Validation {
            field: "id",
            message: e.to_string(),
        })
    })
}
