//! Configuration System
//!
//! Layered configuration built on the `config` crate. Later layers win:
//! built-in defaults, the global file, workspace files, then `RENDER_*`
//! environment variables.

use crate::context::Mode;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge_policy;
mod sources;

pub use sources::global_file::global_config_path;

/// Environment variable prefix for overrides (`RENDER_REMOTE_URL`, ...)
pub const ENV_PREFIX: &str = "RENDER";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Template Store root
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Static topology document used in standalone mode
    #[serde(default = "default_topology_path")]
    pub topology_path: PathBuf,

    /// Registry base URL; setting it selects upstream mode
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Bearer token for the registry
    #[serde(default)]
    pub remote_jwt: Option<String>,

    /// Registry cluster that scopes every node and group lookup
    #[serde(default = "default_remote_cluster")]
    pub remote_cluster: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_topology_path() -> PathBuf {
    PathBuf::from("topology.toml")
}

fn default_remote_cluster() -> String {
    "default".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            topology_path: default_topology_path(),
            remote_url: None,
            remote_jwt: None,
            remote_cluster: default_remote_cluster(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn mode(&self) -> Mode {
        Mode::from_config(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.templates_dir.as_os_str().is_empty() {
            return Err(ApiError::ConfigError(
                "templates_dir cannot be empty".to_string(),
            ));
        }

        if self.mode() == Mode::Upstream {
            let url = self.remote_url.as_deref().unwrap_or_default();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::ConfigError(format!(
                    "remote_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
            if self.remote_cluster.trim().is_empty() {
                return Err(ApiError::ConfigError(
                    "remote_cluster cannot be empty in upstream mode".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Anchor relative paths at `root`. Absolute paths are left untouched.
    pub fn resolve_paths(mut self, root: &Path) -> Self {
        if self.templates_dir.is_relative() {
            self.templates_dir = root.join(&self.templates_dir);
        }
        if self.topology_path.is_relative() {
            self.topology_path = root.join(&self.topology_path);
        }
        self
    }
}

/// Loads [`RenderConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Relative paths in the result are resolved against `workspace_root`.
    pub fn load(workspace_root: &Path) -> Result<RenderConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config: RenderConfig = builder
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config.resolve_paths(workspace_root))
    }

    /// Load configuration from one explicit file, still honouring the environment
    pub fn load_from_file(path: &Path) -> Result<RenderConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        builder
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Path of the global configuration file, if one can be located
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_config_path()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
