//! Merge rules: defaults applied beneath every other layer.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("templates_dir", "templates")?
        .set_default("topology_path", "topology.toml")?
        .set_default("remote_cluster", "default")
}
