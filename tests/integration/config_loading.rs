//! Layered configuration loading

use render_server::config::{global_config_path, ConfigLoader};
use render_server::context::Mode;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::integration::with_isolated_env;

fn write(path: PathBuf, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_defaults_resolve_against_workspace() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    with_isolated_env(&temp, || {
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.templates_dir, workspace.join("templates"));
        assert_eq!(config.topology_path, workspace.join("topology.toml"));
        assert_eq!(config.remote_cluster, "default");
        assert_eq!(config.mode(), Mode::Standalone);
    });
}

#[test]
fn test_global_path_prefers_xdg_config_home() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        assert_eq!(
            global_config_path(),
            Some(temp.path().join("xdg/render-server/config.toml"))
        );

        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(
            global_config_path(),
            Some(temp.path().join("home/.config/render-server/config.toml"))
        );
    });
}

#[test]
fn test_layer_precedence() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    with_isolated_env(&temp, || {
        write(
            temp.path().join("xdg/render-server/config.toml"),
            "remote_url = \"http://global:6304\"\nremote_cluster = \"global\"\ntemplates_dir = \"/srv/templates\"\n",
        );
        write(
            workspace.join("config/config.toml"),
            "remote_cluster = \"workspace\"\n",
        );
        write(
            workspace.join("config/development.toml"),
            "remote_jwt = \"dev-token\"\n",
        );

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.remote_url.as_deref(), Some("http://global:6304"));
        assert_eq!(config.remote_cluster, "workspace");
        assert_eq!(config.remote_jwt.as_deref(), Some("dev-token"));
        assert_eq!(config.templates_dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.mode(), Mode::Upstream);

        std::env::set_var("RENDER_REMOTE_CLUSTER", "from-env");
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.remote_cluster, "from-env");
    });
}

#[test]
fn test_render_env_selects_environment_file() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    with_isolated_env(&temp, || {
        write(
            workspace.join("config/production.toml"),
            "remote_url = \"https://registry.example.com\"\n",
        );

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.mode(), Mode::Standalone);

        std::env::set_var("RENDER_ENV", "production");
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(
            config.remote_url.as_deref(),
            Some("https://registry.example.com")
        );
    });
}

#[test]
fn test_explicit_file_replaces_file_layers() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    with_isolated_env(&temp, || {
        write(
            workspace.join("config/config.toml"),
            "remote_url = \"http://workspace:6304\"\n",
        );
        let explicit = temp.path().join("explicit.toml");
        write(
            explicit.clone(),
            "templates_dir = \"tpl\"\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        );

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(config.remote_url, None);
        assert_eq!(config.templates_dir, PathBuf::from("tpl"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    });
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        assert!(ConfigLoader::load_from_file(&temp.path().join("absent.toml")).is_err());
    });
}
