//! CLI parse: clap types for the Render Server. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Render Server CLI - render templates against inventory contexts
#[derive(Parser)]
#[command(name = "render-server")]
#[command(about = "Render configuration templates against nodes, groups and the cluster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Command output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Resolve and list rendered files
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Inspect node contexts
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },
    /// Inspect group contexts
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Inspect the cluster context
    Cluster {
        #[command(subcommand)]
        command: ClusterCommands,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List templates matching name and type patterns
    List {
        /// Name pattern (shell glob)
        #[arg(long, default_value = "*")]
        name: String,
        /// Type pattern (shell glob)
        #[arg(long = "type", default_value = "*")]
        template_type: String,
    },
    /// Show one template by `<name>.<type>`
    Show {
        id: String,
    },
    /// Create or update a template
    Save {
        id: String,
        /// Payload text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        payload: Option<String>,
        /// Read the payload from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Delete a template (no error if absent)
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum FileCommands {
    /// Render one file by composite id (`<name>.<type>.<context>.nodes|groups` or `<name>.<type>.cluster`)
    Show {
        id: String,
    },
    /// List files selected by filters
    List {
        /// Comma-separated template ids
        #[arg(long, default_value = "")]
        ids: String,
        /// Comma-separated node ids
        #[arg(long)]
        node_ids: Option<String>,
        /// Comma-separated group ids whose member nodes are selected
        #[arg(long)]
        node_group_ids: Option<String>,
        /// Select every node
        #[arg(long)]
        node_all: bool,
        /// Comma-separated group ids
        #[arg(long)]
        group_ids: Option<String>,
        /// Select every group
        #[arg(long)]
        group_all: bool,
        /// Select the cluster
        #[arg(long)]
        cluster: bool,
    },
}

#[derive(Subcommand)]
pub enum NodeCommands {
    /// List nodes in scope
    List,
    /// Show one node
    Show {
        name: String,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// List groups in scope
    List,
    /// Show one group
    Show {
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ClusterCommands {
    /// Show the cluster (always `default`)
    Show,
}
