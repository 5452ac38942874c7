//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the Render API.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{
    Cli, ClusterCommands, Commands, FileCommands, GroupCommands, NodeCommands, OutputFormat,
    TemplateCommands,
};
pub use route::RunContext;
