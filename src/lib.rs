//! Render Server: Template Rendering Against Inventory Contexts
//!
//! Stores typed text templates and renders them on demand against nodes,
//! groups and the cluster, sourced either from a remote inventory registry or
//! from a static local topology.

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod files;
pub mod logging;
pub mod registry;
pub mod render;
pub mod template;
pub mod topology;
