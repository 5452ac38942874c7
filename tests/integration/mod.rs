//! Integration tests for the Render Server

mod composite_ids;
mod config_loading;
mod standalone_mode;
mod test_utils;

pub use test_utils::{demo_upstream, seeded_store, with_isolated_env, DemoRegistry, DEMO_CLUSTER};
