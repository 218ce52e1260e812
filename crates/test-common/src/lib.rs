//! Common test utilities shared across the overlay crates.
//!
//! Fixtures describe one small overlay registry that every integration test works
//! against, so expectations about names and priorities stay consistent.

pub mod config;
pub mod constants;
pub mod fixtures;

pub use config::{test_config, test_config_for_user, test_config_with_colors};
pub use constants::*;
pub use fixtures::{TestEnv, sample_state_yaml, write_state_file};

pub use overlay::config::AppConfigBuilder;
pub use tempfile::TempDir;
