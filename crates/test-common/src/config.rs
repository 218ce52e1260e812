//! `AppConfig` test helpers shared by CLI command tests.

use crate::constants::TEST_STATE_FILE;
use overlay::{
    config::{AppConfig, AppConfigBuilder},
    user::UserId,
};

/// Standard test configuration with colors disabled
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfigBuilder::default()
        .state_file(TEST_STATE_FILE)
        .use_colors(false)
        .build()
}

#[must_use]
pub fn test_config_with_colors() -> AppConfig {
    AppConfigBuilder::default()
        .state_file(TEST_STATE_FILE)
        .use_colors(true)
        .build()
}

/// Test configuration whose `current` user is `user`
#[must_use]
pub fn test_config_for_user(user: UserId) -> AppConfig {
    AppConfigBuilder::default()
        .state_file(TEST_STATE_FILE)
        .default_user(user)
        .use_colors(false)
        .build()
}
