use assert_cmd::Command;
use test_common::TestEnv;

// Helper function to get a command instance
#[must_use]
pub fn get_command() -> Command {
    Command::cargo_bin("overlay-cli").unwrap()
}

// Helper function to get a command instance with environment variables pointing to our test config
#[must_use]
pub fn get_command_with_test_env(env: &TestEnv) -> Command {
    let mut cmd = get_command();

    // Override the config directory location
    cmd.env("OVERLAY_CONFIG_DIR", env.config_dir());

    cmd
}
