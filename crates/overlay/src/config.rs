pub mod loader;

pub use self::loader::{ApplyToConfig, ConfigLoadError, ConfigLoader, YamlLoader};

use std::path::PathBuf;

use serde::Deserialize;

use crate::user::UserId;

const DEBUG_DEFAULT: bool = false;
const USE_COLORS_DEFAULT: bool = true;

/// Application configuration that combines the config file and CLI args
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// YAML file the overlay registry is persisted in
    pub(crate) state_file: PathBuf,

    /// User that `--user current` and omitted `--user` options resolve to
    #[serde(default)]
    pub(crate) default_user: UserId,

    #[serde(default)]
    pub(crate) debug: bool,

    #[serde(default = "default_use_colors")]
    pub(crate) use_colors: bool,
}

fn default_use_colors() -> bool {
    true
}

impl AppConfig {
    /// Path of the overlay registry state file
    #[must_use]
    pub fn state_file(&self) -> &PathBuf {
        &self.state_file
    }

    /// User that omitted and `current` user arguments resolve to
    #[must_use]
    pub fn default_user(&self) -> UserId {
        self.default_user
    }

    /// Whether debug logging is enabled
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Whether to use colors in terminal output
    #[must_use]
    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    /// Get a mutable reference to the state file path
    pub fn state_file_mut(&mut self) -> &mut PathBuf {
        &mut self.state_file
    }

    pub fn debug_mut(&mut self) -> &mut bool {
        &mut self.debug
    }

    pub fn use_colors_mut(&mut self) -> &mut bool {
        &mut self.use_colors
    }
}

/// Builder pattern for `AppConfig` testing
#[derive(Default, Debug)]
pub struct AppConfigBuilder {
    state_file: PathBuf,
    default_user: Option<UserId>,
    debug: Option<bool>,
    use_colors: Option<bool>,
}

impl AppConfigBuilder {
    #[must_use]
    pub fn state_file<P>(mut self, state_file: P) -> Self
    where
        P: AsRef<std::ffi::OsStr>,
    {
        self.state_file = PathBuf::from(state_file.as_ref());
        self
    }

    #[must_use]
    pub fn default_user(mut self, user: UserId) -> Self {
        self.default_user = Some(user);
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    #[must_use]
    pub fn use_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = Some(use_colors);
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        AppConfig {
            state_file: self.state_file,
            default_user: self.default_user.unwrap_or(UserId::SYSTEM),
            debug: self.debug.unwrap_or(DEBUG_DEFAULT),
            use_colors: self.use_colors.unwrap_or(USE_COLORS_DEFAULT),
        }
    }
}
