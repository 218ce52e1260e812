//! Registry state and configuration directory fixtures.

use crate::constants::{
    OVERLAY_DARK, OVERLAY_LIGHT, OVERLAY_LOCKED, OVERLAY_ORPHAN, OVERLAY_OTHER, SECONDARY_USER,
    TARGET_APP, TARGET_OTHER, THEME_CATEGORY,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// The sample registry every integration test starts from
///
/// For user 0, overlays of [`TARGET_APP`] in priority order (lowest first) are
/// dark (enabled), light (disabled) and locked (enabled, immutable).
#[must_use]
pub fn sample_state_yaml() -> String {
    format!(
        r#"targets:
  {TARGET_APP}:
    resources:
      string/title: Example
      string/subtitle: Plain
  {TARGET_OTHER}: {{}}
users:
  0:
    - name: {OVERLAY_DARK}
      target: {TARGET_APP}
      category: {THEME_CATEGORY}
      state: enabled
      resources:
        string/title: Dark Example
    - name: {OVERLAY_LIGHT}
      target: {TARGET_APP}
      category: {THEME_CATEGORY}
      state: disabled
      resources:
        string/title: Light Example
    - name: {OVERLAY_LOCKED}
      target: {TARGET_APP}
      state: enabled_immutable
      mutable: false
    - name: {OVERLAY_OTHER}
      target: {TARGET_OTHER}
      state: disabled
    - name: {OVERLAY_ORPHAN}
      target: com.example.gone
      state: missing_target
  {SECONDARY_USER}:
    - name: {OVERLAY_DARK}
      target: {TARGET_APP}
      category: {THEME_CATEGORY}
      state: disabled
"#
    )
}

/// Write `yaml` as `overlays.yaml` inside `dir`
pub fn write_state_file(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("overlays.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

/// Temporary configuration directory plus registry state file
///
/// Point the binary at it by setting `OVERLAY_CONFIG_DIR` to [`TestEnv::config_dir`].
pub struct TestEnv {
    temp_dir: TempDir,
    config_dir: PathBuf,
    state_file: PathBuf,
}

impl TestEnv {
    /// Environment holding [`sample_state_yaml`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(&sample_state_yaml())
    }

    #[must_use]
    pub fn with_state(yaml: &str) -> Self {
        let env = Self::without_state();
        fs::create_dir_all(env.state_file.parent().unwrap()).unwrap();
        fs::write(&env.state_file, yaml).unwrap();
        env
    }

    /// Environment whose state file does not exist yet
    #[must_use]
    pub fn without_state() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_dir = temp_dir.path().join(".config").join("overlay");
        let state_file = temp_dir.path().join("state").join("overlays.yaml");
        fs::create_dir_all(&config_dir).unwrap();

        fs::write(
            config_dir.join("config.yaml"),
            format!("state_file: {}\nuse_colors: false\n", state_file.display()),
        )
        .unwrap();

        Self {
            temp_dir,
            config_dir,
            state_file,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    #[must_use]
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    #[must_use]
    pub fn read_state(&self) -> String {
        fs::read_to_string(&self.state_file).unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
