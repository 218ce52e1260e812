//! File-backed overlay manager
//!
//! Overlay state lives in a single YAML file:
//!
//! ```yaml
//! targets:
//!   com.example.app:
//!     resources:
//!       string/title: Example
//! users:
//!   0:
//!     - name: com.example.app.overlay.dark
//!       target: com.example.app
//!       category: theme
//!       state: enabled
//!       resources:
//!         string/title: Dark Example
//! ```
//!
//! A missing state file is an empty registry. Every mutation is a
//! load/modify/store cycle guarded by an async mutex.

mod state;

use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    fs::FileSystem,
    resource::ResourceName,
    transaction::Transaction,
    user::UserId,
};

use self::state::RegistryState;

use super::port::{ManagerError, OverlayInfo, OverlayManager, Resolution};

/// [`OverlayManager`] backed by a YAML state file
pub struct YamlOverlayRegistry<F: FileSystem> {
    fs: F,
    state_file: PathBuf,
    lock: Mutex<()>,
}

impl<F: FileSystem> YamlOverlayRegistry<F> {
    /// Create a registry over `state_file`; nothing is read until the first call
    pub fn new(fs: F, state_file: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            state_file: state_file.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<RegistryState, ManagerError> {
        if !self.fs.path_exists(&self.state_file) {
            tracing::debug!(path = %self.state_file.display(), "no state file, starting empty");
            return Ok(RegistryState::default());
        }

        let contents = self.fs.read_file(&self.state_file).map_err(|e| {
            ManagerError::Remote(format!(
                "failed to read {}: {e}",
                self.state_file.display()
            ))
        })?;
        if contents.trim().is_empty() {
            return Ok(RegistryState::default());
        }

        serde_yaml::from_str(&contents).map_err(|e| {
            ManagerError::Remote(format!(
                "failed to parse {}: {e}",
                self.state_file.display()
            ))
        })
    }

    fn store(&self, state: &RegistryState) -> Result<(), ManagerError> {
        let yaml = serde_yaml::to_string(state)
            .map_err(|e| ManagerError::Remote(format!("failed to serialize state: {e}")))?;

        self.fs
            .write_file(&self.state_file, yaml.as_bytes())
            .map_err(|e| {
                ManagerError::Remote(format!(
                    "failed to write {}: {e}",
                    self.state_file.display()
                ))
            })?;

        tracing::info!(path = %self.state_file.display(), "stored overlay state");
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&RegistryState) -> T) -> Result<T, ManagerError> {
        let _guard = self.lock.lock().await;
        let state = self.load()?;
        Ok(f(&state))
    }

    /// Run `f` and store the state only if it reports a change
    async fn mutate(
        &self,
        operation: &str,
        f: impl FnOnce(&mut RegistryState) -> bool,
    ) -> Result<bool, ManagerError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load()?;

        let changed = f(&mut state);
        tracing::debug!(operation, changed, "evaluated state mutation");
        if changed {
            self.store(&state)?;
        }

        Ok(changed)
    }
}

#[async_trait]
impl<F: FileSystem> OverlayManager for YamlOverlayRegistry<F> {
    async fn commit(&self, transaction: Transaction) -> Result<(), ManagerError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load()?;

        for request in &transaction {
            tracing::debug!(%request, "applying request");
            if let Err(e) = state.apply(request) {
                tracing::warn!(%request, "transaction rejected: {e}");
                return Err(e);
            }
        }

        if transaction.is_empty() {
            return Ok(());
        }
        self.store(&state)
    }

    async fn get_all_overlays(
        &self,
        user: UserId,
    ) -> Result<BTreeMap<String, Vec<OverlayInfo>>, ManagerError> {
        self.read(|state| state.all_overlays(user)).await
    }

    async fn get_overlay_infos_for_target(
        &self,
        target: &str,
        user: UserId,
    ) -> Result<Vec<OverlayInfo>, ManagerError> {
        self.read(|state| state.infos_for_target(target, user))
            .await
    }

    async fn get_overlay_info(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<Option<OverlayInfo>, ManagerError> {
        self.read(|state| state.info(package_name, user)).await
    }

    async fn set_enabled(
        &self,
        package_name: &str,
        enable: bool,
        user: UserId,
    ) -> Result<bool, ManagerError> {
        self.mutate("set_enabled", |state| {
            state.set_enabled(package_name, enable, user)
        })
        .await
    }

    async fn set_enabled_exclusive(
        &self,
        package_name: &str,
        enable: bool,
        user: UserId,
    ) -> Result<bool, ManagerError> {
        self.mutate("set_enabled_exclusive", |state| {
            state.set_enabled_exclusive(package_name, enable, user)
        })
        .await
    }

    async fn set_enabled_exclusive_in_category(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<bool, ManagerError> {
        self.mutate("set_enabled_exclusive_in_category", |state| {
            state.set_enabled_exclusive_in_category(package_name, user)
        })
        .await
    }

    async fn set_priority(
        &self,
        package_name: &str,
        parent: &str,
        user: UserId,
    ) -> Result<bool, ManagerError> {
        self.mutate("set_priority", |state| {
            state.set_priority(package_name, parent, user)
        })
        .await
    }

    async fn set_highest_priority(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<bool, ManagerError> {
        self.mutate("set_highest_priority", |state| {
            state.set_highest_priority(package_name, user)
        })
        .await
    }

    async fn set_lowest_priority(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<bool, ManagerError> {
        self.mutate("set_lowest_priority", |state| {
            state.set_lowest_priority(package_name, user)
        })
        .await
    }

    async fn lookup(
        &self,
        package_to_load: &str,
        resource: &ResourceName,
        user: UserId,
    ) -> Result<Resolution, ManagerError> {
        let _guard = self.lock.lock().await;
        self.load()?.lookup(package_to_load, resource, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fs::{FileSystemError, MockFileSystem},
        manager::port::OverlayState,
        transaction::TransactionBuilder,
    };
    use std::{io, path::Path};

    const STATE_FILE: &str = "/tmp/overlays.yaml";
    const USER: UserId = UserId::SYSTEM;

    const STATE_YAML: &str = r#"
users:
  0:
    - name: com.example.overlay.a
      target: com.example
      state: disabled
    - name: com.example.overlay.b
      target: com.example
      state: enabled
"#;

    fn registry_with(yaml: &str) -> MockFileSystem {
        let mut fs = MockFileSystem::default();
        fs.mock_path_exists(STATE_FILE, true);
        fs.mock_read_file(STATE_FILE, yaml);
        fs
    }

    #[tokio::test]
    async fn test_missing_state_file_is_empty_registry() {
        let mut fs = MockFileSystem::default();
        fs.mock_path_exists(STATE_FILE, false);
        let registry = YamlOverlayRegistry::new(fs, STATE_FILE);

        let overlays = registry.get_all_overlays(USER).await.unwrap();

        assert!(overlays.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_is_remote_error() {
        let mut fs = MockFileSystem::default();
        fs.mock_path_exists(STATE_FILE, true);
        fs.expect_read_file().returning(|_| {
            Err(FileSystemError::from(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "denied",
            )))
        });
        let registry = YamlOverlayRegistry::new(fs, STATE_FILE);

        let result = registry.get_overlay_info("com.example.overlay.a", USER).await;

        assert!(matches!(result, Err(ManagerError::Remote(msg)) if msg.contains("denied")));
    }

    #[tokio::test]
    async fn test_malformed_state_file_is_remote_error() {
        let registry = YamlOverlayRegistry::new(registry_with("users: [not, a, map"), STATE_FILE);

        let result = registry.get_all_overlays(USER).await;

        assert!(matches!(result, Err(ManagerError::Remote(_))));
    }

    #[tokio::test]
    async fn test_refused_mutation_does_not_write() {
        // No write expectation: a write would panic
        let registry = YamlOverlayRegistry::new(registry_with(STATE_YAML), STATE_FILE);

        let changed = registry
            .set_enabled("com.example.overlay.missing", true, USER)
            .await
            .unwrap();

        assert!(!changed);
    }

    #[tokio::test]
    async fn test_successful_mutation_writes_state() {
        let mut fs = registry_with(STATE_YAML);
        fs.expect_write_file()
            .withf(|path, data| {
                let yaml = std::str::from_utf8(data).unwrap();
                path == Path::new(STATE_FILE) && !yaml.contains("state: disabled")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let registry = YamlOverlayRegistry::new(fs, STATE_FILE);

        let changed = registry
            .set_enabled("com.example.overlay.a", true, USER)
            .await
            .unwrap();

        assert!(changed);
    }

    #[tokio::test]
    async fn test_failed_commit_writes_nothing() {
        let registry = YamlOverlayRegistry::new(registry_with(STATE_YAML), STATE_FILE);
        let transaction = TransactionBuilder::new()
            .set_enabled("com.example.overlay.a", true, USER)
            .unwrap()
            .set_enabled("com.example.overlay.missing", false, USER)
            .unwrap()
            .build();

        let result = registry.commit(transaction).await;

        assert!(matches!(result, Err(ManagerError::PackageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_commit_stores_once() {
        let mut fs = registry_with(STATE_YAML);
        fs.mock_write_file(STATE_FILE);
        let registry = YamlOverlayRegistry::new(fs, STATE_FILE);
        let transaction = TransactionBuilder::new()
            .set_enabled("com.example.overlay.a", true, USER)
            .unwrap()
            .set_enabled("com.example.overlay.b", false, USER)
            .unwrap()
            .build();

        registry.commit(transaction).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_reports_state() {
        let registry = YamlOverlayRegistry::new(registry_with(STATE_YAML), STATE_FILE);

        let infos = registry
            .get_overlay_infos_for_target("com.example", USER)
            .await
            .unwrap();

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1].state, OverlayState::Enabled);
        assert!(infos.iter().all(|info| info.is_mutable));
    }
}
