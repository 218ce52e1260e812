//! Overlay manager port and error types
//!
//! The `OverlayManager` trait is the boundary to whatever actually owns the overlay
//! registry. This crate only shapes requests toward it; [`super::registry`] provides
//! a file-backed implementation for the command-line tool.

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{resource::ResourceName, transaction::Transaction, user::UserId};

/// Port for overlay manager operations
///
/// Every call may fail with [`ManagerError::Remote`] when the manager cannot be
/// reached or its state cannot be read or written. Mutations that are refused for
/// ordinary reasons (unknown overlay, immutable overlay, mismatched targets) report
/// `Ok(false)` instead.
#[cfg_attr(any(test, feature = "with_mocks"), mockall::automock)]
#[async_trait]
pub trait OverlayManager: Send + Sync {
    /// Apply every request of `transaction` in order, as one unit
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if any request cannot be applied; in that case none
    /// of the requests take effect.
    async fn commit(&self, transaction: Transaction) -> Result<(), ManagerError>;

    /// All overlays of `user`, grouped by target package, each group lowest priority first
    async fn get_all_overlays(
        &self,
        user: UserId,
    ) -> Result<BTreeMap<String, Vec<OverlayInfo>>, ManagerError>;

    /// Overlays targeting `target`, lowest priority first
    async fn get_overlay_infos_for_target(
        &self,
        target: &str,
        user: UserId,
    ) -> Result<Vec<OverlayInfo>, ManagerError>;

    /// Information about a single overlay, `None` if `user` has no such overlay
    async fn get_overlay_info(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<Option<OverlayInfo>, ManagerError>;

    /// Enable or disable `package_name` without touching its priority
    ///
    /// Returns `Ok(false)` if the overlay is unknown, immutable, or enabling it is
    /// impossible because its target is missing.
    async fn set_enabled(
        &self,
        package_name: &str,
        enable: bool,
        user: UserId,
    ) -> Result<bool, ManagerError>;

    /// Enable or disable `package_name`; enabling also disables every other overlay
    /// for the same target
    async fn set_enabled_exclusive(
        &self,
        package_name: &str,
        enable: bool,
        user: UserId,
    ) -> Result<bool, ManagerError>;

    /// Enable `package_name` and disable the other overlays for the same target that
    /// share its category
    async fn set_enabled_exclusive_in_category(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<bool, ManagerError>;

    /// Give `package_name` the priority just above `parent`
    async fn set_priority(
        &self,
        package_name: &str,
        parent: &str,
        user: UserId,
    ) -> Result<bool, ManagerError>;

    /// Give `package_name` the highest priority among the overlays of its target
    async fn set_highest_priority(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<bool, ManagerError>;

    /// Give `package_name` the lowest priority among the overlays of its target
    async fn set_lowest_priority(
        &self,
        package_name: &str,
        user: UserId,
    ) -> Result<bool, ManagerError>;

    /// Resolve `resource` as seen by `package_to_load` with the currently enabled overlays
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::PackageNotFound`] if `package_to_load` is unknown and
    /// [`ManagerError::ResourceNotFound`] if nothing defines the resource.
    async fn lookup(
        &self,
        package_to_load: &str,
        resource: &ResourceName,
        user: UserId,
    ) -> Result<Resolution, ManagerError>;
}

/// Errors reported by an overlay manager
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// The manager could not be reached or failed internally
    #[error("remote failure: {0}")]
    Remote(String),

    /// No package of that name exists for the user
    #[error("package `{package_name}` not found for user {user}")]
    PackageNotFound { package_name: String, user: UserId },

    #[error("resource `{resource}` not found")]
    ResourceNotFound { resource: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// State of an overlay package for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    #[default]
    Disabled,
    Enabled,
    /// Enabled and cannot be changed
    EnabledImmutable,
    /// The package the overlay targets is not installed
    MissingTarget,
}

impl OverlayState {
    #[must_use]
    /// Whether the overlay currently takes part in resource resolution
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled | Self::EnabledImmutable)
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("disabled"),
            Self::Enabled => f.write_str("enabled"),
            Self::EnabledImmutable => f.write_str("enabled_immutable"),
            Self::MissingTarget => f.write_str("missing_target"),
        }
    }
}

/// What a manager reports about one overlay package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayInfo {
    pub package_name: String,
    pub target_package_name: String,
    pub category: Option<String>,
    pub state: OverlayState,

    /// Whether the state of the overlay may be changed
    pub is_mutable: bool,
    pub user: UserId,
}

/// Result of [`OverlayManager::lookup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Final value of the resource
    pub value: String,

    /// One line per package that was consulted, in the order they were applied
    pub trace: Vec<String>,
}
