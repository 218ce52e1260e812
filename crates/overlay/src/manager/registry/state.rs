//! In-memory model of the registry state file
//!
//! Priority is the position in a user's overlay list: the first entry is loaded
//! first (lowest priority), the last entry wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    manager::port::{ManagerError, OverlayInfo, OverlayState, Resolution},
    resource::ResourceName,
    transaction::{Request, RequestType},
    user::UserId,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RegistryState {
    #[serde(default)]
    pub(crate) targets: BTreeMap<String, TargetRecord>,

    #[serde(default)]
    pub(crate) users: BTreeMap<UserId, Vec<OverlayRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TargetRecord {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) resources: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct OverlayRecord {
    pub(crate) name: String,
    pub(crate) target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,

    #[serde(default)]
    pub(crate) state: OverlayState,

    #[serde(default = "default_mutable")]
    pub(crate) mutable: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) resources: BTreeMap<String, String>,
}

fn default_mutable() -> bool {
    true
}

impl OverlayRecord {
    fn can_change(&self) -> bool {
        self.mutable && self.state != OverlayState::EnabledImmutable
    }

    fn info(&self, user: UserId) -> OverlayInfo {
        OverlayInfo {
            package_name: self.name.clone(),
            target_package_name: self.target.clone(),
            category: self.category.clone(),
            state: self.state,
            is_mutable: self.can_change(),
            user,
        }
    }
}

impl RegistryState {
    fn overlays(&self, user: UserId) -> &[OverlayRecord] {
        self.users.get(&user).map(Vec::as_slice).unwrap_or_default()
    }

    fn position(&self, package_name: &str, user: UserId) -> Option<usize> {
        self.overlays(user)
            .iter()
            .position(|overlay| overlay.name == package_name)
    }

    /// Index of a changeable overlay
    fn mutable_position(&self, package_name: &str, user: UserId) -> Option<usize> {
        self.position(package_name, user)
            .filter(|&index| self.overlays(user)[index].can_change())
    }

    fn overlays_mut(&mut self, user: UserId) -> &mut Vec<OverlayRecord> {
        self.users.entry(user).or_default()
    }

    pub(crate) fn all_overlays(&self, user: UserId) -> BTreeMap<String, Vec<OverlayInfo>> {
        let mut grouped: BTreeMap<String, Vec<OverlayInfo>> = BTreeMap::new();
        for overlay in self.overlays(user) {
            grouped
                .entry(overlay.target.clone())
                .or_default()
                .push(overlay.info(user));
        }
        grouped
    }

    pub(crate) fn infos_for_target(&self, target: &str, user: UserId) -> Vec<OverlayInfo> {
        self.overlays(user)
            .iter()
            .filter(|overlay| overlay.target == target)
            .map(|overlay| overlay.info(user))
            .collect()
    }

    pub(crate) fn info(&self, package_name: &str, user: UserId) -> Option<OverlayInfo> {
        self.position(package_name, user)
            .map(|index| self.overlays(user)[index].info(user))
    }

    pub(crate) fn set_enabled(&mut self, package_name: &str, enable: bool, user: UserId) -> bool {
        let Some(index) = self.mutable_position(package_name, user) else {
            return false;
        };
        let overlay = &mut self.overlays_mut(user)[index];
        if enable && overlay.state == OverlayState::MissingTarget {
            return false;
        }

        overlay.state = if enable {
            OverlayState::Enabled
        } else {
            OverlayState::Disabled
        };
        true
    }

    pub(crate) fn set_enabled_exclusive(
        &mut self,
        package_name: &str,
        enable: bool,
        user: UserId,
    ) -> bool {
        if !self.set_enabled(package_name, enable, user) {
            return false;
        }
        if enable {
            self.disable_siblings(package_name, user, |_| true);
        }
        true
    }

    pub(crate) fn set_enabled_exclusive_in_category(
        &mut self,
        package_name: &str,
        user: UserId,
    ) -> bool {
        let Some(category) = self
            .position(package_name, user)
            .and_then(|index| self.overlays(user)[index].category.clone())
        else {
            return false;
        };
        if !self.set_enabled(package_name, true, user) {
            return false;
        }

        self.disable_siblings(package_name, user, |overlay| {
            overlay.category.as_deref() == Some(category.as_str())
        });
        true
    }

    /// Disable the other changeable overlays sharing `package_name`'s target
    fn disable_siblings(
        &mut self,
        package_name: &str,
        user: UserId,
        include: impl Fn(&OverlayRecord) -> bool,
    ) {
        let Some(index) = self.position(package_name, user) else {
            return;
        };
        let overlays = self.overlays_mut(user);
        let target = overlays[index].target.clone();

        for overlay in overlays.iter_mut().filter(|overlay| {
            overlay.name != package_name
                && overlay.target == target
                && overlay.can_change()
                && overlay.state.is_enabled()
                && include(&**overlay)
        }) {
            overlay.state = OverlayState::Disabled;
        }
    }

    pub(crate) fn set_priority(&mut self, package_name: &str, parent: &str, user: UserId) -> bool {
        if package_name == parent {
            return false;
        }
        let (Some(index), Some(parent_index)) = (
            self.mutable_position(package_name, user),
            self.position(parent, user),
        ) else {
            return false;
        };

        let overlays = self.overlays_mut(user);
        if overlays[index].target != overlays[parent_index].target {
            return false;
        }

        let overlay = overlays.remove(index);
        let parent_index = if parent_index > index {
            parent_index - 1
        } else {
            parent_index
        };
        overlays.insert(parent_index + 1, overlay);
        true
    }

    pub(crate) fn set_highest_priority(&mut self, package_name: &str, user: UserId) -> bool {
        let Some(index) = self.mutable_position(package_name, user) else {
            return false;
        };
        let overlays = self.overlays_mut(user);
        let overlay = overlays.remove(index);
        overlays.push(overlay);
        true
    }

    pub(crate) fn set_lowest_priority(&mut self, package_name: &str, user: UserId) -> bool {
        let Some(index) = self.mutable_position(package_name, user) else {
            return false;
        };
        let overlays = self.overlays_mut(user);
        let overlay = overlays.remove(index);
        overlays.insert(0, overlay);
        true
    }

    /// Apply one request of a transaction
    ///
    /// Enabling also moves the overlay to the highest priority.
    pub(crate) fn apply(&mut self, request: &Request) -> Result<(), ManagerError> {
        let user = request.user();
        let package_name = request.package_name();

        let request_type = request.kind().known().ok_or_else(|| {
            ManagerError::InvalidArgument(format!("unsupported request {request}"))
        })?;
        let index =
            self.position(package_name, user)
                .ok_or_else(|| ManagerError::PackageNotFound {
                    package_name: package_name.to_string(),
                    user,
                })?;

        let overlays = self.overlays_mut(user);
        if !overlays[index].can_change() {
            return Err(ManagerError::InvalidArgument(format!(
                "overlay `{package_name}` is immutable"
            )));
        }

        match request_type {
            RequestType::SetEnabled => {
                if overlays[index].state == OverlayState::MissingTarget {
                    return Err(ManagerError::InvalidArgument(format!(
                        "target of overlay `{package_name}` is missing"
                    )));
                }
                let mut overlay = overlays.remove(index);
                overlay.state = OverlayState::Enabled;
                overlays.push(overlay);
            }
            RequestType::SetDisabled => overlays[index].state = OverlayState::Disabled,
        }

        Ok(())
    }

    pub(crate) fn lookup(
        &self,
        package_to_load: &str,
        resource: &ResourceName,
        user: UserId,
    ) -> Result<Resolution, ManagerError> {
        if !self.targets.contains_key(package_to_load) {
            return Err(ManagerError::PackageNotFound {
                package_name: package_to_load.to_string(),
                user,
            });
        }

        let entry = resource.entry();
        let mut trace = vec![format!("Resolution for {resource}")];
        let mut value = None;

        if let Some(base) = self
            .targets
            .get(resource.package())
            .and_then(|target| target.resources.get(&entry))
        {
            trace.push(format!("\t{} (base)", resource.package()));
            value = Some(base.clone());
        }

        for overlay in self
            .overlays(user)
            .iter()
            .filter(|overlay| overlay.target == resource.package() && overlay.state.is_enabled())
        {
            if let Some(overridden) = overlay.resources.get(&entry) {
                trace.push(format!("\t{} (overlay)", overlay.name));
                value = Some(overridden.clone());
            }
        }

        value
            .map(|value| Resolution { value, trace })
            .ok_or_else(|| ManagerError::ResourceNotFound {
                resource: resource.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{RequestKind, TransactionBuilder};
    use pretty_assertions::assert_eq;

    const USER: UserId = UserId::SYSTEM;

    fn overlay(name: &str, target: &str, state: OverlayState) -> OverlayRecord {
        OverlayRecord {
            name: name.to_string(),
            target: target.to_string(),
            category: None,
            state,
            mutable: true,
            resources: BTreeMap::new(),
        }
    }

    fn in_category(mut record: OverlayRecord, category: &str) -> OverlayRecord {
        record.category = Some(category.to_string());
        record
    }

    fn state_with(overlays: Vec<OverlayRecord>) -> RegistryState {
        let mut state = RegistryState::default();
        state.users.insert(USER, overlays);
        state
    }

    fn names(state: &RegistryState) -> Vec<&str> {
        state
            .overlays(USER)
            .iter()
            .map(|overlay| overlay.name.as_str())
            .collect()
    }

    fn state_of(state: &RegistryState, name: &str) -> OverlayState {
        state.info(name, USER).unwrap().state
    }

    #[test]
    fn test_set_enabled_toggles_state_without_reordering() {
        let mut state = state_with(vec![
            overlay("a", "app", OverlayState::Disabled),
            overlay("b", "app", OverlayState::Disabled),
        ]);

        assert!(state.set_enabled("a", true, USER));

        assert_eq!(state_of(&state, "a"), OverlayState::Enabled);
        assert_eq!(names(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_set_enabled_refuses_unknown_immutable_and_missing_target() {
        let mut locked = overlay("locked", "app", OverlayState::Disabled);
        locked.mutable = false;
        let mut state = state_with(vec![
            locked,
            overlay("fixed", "app", OverlayState::EnabledImmutable),
            overlay("orphan", "gone", OverlayState::MissingTarget),
        ]);

        assert!(!state.set_enabled("nope", true, USER));
        assert!(!state.set_enabled("locked", true, USER));
        assert!(!state.set_enabled("fixed", false, USER));
        assert!(!state.set_enabled("orphan", true, USER));
        assert!(state.set_enabled("orphan", false, USER));
    }

    #[test]
    fn test_set_enabled_exclusive_disables_siblings_of_same_target() {
        let mut state = state_with(vec![
            overlay("a", "app", OverlayState::Enabled),
            overlay("b", "app", OverlayState::Disabled),
            overlay("c", "other", OverlayState::Enabled),
            overlay("d", "app", OverlayState::EnabledImmutable),
        ]);

        assert!(state.set_enabled_exclusive("b", true, USER));

        assert_eq!(state_of(&state, "a"), OverlayState::Disabled);
        assert_eq!(state_of(&state, "b"), OverlayState::Enabled);
        assert_eq!(state_of(&state, "c"), OverlayState::Enabled);
        assert_eq!(state_of(&state, "d"), OverlayState::EnabledImmutable);
    }

    #[test]
    fn test_set_enabled_exclusive_in_category() {
        let mut state = state_with(vec![
            in_category(overlay("dark", "app", OverlayState::Enabled), "theme"),
            in_category(overlay("light", "app", OverlayState::Disabled), "theme"),
            in_category(overlay("font", "app", OverlayState::Enabled), "font"),
            overlay("plain", "app", OverlayState::Disabled),
        ]);

        assert!(state.set_enabled_exclusive_in_category("light", USER));
        assert!(!state.set_enabled_exclusive_in_category("plain", USER));

        assert_eq!(state_of(&state, "dark"), OverlayState::Disabled);
        assert_eq!(state_of(&state, "light"), OverlayState::Enabled);
        assert_eq!(state_of(&state, "font"), OverlayState::Enabled);
        assert_eq!(state_of(&state, "plain"), OverlayState::Disabled);
    }

    #[test]
    fn test_set_priority_moves_just_above_parent() {
        let mut state = state_with(vec![
            overlay("a", "app", OverlayState::Enabled),
            overlay("b", "app", OverlayState::Enabled),
            overlay("c", "app", OverlayState::Enabled),
            overlay("d", "app", OverlayState::Enabled),
        ]);

        assert!(state.set_priority("a", "c", USER));
        assert_eq!(names(&state), vec!["b", "c", "a", "d"]);

        assert!(state.set_priority("d", "b", USER));
        assert_eq!(names(&state), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_set_priority_requires_same_target_and_distinct_packages() {
        let mut state = state_with(vec![
            overlay("a", "app", OverlayState::Enabled),
            overlay("x", "other", OverlayState::Enabled),
        ]);

        assert!(!state.set_priority("a", "x", USER));
        assert!(!state.set_priority("a", "a", USER));
        assert!(!state.set_priority("a", "missing", USER));
        assert_eq!(names(&state), vec!["a", "x"]);
    }

    #[test]
    fn test_highest_and_lowest_priority() {
        let mut state = state_with(vec![
            overlay("a", "app", OverlayState::Enabled),
            overlay("b", "app", OverlayState::Enabled),
            overlay("c", "app", OverlayState::Enabled),
        ]);

        assert!(state.set_highest_priority("a", USER));
        assert_eq!(names(&state), vec!["b", "c", "a"]);

        assert!(state.set_lowest_priority("c", USER));
        assert_eq!(names(&state), vec!["c", "b", "a"]);

        assert!(!state.set_highest_priority("missing", USER));
    }

    #[test]
    fn test_apply_enable_moves_overlay_to_highest_priority() {
        let mut state = state_with(vec![
            overlay("a", "app", OverlayState::Disabled),
            overlay("b", "app", OverlayState::Enabled),
        ]);
        let transaction = TransactionBuilder::new()
            .set_enabled("a", true, USER)
            .unwrap()
            .set_enabled("b", false, USER)
            .unwrap()
            .build();

        for request in &transaction {
            state.apply(request).unwrap();
        }

        assert_eq!(names(&state), vec!["b", "a"]);
        assert_eq!(state_of(&state, "a"), OverlayState::Enabled);
        assert_eq!(state_of(&state, "b"), OverlayState::Disabled);
    }

    #[test]
    fn test_apply_reports_unknown_package_and_kind() {
        let mut state = state_with(vec![overlay("a", "app", OverlayState::Disabled)]);
        let missing = TransactionBuilder::new()
            .set_enabled("missing", true, USER)
            .unwrap()
            .build();
        let unknown = Request::from_wire(RequestKind::Unknown(7), "a".to_string(), USER);

        assert_eq!(
            state.apply(missing.iter().next().unwrap()),
            Err(ManagerError::PackageNotFound {
                package_name: "missing".to_string(),
                user: USER,
            })
        );
        assert!(matches!(
            state.apply(&unknown),
            Err(ManagerError::InvalidArgument(msg)) if msg.contains("UNKNOWN(7)")
        ));
    }

    #[test]
    fn test_lookup_prefers_highest_priority_enabled_overlay() {
        let mut state = state_with(vec![
            overlay("low", "app", OverlayState::Enabled),
            overlay("high", "app", OverlayState::Enabled),
            overlay("off", "app", OverlayState::Disabled),
        ]);
        state.targets.insert(
            "app".to_string(),
            TargetRecord {
                resources: BTreeMap::from([("string/title".to_string(), "Base".to_string())]),
            },
        );
        let overlays = state.overlays_mut(USER);
        for (record, value) in overlays.iter_mut().zip(["Low", "High", "Off"]) {
            record
                .resources
                .insert("string/title".to_string(), value.to_string());
        }

        let resource: ResourceName = "app:string/title".parse().unwrap();
        let resolution = state.lookup("app", &resource, USER).unwrap();

        assert_eq!(resolution.value, "High");
        assert_eq!(
            resolution.trace,
            vec![
                "Resolution for app:string/title".to_string(),
                "\tapp (base)".to_string(),
                "\tlow (overlay)".to_string(),
                "\thigh (overlay)".to_string(),
            ]
        );
    }

    #[test]
    fn test_lookup_not_found_cases() {
        let mut state = RegistryState::default();
        state
            .targets
            .insert("app".to_string(), TargetRecord::default());
        let resource: ResourceName = "app:string/title".parse().unwrap();

        assert!(matches!(
            state.lookup("unknown", &resource, USER),
            Err(ManagerError::PackageNotFound { .. })
        ));
        assert_eq!(
            state.lookup("app", &resource, USER),
            Err(ManagerError::ResourceNotFound {
                resource: "app:string/title".to_string()
            })
        );
    }

    #[test]
    fn test_state_file_round_trips_through_yaml() {
        let yaml = r#"
targets:
  com.example.app:
    resources:
      string/title: Example
users:
  0:
    - name: com.example.app.overlay.dark
      target: com.example.app
      category: theme
      state: enabled
    - name: com.example.app.overlay.locked
      target: com.example.app
      state: enabled_immutable
      mutable: false
"#;

        let state: RegistryState = serde_yaml::from_str(yaml).unwrap();
        let overlays = state.overlays(USER);

        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].category.as_deref(), Some("theme"));
        assert!(overlays[0].mutable);
        assert!(!overlays[1].mutable);

        let reparsed: RegistryState =
            serde_yaml::from_str(&serde_yaml::to_string(&state).unwrap()).unwrap();
        assert_eq!(reparsed, state);
    }
}
