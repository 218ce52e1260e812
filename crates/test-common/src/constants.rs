//! Common test constants used across multiple test files.

/// Target package with several overlays
pub const TARGET_APP: &str = "com.example.app";

/// Target package with a single overlay
pub const TARGET_OTHER: &str = "com.example.other";

/// Enabled overlay of [`TARGET_APP`] in the `theme` category, lowest priority
pub const OVERLAY_DARK: &str = "com.example.app.overlay.dark";

/// Disabled overlay of [`TARGET_APP`] in the `theme` category
pub const OVERLAY_LIGHT: &str = "com.example.app.overlay.light";

/// Immutable enabled overlay of [`TARGET_APP`], highest priority
pub const OVERLAY_LOCKED: &str = "com.example.app.overlay.locked";

/// Disabled overlay of [`TARGET_OTHER`]
pub const OVERLAY_OTHER: &str = "com.example.other.overlay";

/// Overlay whose target is not installed
pub const OVERLAY_ORPHAN: &str = "com.example.gone.overlay";

pub const THEME_CATEGORY: &str = "theme";

/// Resource of [`TARGET_APP`] overridden by the theme overlays
pub const RESOURCE_TITLE: &str = "com.example.app:string/title";

/// Resource of [`TARGET_APP`] no overlay touches
pub const RESOURCE_SUBTITLE: &str = "com.example.app:string/subtitle";

/// Secondary user in the sample registry
pub const SECONDARY_USER: i32 = 10;

/// State file path for configs that never touch the disk
pub const TEST_STATE_FILE: &str = "/tmp/overlay-test/overlays.yaml";
