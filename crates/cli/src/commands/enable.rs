use overlay::{manager::OverlayManager, user::UserId};

use crate::terminal_progress_reporter::TerminalProgressReporter;

use super::bool_status;

pub(crate) async fn handle_set_enabled<M: OverlayManager>(
    manager: &M,
    package_name: &str,
    enable: bool,
    user: UserId,
    reporter: TerminalProgressReporter,
) -> i32 {
    tracing::debug!(package_name, enable, %user, "setting overlay state");
    let (action, done) = if enable {
        ("enable", "Enabled")
    } else {
        ("disable", "Disabled")
    };

    let result = manager.set_enabled(package_name, enable, user).await;
    let code = bool_status(
        result,
        || format!("Error: failed to {action} {package_name} for user {user}"),
        reporter,
    );
    if code == 0 {
        reporter.report_success(format!("{done} {package_name}"));
    }
    code
}

pub(crate) async fn handle_enable_exclusive<M: OverlayManager>(
    manager: &M,
    package_name: &str,
    category: bool,
    user: UserId,
    reporter: TerminalProgressReporter,
) -> i32 {
    tracing::debug!(package_name, category, %user, "enabling overlay exclusively");

    let result = if category {
        manager
            .set_enabled_exclusive_in_category(package_name, user)
            .await
    } else {
        manager.set_enabled_exclusive(package_name, true, user).await
    };

    let code = bool_status(
        result,
        || format!("Error: failed to exclusively enable {package_name} for user {user}"),
        reporter,
    );
    if code == 0 {
        reporter.report_success(format!("Enabled {package_name} exclusively"));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay::manager::{ManagerError, MockOverlayManager};

    const PACKAGE: &str = "com.app.overlay";

    #[tokio::test]
    async fn test_enable_passes_arguments_through() {
        let mut manager = MockOverlayManager::new();
        manager
            .expect_set_enabled()
            .withf(|package_name, enable, user| {
                package_name == PACKAGE && *enable && *user == UserId::new(10)
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let code = handle_set_enabled(
            &manager,
            PACKAGE,
            true,
            UserId::new(10),
            TerminalProgressReporter::new(false),
        )
        .await;

        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_disable_refused_exits_with_one() {
        let mut manager = MockOverlayManager::new();
        manager
            .expect_set_enabled()
            .withf(|_, enable, _| !*enable)
            .returning(|_, _, _| Ok(false));

        let code = handle_set_enabled(
            &manager,
            PACKAGE,
            false,
            UserId::SYSTEM,
            TerminalProgressReporter::new(false),
        )
        .await;

        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_enable_remote_failure_exits_with_minus_one() {
        let mut manager = MockOverlayManager::new();
        manager
            .expect_set_enabled()
            .returning(|_, _, _| Err(ManagerError::Remote("binder died".to_string())));

        let code = handle_set_enabled(
            &manager,
            PACKAGE,
            true,
            UserId::SYSTEM,
            TerminalProgressReporter::new(false),
        )
        .await;

        assert_eq!(code, -1);
    }

    #[tokio::test]
    async fn test_enable_exclusive_in_category() {
        let mut manager = MockOverlayManager::new();
        manager
            .expect_set_enabled_exclusive_in_category()
            .withf(|package_name, _| package_name == PACKAGE)
            .times(1)
            .returning(|_, _| Ok(true));
        manager.expect_set_enabled_exclusive().never();

        let code = handle_enable_exclusive(
            &manager,
            PACKAGE,
            true,
            UserId::SYSTEM,
            TerminalProgressReporter::new(false),
        )
        .await;

        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_enable_exclusive_for_whole_target() {
        let mut manager = MockOverlayManager::new();
        manager
            .expect_set_enabled_exclusive()
            .withf(|package_name, enable, _| package_name == PACKAGE && *enable)
            .times(1)
            .returning(|_, _, _| Ok(false));

        let code = handle_enable_exclusive(
            &manager,
            PACKAGE,
            false,
            UserId::SYSTEM,
            TerminalProgressReporter::new(false),
        )
        .await;

        assert_eq!(code, 1);
    }
}
