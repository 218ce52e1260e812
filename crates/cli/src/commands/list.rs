use std::io::Write;

use overlay::{
    manager::{ManagerError, OverlayInfo, OverlayManager, OverlayState},
    user::UserId,
};

use crate::terminal_progress_reporter::TerminalProgressReporter;

use super::{report_manager_error, write_output};

pub(crate) async fn handle_list<M: OverlayManager>(
    manager: &M,
    package_name: Option<&str>,
    user: UserId,
    out: &mut impl Write,
    reporter: TerminalProgressReporter,
) -> i32 {
    tracing::debug!(?package_name, %user, "listing overlays");

    let listing = match package_name {
        Some(package_name) => list_package(manager, package_name, user).await,
        None => list_all(manager, user).await,
    };

    match listing {
        Ok(text) => {
            if text.is_empty() && package_name.is_none() {
                reporter.report_info(format!("No overlays installed for user {user}"));
            }
            write_output(out, &text, reporter)
        }
        Err(e) => report_manager_error(&e, reporter),
    }
}

/// Every target followed by its overlays and a blank line
async fn list_all<M: OverlayManager>(manager: &M, user: UserId) -> Result<String, ManagerError> {
    let mut text = String::new();

    for (target, overlays) in manager.get_all_overlays(user).await? {
        text.push_str(&format!("{target}\n"));
        for info in &overlays {
            text.push_str(&overlay_line(info));
        }
        text.push('\n');
    }

    Ok(text)
}

/// Overlays of `package_name` as a target, or its own line if it is an overlay
async fn list_package<M: OverlayManager>(
    manager: &M,
    package_name: &str,
    user: UserId,
) -> Result<String, ManagerError> {
    let overlays = manager
        .get_overlay_infos_for_target(package_name, user)
        .await?;

    if overlays.is_empty() {
        return Ok(manager
            .get_overlay_info(package_name, user)
            .await?
            .map(|info| overlay_line(&info))
            .unwrap_or_default());
    }

    let mut text = format!("{package_name}\n");
    for info in &overlays {
        text.push_str(&overlay_line(info));
    }
    Ok(text)
}

fn overlay_line(info: &OverlayInfo) -> String {
    let marker = match info.state {
        OverlayState::Enabled | OverlayState::EnabledImmutable => "[x]",
        OverlayState::Disabled => "[ ]",
        OverlayState::MissingTarget => "---",
    };
    format!("{marker} {}\n", info.package_name)
}
