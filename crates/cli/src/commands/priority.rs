use overlay::{manager::OverlayManager, user::UserId};

use crate::{cli::PriorityTarget, terminal_progress_reporter::TerminalProgressReporter};

use super::bool_status;

pub(crate) async fn handle_set_priority<M: OverlayManager>(
    manager: &M,
    package_name: &str,
    parent: &PriorityTarget,
    user: UserId,
    reporter: TerminalProgressReporter,
) -> i32 {
    tracing::debug!(package_name, ?parent, %user, "changing overlay priority");

    let result = match parent {
        PriorityTarget::Highest => manager.set_highest_priority(package_name, user).await,
        PriorityTarget::Lowest => manager.set_lowest_priority(package_name, user).await,
        PriorityTarget::Parent(parent) => manager.set_priority(package_name, parent, user).await,
    };

    bool_status(
        result,
        || format!("Error: failed to change the priority of {package_name} for user {user}"),
        reporter,
    )
}
