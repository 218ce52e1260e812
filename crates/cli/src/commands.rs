pub(crate) mod commit;
pub(crate) mod enable;
pub(crate) mod list;
pub(crate) mod lookup;
pub(crate) mod priority;

use std::io::Write;

use overlay::{
    config::AppConfig,
    manager::{ManagerError, OverlayManager},
    user::UserId,
};
use tracing::debug;

use crate::{
    cli::{ClapCommands, UserOpt},
    terminal_progress_reporter::TerminalProgressReporter,
};

/// Exit status for failures reported by the manager itself
pub(crate) const EXIT_MANAGER_FAILURE: i32 = -1;

/// Primary command dispatcher that routes to the appropriate command handler
///
/// Data output (`list`, `lookup`) goes to `out`; status messages go through `reporter`.
pub(crate) async fn dispatch_command<M: OverlayManager>(
    command: &ClapCommands,
    manager: &M,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
    out: &mut impl Write,
) -> i32 {
    debug!("Dispatching command: {:?}", command);

    match command {
        ClapCommands::List { user, package_name } => {
            let user = resolve_user(user, config);
            list::handle_list(manager, package_name.as_deref(), user, out, reporter).await
        }
        ClapCommands::Enable { user, package_name } => {
            let user = resolve_user(user, config);
            enable::handle_set_enabled(manager, package_name, true, user, reporter).await
        }
        ClapCommands::Disable { user, package_name } => {
            let user = resolve_user(user, config);
            enable::handle_set_enabled(manager, package_name, false, user, reporter).await
        }
        ClapCommands::EnableExclusive {
            user,
            category,
            package_name,
        } => {
            let user = resolve_user(user, config);
            enable::handle_enable_exclusive(manager, package_name, *category, user, reporter)
                .await
        }
        ClapCommands::SetPriority {
            user,
            package_name,
            parent,
        } => {
            let user = resolve_user(user, config);
            priority::handle_set_priority(manager, package_name, parent, user, reporter).await
        }
        ClapCommands::Lookup {
            user,
            verbose,
            package_to_load,
            resource,
        } => {
            let user = resolve_user(user, config);
            lookup::handle_lookup(
                manager,
                package_to_load,
                resource,
                *verbose,
                user,
                out,
                reporter,
            )
            .await
        }
        ClapCommands::Commit { user, operations } => {
            let user = resolve_user(user, config);
            commit::handle_commit(manager, operations, user, reporter).await
        }
    }
}

/// Omitted `--user` and `--user current` both mean the configured default user
fn resolve_user(opt: &UserOpt, config: &AppConfig) -> UserId {
    opt.user
        .map_or(config.default_user(), |user| user.resolve(config.default_user()))
}

/// Report a manager failure and return the matching exit status
pub(crate) fn report_manager_error(
    error: &ManagerError,
    reporter: TerminalProgressReporter,
) -> i32 {
    match error {
        ManagerError::Remote(message) => {
            reporter.report_error(format!("Remote exception: {message}"));
            EXIT_MANAGER_FAILURE
        }
        ManagerError::InvalidArgument(message) => {
            reporter.report_error(format!("Error: {message}"));
            EXIT_MANAGER_FAILURE
        }
        ManagerError::PackageNotFound { .. } | ManagerError::ResourceNotFound { .. } => {
            reporter.report_error(format!("Error: {error}"));
            1
        }
    }
}

/// Exit status of a manager call that reports success as a bool
pub(crate) fn bool_status(
    result: Result<bool, ManagerError>,
    failure: impl FnOnce() -> String,
    reporter: TerminalProgressReporter,
) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => {
            reporter.report_error(failure());
            reporter.report_suggestion("Run `overlay-cli list` to check the package name and state");
            1
        }
        Err(e) => report_manager_error(&e, reporter),
    }
}

pub(crate) fn write_output(
    out: &mut impl Write,
    text: &str,
    reporter: TerminalProgressReporter,
) -> i32 {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => 0,
        Err(e) => {
            reporter.report_error(format!("Error: failed to write output: {e}"));
            1
        }
    }
}
