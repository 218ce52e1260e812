use std::io::Write;

use overlay::{
    manager::{ManagerError, OverlayManager},
    resource::ResourceName,
    user::UserId,
};

use crate::terminal_progress_reporter::TerminalProgressReporter;

use super::{report_manager_error, write_output};

pub(crate) async fn handle_lookup<M: OverlayManager>(
    manager: &M,
    package_to_load: &str,
    resource: &str,
    verbose: bool,
    user: UserId,
    out: &mut impl Write,
    reporter: TerminalProgressReporter,
) -> i32 {
    tracing::debug!(package_to_load, resource, %user, "looking up resource");

    let resource_name: ResourceName = match resource.parse() {
        Ok(name) => name,
        Err(e) => {
            reporter.report_error(format!("Error: {e}"));
            return 1;
        }
    };

    match manager.lookup(package_to_load, &resource_name, user).await {
        Ok(resolution) => {
            let mut text = String::new();
            if verbose {
                for line in &resolution.trace {
                    text.push_str(line);
                    text.push('\n');
                }
            }
            text.push_str(&resolution.value);
            text.push('\n');

            write_output(out, &text, reporter)
        }
        Err(ManagerError::PackageNotFound { .. }) => {
            reporter.report_error(format!(
                "Error: failed to get resources for package {package_to_load} for user {user}"
            ));
            1
        }
        Err(ManagerError::ResourceNotFound { .. }) => {
            reporter.report_error(format!("Error: failed to get the resource {resource}"));
            1
        }
        Err(e) => report_manager_error(&e, reporter),
    }
}
