use overlay::{manager::OverlayManager, transaction::TransactionBuilder, user::UserId};

use crate::{cli::CommitOp, terminal_progress_reporter::TerminalProgressReporter};

use super::report_manager_error;

/// Build one transaction from `operations`, in order, and commit it
pub(crate) async fn handle_commit<M: OverlayManager>(
    manager: &M,
    operations: &[CommitOp],
    user: UserId,
    reporter: TerminalProgressReporter,
) -> i32 {
    let mut builder = TransactionBuilder::new();
    for op in operations {
        if let Err(e) = builder.set_enabled(&op.package_name, op.enable, user) {
            reporter.report_error(format!("Error: `{op}`: {e}"));
            return 1;
        }
    }

    let transaction = builder.build();
    tracing::debug!(%transaction, "committing");

    let count = transaction.len();
    match manager.commit(transaction).await {
        Ok(()) => {
            reporter.report_success(format!("Committed {count} request(s)"));
            0
        }
        Err(e) => report_manager_error(&e, reporter),
    }
}
