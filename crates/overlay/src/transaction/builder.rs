use crate::user::UserId;

use super::{Request, RequestType, Transaction, TransactionError};

/// Accumulates requests for a [`Transaction`]
///
/// [`build`](Self::build) takes a snapshot of the requests added so far. The builder
/// keeps its requests afterwards, so it can be reused to build a longer transaction
/// that starts with the same requests.
///
/// ```
/// use overlay::{transaction::TransactionBuilder, user::UserId};
///
/// # fn main() -> Result<(), overlay::transaction::TransactionError> {
/// let transaction = TransactionBuilder::new()
///     .set_enabled("com.foo.overlay", true, UserId::SYSTEM)?
///     .set_enabled("com.bar.overlay", false, UserId::SYSTEM)?
///     .build();
///
/// assert_eq!(transaction.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    requests: Vec<Request>,
}

impl TransactionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that an overlay package be enabled, or disabled
    ///
    /// Disabling is always possible for a caller allowed to commit. Enabling can still
    /// be refused by the manager when the transaction is committed.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidArgument`] if `package_name` is empty. Nothing
    /// is appended in that case.
    pub fn set_enabled(
        &mut self,
        package_name: &str,
        enable: bool,
        user: UserId,
    ) -> Result<&mut Self, TransactionError> {
        let request_type = if enable {
            RequestType::SetEnabled
        } else {
            RequestType::SetDisabled
        };
        self.requests.push(Request::new(request_type, package_name, user)?);

        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Create a new transaction out of the requests added so far
    #[must_use]
    pub fn build(&self) -> Transaction {
        Transaction::from_requests(self.requests.clone())
    }
}
