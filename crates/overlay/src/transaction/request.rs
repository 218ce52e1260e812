//! A single unit of a [`Transaction`](super::Transaction)

use std::fmt;

use crate::user::UserId;

use super::TransactionError;

/// The operations a caller can ask for when building a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// Enable the overlay and make it the last one loaded for its target
    SetEnabled,
    /// Disable the overlay
    SetDisabled,
}

impl RequestType {
    pub const SET_ENABLED_CODE: i32 = 0;
    pub const SET_DISABLED_CODE: i32 = 1;

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::SetEnabled => Self::SET_ENABLED_CODE,
            Self::SetDisabled => Self::SET_DISABLED_CODE,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SetEnabled => "SET_ENABLED",
            Self::SetDisabled => "SET_DISABLED",
        }
    }
}

/// Kind of a request as it travels on the wire
///
/// Decoding never rejects a kind code it does not know; such codes are kept as
/// [`RequestKind::Unknown`] and written back unchanged. Only the manager that applies
/// the transaction decides whether it can act on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Known(RequestType),
    Unknown(i32),
}

impl RequestKind {
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            RequestType::SET_ENABLED_CODE => Self::Known(RequestType::SetEnabled),
            RequestType::SET_DISABLED_CODE => Self::Known(RequestType::SetDisabled),
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Known(request_type) => request_type.code(),
            Self::Unknown(code) => code,
        }
    }

    #[must_use]
    pub const fn known(self) -> Option<RequestType> {
        match self {
            Self::Known(request_type) => Some(request_type),
            Self::Unknown(_) => None,
        }
    }
}

impl From<RequestType> for RequestKind {
    fn from(request_type: RequestType) -> Self {
        Self::Known(request_type)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(request_type) => f.write_str(request_type.label()),
            Self::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

/// A request to enable or disable one overlay package for one user
///
/// The package name is validated when the request is created and never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    kind: RequestKind,
    package_name: String,
    user: UserId,
}

impl Request {
    /// Create a request for one of the known operations
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidArgument`] if `package_name` is empty.
    pub fn new(
        request_type: RequestType,
        package_name: impl Into<String>,
        user: UserId,
    ) -> Result<Self, TransactionError> {
        let package_name = package_name.into();
        if package_name.is_empty() {
            return Err(TransactionError::InvalidArgument(
                "package name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            kind: RequestKind::Known(request_type),
            package_name,
            user,
        })
    }

    /// Requests read off the wire keep whatever kind code they carried.
    pub(crate) fn from_wire(kind: RequestKind, package_name: String, user: UserId) -> Self {
        Self {
            kind,
            package_name,
            user,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Human readable name of the request kind, only meant for diagnostics
    #[must_use]
    pub fn type_label(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request{{type={:#04x} ({}), packageName={}, userId={}}}",
            self.kind.code(),
            self.kind,
            self.package_name,
            self.user
        )
    }
}
