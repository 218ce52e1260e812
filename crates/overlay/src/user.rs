//! User scopes
//!
//! Every overlay request and query is scoped to a user. The core never assumes an
//! ambient "current user"; callers pass a [`UserId`] explicitly and resolve
//! [`UserArg::Current`] against whatever default their own context provides.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of the user (namespace) an overlay operation applies to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// The system user, the default scope of the command-line tool
    pub const SYSTEM: Self = Self(0);

    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `--user` argument as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserArg {
    /// An explicit numeric user id
    Id(UserId),

    /// `current` or `cur`: whatever default user the caller is configured with
    Current,
}

impl UserArg {
    /// Turn the argument into a concrete user, using `current` for [`UserArg::Current`]
    #[must_use]
    pub fn resolve(self, current: UserId) -> UserId {
        match self {
            Self::Id(id) => id,
            Self::Current => current,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserArgError {
    #[error("Bad user number: {0}")]
    BadUserNumber(String),
}

impl FromStr for UserArg {
    type Err = UserArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" | "cur" => Ok(Self::Current),
            other => other
                .parse::<i32>()
                .ok()
                .filter(|id| *id >= 0)
                .map(|id| Self::Id(UserId(id)))
                .ok_or_else(|| UserArgError::BadUserNumber(other.to_string())),
        }
    }
}
