//! Batches of overlay requests
//!
//! A [`Transaction`] is an ordered, immutable list of [`Request`]s that a manager
//! applies as one unit. Transactions are assembled with a [`TransactionBuilder`] and
//! travel to the manager in the parcel layout implemented by [`parcel`].
//!
//! ```
//! use overlay::{transaction::TransactionBuilder, user::UserId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transaction = TransactionBuilder::new()
//!     .set_enabled("com.example.overlay.dark", true, UserId::SYSTEM)?
//!     .set_enabled("com.example.overlay.light", false, UserId::SYSTEM)?
//!     .build();
//!
//! let bytes = transaction.to_bytes()?;
//! assert_eq!(overlay::transaction::Transaction::from_bytes(&bytes)?, transaction);
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod parcel;
mod request;

pub use self::{
    builder::TransactionBuilder,
    request::{Request, RequestKind, RequestType},
};

use std::fmt;

use thiserror::Error;

use crate::user::UserId;

use self::parcel::{ParcelError, ParcelReader, ParcelWriter};

/// Smallest encoded request: kind, empty string with terminator, user.
const MIN_ENCODED_REQUEST_LEN: usize = 4 + 8 + 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Container for a batch of requests to an overlay manager
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    requests: Vec<Request>,
}

impl Transaction {
    pub(crate) fn from_requests(requests: Vec<Request>) -> Self {
        Self { requests }
    }

    /// Iterate over the requests in the order they were added
    pub fn iter(&self) -> std::slice::Iter<'_, Request> {
        self.requests.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Append the transaction to a parcel
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError`] if a request has an empty package name or if a count or
    /// string length does not fit in 32 bits.
    pub fn write_to(&self, parcel: &mut ParcelWriter) -> Result<(), ParcelError> {
        let count = i32::try_from(self.requests.len()).map_err(|_| ParcelError::TooLarge {
            what: "request count",
            len: self.requests.len(),
        })?;
        parcel.write_i32(count);

        for (index, request) in self.requests.iter().enumerate() {
            if request.package_name().is_empty() {
                return Err(ParcelError::EmptyPackageName { index });
            }
            parcel.write_i32(request.kind().code());
            parcel.write_string(request.package_name())?;
            parcel.write_i32(request.user().get());
        }

        Ok(())
    }

    /// Read a transaction from the current position of a parcel
    ///
    /// Kind codes that are not known to this crate are kept as
    /// [`RequestKind::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError`] if the parcel is truncated, the count is negative, or a
    /// package name is null, empty or malformed.
    pub fn read_from(parcel: &mut ParcelReader<'_>) -> Result<Self, ParcelError> {
        let count = parcel.read_i32()?;
        let count = usize::try_from(count).map_err(|_| ParcelError::NegativeCount(count))?;

        let mut requests =
            Vec::with_capacity(count.min(parcel.remaining() / MIN_ENCODED_REQUEST_LEN));
        for index in 0..count {
            let kind = RequestKind::from_code(parcel.read_i32()?);
            let package_name = parcel.read_string()?;
            if package_name.is_empty() {
                return Err(ParcelError::EmptyPackageName { index });
            }
            let user = UserId::new(parcel.read_i32()?);

            requests.push(Request::from_wire(kind, package_name, user));
        }

        Ok(Self { requests })
    }

    /// Encode the transaction as a standalone parcel
    ///
    /// # Errors
    ///
    /// See [`write_to`](Self::write_to).
    pub fn to_bytes(&self) -> Result<Vec<u8>, ParcelError> {
        let mut parcel = ParcelWriter::new();
        self.write_to(&mut parcel)?;
        Ok(parcel.into_bytes())
    }

    /// Decode a parcel that holds exactly one transaction
    ///
    /// # Errors
    ///
    /// See [`read_from`](Self::read_from); additionally fails with
    /// [`ParcelError::TrailingBytes`] if anything follows the transaction.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParcelError> {
        let mut parcel = ParcelReader::new(bytes);
        let transaction = Self::read_from(&mut parcel)?;

        match parcel.remaining() {
            0 => Ok(transaction),
            trailing => Err(ParcelError::TrailingBytes(trailing)),
        }
    }
}

impl<'a> IntoIterator for &'a Transaction {
    type Item = &'a Request;
    type IntoIter = std::slice::Iter<'a, Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

impl IntoIterator for Transaction {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transaction { requests = [")?;
        for (i, request) in self.requests.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{request}")?;
        }
        f.write_str("] }")
    }
}
