//! Overlay - batched overlay state changes
//!
//! The `overlay` library shapes requests to an overlay manager: a
//! [`transaction::Transaction`] is an ordered batch of enable/disable requests that is
//! applied as one unit, with a fixed little-endian wire layout for crossing a process
//! boundary. The manager itself sits behind the [`manager::OverlayManager`] port.
//!
//! # Main Components
//!
//! - [`transaction`] - Requests, the transaction builder and the parcel codec
//! - [`manager`] - The manager port and a YAML-file backed implementation
//! - [`resource`] - `package:type/name` resource references
//! - [`user`] - User scopes
//! - [`config`] - Application configuration management
//! - [`fs`] - File system abstractions
//!
//! # Examples
//!
//! ```
//! use overlay::{transaction::{Transaction, TransactionBuilder}, user::UserId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transaction = TransactionBuilder::new()
//!     .set_enabled("com.example.overlay", true, UserId::SYSTEM)?
//!     .build();
//!
//! let bytes = transaction.to_bytes()?;
//! assert_eq!(Transaction::from_bytes(&bytes)?, transaction);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod fs;
pub mod manager;
pub mod resource;
pub mod transaction;
pub mod user;
