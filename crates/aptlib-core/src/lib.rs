//! aptlib-core: Core traits, types, and error definitions for aptlib.
//!
//! This crate defines the abstractions shared by every aptlib crate.
//! Applications and device-family layers depend on these types without
//! pulling in the serial transport or the protocol engine itself.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`AptEvent`] -- unsolicited-frame notifications
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod events;
pub mod transport;

// Re-export key types at crate root for ergonomic `use aptlib_core::*`.
pub use error::{Error, Result};
pub use events::AptEvent;
pub use transport::Transport;
