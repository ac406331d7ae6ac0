//! aptlib-transport: Serial transport implementation for aptlib.
//!
//! APT motion controllers connect over USB and present as virtual COM
//! ports. This crate provides [`SerialTransport`], the production
//! implementation of the [`Transport`](aptlib_core::Transport) trait.

pub mod serial;

pub use serial::{DEFAULT_BAUD_RATE, SerialTransport};
