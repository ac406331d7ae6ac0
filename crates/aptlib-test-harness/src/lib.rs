//! aptlib-test-harness: Test utilities and mock transports for aptlib.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing of
//! the protocol engine without requiring real motion-controller hardware.

pub mod mock_serial;

pub use mock_serial::MockTransport;
