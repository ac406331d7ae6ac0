//! Transport trait for controller communication.
//!
//! The [`Transport`] trait abstracts over the physical link to an APT
//! motion controller. Implementations exist for USB virtual COM ports
//! (`aptlib-transport`) and mock transports for testing
//! (`aptlib-test-harness`).
//!
//! The protocol engine in `aptlib-vcp` operates on a `Transport` rather
//! than directly on a serial port, enabling both real hardware control and
//! deterministic unit testing with `MockTransport`.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to a controller.
///
/// Implementations handle buffering and error recovery at the physical
/// layer. Protocol-level concerns (APT addressing, frame layout, unsolicited
/// message handling) are handled by the engine that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the controller.
    ///
    /// Implementations should block until all bytes have been written to
    /// the underlying transport (serial TX buffer, etc.).
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the controller into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Will wait up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if no data is received within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Discard any bytes currently buffered on the receive side.
    ///
    /// The engine calls this at the start of every transaction so that
    /// leftovers from a previous aborted exchange cannot desynchronize the
    /// frame stream.
    async fn flush_input(&mut self) -> Result<()>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
