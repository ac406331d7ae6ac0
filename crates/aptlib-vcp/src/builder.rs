//! AptVcpBuilder -- fluent builder for constructing [`AptVcp`] connections.
//!
//! Separates configuration from construction so that callers can set up
//! the serial port, bus addresses, timeout, and the device-family status
//! capability before the transport connection is established.
//!
//! # Example
//!
//! ```no_run
//! use aptlib_vcp::builder::AptVcpBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> aptlib_core::Result<()> {
//! let stage = AptVcpBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .destination(0x21)
//!     .command_timeout(Duration::from_secs(1))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use aptlib_core::error::{Error, Result};
use aptlib_core::transport::Transport;
use aptlib_transport::{DEFAULT_BAUD_RATE, SerialTransport};

use crate::connection::AptVcp;
use crate::frame::HOST_SOURCE;
use crate::status::StatusHandler;

/// Fluent builder for [`AptVcp`].
///
/// The destination address has no default — every controller family uses a
/// different bus address (0x50 for generic USB units, 0x21/0x22 for bay
/// controllers, ...), and guessing one silently would misroute every
/// frame. Everything else has a sensible default.
pub struct AptVcpBuilder {
    source: u8,
    destination: Option<u8>,
    command_timeout: Duration,
    verbose: bool,
    status_update_id: Option<u16>,
    status_handler: Option<Box<dyn StatusHandler>>,
    serial_port: Option<String>,
    baud_rate: u32,
}

impl AptVcpBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        AptVcpBuilder {
            source: HOST_SOURCE,
            destination: None,
            command_timeout: Duration::from_secs(1),
            verbose: true,
            status_update_id: None,
            status_handler: None,
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Set the destination bus address of the target controller. Required.
    pub fn destination(mut self, addr: u8) -> Self {
        self.destination = Some(addr);
        self
    }

    /// Override the source address the engine presents (default `0x01`).
    pub fn source(mut self, addr: u8) -> Self {
        self.source = addr;
        self
    }

    /// Set the timeout for a single transport read (default: 1 s, the
    /// hardware's own serial timeout).
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Enable or disable logging of decoded unsolicited frames
    /// (default: enabled).
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Set the device family's periodic status-update message id.
    ///
    /// Left unset, incoming frames are never classified as status updates.
    pub fn status_update_id(mut self, id: u16) -> Self {
        self.status_update_id = Some(id);
        self
    }

    /// Supply the device family's status-update decoder.
    ///
    /// A correlated status frame arriving without a handler fails the
    /// transaction with
    /// [`Error::NotSupported`](aptlib_core::Error::NotSupported).
    pub fn status_handler(mut self, handler: Box<dyn StatusHandler>) -> Self {
        self.status_handler = Some(handler);
        self
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM12`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the baud rate (default: 115 200).
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }

    /// Build an [`AptVcp`] with a caller-provided transport.
    ///
    /// This is the primary entry point for testing (pass a
    /// `MockTransport` from `aptlib-test-harness`) and for advanced use
    /// cases where the caller manages the transport lifecycle directly.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<AptVcp> {
        let destination = self.destination.ok_or_else(|| {
            Error::Configuration("destination address has not been set".into())
        })?;

        Ok(AptVcp::new(
            transport,
            self.source,
            destination,
            self.command_timeout,
            self.verbose,
            self.status_update_id,
            self.status_handler,
        ))
    }

    /// Build an [`AptVcp`] over a serial transport.
    ///
    /// Requires that [`serial_port()`](Self::serial_port) has been called.
    pub async fn build(self) -> Result<AptVcp> {
        let port = self.serial_port.as_ref().ok_or_else(|| {
            Error::Configuration("serial_port is required for build()".into())
        })?;

        let transport = SerialTransport::open(port, self.baud_rate).await?;
        self.build_with_transport(Box::new(transport))
    }
}

impl Default for AptVcpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptlib_test_harness::MockTransport;

    #[test]
    fn builder_defaults() {
        let engine = AptVcpBuilder::new()
            .destination(0x50)
            .build_with_transport(Box::new(MockTransport::new()))
            .unwrap();

        assert_eq!(engine.source(), HOST_SOURCE);
        assert_eq!(engine.destination(), 0x50);
    }

    #[test]
    fn builder_requires_destination() {
        let result = AptVcpBuilder::new().build_with_transport(Box::new(MockTransport::new()));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn builder_requires_serial_port_for_build() {
        let result = AptVcpBuilder::new().destination(0x50).build().await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn builder_fluent_chain() {
        let engine = AptVcpBuilder::new()
            .destination(0x21)
            .source(0x11)
            .command_timeout(Duration::from_millis(250))
            .verbose(false)
            .status_update_id(0x0481)
            .baud_rate(9_600)
            .build_with_transport(Box::new(MockTransport::new()))
            .unwrap();

        assert_eq!(engine.source(), 0x11);
        assert_eq!(engine.destination(), 0x21);
    }
}
