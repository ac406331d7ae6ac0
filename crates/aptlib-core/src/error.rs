//! Error types for aptlib.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, protocol-layer, and
//! configuration errors are all captured here.

/// The error type for all aptlib operations.
///
/// Variants cover the full range of failure modes encountered when
/// communicating with APT motion controllers: physical transport failures,
/// malformed frames, timeouts, unknown channels and models, and missing
/// device capabilities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port open/read/write failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// Fewer bytes than required for a header or payload arrived before
    /// the transport timeout.
    ///
    /// This is fatal to the in-flight transaction but does not corrupt
    /// subsequent ones — the next `query` flushes the input buffer before
    /// sending.
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead {
        /// Number of bytes the frame layout requires.
        expected: usize,
        /// Number of bytes actually received.
        got: usize,
    },

    /// Timed out waiting for a response from the controller.
    ///
    /// This typically indicates the controller is powered off, the baud
    /// rate is wrong, or the destination address is incorrect.
    #[error("timeout waiting for response")]
    Timeout,

    /// A channel number outside the valid range 1..=4.
    #[error("unknown channel number: {0}")]
    UnknownChannel(u8),

    /// The serial-number prefix is not present in the model table.
    ///
    /// Identity decoding still succeeds with the model field absent; this
    /// error is only returned by the direct model lookup.
    #[error("no known model for serial number {0}")]
    UnknownModel(u32),

    /// A wire value outside its expected enumerated set (e.g. a
    /// channel-state byte that is neither 0x01 nor 0x02).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A status-update frame arrived but no device-specific handler is
    /// configured, or a required device capability was never supplied.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The connection was misconfigured (e.g. no destination address).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No connection to the controller has been established.
    #[error("not connected")]
    NotConnected,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_short_read() {
        let e = Error::ShortRead {
            expected: 6,
            got: 2,
        };
        assert_eq!(e.to_string(), "short read: expected 6 bytes, got 2");
    }

    #[test]
    fn error_display_timeout() {
        let e = Error::Timeout;
        assert_eq!(e.to_string(), "timeout waiting for response");
    }

    #[test]
    fn error_display_unknown_channel() {
        let e = Error::UnknownChannel(5);
        assert_eq!(e.to_string(), "unknown channel number: 5");
    }

    #[test]
    fn error_display_unknown_model() {
        let e = Error::UnknownModel(990_123);
        assert_eq!(e.to_string(), "no known model for serial number 990123");
    }

    #[test]
    fn error_display_protocol_violation() {
        let e = Error::ProtocolViolation("channel state byte 0x03".into());
        assert_eq!(e.to_string(), "protocol violation: channel state byte 0x03");
    }

    #[test]
    fn error_display_not_supported() {
        let e = Error::NotSupported("status decode".into());
        assert_eq!(e.to_string(), "not supported: status decode");
    }

    #[test]
    fn error_display_configuration() {
        let e = Error::Configuration("destination address unset".into());
        assert_eq!(
            e.to_string(),
            "configuration error: destination address unset"
        );
    }

    #[test]
    fn error_display_not_connected() {
        let e = Error::NotConnected;
        assert_eq!(e.to_string(), "not connected");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        // io::Error is Send + Sync, so our Error should be too.
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }

    #[test]
    fn result_alias_works() {
        let ok: Result<u32> = Ok(42);
        match ok {
            Ok(val) => assert_eq!(val, 42),
            Err(_) => panic!("expected Ok"),
        }

        let err: Result<u32> = Err(Error::Timeout);
        assert!(err.is_err());
    }
}
