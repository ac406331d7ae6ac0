//! Channel identity and enable-state wire mappings.
//!
//! Controllers address their motor channels by a bit-flag identity byte,
//! not the channel number itself. Enable state uses the historical APT
//! encoding where 0x01 means enabled and 0x02 — not 0x00 — means disabled;
//! both directions of that mapping must be preserved exactly.

use aptlib_core::{Error, Result};

/// Wire byte for an enabled channel.
pub const CHANNEL_ENABLED: u8 = 0x01;

/// Wire byte for a disabled channel.
pub const CHANNEL_DISABLED: u8 = 0x02;

/// Map a logical channel number (1..=4) to its bit-flag identity byte.
///
/// Fails with [`Error::UnknownChannel`] for anything outside 1..=4.
pub fn channel_identity(channel: u8) -> Result<u8> {
    match channel {
        1 => Ok(0x01),
        2 => Ok(0x02),
        3 => Ok(0x04),
        4 => Ok(0x08),
        other => Err(Error::UnknownChannel(other)),
    }
}

/// Encode an enable state for the wire.
pub fn encode_channel_state(enabled: bool) -> u8 {
    if enabled {
        CHANNEL_ENABLED
    } else {
        CHANNEL_DISABLED
    }
}

/// Decode an enable-state byte from the wire.
///
/// Fails with [`Error::ProtocolViolation`] for any byte other than the two
/// defined states — an unexpected value must never be read as a default.
pub fn decode_channel_state(byte: u8) -> Result<bool> {
    match byte {
        CHANNEL_ENABLED => Ok(true),
        CHANNEL_DISABLED => Ok(false),
        other => Err(Error::ProtocolViolation(format!(
            "channel state byte 0x{other:02X} is neither enabled (0x01) nor disabled (0x02)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_bytes_are_bit_flags() {
        assert_eq!(channel_identity(1).unwrap(), 0x01);
        assert_eq!(channel_identity(2).unwrap(), 0x02);
        assert_eq!(channel_identity(3).unwrap(), 0x04);
        assert_eq!(channel_identity(4).unwrap(), 0x08);
    }

    #[test]
    fn identity_rejects_out_of_range() {
        assert!(matches!(channel_identity(0), Err(Error::UnknownChannel(0))));
        assert!(matches!(channel_identity(5), Err(Error::UnknownChannel(5))));
        assert!(matches!(
            channel_identity(255),
            Err(Error::UnknownChannel(255))
        ));
    }

    #[test]
    fn state_encoding_is_one_and_two() {
        assert_eq!(encode_channel_state(true), 0x01);
        assert_eq!(encode_channel_state(false), 0x02);
    }

    #[test]
    fn state_round_trip() {
        for state in [true, false] {
            assert_eq!(
                decode_channel_state(encode_channel_state(state)).unwrap(),
                state
            );
        }
    }

    #[test]
    fn decode_rejects_unknown_state_byte() {
        assert!(matches!(
            decode_channel_state(0x00),
            Err(Error::ProtocolViolation(_))
        ));
        assert!(matches!(
            decode_channel_state(0x03),
            Err(Error::ProtocolViolation(_))
        ));
    }
}
