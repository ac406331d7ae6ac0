//! APT frame header encoder/decoder.
//!
//! The APT protocol uses fixed 6-byte headers on a half-duplex serial
//! link. Every message starts with the same six bytes, but two competing
//! layouts share them:
//!
//! ```text
//! Short form:  <msgid u16 LE> <param1 u8> <param2 u8> <dest u8> <source u8>
//! Long form:   <msgid u16 LE> <length u16 LE>         <dest u8> <source u8>
//! ```
//!
//! A short-form message is complete in itself — the two parameter bytes
//! carry the entire payload. A long-form header is followed by `length`
//! raw payload bytes on the wire. Nothing in the header says which layout
//! applies; that decision belongs to the classifier (`classify`), which
//! looks at the message id and the addressing bytes. This module only
//! handles the pure byte-level reinterpretations.

use bytes::{BufMut, BytesMut};

use aptlib_core::{Error, Result};

/// Fixed length of every APT message header.
pub const HEADER_LEN: usize = 6;

/// Default bus address the host presents as `source`.
pub const HOST_SOURCE: u8 = 0x01;

/// Disconnect the controller from the USB bus.
pub const MGMSG_HW_DISCONNECT: u16 = 0x0002;

/// Request the hardware-identity block (long response).
pub const MGMSG_HW_REQ_INFO: u16 = 0x0005;

/// Start periodic status-update messages; `param1` carries the rate.
pub const MGMSG_HW_START_UPDATEMSGS: u16 = 0x0011;

/// Stop periodic status-update messages.
pub const MGMSG_HW_STOP_UPDATEMSGS: u16 = 0x0012;

/// Unsolicited one-line hardware response (short form).
pub const MGMSG_HW_RESPONSE: u16 = 0x0080;

/// Unsolicited rich response (long form, free-text error detail).
pub const MGMSG_HW_RICHRESPONSE: u16 = 0x0081;

/// Enable or disable a channel; identity byte in `param1`, state in `param2`.
pub const MGMSG_MOD_SET_CHANENABLESTATE: u16 = 0x0210;

/// Request the enable state of a channel; identity byte in `param1`.
pub const MGMSG_MOD_REQ_CHANENABLESTATE: u16 = 0x0211;

/// Instruct the unit to identify itself by flashing its front-panel LED.
pub const MGMSG_MOD_IDENTIFY: u16 = 0x0223;

/// The 6 header bytes read under the short-form layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortHeader {
    /// Wire message id.
    pub id: u16,
    /// First parameter byte.
    pub param1: u8,
    /// Second parameter byte.
    pub param2: u8,
    /// Destination bus address.
    pub dest: u8,
    /// Source bus address.
    pub source: u8,
}

/// The 6 header bytes read under the long-form layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongHeader {
    /// Wire message id.
    pub id: u16,
    /// Number of payload bytes that follow the header on the wire.
    pub length: u16,
    /// Destination bus address.
    pub dest: u8,
    /// Source bus address.
    pub source: u8,
}

/// A fully decoded APT message.
///
/// Produced by the engine's classify loop once the correct layout has been
/// chosen and, for long-form frames, the trailing payload has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Wire message id.
    pub id: u16,
    /// Destination bus address.
    pub dest: u8,
    /// Source bus address.
    pub source: u8,
    /// The message payload in whichever form the wire carried it.
    pub body: MessageBody,
}

/// Payload of a decoded [`Message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Short-form payload: the two parameter bytes from the header.
    ShortParams {
        /// First parameter byte.
        param1: u8,
        /// Second parameter byte.
        param2: u8,
    },
    /// Long-form payload: the raw bytes that followed the header.
    LongData {
        /// Payload bytes (`length` of them on the wire).
        data: Vec<u8>,
    },
}

impl Message {
    /// Build a short-form message from its decoded header.
    pub fn from_short(header: ShortHeader) -> Self {
        Message {
            id: header.id,
            dest: header.dest,
            source: header.source,
            body: MessageBody::ShortParams {
                param1: header.param1,
                param2: header.param2,
            },
        }
    }

    /// Build a long-form message from its decoded header and payload.
    pub fn from_long(header: LongHeader, data: Vec<u8>) -> Self {
        Message {
            id: header.id,
            dest: header.dest,
            source: header.source,
            body: MessageBody::LongData { data },
        }
    }

    /// The second parameter byte, if this is a short-form message.
    pub fn param2(&self) -> Option<u8> {
        match self.body {
            MessageBody::ShortParams { param2, .. } => Some(param2),
            MessageBody::LongData { .. } => None,
        }
    }

    /// The payload bytes, if this is a long-form message.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.body {
            MessageBody::LongData { data } => Some(data),
            MessageBody::ShortParams { .. } => None,
        }
    }
}

/// Encode a short-form request frame.
///
/// This is the only outbound frame shape the engine ever sends — all APT
/// requests are parameter-encoded, never length-prefixed.
///
/// # Example
///
/// ```
/// use aptlib_vcp::frame::{encode_short, MGMSG_HW_REQ_INFO, HOST_SOURCE};
///
/// // Hardware-info request to a bay controller at 0x21
/// let bytes = encode_short(MGMSG_HW_REQ_INFO, 0x00, 0x00, 0x21, HOST_SOURCE);
/// assert_eq!(bytes, vec![0x05, 0x00, 0x00, 0x00, 0x21, 0x01]);
/// ```
pub fn encode_short(id: u16, param1: u8, param2: u8, dest: u8, source: u8) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(HEADER_LEN);
    buf.put_u16_le(id);
    buf.put_u8(param1);
    buf.put_u8(param2);
    buf.put_u8(dest);
    buf.put_u8(source);
    buf.to_vec()
}

/// Reinterpret 6 header bytes under the long-form layout.
///
/// Fails with [`Error::ShortRead`] if fewer than [`HEADER_LEN`] bytes are
/// available. The decode itself cannot tell whether the long form is the
/// correct reading — see the classifier.
pub fn decode_as_long(buf: &[u8]) -> Result<LongHeader> {
    if buf.len() < HEADER_LEN {
        return Err(Error::ShortRead {
            expected: HEADER_LEN,
            got: buf.len(),
        });
    }
    Ok(LongHeader {
        id: u16::from_le_bytes([buf[0], buf[1]]),
        length: u16::from_le_bytes([buf[2], buf[3]]),
        dest: buf[4],
        source: buf[5],
    })
}

/// Reinterpret 6 header bytes under the short-form layout.
///
/// Fails with [`Error::ShortRead`] if fewer than [`HEADER_LEN`] bytes are
/// available.
pub fn decode_as_short(buf: &[u8]) -> Result<ShortHeader> {
    if buf.len() < HEADER_LEN {
        return Err(Error::ShortRead {
            expected: HEADER_LEN,
            got: buf.len(),
        });
    }
    Ok(ShortHeader {
        id: u16::from_le_bytes([buf[0], buf[1]]),
        param1: buf[2],
        param2: buf[3],
        dest: buf[4],
        source: buf[5],
    })
}
