//! Frame classification for incoming APT traffic.
//!
//! Six freshly read header bytes can be a normal response to the command
//! just sent, or an unsolicited frame the controller pushed on its own.
//! Worse, the same six bytes decode differently depending on which case
//! applies. This module makes that decision as a pure function so the read
//! loop stays trivial and the decision logic is testable without I/O.
//!
//! The check order is part of the protocol contract:
//!
//! 1. decode the header as long form;
//! 2. `MGMSG_HW_RESPONSE` — re-read as short form, unsolicited, consume;
//! 3. `MGMSG_HW_RICHRESPONSE` — long form, `length` payload bytes follow,
//!    unsolicited, consume;
//! 4. the configured status-update id, but only when the last command sent
//!    was that same id (the id is not unique across commands, so the
//!    command history disambiguates) — long form, deliver to the status
//!    handler, consume;
//! 5. otherwise a normal response: if `source | 0x80 == dest` the frame is
//!    an addressed long-form data frame, else it is a short parameter
//!    reply. Either way it terminates the drain loop.

use aptlib_core::Result;

use crate::frame::{
    LongHeader, MGMSG_HW_RESPONSE, MGMSG_HW_RICHRESPONSE, ShortHeader, decode_as_long,
    decode_as_short,
};

/// What a freshly read header turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Unsolicited `MGMSG_HW_RESPONSE` notice; no trailing payload.
    /// Consume and keep reading.
    HardwareNotice(ShortHeader),

    /// Unsolicited `MGMSG_HW_RICHRESPONSE`; `length` payload bytes follow.
    /// Consume and keep reading.
    RichNotice(LongHeader),

    /// Device status update correlated with the most recently sent command;
    /// `length` payload bytes follow. Deliver to the status handler,
    /// consume, and keep reading.
    StatusUpdate(LongHeader),

    /// Addressed data-bearing response; `length` payload bytes follow.
    /// This is the answer — return it to the caller.
    Data(LongHeader),

    /// Short parameter response. This is the answer — return it to the
    /// caller.
    ShortReply(ShortHeader),
}

/// Classify 6 header bytes.
///
/// `source` is the engine's own bus address (what the controller addresses
/// replies to), `status_update_id` the device family's periodic-update id
/// (`None` never matches), and `last_command` the most recent entry of the
/// command history.
pub fn classify(
    header: &[u8],
    source: u8,
    status_update_id: Option<u16>,
    last_command: Option<u16>,
) -> Result<Classification> {
    let long = decode_as_long(header)?;

    if long.id == MGMSG_HW_RESPONSE {
        return Ok(Classification::HardwareNotice(decode_as_short(header)?));
    }

    if long.id == MGMSG_HW_RICHRESPONSE {
        return Ok(Classification::RichNotice(long));
    }

    if let Some(update_id) = status_update_id {
        if long.id == update_id && last_command == Some(update_id) {
            return Ok(Classification::StatusUpdate(long));
        }
    }

    if source | 0x80 == long.dest {
        Ok(Classification::Data(long))
    } else {
        Ok(Classification::ShortReply(decode_as_short(header)?))
    }
}
