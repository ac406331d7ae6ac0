//! Unsolicited-frame event types.
//!
//! APT controllers push frames the host never asked for: one-line hardware
//! status responses, free-text rich errors, and periodic status updates.
//! The engine drains these while a transaction is in flight and emits each
//! one through a [`tokio::sync::broadcast`] channel so diagnostic consumers
//! can observe them without polling. Events are delivered on a best-effort
//! basis; with no subscribers they are simply dropped after logging.

/// An event emitted by the engine when an unsolicited frame is consumed.
#[derive(Debug, Clone)]
pub enum AptEvent {
    /// A short `MGMSG_HW_RESPONSE` notification (0x0080) from the hardware.
    HardwareNotice {
        /// First parameter byte of the short frame.
        param1: u8,
        /// Second parameter byte of the short frame.
        param2: u8,
        /// Bus address of the unit that sent the notice.
        source: u8,
    },

    /// A long `MGMSG_HW_RICHRESPONSE` frame (0x0081) carrying free-text
    /// error detail.
    RichNotice {
        /// Bus address of the unit that sent the notice.
        source: u8,
        /// Raw payload bytes (ASCII error text on real hardware).
        data: Vec<u8>,
    },

    /// A device-specific periodic status frame was delivered to the
    /// configured status handler.
    StatusUpdate {
        /// Wire message id of the status frame.
        id: u16,
        /// Bus address of the unit that sent the update.
        source: u8,
    },
}
