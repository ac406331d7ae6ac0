//! Device-specific status-update capability.
//!
//! The layout of a periodic status frame varies between device families
//! (stepper bays, DC servo cubes, piezo drivers all push different
//! blocks), so the engine cannot decode them itself. A device-family layer
//! supplies a [`StatusHandler`]; the engine delivers every correlated
//! status frame to it from inside the transaction critical section.
//!
//! A status frame arriving while no handler is configured fails the
//! transaction with [`Error::NotSupported`](aptlib_core::Error::NotSupported)
//! rather than being dropped on the floor.

use aptlib_core::Result;

use crate::frame::Message;

/// Decoder for device-family status-update frames.
///
/// Implementations typically cache the decoded fields (position, velocity,
/// status bits) behind interior mutability; `update_status` is only ever
/// invoked from within a single in-flight transaction, never concurrently.
pub trait StatusHandler: Send + Sync {
    /// Apply a status-update message to the device-family state.
    fn update_status(&self, message: &Message) -> Result<()>;
}
