//! AptVcp -- the APT virtual COM port connection.
//!
//! This module ties the frame codec ([`frame`](crate::frame)), the
//! classifier ([`classify`](crate::classify)), and the command history to a
//! [`Transport`] to produce a working protocol engine. It handles request
//! framing, stale-input flushing, draining of interleaved unsolicited
//! frames, status-update delivery, and hardware-identity caching.
//!
//! One connection means one transport, one command history, and one
//! `source`/`destination` pair. A transaction (`query`) is a single
//! critical section: flush, send, then classify incoming frames until the
//! addressed response arrives. Concurrent callers block on the connection
//! mutex until the in-flight transaction completes.

use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use aptlib_core::error::{Error, Result};
use aptlib_core::events::AptEvent;
use aptlib_core::transport::Transport;

use crate::channel::{channel_identity, decode_channel_state, encode_channel_state};
use crate::classify::{Classification, classify};
use crate::frame::{
    HEADER_LEN, MGMSG_HW_DISCONNECT, MGMSG_HW_REQ_INFO, MGMSG_HW_START_UPDATEMSGS,
    MGMSG_HW_STOP_UPDATEMSGS, MGMSG_MOD_IDENTIFY, MGMSG_MOD_REQ_CHANENABLESTATE,
    MGMSG_MOD_SET_CHANENABLESTATE, Message, encode_short,
};
use crate::history::CommandHistory;
use crate::hwinfo::{HardwareInfo, decode_hardware_info};
use crate::status::StatusHandler;

/// Maximum number of unsolicited frames consumed within one transaction.
///
/// A controller flooding the bus with status pushes must not be able to
/// block a `query` forever; exceeding this bound fails the transaction.
pub const MAX_UNSOLICITED_DRAIN: usize = 32;

/// Everything a transaction mutates, guarded by one mutex.
///
/// The command history and the cached identity are only ever touched from
/// inside the transaction critical section, so they live under the same
/// lock as the transport.
struct EngineState {
    transport: Box<dyn Transport>,
    history: CommandHistory,
    hardware_info: Option<HardwareInfo>,
}

/// A connection to an APT motion controller.
///
/// Constructed via [`AptVcpBuilder`](crate::builder::AptVcpBuilder). All
/// controller communication goes through the [`Transport`] provided at
/// build time.
pub struct AptVcp {
    state: Mutex<EngineState>,
    source: u8,
    destination: u8,
    command_timeout: Duration,
    verbose: bool,
    status_update_id: Option<u16>,
    status_handler: Option<Box<dyn StatusHandler>>,
    event_tx: broadcast::Sender<AptEvent>,
}

impl AptVcp {
    /// Create a new connection from its constituent parts.
    ///
    /// This is called by [`AptVcpBuilder`](crate::builder::AptVcpBuilder);
    /// callers should use the builder API instead.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        source: u8,
        destination: u8,
        command_timeout: Duration,
        verbose: bool,
        status_update_id: Option<u16>,
        status_handler: Option<Box<dyn StatusHandler>>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(16);
        AptVcp {
            state: Mutex::new(EngineState {
                transport,
                history: CommandHistory::new(),
                hardware_info: None,
            }),
            source,
            destination,
            command_timeout,
            verbose,
            status_update_id,
            status_handler,
            event_tx,
        }
    }

    /// The bus address this engine presents as `source`.
    pub fn source(&self) -> u8 {
        self.source
    }

    /// The bus address of the target controller.
    pub fn destination(&self) -> u8 {
        self.destination
    }

    /// Subscribe to decoded unsolicited frames.
    ///
    /// By default unsolicited frames are only logged; subscribing makes
    /// them observable without changing the engine's behavior.
    pub fn subscribe(&self) -> broadcast::Receiver<AptEvent> {
        self.event_tx.subscribe()
    }

    /// The most recently sent command id, if any.
    pub async fn last_command(&self) -> Option<u16> {
        self.state.lock().await.history.last()
    }

    /// Tear down the connection and recover the transport.
    ///
    /// Useful for probing several destination addresses over one port.
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.state.into_inner().transport
    }

    // -----------------------------------------------------------------
    // Core transaction
    // -----------------------------------------------------------------

    /// Send a request frame and classify incoming frames until the
    /// addressed response arrives.
    ///
    /// Runs entirely inside the caller's lock on [`EngineState`]. Stale
    /// input is flushed first so a previous aborted exchange cannot
    /// desynchronize this one, and the sent id is recorded in the history
    /// *before* reading so an interleaved status frame correlates against
    /// the command that requested it.
    async fn exchange(
        &self,
        state: &mut EngineState,
        id: u16,
        param1: u8,
        param2: u8,
    ) -> Result<Message> {
        state.transport.flush_input().await?;
        state.history.push(id);

        let request = encode_short(id, param1, param2, self.destination, self.source);
        debug!(
            id = format_args!("0x{id:04X}"),
            param1,
            param2,
            dest = self.destination,
            "sending request"
        );
        state.transport.send(&request).await?;

        for _ in 0..MAX_UNSOLICITED_DRAIN {
            let header = read_header(&mut *state.transport, self.command_timeout).await?;

            match classify(
                &header,
                self.source,
                self.status_update_id,
                state.history.last(),
            )? {
                Classification::HardwareNotice(h) => {
                    if self.verbose {
                        debug!(
                            param1 = h.param1,
                            param2 = h.param2,
                            source = h.source,
                            "unsolicited hardware notice"
                        );
                    }
                    let _ = self.event_tx.send(AptEvent::HardwareNotice {
                        param1: h.param1,
                        param2: h.param2,
                        source: h.source,
                    });
                }
                Classification::RichNotice(h) => {
                    let data = read_payload(
                        &mut *state.transport,
                        h.length as usize,
                        self.command_timeout,
                    )
                    .await?;
                    if self.verbose {
                        debug!(
                            source = h.source,
                            text = %String::from_utf8_lossy(&data),
                            "unsolicited rich notice"
                        );
                    }
                    let _ = self.event_tx.send(AptEvent::RichNotice {
                        source: h.source,
                        data,
                    });
                }
                Classification::StatusUpdate(h) => {
                    let data = read_payload(
                        &mut *state.transport,
                        h.length as usize,
                        self.command_timeout,
                    )
                    .await?;
                    let handler = self.status_handler.as_ref().ok_or_else(|| {
                        Error::NotSupported(
                            "status update received but no status handler is configured"
                                .into(),
                        )
                    })?;
                    debug!(
                        id = format_args!("0x{:04X}", h.id),
                        source = h.source,
                        "delivering status update"
                    );
                    handler.update_status(&Message::from_long(h, data))?;
                    let _ = self.event_tx.send(AptEvent::StatusUpdate {
                        id: h.id,
                        source: h.source,
                    });
                }
                Classification::Data(h) => {
                    let data = read_payload(
                        &mut *state.transport,
                        h.length as usize,
                        self.command_timeout,
                    )
                    .await?;
                    return Ok(Message::from_long(h, data));
                }
                Classification::ShortReply(h) => {
                    return Ok(Message::from_short(h));
                }
            }
        }

        Err(Error::ProtocolViolation(format!(
            "more than {MAX_UNSOLICITED_DRAIN} unsolicited frames while waiting for a response"
        )))
    }

    // -----------------------------------------------------------------
    // Public operations
    // -----------------------------------------------------------------

    /// Send a request and wait for the addressed response.
    ///
    /// Holds exclusive access to the transport for the whole exchange.
    /// Unsolicited frames arriving in between are consumed internally and
    /// never returned; the first addressed frame is the result. Fails with
    /// [`Error::Timeout`] when no frame arrives within the command timeout.
    pub async fn query(&self, id: u16, param1: u8, param2: u8) -> Result<Message> {
        let mut state = self.state.lock().await;
        self.exchange(&mut state, id, param1, param2).await
    }

    /// Send a request without waiting for any response.
    ///
    /// The sent id is still recorded in the command history so a later
    /// status frame can correlate against it. Callers that need an
    /// acknowledgement must use [`query`](Self::query).
    pub async fn write(&self, id: u16, param1: u8, param2: u8) -> Result<()> {
        let mut state = self.state.lock().await;
        state.history.push(id);

        let request = encode_short(id, param1, param2, self.destination, self.source);
        debug!(
            id = format_args!("0x{id:04X}"),
            param1,
            param2,
            dest = self.destination,
            "sending fire-and-forget request"
        );
        state.transport.send(&request).await
    }

    /// Query the controller's hardware identity.
    ///
    /// Decodes the 84-byte identity block, caches it on the connection,
    /// and returns it. The cache is never invalidated automatically; call
    /// this again to refresh it.
    pub async fn get_hardware_info(&self) -> Result<HardwareInfo> {
        let mut state = self.state.lock().await;
        let reply = self
            .exchange(&mut state, MGMSG_HW_REQ_INFO, 0x00, 0x00)
            .await?;
        let data = reply.data().ok_or_else(|| {
            Error::ProtocolViolation("hardware info response was not a data-bearing frame".into())
        })?;
        let info = decode_hardware_info(data)?;
        state.hardware_info = Some(info.clone());
        Ok(info)
    }

    /// The hardware identity cached by the last successful
    /// [`get_hardware_info`](Self::get_hardware_info) call, without
    /// touching the transport.
    pub async fn cached_hardware_info(&self) -> Option<HardwareInfo> {
        self.state.lock().await.hardware_info.clone()
    }

    /// Enable or disable a motor channel.
    ///
    /// The controller does not acknowledge this message, so it is
    /// send-only. The channel number is validated before any transport
    /// access.
    pub async fn set_channel_state(&self, channel: u8, enabled: bool) -> Result<()> {
        let identity = channel_identity(channel)?;
        let state_byte = encode_channel_state(enabled);
        self.write(MGMSG_MOD_SET_CHANENABLESTATE, identity, state_byte)
            .await
    }

    /// Read the enable state of a motor channel.
    pub async fn get_channel_state(&self, channel: u8) -> Result<bool> {
        let identity = channel_identity(channel)?;
        let reply = self
            .query(MGMSG_MOD_REQ_CHANENABLESTATE, identity, 0x00)
            .await?;
        let state_byte = reply.param2().ok_or_else(|| {
            Error::ProtocolViolation(
                "channel state response was not a short parameter frame".into(),
            )
        })?;
        decode_channel_state(state_byte)
    }

    /// Instruct the unit to identify itself by flashing its front-panel
    /// LED.
    pub async fn identify(&self) -> Result<()> {
        self.write(MGMSG_MOD_IDENTIFY, 0x00, 0x00).await
    }

    /// Disconnect the controller from the USB bus.
    pub async fn disconnect(&self) -> Result<()> {
        self.write(MGMSG_HW_DISCONNECT, 0x00, 0x00).await
    }

    /// Start periodic hardware status updates at `update_rate` messages
    /// per second.
    pub async fn enable_updates(&self, update_rate: u8) -> Result<()> {
        self.write(MGMSG_HW_START_UPDATEMSGS, update_rate, 0x00)
            .await
    }

    /// Stop periodic hardware status updates.
    pub async fn disable_updates(&self) -> Result<()> {
        self.write(MGMSG_HW_STOP_UPDATEMSGS, 0x00, 0x00).await
    }
}

// ---------------------------------------------------------------------------
// Read helpers
// ---------------------------------------------------------------------------

/// Read one 6-byte frame header.
///
/// No bytes at all before the timeout is [`Error::Timeout`] (nothing was
/// answering); a partial header is [`Error::ShortRead`] (the stream broke
/// mid-frame).
async fn read_header(
    transport: &mut dyn Transport,
    timeout: Duration,
) -> Result<[u8; HEADER_LEN]> {
    let mut buf = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match transport.receive(&mut buf[filled..], timeout).await {
            Ok(n) if n > 0 => filled += n,
            Ok(_) | Err(Error::Timeout) => {
                if filled == 0 {
                    return Err(Error::Timeout);
                }
                return Err(Error::ShortRead {
                    expected: HEADER_LEN,
                    got: filled,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(buf)
}

/// Read exactly `len` payload bytes following a long-form header.
///
/// Anything short of `len` before the timeout is [`Error::ShortRead`] —
/// once a header announced a payload, the payload must follow.
async fn read_payload(
    transport: &mut dyn Transport,
    len: usize,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let mut data = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        match transport.receive(&mut data[filled..], timeout).await {
            Ok(n) if n > 0 => filled += n,
            Ok(_) | Err(Error::Timeout) => {
                return Err(Error::ShortRead {
                    expected: len,
                    got: filled,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(data)
}
