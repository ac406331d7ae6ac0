//! # aptlib -- APT Motion Controller Control
//!
//! `aptlib` is an asynchronous Rust library for controlling Thorlabs APT
//! motion controllers (stepper bays, DC servo cubes, rack systems) over
//! their USB virtual COM ports. It implements the binary APT
//! command/response protocol: fixed 6-byte headers in two competing wire
//! forms, unsolicited hardware notifications interleaved with responses,
//! and the packed hardware-identity block.
//!
//! ## Quick Start
//!
//! Add `aptlib` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! aptlib = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Connect to a controller and read its identity:
//!
//! ```no_run
//! use aptlib::vcp::AptVcpBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let stage = AptVcpBuilder::new()
//!         .serial_port("/dev/ttyUSB0")
//!         .destination(0x50)
//!         .build()
//!         .await?;
//!
//!     let info = stage.get_hardware_info().await?;
//!     println!("serial {}: {}", info.serial_number, info.model_name);
//!
//!     stage.set_channel_state(1, true).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                 | Purpose                                      |
//! |-----------------------|----------------------------------------------|
//! | `aptlib-core`         | [`Transport`] trait, [`AptEvent`], errors    |
//! | `aptlib-transport`    | Serial (USB VCP) transport implementation    |
//! | `aptlib-vcp`          | The APT binary protocol engine               |
//! | `aptlib-test-harness` | `MockTransport` for protocol tests           |
//! | **`aptlib`**          | This facade crate -- re-exports everything   |
//!
//! Device-family layers (stepper stages, piezo drivers, ...) build on
//! [`AptVcp`](vcp::AptVcp), supplying their status-update decoding through
//! the [`StatusHandler`](vcp::StatusHandler) trait.
//!
//! ## Unsolicited Traffic
//!
//! Controllers push frames the host never requested — one-line hardware
//! responses, rich free-text errors, periodic status updates. The engine
//! drains them transparently while a request is outstanding. Subscribe to
//! observe them:
//!
//! ```no_run
//! use aptlib::AptEvent;
//! # async fn example(stage: &aptlib::vcp::AptVcp) {
//! let mut events = stage.subscribe();
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         AptEvent::RichNotice { source, data } => {
//!             eprintln!("unit 0x{source:02X}: {}", String::from_utf8_lossy(&data));
//!         }
//!         other => eprintln!("{other:?}"),
//!     }
//! }
//! # }
//! ```
//!
//! ## Finding the Bus Address
//!
//! Each controller family answers on its own destination address. When it
//! is unknown, [`probe_destinations`](vcp::probe_destinations) queries the
//! candidate set and collects the addresses that answer.

pub use aptlib_core::*;

/// The APT virtual COM port protocol engine.
///
/// Provides [`AptVcp`](vcp::AptVcp) and [`AptVcpBuilder`](vcp::AptVcpBuilder)
/// for driving controllers over the binary APT protocol, plus the frame
/// codec, hardware-identity decoding, and destination probing.
pub mod vcp {
    pub use aptlib_vcp::*;
}

/// Transport implementations for controller communication.
///
/// Provides [`SerialTransport`](transport::SerialTransport) for the USB
/// virtual COM ports that APT controllers present.
pub mod transport {
    pub use aptlib_transport::*;
}
