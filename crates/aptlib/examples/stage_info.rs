//! Basic APT controller example.
//!
//! Demonstrates connecting to a controller over its USB virtual COM port,
//! reading the hardware identity, and enabling a motor channel.
//!
//! # Requirements
//!
//! - An APT motion controller connected via USB
//! - The serial port path adjusted for your system (e.g., `/dev/ttyUSB0`
//!   on Linux, `COM12` on Windows)
//! - The destination address matching your unit (0x50 for generic USB
//!   controllers, 0x21 and up for bay slots)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p aptlib --example stage_info
//! ```

use std::time::Duration;

use aptlib::vcp::AptVcpBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Adjust these to match your system.
    let serial_port = "/dev/ttyUSB0";
    let destination = 0x50;

    println!("Connecting to controller on {}...", serial_port);

    let stage = AptVcpBuilder::new()
        .serial_port(serial_port)
        .destination(destination)
        .command_timeout(Duration::from_secs(1))
        .build()
        .await?;

    // Read and print the hardware identity.
    let info = stage.get_hardware_info().await?;
    println!("Serial number: {}", info.serial_number);
    println!("Model:         {}", info.model_name);
    println!("Firmware:      0x{:08X}", info.software_version);
    println!("Channels:      {}", info.channel_count);
    if let Some(model) = info.model {
        println!("Family:        {} ({})", model.description, model.model_code);
    }

    // Flash the front-panel LED so the right unit is easy to spot.
    println!("\nFlashing front-panel LED...");
    stage.identify().await?;

    // Enable channel 1 and read the state back.
    println!("Enabling channel 1...");
    stage.set_channel_state(1, true).await?;

    let enabled = stage.get_channel_state(1).await?;
    println!("Channel 1 enabled: {}", enabled);

    println!("\nDone.");
    Ok(())
}
