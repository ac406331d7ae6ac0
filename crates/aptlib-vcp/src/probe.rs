//! Destination-address probing.
//!
//! APT controllers sit behind one serial port but answer only on their own
//! bus address, and the address depends on the product family (0x50 for
//! generic USB units, 0x11 for rack motherboards, 0x21..=0x2A for bay
//! slots). When the address is unknown, the only way to find it is to ask:
//! issue a hardware-info query per candidate and collect the addresses
//! that answer. A candidate that stays silent or returns garbage is simply
//! skipped — a wrong address is an expected outcome here, not an error.

use std::time::Duration;

use tracing::debug;

use aptlib_core::transport::Transport;

use crate::connection::AptVcp;
use crate::hwinfo::HardwareInfo;

/// Bus addresses an APT unit may answer on: generic USB units, the rack
/// motherboard, then the ten bay slots.
pub const CANDIDATE_DESTINATIONS: [u8; 12] = [
    0x50, 0x11, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A,
];

/// A destination address that answered a hardware-info query.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// The bus address the unit answered on.
    pub destination: u8,
    /// The identity it reported.
    pub info: HardwareInfo,
}

/// Try a hardware-info query against each candidate destination address.
///
/// Returns every address that produced a decodable identity block, along
/// with the transport for further use. Candidates that time out or answer
/// with something undecodable are logged and skipped.
pub async fn probe_destinations(
    transport: Box<dyn Transport>,
    source: u8,
    candidates: &[u8],
    timeout: Duration,
) -> (Vec<ProbeResult>, Box<dyn Transport>) {
    let mut found = Vec::new();
    let mut transport = transport;

    for &destination in candidates {
        debug!(destination = format_args!("0x{destination:02X}"), "probing");

        let engine = AptVcp::new(transport, source, destination, timeout, false, None, None);

        match engine.get_hardware_info().await {
            Ok(info) => {
                debug!(
                    destination = format_args!("0x{destination:02X}"),
                    serial_number = info.serial_number,
                    "unit answered"
                );
                found.push(ProbeResult { destination, info });
            }
            Err(e) => {
                debug!(
                    destination = format_args!("0x{destination:02X}"),
                    error = %e,
                    "no unit at this address"
                );
            }
        }

        transport = engine.into_transport();
    }

    (found, transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{HOST_SOURCE, MGMSG_HW_REQ_INFO, encode_short};
    use crate::hwinfo::HW_INFO_LEN;
    use aptlib_test_harness::MockTransport;

    fn identity_response(dest: u8, serial: u32) -> Vec<u8> {
        let mut payload = vec![0u8; HW_INFO_LEN];
        payload[0..4].copy_from_slice(&serial.to_le_bytes());
        payload[4..10].copy_from_slice(b"BSC101");
        payload[82..84].copy_from_slice(&1u16.to_le_bytes());

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0006u16.to_le_bytes());
        bytes.extend_from_slice(&(HW_INFO_LEN as u16).to_le_bytes());
        bytes.push(HOST_SOURCE | 0x80);
        bytes.push(dest);
        bytes.extend_from_slice(&payload);
        bytes
    }

    #[tokio::test]
    async fn probe_collects_answering_addresses() {
        let mut mock = MockTransport::new();

        // 0x50 stays silent, 0x21 answers, 0x22 stays silent.
        let req_50 = encode_short(MGMSG_HW_REQ_INFO, 0x00, 0x00, 0x50, HOST_SOURCE);
        mock.expect(&req_50, &[]);
        let req_21 = encode_short(MGMSG_HW_REQ_INFO, 0x00, 0x00, 0x21, HOST_SOURCE);
        mock.expect(&req_21, &identity_response(0x21, 400_123));
        let req_22 = encode_short(MGMSG_HW_REQ_INFO, 0x00, 0x00, 0x22, HOST_SOURCE);
        mock.expect(&req_22, &[]);

        let (found, transport) = probe_destinations(
            Box::new(mock),
            HOST_SOURCE,
            &[0x50, 0x21, 0x22],
            Duration::from_millis(20),
        )
        .await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].destination, 0x21);
        assert_eq!(found[0].info.serial_number, 400_123);
        assert!(transport.is_connected());
    }

    #[tokio::test]
    async fn probe_with_no_answers_is_empty() {
        let mut mock = MockTransport::new();
        for dest in [0x50u8, 0x11] {
            let req = encode_short(MGMSG_HW_REQ_INFO, 0x00, 0x00, dest, HOST_SOURCE);
            mock.expect(&req, &[]);
        }

        let (found, _transport) = probe_destinations(
            Box::new(mock),
            HOST_SOURCE,
            &[0x50, 0x11],
            Duration::from_millis(20),
        )
        .await;

        assert!(found.is_empty());
    }

    #[test]
    fn candidate_table_covers_bay_slots() {
        assert_eq!(CANDIDATE_DESTINATIONS[0], 0x50);
        assert_eq!(CANDIDATE_DESTINATIONS[1], 0x11);
        assert_eq!(
            &CANDIDATE_DESTINATIONS[2..],
            &[0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A]
        );
    }
}
