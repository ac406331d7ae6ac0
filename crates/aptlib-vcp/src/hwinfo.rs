//! Hardware-identity payload decoder and model lookup.
//!
//! A `MGMSG_HW_REQ_INFO` query is answered with a fixed 84-byte block
//! describing the controller:
//!
//! ```text
//! offset  size  field
//!      0     4  serial number (u32 LE)
//!      4     8  model name (ASCII, NUL padded)
//!     12     2  hardware type (u16 LE)
//!     14     4  firmware version (u32 LE)
//!     18    48  notes (ASCII, NUL padded)
//!     66    12  reserved padding
//!     78     2  hardware version (u16 LE)
//!     80     2  modification state (u16 LE)
//!     82     2  channel count (u16 LE)
//! ```
//!
//! The first two decimal digits of the serial number identify the device
//! family. [`model_for_serial`] resolves them against the known-model
//! table; an unknown prefix is a lookup failure, never a decode failure.

use aptlib_core::{Error, Result};

/// Exact length of the hardware-identity payload.
pub const HW_INFO_LEN: usize = 84;

/// A device family resolved from a serial-number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceModel {
    /// Human-readable device family description.
    pub description: &'static str,
    /// Manufacturer model code.
    pub model_code: &'static str,
}

/// Decoded hardware identity of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareInfo {
    /// Unit serial number.
    pub serial_number: u32,
    /// Model name as reported by the firmware, padding trimmed.
    pub model_name: String,
    /// Hardware type code.
    pub hardware_type: u16,
    /// Firmware version.
    pub software_version: u32,
    /// Free-text notes field, padding trimmed.
    pub notes: String,
    /// Hardware revision.
    pub hardware_version: u16,
    /// Modification state.
    pub mod_state: u16,
    /// Number of motor channels the unit drives.
    pub channel_count: u16,
    /// Device family resolved from the serial-number prefix, when known.
    pub model: Option<DeviceModel>,
}

/// Resolve a device family from the leading two decimal digits of a
/// serial number.
///
/// Fails with [`Error::UnknownModel`] when the prefix is not in the table.
pub fn model_for_serial(serial_number: u32) -> Result<DeviceModel> {
    let mut prefix = serial_number;
    while prefix >= 100 {
        prefix /= 10;
    }

    let (description, model_code) = match prefix {
        20 => ("Legacy single channel stepper driver", "BSC001"),
        25 => ("Legacy single channel mini stepper driver", "BMS001"),
        30 => ("Legacy dual channel stepper driver", "BSC002"),
        35 => ("Legacy dual channel mini stepper driver", "BMS002"),
        40 => ("Single channel stepper driver", "BSC101"),
        60 => ("OptoST mini stepper driver", "OST001"),
        63 => ("OptoDC mini DC servo driver", "ODC001"),
        70 => ("Three channel card slot stepper driver", "BSC103"),
        73 => ("Brushless DC motherboard", "BBD102/BBD103"),
        80 => ("Stepper driver T-Cube", "TST001"),
        94 => ("Brushless DC motor card", "BBD102/BBD103"),
        _ => return Err(Error::UnknownModel(serial_number)),
    };

    Ok(DeviceModel {
        description,
        model_code,
    })
}

/// Decode the 84-byte hardware-identity payload.
///
/// Fails with [`Error::ShortRead`] when the payload is shorter than
/// [`HW_INFO_LEN`]. An unrecognized serial-number prefix leaves `model`
/// as `None`; it does not fail the decode.
pub fn decode_hardware_info(payload: &[u8]) -> Result<HardwareInfo> {
    if payload.len() < HW_INFO_LEN {
        return Err(Error::ShortRead {
            expected: HW_INFO_LEN,
            got: payload.len(),
        });
    }

    let serial_number = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let model_name = trim_ascii(&payload[4..12]);
    let hardware_type = u16::from_le_bytes([payload[12], payload[13]]);
    let software_version =
        u32::from_le_bytes([payload[14], payload[15], payload[16], payload[17]]);
    let notes = trim_ascii(&payload[18..66]);
    // payload[66..78] is reserved padding.
    let hardware_version = u16::from_le_bytes([payload[78], payload[79]]);
    let mod_state = u16::from_le_bytes([payload[80], payload[81]]);
    let channel_count = u16::from_le_bytes([payload[82], payload[83]]);

    Ok(HardwareInfo {
        serial_number,
        model_name,
        hardware_type,
        software_version,
        notes,
        hardware_version,
        mod_state,
        channel_count,
        model: model_for_serial(serial_number).ok(),
    })
}

/// Decode a NUL/space padded ASCII field, dropping anything non-printable.
fn trim_ascii(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |pos| pos + 1);
    bytes[..end]
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a synthetic 84-byte identity payload.
    fn payload(serial: u32, model: &str, channels: u16) -> Vec<u8> {
        let mut buf = vec![0u8; HW_INFO_LEN];
        buf[0..4].copy_from_slice(&serial.to_le_bytes());
        buf[4..4 + model.len()].copy_from_slice(model.as_bytes());
        buf[12..14].copy_from_slice(&1u16.to_le_bytes()); // hardware type
        buf[14..18].copy_from_slice(&0x00020103u32.to_le_bytes()); // firmware
        let notes = b"APT Stepper Motor Controller";
        buf[18..18 + notes.len()].copy_from_slice(notes);
        buf[78..80].copy_from_slice(&2u16.to_le_bytes()); // hardware version
        buf[80..82].copy_from_slice(&0u16.to_le_bytes()); // mod state
        buf[82..84].copy_from_slice(&channels.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_known_stepper_driver() {
        let info = decode_hardware_info(&payload(400_123, "BSC101", 1)).unwrap();
        assert_eq!(info.serial_number, 400_123);
        assert_eq!(info.model_name, "BSC101");
        assert_eq!(info.hardware_type, 1);
        assert_eq!(info.software_version, 0x00020103);
        assert_eq!(info.notes, "APT Stepper Motor Controller");
        assert_eq!(info.hardware_version, 2);
        assert_eq!(info.mod_state, 0);
        assert_eq!(info.channel_count, 1);

        let model = info.model.expect("prefix 40 is in the model table");
        assert_eq!(model.description, "Single channel stepper driver");
        assert_eq!(model.model_code, "BSC101");
    }

    #[test]
    fn unknown_prefix_decodes_with_model_absent() {
        let info = decode_hardware_info(&payload(990_001, "XXX001", 1)).unwrap();
        assert_eq!(info.serial_number, 990_001);
        assert_eq!(info.model, None);
    }

    #[test]
    fn short_payload_is_short_read() {
        let result = decode_hardware_info(&[0u8; 40]);
        match result {
            Err(Error::ShortRead { expected, got }) => {
                assert_eq!(expected, HW_INFO_LEN);
                assert_eq!(got, 40);
            }
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    fn trims_trailing_padding() {
        let mut buf = payload(700_500, "BSC103", 3);
        // Pad the model field with spaces instead of NULs.
        buf[10] = b' ';
        buf[11] = b' ';
        let info = decode_hardware_info(&buf).unwrap();
        assert_eq!(info.model_name, "BSC103");
    }

    #[test]
    fn model_lookup_known_prefixes() {
        assert_eq!(model_for_serial(400_123).unwrap().model_code, "BSC101");
        assert_eq!(model_for_serial(2_000_000).unwrap().model_code, "BSC001");
        assert_eq!(model_for_serial(9_400_000).unwrap().model_code, "BBD102/BBD103");
        assert_eq!(model_for_serial(8_012_345).unwrap().model_code, "TST001");
        assert_eq!(
            model_for_serial(6_300_001).unwrap().description,
            "OptoDC mini DC servo driver"
        );
    }

    #[test]
    fn model_lookup_unknown_prefix() {
        assert!(matches!(
            model_for_serial(990_123),
            Err(Error::UnknownModel(990_123))
        ));
        // Single-digit serials cannot carry a two-digit prefix.
        assert!(matches!(model_for_serial(7), Err(Error::UnknownModel(7))));
    }
}
