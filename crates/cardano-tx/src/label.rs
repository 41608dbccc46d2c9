//! CIP-67 asset name labels and unit construction
//!
//! A labeled asset name is `label_prefix(label) + hex(utf8(name))`; the full
//! unit is the policy ID concatenated with the labeled name. Label prefixes
//! are 4 bytes: a zero nibble, the 16-bit label, a CRC-8 checksum of the
//! label bytes, and a closing zero nibble.

/// CIP-68 reference token label (holds the metadata datum)
pub const CIP68_REF_LABEL: u16 = 100;

/// CIP-68 user token label (the circulating asset)
pub const CIP68_USER_LABEL: u16 = 222;

/// CRC-8 (polynomial 0x07) over the label bytes
fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Hex prefix for a CIP-67 label
pub fn label_prefix(label: u16) -> String {
    let checksum = crc8(&label.to_be_bytes());
    let packed = ((label as u32) << 12) | ((checksum as u32) << 4);
    hex::encode(packed.to_be_bytes())
}

/// Hex-encode a human-readable asset name
pub fn asset_name_hex(name: &str) -> String {
    hex::encode(name.as_bytes())
}

/// Labeled name of the reference token (label 100)
pub fn cip68_100(name_hex: &str) -> String {
    format!("{}{}", label_prefix(CIP68_REF_LABEL), name_hex)
}

/// Labeled name of the user token (label 222)
pub fn cip68_222(name_hex: &str) -> String {
    format!("{}{}", label_prefix(CIP68_USER_LABEL), name_hex)
}

/// Full on-chain unit: policy ID + labeled asset name
pub fn unit(policy_id: &str, labeled_name: &str) -> String {
    format!("{policy_id}{labeled_name}")
}
