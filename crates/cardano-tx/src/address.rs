//! Cardano address utilities

/// Extract the payment verification key hash (hex) from a bech32 address.
///
/// Works for base and enterprise addresses whose payment credential is a
/// key hash; script-credential addresses are rejected.
pub fn payment_key_hash(address: &str) -> Result<String, AddressError> {
    let (hrp, data) =
        bech32::decode(address).map_err(|_| AddressError::InvalidAddress(address.to_string()))?;

    let hrp = hrp.to_string();
    if hrp != "addr" && hrp != "addr_test" {
        return Err(AddressError::InvalidAddress(address.to_string()));
    }

    // Header byte + 28-byte payment credential at minimum
    if data.len() < 29 {
        return Err(AddressError::InvalidAddress(address.to_string()));
    }

    // Address type is the high nibble; odd types carry a script payment part
    if (data[0] >> 4) & 0x01 != 0 {
        return Err(AddressError::ScriptPayment(address.to_string()));
    }

    Ok(hex::encode(&data[1..29]))
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid Cardano address: {0}")]
    InvalidAddress(String),

    #[error("Address payment credential is a script: {0}")]
    ScriptPayment(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bech32::{Bech32, Hrp};

    fn encode_addr(hrp: &str, header: u8, payment: [u8; 28], delegation: Option<[u8; 28]>) -> String {
        let mut data = vec![header];
        data.extend_from_slice(&payment);
        if let Some(stake) = delegation {
            data.extend_from_slice(&stake);
        }
        bech32::encode::<Bech32>(Hrp::parse(hrp).unwrap(), &data).unwrap()
    }

    #[test]
    fn test_base_address_key_hash() {
        let payment = [0x11u8; 28];
        let addr = encode_addr("addr_test", 0x00, payment, Some([0x22u8; 28]));
        assert_eq!(payment_key_hash(&addr).unwrap(), hex::encode(payment));
    }

    #[test]
    fn test_enterprise_address_key_hash() {
        let payment = [0x33u8; 28];
        let addr = encode_addr("addr", 0x61, payment, None);
        assert_eq!(payment_key_hash(&addr).unwrap(), hex::encode(payment));
    }

    #[test]
    fn test_script_payment_rejected() {
        let addr = encode_addr("addr_test", 0x10, [0x44u8; 28], Some([0x55u8; 28]));
        assert!(matches!(
            payment_key_hash(&addr),
            Err(AddressError::ScriptPayment(_))
        ));
    }

    #[test]
    fn test_wrong_hrp_rejected() {
        let addr = encode_addr("stake", 0xe0, [0x66u8; 28], None);
        assert!(matches!(
            payment_key_hash(&addr),
            Err(AddressError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_invalid_address() {
        assert!(payment_key_hash("not_an_address").is_err());
        assert!(payment_key_hash("").is_err());
    }
}
