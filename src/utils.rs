//! Utility functions for record identifiers

use bech32::Bech32m;
use uuid7::uuid7;

pub const BOOKING_HRP: &str = "booking_";

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    encode_id(hrp, uuid7().as_bytes())
}

pub fn encode_id(hrp: &str, bytes: &[u8]) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, bytes)?;
    Ok(encode)
}

/// Recover the raw key bytes behind a bech32 id.
pub fn decode_id(id: &str) -> anyhow::Result<Vec<u8>> {
    let (_hrp, bytes) = bech32::decode(id)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_recovers_encoded_bytes() {
        let key = uuid7();
        let id = encode_id(BOOKING_HRP, key.as_bytes()).unwrap();

        assert!(id.starts_with("booking_1"));
        assert_eq!(decode_id(&id).unwrap(), key.as_bytes().to_vec());
    }

    #[test]
    fn rejects_empty_hrp_and_garbage() {
        assert!(new_uuid_to_bech32("").is_err());
        assert!(decode_id("not an id").is_err());
    }

    #[test]
    fn generates_unique_ids() {
        let id1 = new_uuid_to_bech32(BOOKING_HRP).unwrap();
        let id2 = new_uuid_to_bech32(BOOKING_HRP).unwrap();

        assert_ne!(id1, id2);
    }
}
