//! secp256k1 keys and address derivation.

use crate::error::SignatureError;
use crate::hash::keccak256;
use ballot_types::Address;
use k256::ecdsa::{SigningKey, VerifyingKey};

/// Derive a signing key from a 32-byte secret (deterministic).
///
/// Fails if the secret is zero or not below the curve order.
pub fn keypair_from_seed(seed: &[u8; 32]) -> Result<SigningKey, SignatureError> {
    SigningKey::from_slice(seed).map_err(|_| SignatureError::InvalidKey)
}

/// The address of a public key: the last 20 bytes of the keccak-256 hash of
/// its uncompressed encoding (without the leading `0x04`).
pub fn address_from_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&hash[12..]);
    Address::new(raw)
}

/// The address controlled by a signing key.
pub fn address_of(key: &SigningKey) -> Address {
    address_from_key(key.verifying_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(last: u8) -> [u8; 32] {
        let mut s = [0u8; 32];
        s[31] = last;
        s
    }

    #[test]
    fn private_key_one_has_known_address() {
        let key = keypair_from_seed(&seed(1)).unwrap();
        assert_eq!(
            address_of(&key).to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn seed_is_deterministic() {
        let a = keypair_from_seed(&[42u8; 32]).unwrap();
        let b = keypair_from_seed(&[42u8; 32]).unwrap();
        assert_eq!(address_of(&a), address_of(&b));
    }

    #[test]
    fn different_seeds_produce_different_addresses() {
        let a = keypair_from_seed(&seed(1)).unwrap();
        let b = keypair_from_seed(&seed(2)).unwrap();
        assert_ne!(address_of(&a), address_of(&b));
    }

    #[test]
    fn zero_seed_rejected() {
        assert_eq!(
            keypair_from_seed(&[0u8; 32]).unwrap_err(),
            SignatureError::InvalidKey
        );
    }
}
