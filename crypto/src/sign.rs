//! Recoverable secp256k1 signatures over 32-byte digests.
//!
//! Wire format is 65 bytes: `r (32) || s (32) || v (1)` with `v` in `{27, 28}`.
//! Only low-S signatures are accepted (malleability protection).

use crate::error::SignatureError;
use crate::keys::address_from_key;
use ballot_types::Address;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::scalar::IsHigh;

pub const SIGNATURE_LEN: usize = 65;

const V_OFFSET: u8 = 27;

/// Sign a digest, returning the 65-byte recoverable signature.
pub fn sign_digest(digest: &[u8; 32], key: &SigningKey) -> Result<[u8; 65], SignatureError> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|_| SignatureError::SigningFailed)?;
    let mut out = [0u8; SIGNATURE_LEN];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = V_OFFSET + recovery_id.to_byte();
    Ok(out)
}

/// Recover the address that produced `signature` over `digest`.
///
/// The result is whoever actually signed; callers compare it against the
/// identity they were told to expect. A structurally valid signature that does
/// not correspond to any key yields [`SignatureError::Unrecoverable`].
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> Result<Address, SignatureError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength(signature.len()));
    }
    let v = signature[64];
    let recovery_id = v
        .checked_sub(V_OFFSET)
        .filter(|id| *id <= 1)
        .and_then(RecoveryId::from_byte)
        .ok_or(SignatureError::InvalidRecoveryId(v))?;
    let sig = Signature::from_slice(&signature[..64]).map_err(|_| SignatureError::InvalidScalar)?;
    if bool::from(sig.s().is_high()) {
        return Err(SignatureError::HighS);
    }
    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| SignatureError::Unrecoverable)?;
    Ok(address_from_key(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;
    use crate::keys::{address_of, keypair_from_seed};

    // secp256k1 group order minus one: a valid but high s value.
    const HIGH_S: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140";

    fn key() -> SigningKey {
        keypair_from_seed(&[7u8; 32]).unwrap()
    }

    #[test]
    fn sign_and_recover() {
        let key = key();
        let digest = keccak256(b"ballot digest");
        let sig = sign_digest(&digest, &key).unwrap();
        assert!(sig[64] == 27 || sig[64] == 28);
        assert_eq!(recover_signer(&digest, &sig).unwrap(), address_of(&key));
    }

    #[test]
    fn signatures_are_deterministic() {
        let digest = keccak256(b"same");
        assert_eq!(
            sign_digest(&digest, &key()).unwrap(),
            sign_digest(&digest, &key()).unwrap()
        );
    }

    #[test]
    fn wrong_digest_recovers_someone_else() {
        let key = key();
        let sig = sign_digest(&keccak256(b"signed"), &key).unwrap();
        match recover_signer(&keccak256(b"presented"), &sig) {
            Ok(addr) => assert_ne!(addr, address_of(&key)),
            Err(e) => assert_eq!(e, SignatureError::Unrecoverable),
        }
    }

    #[test]
    fn wrong_length_is_malformed() {
        let err = recover_signer(&[0u8; 32], &[0u8; 64]).unwrap_err();
        assert_eq!(err, SignatureError::InvalidLength(64));
        assert!(err.is_malformed());
    }

    #[test]
    fn bad_recovery_id_is_malformed() {
        let digest = keccak256(b"v");
        let mut sig = sign_digest(&digest, &key()).unwrap();
        for v in [0u8, 1, 26, 29, 255] {
            sig[64] = v;
            assert_eq!(
                recover_signer(&digest, &sig).unwrap_err(),
                SignatureError::InvalidRecoveryId(v)
            );
        }
    }

    #[test]
    fn zero_r_is_malformed() {
        let digest = keccak256(b"r");
        let mut sig = sign_digest(&digest, &key()).unwrap();
        sig[..32].fill(0);
        assert_eq!(
            recover_signer(&digest, &sig).unwrap_err(),
            SignatureError::InvalidScalar
        );
    }

    #[test]
    fn high_s_is_malformed() {
        let digest = keccak256(b"s");
        let mut sig = sign_digest(&digest, &key()).unwrap();
        sig[32..64].copy_from_slice(&hex::decode(HIGH_S).unwrap());
        assert_eq!(recover_signer(&digest, &sig).unwrap_err(), SignatureError::HighS);
    }

    #[test]
    fn unrecoverable_is_not_malformed() {
        assert!(!SignatureError::Unrecoverable.is_malformed());
    }
}
