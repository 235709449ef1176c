use proptest::prelude::*;

use ballot_crypto::{
    address_of, decode, encode, keccak256, keypair_from_seed, recover_signer, sign_digest,
    ParamKind, SignatureError, Token,
};

proptest! {
    /// Decoding arbitrary bytes never panics.
    #[test]
    fn decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&[ParamKind::Uint, ParamKind::String], &data);
        let _ = decode(&[ParamKind::Bytes, ParamKind::Address, ParamKind::Bool], &data);
    }

    /// Any (uint128, string) pair decodes back to the same values.
    #[test]
    fn uint_string_decodes(value in any::<u128>(), note in ".{0,80}") {
        let encoded = encode(&[Token::uint(value), Token::String(note.clone())]);
        prop_assert_eq!(encoded.len() % 32, 0);
        let tokens = decode(&[ParamKind::Uint, ParamKind::String], &encoded).unwrap();
        prop_assert_eq!(tokens[0].as_u128(), Some(value));
        prop_assert_eq!(tokens[1].as_str(), Some(note.as_str()));
    }

    /// Flipping any bit in the low 24 bytes of `s` yields a different signer.
    #[test]
    fn s_bit_flip_changes_signer(
        seed in 1u8..=0xfe,
        message in prop::collection::vec(any::<u8>(), 0..64),
        byte in 40usize..64,
        bit in 0u8..8,
    ) {
        let key = keypair_from_seed(&[seed; 32]).unwrap();
        let digest = keccak256(&message);
        let mut sig = sign_digest(&digest, &key).unwrap();
        sig[byte] ^= 1 << bit;
        match recover_signer(&digest, &sig) {
            Ok(recovered) => prop_assert_ne!(recovered, address_of(&key)),
            Err(e) => prop_assert_eq!(e, SignatureError::Unrecoverable),
        }
    }

    /// Any mutation of the signature bytes never recovers the original signer.
    #[test]
    fn any_bit_flip_never_recovers_signer(
        byte in 0usize..65,
        bit in 0u8..8,
    ) {
        let key = keypair_from_seed(&[9u8; 32]).unwrap();
        let digest = keccak256(b"fixed message");
        let mut sig = sign_digest(&digest, &key).unwrap();
        sig[byte] ^= 1 << bit;
        if let Ok(recovered) = recover_signer(&digest, &sig) {
            prop_assert_ne!(recovered, address_of(&key));
        }
    }
}
