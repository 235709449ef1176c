//! Cryptographic primitives for the ballot governance core.
//!
//! - **keccak-256** for proposal identities, type hashes and address derivation
//! - **ABI encoding** (the subset needed for proposal hashing and vote parameters)
//! - **EIP-712** domain-separated typed-data digests
//! - **secp256k1** recoverable signatures, 65 bytes `r || s || v`

pub mod abi;
pub mod eip712;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use abi::{decode, encode, ParamKind, Token};
pub use eip712::{typed_data_digest, Domain, TypedStruct};
pub use error::{AbiError, SignatureError};
pub use hash::{keccak256, keccak256_multi};
pub use keys::{address_from_key, address_of, keypair_from_seed};
pub use sign::{recover_signer, sign_digest, SIGNATURE_LEN};
