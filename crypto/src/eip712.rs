//! EIP-712 typed structured data hashing.
//!
//! A digest binds a struct to a [`Domain`] so that a signature produced for one
//! deployment (name, version, chain, contract) cannot be replayed against another.

use crate::abi::{encode, Token};
use crate::hash::{keccak256, keccak256_multi};
use ballot_types::Address;

/// The canonical domain type string.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// The signing domain of a deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Domain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn type_hash() -> [u8; 32] {
        keccak256(DOMAIN_TYPE.as_bytes())
    }

    /// `keccak256(abi.encode(typeHash, keccak(name), keccak(version), chainId, verifyingContract))`
    pub fn separator(&self) -> [u8; 32] {
        keccak256(&encode(&[
            Token::FixedBytes(Self::type_hash()),
            Token::FixedBytes(keccak256(self.name.as_bytes())),
            Token::FixedBytes(keccak256(self.version.as_bytes())),
            Token::uint(u128::from(self.chain_id)),
            Token::Address(self.verifying_contract),
        ]))
    }
}

/// A struct that can be hashed as EIP-712 typed data.
pub trait TypedStruct {
    /// The struct's type string, e.g. `Ballot(uint256 proposalId,uint8 support)`.
    const TYPE: &'static str;

    /// The encoded member values, in declaration order. Dynamic members
    /// (`string`, `bytes`) must already be replaced by their keccak-256 hash.
    fn encode_members(&self) -> Vec<Token>;

    fn type_hash() -> [u8; 32] {
        keccak256(Self::TYPE.as_bytes())
    }

    /// `keccak256(typeHash || encodeData(s))`
    fn struct_hash(&self) -> [u8; 32] {
        let mut tokens = Vec::with_capacity(8);
        tokens.push(Token::FixedBytes(Self::type_hash()));
        tokens.extend(self.encode_members());
        keccak256(&encode(&tokens))
    }
}

/// `keccak256("\x19\x01" || domainSeparator || structHash)`
pub fn typed_data_digest(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    keccak256_multi(&[&[0x19, 0x01], domain_separator, struct_hash])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mail {
        contents: String,
    }

    impl TypedStruct for Mail {
        const TYPE: &'static str = "Mail(string contents)";

        fn encode_members(&self) -> Vec<Token> {
            vec![Token::FixedBytes(keccak256(self.contents.as_bytes()))]
        }
    }

    fn domain() -> Domain {
        Domain::new("Governor", "1", 1, Address::new([0xcc; 20]))
    }

    #[test]
    fn domain_type_hash_matches_standard() {
        assert_eq!(
            hex::encode(Domain::type_hash()),
            "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f"
        );
    }

    #[test]
    fn separator_depends_on_every_field() {
        let base = domain().separator();
        let mut other = domain();
        other.chain_id = 5;
        assert_ne!(base, other.separator());
        let mut other = domain();
        other.version = "2".into();
        assert_ne!(base, other.separator());
        let mut other = domain();
        other.verifying_contract = Address::ZERO;
        assert_ne!(base, other.separator());
        let mut other = domain();
        other.name = "Other".into();
        assert_ne!(base, other.separator());
    }

    #[test]
    fn struct_hash_prefixes_type_hash() {
        let mail = Mail {
            contents: "hello".into(),
        };
        let expected = keccak256_multi(&[&Mail::type_hash(), &keccak256(b"hello")]);
        assert_eq!(mail.struct_hash(), expected);
    }

    #[test]
    fn digest_binds_domain() {
        let mail = Mail {
            contents: "hello".into(),
        };
        let a = typed_data_digest(&domain().separator(), &mail.struct_hash());
        let mut other = domain();
        other.chain_id = 137;
        let b = typed_data_digest(&other.separator(), &mail.struct_hash());
        assert_ne!(a, b);
    }
}
