//! Typed-data signature verification for ballots cast on a voter's behalf.

use crate::error::GovernanceError;
use ballot_crypto::{recover_signer, typed_data_digest, Domain, SignatureError, TypedStruct};
use ballot_types::Address;
use tracing::warn;

/// Verifies EIP-712 signatures against a fixed signing domain.
///
/// The verifier reports who actually signed; it never takes the claimed
/// signer as an input to recovery.
#[derive(Clone, Debug)]
pub struct SignatureVerifier {
    domain: Domain,
    separator: [u8; 32],
}

impl SignatureVerifier {
    pub fn new(domain: Domain) -> Self {
        let separator = domain.separator();
        Self { domain, separator }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn domain_separator(&self) -> [u8; 32] {
        self.separator
    }

    /// The digest a signer must sign for `message` under this domain.
    pub fn digest<T: TypedStruct>(&self, message: &T) -> [u8; 32] {
        typed_data_digest(&self.separator, &message.struct_hash())
    }

    /// Recover the signer of `message`.
    ///
    /// Structurally invalid signatures fail with `MalformedSignature`. A
    /// well-formed signature that recovers no key yields the zero address.
    pub fn verify<T: TypedStruct>(
        &self,
        message: &T,
        signature: &[u8],
    ) -> Result<Address, GovernanceError> {
        match recover_signer(&self.digest(message), signature) {
            Ok(signer) => Ok(signer),
            Err(SignatureError::Unrecoverable) => Ok(Address::ZERO),
            Err(e) => Err(GovernanceError::MalformedSignature(e.to_string())),
        }
    }

    /// Recover the signer and require it to be `claimed`.
    pub fn authenticate<T: TypedStruct>(
        &self,
        message: &T,
        signature: &[u8],
        claimed: &Address,
    ) -> Result<Address, GovernanceError> {
        let recovered = self.verify(message, signature)?;
        if recovered != *claimed {
            warn!(recovered = %recovered, claimed = %claimed, "signature does not match voter");
            return Err(GovernanceError::InvalidSigner {
                recovered,
                claimed: *claimed,
            });
        }
        Ok(recovered)
    }
}
