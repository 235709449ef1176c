use thiserror::Error;

/// Failures while decoding ABI-encoded data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("data too short: need {need} bytes at offset {offset}, have {have}")]
    OutOfBounds {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("offset or length does not fit in memory: {0}")]
    InvalidOffset(String),

    #[error("value for {kind} is not canonically encoded")]
    NonCanonical { kind: &'static str },
}

/// Failures while producing or parsing a recoverable signature.
///
/// Everything except [`SignatureError::Unrecoverable`] means the signature bytes
/// are structurally unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("signature scalar is zero or out of range")]
    InvalidScalar,

    #[error("signature s value is in the upper half of the curve order")]
    HighS,

    #[error("no public key can be recovered from this signature")]
    Unrecoverable,

    #[error("invalid private key")]
    InvalidKey,

    #[error("signing failed")]
    SigningFailed,
}

impl SignatureError {
    /// Whether the bytes themselves are unusable, as opposed to well-formed but
    /// not matching any key.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Unrecoverable)
    }
}
