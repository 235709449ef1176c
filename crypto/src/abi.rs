//! Contract ABI encoding, restricted to the types the governance core needs.
//!
//! Encoding covers static words (`uint256`, `uint8`, `address`, `bool`,
//! `bytes32`), dynamic `bytes`/`string`, and dynamic arrays of any of those.
//! Decoding covers top-level tuples of non-array types, which is enough for
//! vote parameters such as `(uint256, string)`.

use crate::error::AbiError;
use ballot_types::{Address, ProposalId};

const WORD: usize = 32;

/// A value to be ABI-encoded, or one that was decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Any unsigned integer up to 256 bits, as a big-endian word.
    Uint([u8; 32]),
    Address(Address),
    Bool(bool),
    FixedBytes([u8; 32]),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Token>),
}

impl Token {
    pub fn uint(value: u128) -> Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        Self::Uint(word)
    }

    pub fn proposal_id(id: &ProposalId) -> Self {
        Self::Uint(*id.as_bytes())
    }

    /// The value of a `Uint` token if it fits in 128 bits.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Self::Uint(word) if word[..16].iter().all(|b| *b == 0) => {
                let mut low = [0u8; 16];
                low.copy_from_slice(&word[16..]);
                Some(u128::from_be_bytes(low))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    fn is_dynamic(&self) -> bool {
        matches!(self, Self::Bytes(_) | Self::String(_) | Self::Array(_))
    }
}

/// The type of a top-level value to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Uint,
    Address,
    Bool,
    FixedBytes,
    Bytes,
    String,
}

impl ParamKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Uint => "uint256",
            Self::Address => "address",
            Self::Bool => "bool",
            Self::FixedBytes => "bytes32",
            Self::Bytes => "bytes",
            Self::String => "string",
        }
    }
}

/// Encode `tokens` as a tuple (`abi.encode(...)`).
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = WORD * tokens.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            encode_tail(token, &mut tail);
        } else {
            head.extend_from_slice(&static_word(token));
        }
    }
    head.extend_from_slice(&tail);
    head
}

fn static_word(token: &Token) -> [u8; 32] {
    match token {
        Token::Uint(word) | Token::FixedBytes(word) => *word,
        Token::Address(address) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(address.as_bytes());
            word
        }
        Token::Bool(flag) => {
            let mut word = [0u8; 32];
            word[31] = u8::from(*flag);
            word
        }
        // Dynamic tokens never reach here; `encode` routes them to the tail.
        Token::Bytes(_) | Token::String(_) | Token::Array(_) => [0u8; 32],
    }
}

fn encode_tail(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::Bytes(data) => encode_packed_bytes(data, out),
        Token::String(s) => encode_packed_bytes(s.as_bytes(), out),
        Token::Array(items) => {
            out.extend_from_slice(&usize_word(items.len()));
            out.extend_from_slice(&encode(items));
        }
        _ => out.extend_from_slice(&static_word(token)),
    }
}

fn encode_packed_bytes(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(data.len()));
    out.extend_from_slice(data);
    let padding = (WORD - data.len() % WORD) % WORD;
    out.extend(std::iter::repeat(0u8).take(padding));
}

fn usize_word(value: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Decode a tuple of `kinds` from `data` (`abi.decode(data, (...))`).
///
/// Trailing bytes beyond what the kinds reference are ignored.
pub fn decode(kinds: &[ParamKind], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let word = read_word(data, i * WORD)?;
            match kind {
                ParamKind::Uint => Ok(Token::Uint(word)),
                ParamKind::FixedBytes => Ok(Token::FixedBytes(word)),
                ParamKind::Address => {
                    if word[..12].iter().any(|b| *b != 0) {
                        return Err(AbiError::NonCanonical { kind: kind.name() });
                    }
                    let mut raw = [0u8; 20];
                    raw.copy_from_slice(&word[12..]);
                    Ok(Token::Address(Address::new(raw)))
                }
                ParamKind::Bool => match word_to_usize(&word) {
                    Ok(0) => Ok(Token::Bool(false)),
                    Ok(1) => Ok(Token::Bool(true)),
                    _ => Err(AbiError::NonCanonical { kind: kind.name() }),
                },
                ParamKind::Bytes => Ok(Token::Bytes(read_dynamic(data, &word)?.to_vec())),
                ParamKind::String => {
                    // Solidity strings are arbitrary bytes; invalid sequences become U+FFFD.
                    let raw = read_dynamic(data, &word)?;
                    Ok(Token::String(String::from_utf8_lossy(raw).into_owned()))
                }
            }
        })
        .collect()
}

fn read_word(data: &[u8], offset: usize) -> Result<[u8; 32], AbiError> {
    let end = offset.checked_add(WORD).ok_or_else(|| {
        AbiError::InvalidOffset(format!("offset {} overflows", offset))
    })?;
    let slice = data.get(offset..end).ok_or(AbiError::OutOfBounds {
        offset,
        need: WORD,
        have: data.len(),
    })?;
    let mut word = [0u8; 32];
    word.copy_from_slice(slice);
    Ok(word)
}

fn read_dynamic<'a>(data: &'a [u8], offset_word: &[u8; 32]) -> Result<&'a [u8], AbiError> {
    let offset = word_to_usize(offset_word)?;
    let len = word_to_usize(&read_word(data, offset)?)?;
    let start = offset + WORD;
    let end = start
        .checked_add(len)
        .ok_or_else(|| AbiError::InvalidOffset(format!("length {} overflows", len)))?;
    data.get(start..end).ok_or(AbiError::OutOfBounds {
        offset: start,
        need: len,
        have: data.len(),
    })
}

fn word_to_usize(word: &[u8; 32]) -> Result<usize, AbiError> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(AbiError::InvalidOffset(format!(
            "0x{}",
            word.iter().map(|b| format!("{:02x}", b)).collect::<String>()
        )));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| AbiError::InvalidOffset(u64::from_be_bytes(low).to_string()))
}
