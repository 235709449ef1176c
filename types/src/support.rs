//! The three support choices a voter can express.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A voter's decision on a proposal.
///
/// The numeric encoding is fixed: it is what gets signed as `uint8 support`
/// in typed ballots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Support {
    Against = 0,
    For = 1,
    /// Counted toward quorum but not toward the outcome.
    Abstain = 2,
}

impl Support {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Support {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            other => Err(TypesError::InvalidSupport(other)),
        }
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Against => "against",
            Self::For => "for",
            Self::Abstain => "abstain",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_encoding() {
        assert_eq!(Support::Against.as_u8(), 0);
        assert_eq!(Support::For.as_u8(), 1);
        assert_eq!(Support::Abstain.as_u8(), 2);
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(Support::try_from(1), Ok(Support::For));
        assert_eq!(Support::try_from(3), Err(TypesError::InvalidSupport(3)));
    }
}
