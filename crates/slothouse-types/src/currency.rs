//! Payment currency of an auction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ContractAddress;

/// Either the host's native currency or a specific fungible token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Currency {
    Native,
    Token(ContractAddress),
}

impl Currency {
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Token address, if this is a token currency.
    #[must_use]
    pub fn token(&self) -> Option<ContractAddress> {
        match self {
            Self::Native => None,
            Self::Token(addr) => Some(*addr),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "NATIVE"),
            Self::Token(addr) => write!(f, "TOKEN:{addr}"),
        }
    }
}
