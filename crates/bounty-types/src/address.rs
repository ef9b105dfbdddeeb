use serde::{Deserialize, Serialize};
use std::fmt;

/// A wallet address string uniquely identifying a participant.
///
/// Equality is exact string match. No normalization (case folding, checksum
/// re-formatting) is applied here; the address is compared exactly as the
/// upstream wallet supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WalletAddress {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

impl From<String> for WalletAddress {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
