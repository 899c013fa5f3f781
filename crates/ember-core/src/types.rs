//! Core value types: addresses, amounts, timestamps.
//!
//! All monetary values are u128 base units (1 EMB/GILT = 10^18 units).
//! All times are u64 Unix seconds supplied by the hosting environment;
//! the core never reads a wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in base units.
pub type Amount = u128;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A 32-byte account address.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The zero address. Never owns a balance; used as a burn sink marker.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an Address from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address([1u8; 32]).is_zero());
    }

    #[test]
    fn display_is_lowercase_hex() {
        let addr = Address([0xab; 32]);
        assert_eq!(addr.to_string(), "ab".repeat(32));
    }

    #[test]
    fn round_trips_through_bytes() {
        let addr = Address::from_bytes([7u8; 32]);
        assert_eq!(Address::from(*addr.as_bytes()), addr);
    }
}
