//! Core identifiers and fixed-size byte primitives.
//!
//! Reference: SPEC_FULL.md Section 3 - Data Model

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

/// A 32-byte opaque hash. Equality is byte-wise; `[0u8; 32]` denotes "unset".
pub type Hash = [u8; 32];

/// A 20-byte execution-layer address. `[0u8; 20]` denotes "unset".
pub type Address = [u8; 20];

/// Unique identifier for a registered builder.
pub type BuilderIndex = u64;

/// Consensus slot number. `0` denotes "unset/invalid".
pub type Slot = u64;

/// Amount denominated in Gwei (1 Gwei = 10^9 Wei).
pub type Gwei = u64;

/// Number of Wei per Gwei.
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// The distinguished "unset" hash value.
pub const ZERO_HASH: Hash = [0u8; 32];

/// The distinguished "unset" address value.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Number of slots in a PTC committee.
pub const PTC_SIZE: usize = 512;

/// Maximum payload attestations per slot.
pub const MAX_PAYLOAD_ATTESTATIONS: usize = 4;

/// Maximum blob KZG commitments per block.
pub const MAX_BLOB_COMMITMENTS_PER_BLOCK: usize = 4096;

/// A 48-byte BLS12-381 public key. The all-zero value is a test-only sentinel
/// meaning "unsigned"; production callers must never accept it.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlsPubkey(#[serde_as(as = "Bytes")] pub [u8; 48]);

impl BlsPubkey {
    /// The all-zero sentinel value.
    pub const fn zero() -> Self {
        Self([0u8; 48])
    }

    /// True if this is the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 48]
    }
}

impl Default for BlsPubkey {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Debug for BlsPubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsPubkey(0x{})", hex_fmt(&self.0))
    }
}

/// A 96-byte BLS12-381 signature. The all-zero value is a test-only sentinel
/// meaning "unsigned"; production callers must never accept it.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlsSignature(#[serde_as(as = "Bytes")] pub [u8; 96]);

impl BlsSignature {
    /// The all-zero sentinel value.
    pub const fn zero() -> Self {
        Self([0u8; 96])
    }

    /// True if this is the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 96]
    }
}

impl Default for BlsSignature {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsSignature(0x{})", hex_fmt(&self.0))
    }
}

fn hex_fmt(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sentinels_round_trip() {
        assert!(BlsPubkey::zero().is_zero());
        assert!(BlsSignature::zero().is_zero());
        assert_eq!(BlsPubkey::default(), BlsPubkey::zero());
    }

    #[test]
    fn nonzero_key_is_not_zero() {
        let mut bytes = [0u8; 48];
        bytes[0] = 1;
        assert!(!BlsPubkey(bytes).is_zero());
    }
}
