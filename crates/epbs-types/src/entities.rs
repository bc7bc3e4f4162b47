//! Wire entities shared across the auction, escrow, commitment, and slashing
//! engines.
//!
//! Reference: SPEC_FULL.md Section 3 - Data Model, Section 6 - External Interfaces

use serde::{Deserialize, Serialize};

use crate::primitives::{Address, BlsPubkey, BlsSignature, BuilderIndex, Gwei, Hash, Slot};

/// A builder's offer to construct the execution payload for a slot.
///
/// Reference: SPEC_FULL.md Section 3 - BuilderBid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderBid {
    pub parent_block_hash: Hash,
    pub parent_block_root: Hash,
    /// The committed block hash; this is what the builder must reveal a
    /// matching payload root for.
    pub block_hash: Hash,
    pub prev_randao: Hash,
    pub fee_recipient: Address,
    pub gas_limit: u64,
    pub builder_index: BuilderIndex,
    pub slot: Slot,
    /// Value offered to the proposer, in Gwei.
    pub value: Gwei,
    /// Additional execution-side payment amount, in Gwei.
    pub execution_payment: Gwei,
    pub blob_kzg_commitments: Vec<Hash>,
    pub blob_kzg_commitments_root: Hash,
    pub builder_pubkey: BlsPubkey,
}

impl BuilderBid {
    /// True iff the bid satisfies the structural well-formedness contract:
    /// block hash and parent block hash non-zero, value and slot positive.
    pub fn is_well_formed(&self) -> bool {
        self.block_hash != crate::primitives::ZERO_HASH
            && self.parent_block_hash != crate::primitives::ZERO_HASH
            && self.value > 0
            && self.slot > 0
    }
}

/// The signed wire form of a [`BuilderBid`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBuilderBid {
    pub message: BuilderBid,
    pub signature: BlsSignature,
}

impl SignedBuilderBid {
    pub fn new(message: BuilderBid, signature: BlsSignature) -> Self {
        Self { message, signature }
    }

    /// True if neither the pubkey nor signature is the zero sentinel, i.e.
    /// signature verification is expected to run.
    pub fn requires_signature_check(&self) -> bool {
        !self.message.builder_pubkey.is_zero() && !self.signature.is_zero()
    }
}

/// The revealed execution payload commitment for a slot.
///
/// Reference: SPEC_FULL.md Section 3 - PayloadEnvelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEnvelope {
    /// Must equal the winning bid's `block_hash`.
    pub payload_root: Hash,
    pub builder_index: BuilderIndex,
    pub beacon_block_root: Hash,
    pub slot: Slot,
    pub state_root: Hash,
    pub blob_kzg_commitments: Vec<Hash>,
}

impl PayloadEnvelope {
    /// True iff all three roots are non-zero and slot is positive.
    pub fn is_well_formed(&self) -> bool {
        self.payload_root != crate::primitives::ZERO_HASH
            && self.beacon_block_root != crate::primitives::ZERO_HASH
            && self.state_root != crate::primitives::ZERO_HASH
            && self.slot > 0
    }
}

/// The signed wire form of a [`PayloadEnvelope`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPayloadEnvelope {
    pub message: PayloadEnvelope,
    pub signature: BlsSignature,
}

/// Whether a builder's payload was observed present, absent, or withheld by
/// the payload-timeliness committee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PayloadStatus {
    Absent = 0,
    Present = 1,
    Withheld = 2,
}

impl PayloadStatus {
    /// Decode from the wire's raw `u8` status code.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Absent),
            1 => Some(Self::Present),
            2 => Some(Self::Withheld),
            _ => None,
        }
    }
}

/// A committee member's vote on payload presence for a slot.
///
/// Reference: SPEC_FULL.md Section 3 - PayloadAttestationData
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAttestationData {
    pub beacon_block_root: Hash,
    pub slot: Slot,
    pub payload_status: PayloadStatus,
}

impl PayloadAttestationData {
    pub fn is_well_formed(&self) -> bool {
        self.beacon_block_root != crate::primitives::ZERO_HASH && self.slot > 0
    }
}
