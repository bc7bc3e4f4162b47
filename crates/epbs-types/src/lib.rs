//! # ePBS Shared Types
//!
//! Primitives and wire entities shared by the auction, market, escrow,
//! commitment-reveal, slashing, MEV-burn, and payment engines.
//!
//! Reference: SPEC_FULL.md Section 3 - Data Model

pub mod entities;
pub mod primitives;

pub use entities::{
    BuilderBid, PayloadAttestationData, PayloadEnvelope, PayloadStatus, SignedBuilderBid,
    SignedPayloadEnvelope,
};
pub use primitives::{
    Address, BlsPubkey, BlsSignature, BuilderIndex, Gwei, Hash, Slot, MAX_BLOB_COMMITMENTS_PER_BLOCK,
    MAX_PAYLOAD_ATTESTATIONS, PTC_SIZE, WEI_PER_GWEI, ZERO_ADDRESS, ZERO_HASH,
};
