//! Configuration and record types for the commitment-reveal engine.
//!
//! Reference: SPEC_FULL.md Section 4.6 - Commitment-reveal

use epbs_types::{Address, BuilderIndex, Gwei, Hash, Slot};
use serde::{Deserialize, Serialize};

use crate::error::CommitmentResult;

/// Allowed reveal interval, relative to a commitment's slot: `[slot, slot +
/// deadline_slots]` inclusive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RevealWindow {
    pub deadline_slots: Slot,
}

impl Default for RevealWindow {
    fn default() -> Self {
        Self { deadline_slots: 1 }
    }
}

/// Tunable parameters for [`crate::commitment::CommitmentEngine`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitmentConfig {
    pub reveal_window: RevealWindow,
    pub non_reveal_basis_points: u64,
    pub mismatch_basis_points: u64,
    pub penalty_ring_capacity: usize,
}

impl Default for CommitmentConfig {
    fn default() -> Self {
        Self {
            reveal_window: RevealWindow::default(),
            non_reveal_basis_points: 20_000,
            mismatch_basis_points: 30_000,
            penalty_ring_capacity: 1024,
        }
    }
}

impl CommitmentConfig {
    pub fn validate(&self) -> CommitmentResult<()> {
        Ok(())
    }
}

/// A builder's recorded commitment for a slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderCommitment {
    pub slot: Slot,
    pub builder_index: BuilderIndex,
    pub builder_address: Address,
    pub bid_amount: Gwei,
    pub commitment_hash: Hash,
    pub block_root: Hash,
    pub revealed: bool,
    pub revealed_at_slot: Option<Slot>,
}

/// The kind of reveal penalty recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyKind {
    NonReveal,
    Mismatch,
}

/// A penalty produced by a missed or mismatched reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRecord {
    pub slot: Slot,
    pub builder_index: BuilderIndex,
    pub builder_address: Address,
    pub kind: PenaltyKind,
    pub penalty: Gwei,
}
