//! Error types for the commitment-reveal engine.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// `Commit` called for a (slot, builder index) pair already committed.
    #[error("duplicate commitment for slot {slot}, builder {builder_index}")]
    DuplicateCommitment { slot: u64, builder_index: u64 },

    /// No commitment exists for the requested (slot, builder index).
    #[error("no commitment for slot {slot}, builder {builder_index}")]
    NoCommitment { slot: u64, builder_index: u64 },

    /// `Reveal` called with no payload.
    #[error("payload is required")]
    NilPayload,

    /// The commitment was already revealed.
    #[error("commitment for slot {slot}, builder {builder_index} was already revealed")]
    AlreadyRevealed { slot: u64, builder_index: u64 },

    /// `currentSlot` is past the commitment's reveal-window deadline.
    #[error("reveal window expired for slot {slot}, builder {builder_index}: current slot {current_slot} > deadline {deadline_slot}")]
    RevealExpired {
        slot: u64,
        builder_index: u64,
        current_slot: u64,
        deadline_slot: u64,
    },

    /// Revealed payload's `payload_root` disagrees with the committed
    /// block root.
    #[error("commitment mismatch for slot {slot}, builder {builder_index}")]
    CommitmentMismatch { slot: u64, builder_index: u64 },

    /// Config field outside its valid range.
    #[error("invalid commitment config: {0}")]
    InvalidConfig(String),
}

pub type CommitmentResult<T> = Result<T, CommitmentError>;
