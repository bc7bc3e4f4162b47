//! Error types for the auction book, validators, and round engine.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use thiserror::Error;

/// Errors surfaced by validators, the per-slot auction book, and the
/// auction round engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// A payload envelope argument was required but absent.
    #[error("payload is required")]
    NilPayload,

    /// Bid's `block_hash` field is the zero sentinel.
    #[error("bid block hash must be non-zero")]
    EmptyBlockHash,

    /// Bid's `parent_block_hash` field is the zero sentinel.
    #[error("bid parent block hash must be non-zero")]
    EmptyParentBlockHash,

    /// Payload envelope's `payload_root` field is the zero sentinel.
    #[error("payload root must be non-zero")]
    EmptyPayloadRoot,

    /// Payload envelope's `beacon_block_root` field is the zero sentinel.
    #[error("beacon block root must be non-zero")]
    EmptyBeaconRoot,

    /// Payload envelope's `state_root` field is the zero sentinel.
    #[error("state root must be non-zero")]
    EmptyStateRoot,

    /// Bid value is zero.
    #[error("bid value must be greater than zero")]
    ZeroBidValue,

    /// Bid or payload slot is zero.
    #[error("slot must be greater than zero")]
    ZeroSlot,

    /// A non-zero signature/pubkey pair failed to verify against `BidHash`.
    #[error("bid signature failed verification")]
    BlsInvalidSignature,

    /// Payload attestation carries a status code outside {0,1,2}.
    #[error("invalid payload status code: {0}")]
    InvalidPayloadStatus(u8),

    /// Bid and payload envelope disagree on slot.
    #[error("slot mismatch: bid slot {bid_slot}, payload slot {payload_slot}")]
    SlotMismatch { bid_slot: u64, payload_slot: u64 },

    /// Bid and payload envelope disagree on builder index.
    #[error("builder mismatch: bid builder {bid_builder}, payload builder {payload_builder}")]
    BuilderMismatch {
        bid_builder: u64,
        payload_builder: u64,
    },

    /// No bids have been submitted for the requested slot.
    #[error("no bids for slot {0}")]
    NoBidsForSlot(u64),

    /// The round has reached its configured bid capacity.
    #[error("auction round is full (capacity {0})")]
    RoundFull(usize),

    /// An operation required the round to be `Open` but it was not.
    #[error("round is not open")]
    NotOpen,

    /// An operation required the round to be `BiddingClosed` but it was not.
    #[error("round is not in bidding-closed state")]
    NotClosed,

    /// `FinalizeAuction` was called before a winner was selected.
    #[error("winner has not been selected yet")]
    WinnerNotSet,

    /// The round has already been finalized.
    #[error("round is already finalized")]
    AlreadyFinalized,

    /// `SubmitBid` targeted a slot different from the round's opening slot.
    #[error("bid slot {bid_slot} does not match round slot {round_slot}")]
    RoundSlotMismatch { bid_slot: u64, round_slot: u64 },

    /// No round has been opened yet.
    #[error("no auction round is open")]
    NoRoundOpen,
}

/// Result alias for auction-engine operations.
pub type AuctionResult<T> = Result<T, AuctionError>;
