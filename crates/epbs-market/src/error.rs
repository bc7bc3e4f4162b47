//! Error types for builder registration, the market bid book, and scoring.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// `ValidateBid`/`SubmitBid` called with no bid.
    #[error("bid is required")]
    NilBid,

    /// Bid's `block_hash` field is the zero sentinel.
    #[error("bid block hash must be non-zero")]
    EmptyBlockHash,

    /// Bid's `parent_block_hash` field is the zero sentinel.
    #[error("bid parent block hash must be non-zero")]
    EmptyParentBlockHash,

    /// Bid value is zero.
    #[error("bid value must be greater than zero")]
    ZeroBidValue,

    /// Bid or payload slot is zero.
    #[error("slot must be greater than zero")]
    ZeroSlot,

    /// Bid value is below the configured reserve price.
    #[error("bid value {value} is below reserve price {reserve}")]
    BidBelowReserve { value: u64, reserve: u64 },

    /// The submitting builder is registered and currently banned.
    #[error("builder is banned")]
    BuilderBanned,

    /// The slot's auction already has a selected winner.
    #[error("slot {0} is already finalized")]
    SlotFinalized(u64),

    /// The slot's book is at capacity and the new bid does not beat the
    /// weakest stored bid.
    #[error("bid value {value} does not beat weakest stored bid {weakest}")]
    BidBelowWeakest { value: u64, weakest: u64 },

    /// No bids exist for the requested slot.
    #[error("no bids for slot {0}")]
    NoBidsForSlot(u64),

    /// No profile exists for the requested builder.
    #[error("builder is not registered")]
    BuilderNotFound,

    /// Config field outside its valid range.
    #[error("invalid market config: {0}")]
    InvalidConfig(String),
}

pub type MarketResult<T> = Result<T, MarketError>;
