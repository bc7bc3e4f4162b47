//! Error types for the collateral escrow engine.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// `Deposit` called with a zero amount.
    #[error("deposit amount must be greater than zero")]
    ZeroDeposit,

    /// `WithdrawBalance` called with a zero amount.
    #[error("withdraw amount must be greater than zero")]
    ZeroWithdraw,

    /// `SlashBuilder` called with a zero amount.
    #[error("slash amount must be greater than zero")]
    ZeroSlash,

    /// Available (or total, for slashing) balance is insufficient.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },

    /// `PlaceBid` targeted a slot that already has an escrowed entry.
    #[error("slot {0} already has an escrowed bid")]
    DuplicateBid(u64),

    /// No escrowed entry exists for the requested slot.
    #[error("no escrowed bid for slot {0}")]
    NoActiveBid(u64),

    /// The entry is not in the state the operation requires.
    #[error("escrowed bid for slot {0} is not pending")]
    NotPending(u64),

    /// `RevealPayload` called with no payload.
    #[error("payload is required")]
    NilPayload,

    /// Revealed payload's slot disagrees with the escrowed bid's slot.
    #[error("slot mismatch: expected {expected}, got {got}")]
    SlotMismatch { expected: u64, got: u64 },

    /// Revealed payload's builder index (or the caller-supplied builder
    /// id) disagrees with the escrowed bid's builder.
    #[error("builder mismatch: expected {expected}, got {got}")]
    BuilderMismatch { expected: u64, got: u64 },

    /// Revealed payload's `payload_root` disagrees with the bid's
    /// `block_hash`.
    #[error("payload root does not match committed block hash")]
    PayloadRootMismatch,

    /// `SettleBid` called on an entry that is already terminal.
    #[error("escrowed bid for slot {0} is already settled")]
    AlreadySettled(u64),

    /// Operation referenced a builder with no collateral account.
    #[error("builder has no collateral account")]
    UnknownBuilder,

    /// Config field outside its valid range.
    #[error("invalid escrow config: {0}")]
    InvalidConfig(String),
}

pub type EscrowResult<T> = Result<T, EscrowError>;
