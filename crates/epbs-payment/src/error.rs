//! Error types for the Wei-denominated payment processor.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use primitive_types::U256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// `Escrow` called with a zero bid value.
    #[error("bid value must be greater than zero")]
    ZeroBidValue,

    /// `Escrow` called for a slot that already has a record.
    #[error("slot {0} already has an escrow record")]
    DuplicateEscrow(u64),

    /// No escrow record exists for the requested slot.
    #[error("no escrow record for slot {0}")]
    NoEscrow(u64),

    /// Operation required the record to be `Escrowed` but it was not.
    #[error("escrow record for slot {0} is not in the escrowed state")]
    NotEscrowed(u64),

    /// Builder's Wei balance is below the amount the operation requires.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: U256, available: U256 },

    /// `ReleasePayment`'s delivered payload hash does not match the
    /// escrowed record.
    #[error("delivered payload hash does not match escrow record")]
    PayloadHashMismatch,

    /// `RefundEscrow` called before the settlement deadline.
    #[error("settlement deadline not reached: current slot {current}, required {required}")]
    SettlementDeadlineNotReached { current: u64, required: u64 },

    /// Config field outside its valid range.
    #[error("invalid payment config: {0}")]
    InvalidConfig(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;
