//! Per-slot bid book, structural validators, and the explicit auction
//! round state machine.
//!
//! Reference: SPEC_FULL.md Section 4.1, 4.2, 4.10

pub mod book;
pub mod error;
pub mod round;
pub mod validators;

pub use book::AuctionBook;
pub use error::{AuctionError, AuctionResult};
pub use round::{HistoryEntry, RoundConfig, RoundEngine, RoundState, ViolationRecord};
pub use validators::{
    validate_bid_envelope_consistency, validate_bid_fields, validate_builder_bid,
    validate_payload_attestation_data, validate_payload_envelope, AlwaysValidVerifier, BlsVerifier,
};
