//! Commit-reveal protocol for builder block-root commitments.
//!
//! Reference: SPEC_FULL.md Section 4.6

pub mod commitment;
pub mod error;
pub mod types;

pub use commitment::CommitmentEngine;
pub use error::{CommitmentError, CommitmentResult};
pub use types::{BuilderCommitment, CommitmentConfig, PenaltyKind, PenaltyRecord, RevealWindow};
