//! Error types for the slashing engine.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlashingError {
    /// Config field outside its valid range.
    #[error("invalid slashing config: {0}")]
    InvalidConfig(String),
}

pub type SlashingResult<T> = Result<T, SlashingError>;
