//! Error types for MEV-burn accounting.
//!
//! Reference: SPEC_FULL.md Section 7 - Error handling design

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MevBurnError {
    /// `burn_fraction` outside `[0, 1]`.
    #[error("burn fraction must be in [0, 1], got {0}")]
    InvalidFraction(f64),

    /// `smoothing_factor` outside `(0, 1]`.
    #[error("smoothing factor must be in (0, 1], got {0}")]
    InvalidSmoothing(f64),

    /// `tolerance` outside `[0, 1]`.
    #[error("tolerance must be in [0, 1], got {0}")]
    InvalidTolerance(f64),

    /// `EstimateSmoothedBurn` called with no bid history.
    #[error("bid history must not be empty")]
    EmptyBidHistory,

    /// Claimed burn amount deviates from the computed reference by more
    /// than the configured tolerance.
    #[error("claimed burn {claimed} deviates from computed {computed} by more than tolerance")]
    BurnAmountMismatch { claimed: u64, computed: u64 },
}

pub type MevBurnResult<T> = Result<T, MevBurnError>;
