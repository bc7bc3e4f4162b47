//! MEV-burn split computation, EMA smoothing, and the per-epoch tracker.
//!
//! Reference: SPEC_FULL.md Section 4.8

pub mod compute;
pub mod error;
pub mod tracker;
pub mod types;

pub use compute::{compute_mev_burn, estimate_smoothed_burn, validate_burn_amount};
pub use error::{MevBurnError, MevBurnResult};
pub use tracker::{EpochStats, MevBurnTracker};
pub use types::{BurnSplit, MevBurnConfig};
