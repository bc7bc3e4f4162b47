//! Configuration and result types for MEV-burn accounting.
//!
//! Reference: SPEC_FULL.md Section 4.8 - MEV-burn accounting

use epbs_types::Gwei;
use serde::{Deserialize, Serialize};

use crate::error::{MevBurnError, MevBurnResult};

/// Tunable parameters for MEV-burn computation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MevBurnConfig {
    pub burn_fraction: f64,
    pub smoothing_factor: f64,
    pub min_threshold: Gwei,
    pub tolerance: f64,
}

impl Default for MevBurnConfig {
    fn default() -> Self {
        Self {
            burn_fraction: 0.50,
            smoothing_factor: 0.10,
            min_threshold: 100,
            tolerance: 0.01,
        }
    }
}

impl MevBurnConfig {
    pub fn validate(&self) -> MevBurnResult<()> {
        if !(0.0..=1.0).contains(&self.burn_fraction) {
            return Err(MevBurnError::InvalidFraction(self.burn_fraction));
        }
        if !(0.0..=1.0).contains(&self.smoothing_factor) || self.smoothing_factor == 0.0 {
            return Err(MevBurnError::InvalidSmoothing(self.smoothing_factor));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(MevBurnError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// The outcome of splitting a winning bid's value into a burned portion
/// and a proposer payment. Invariant: `burn + proposer_payment == value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnSplit {
    pub value: Gwei,
    pub burn: Gwei,
    pub proposer_payment: Gwei,
}
