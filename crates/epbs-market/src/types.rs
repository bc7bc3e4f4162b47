//! Configuration and profile types for the builder market.
//!
//! Reference: SPEC_FULL.md Section 4.3 - Builder market & reputation

use epbs_types::{Address, Gwei, Slot};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};

/// Tunable parameters for [`crate::market::Market`].
///
/// Reference: SPEC_FULL.md Section 6 - Default configuration values
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Minimum accepted bid value.
    pub reserve_price: Gwei,
    /// Capacity of a slot's bid book before the weakest-replacement rule
    /// applies.
    pub max_bids_per_slot: usize,
    /// Consecutive misses before a builder is automatically banned.
    pub max_consecutive_misses: u32,
    /// Exponential smoothing weight applied to the prior score in
    /// `ScoreBuilder`.
    pub score_decay: f64,
    /// Configured but not consumed by the literal `ScoreBuilder` formula;
    /// reserved for a future direct-reward variant. See DESIGN.md.
    pub delivery_bonus: f64,
    /// Base penalty subtracted per consecutive miss, scaled geometrically
    /// by streak length.
    pub miss_penalty: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            reserve_price: 1,
            max_bids_per_slot: 256,
            max_consecutive_misses: 3,
            score_decay: 0.95,
            delivery_bonus: 10.0,
            miss_penalty: 25.0,
        }
    }
}

impl MarketConfig {
    pub fn validate(&self) -> MarketResult<()> {
        if !(0.0..=1.0).contains(&self.score_decay) {
            return Err(MarketError::InvalidConfig(
                "score_decay must be in [0, 1]".into(),
            ));
        }
        if self.delivery_bonus < 0.0 {
            return Err(MarketError::InvalidConfig(
                "delivery_bonus must be non-negative".into(),
            ));
        }
        if self.miss_penalty < 0.0 {
            return Err(MarketError::InvalidConfig(
                "miss_penalty must be non-negative".into(),
            ));
        }
        if self.max_bids_per_slot == 0 {
            return Err(MarketError::InvalidConfig(
                "max_bids_per_slot must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// A registered builder's reputation and delivery record.
///
/// Reference: SPEC_FULL.md Section 3 - Builder profile (market view)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuilderProfile {
    pub address: Address,
    pub bids_submitted: u64,
    pub wins: u64,
    pub deliveries: u64,
    pub misses: u64,
    pub consecutive_misses: u32,
    pub score: f64,
    pub banned: bool,
    pub last_active_slot: Slot,
}

impl BuilderProfile {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            bids_submitted: 0,
            wins: 0,
            deliveries: 0,
            misses: 0,
            consecutive_misses: 0,
            score: 50.0,
            banned: false,
            last_active_slot: 0,
        }
    }
}
