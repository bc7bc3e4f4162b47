//! Per-epoch MEV-burn bookkeeping and lifetime EMA tracking.
//!
//! Reference: SPEC_FULL.md Section 4.8 - MEV-burn accounting (Tracker)

use std::collections::HashMap;

use epbs_types::Gwei;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::compute::compute_mev_burn;
use crate::error::MevBurnResult;
use crate::types::MevBurnConfig;

/// Cumulative burn/value totals for a single epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochStats {
    pub total_value: Gwei,
    pub total_burn: Gwei,
    pub count: u64,
}

struct State {
    ema: Option<f64>,
    lifetime_value: Gwei,
    lifetime_burn: Gwei,
    epochs: HashMap<u64, EpochStats>,
}

/// Maintains per-epoch burn statistics and a running EMA of bid values,
/// updated on every [`record_burn`](MevBurnTracker::record_burn).
pub struct MevBurnTracker {
    config: MevBurnConfig,
    state: RwLock<State>,
}

impl MevBurnTracker {
    pub fn new(config: MevBurnConfig) -> MevBurnResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(State {
                ema: None,
                lifetime_value: 0,
                lifetime_burn: 0,
                epochs: HashMap::new(),
            }),
        })
    }

    /// Computes the burn split for `value`, updates lifetime and per-epoch
    /// totals, and advances the EMA.
    pub fn record_burn(&self, epoch: u64, value: Gwei) -> Gwei {
        let split = compute_mev_burn(value, &self.config);

        let mut state = self.state.write();
        state.lifetime_value += value;
        state.lifetime_burn += split.burn;

        state.ema = Some(match state.ema {
            None => value as f64,
            Some(prior) => self.config.smoothing_factor * value as f64 + (1.0 - self.config.smoothing_factor) * prior,
        });

        let stats = state.epochs.entry(epoch).or_default();
        stats.total_value += value;
        stats.total_burn += split.burn;
        stats.count += 1;

        split.burn
    }

    pub fn current_ema(&self) -> Option<f64> {
        self.state.read().ema
    }

    pub fn lifetime_totals(&self) -> (Gwei, Gwei) {
        let state = self.state.read();
        (state.lifetime_value, state.lifetime_burn)
    }

    pub fn epoch_stats(&self, epoch: u64) -> Option<EpochStats> {
        self.state.read().epochs.get(&epoch).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_burn_accumulates_epoch_and_lifetime_totals() {
        let tracker = MevBurnTracker::new(MevBurnConfig::default()).unwrap();
        tracker.record_burn(1, 10_000);
        tracker.record_burn(1, 20_000);

        let stats = tracker.epoch_stats(1).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_value, 30_000);

        let (lifetime_value, _) = tracker.lifetime_totals();
        assert_eq!(lifetime_value, 30_000);
    }

    #[test]
    fn ema_seeds_on_first_record() {
        let tracker = MevBurnTracker::new(MevBurnConfig::default()).unwrap();
        tracker.record_burn(1, 5_000);
        assert_eq!(tracker.current_ema(), Some(5_000.0));
    }

    #[test]
    fn unknown_epoch_has_no_stats() {
        let tracker = MevBurnTracker::new(MevBurnConfig::default()).unwrap();
        assert!(tracker.epoch_stats(99).is_none());
    }
}
