//! MEV-burn split, EMA smoothing, and claimed-amount validation.
//!
//! Reference: SPEC_FULL.md Section 4.8 - MEV-burn accounting

use epbs_types::Gwei;

use crate::error::{MevBurnError, MevBurnResult};
use crate::types::{BurnSplit, MevBurnConfig};

/// Splits `value` into a burned portion and a proposer payment. Below the
/// configured minimum threshold, or with a zero burn fraction, the entire
/// value goes to the proposer.
pub fn compute_mev_burn(value: Gwei, config: &MevBurnConfig) -> BurnSplit {
    let burn = if value < config.min_threshold || config.burn_fraction == 0.0 {
        0
    } else {
        ((value as f64 * config.burn_fraction).floor() as Gwei).min(value)
    };
    BurnSplit {
        value,
        burn,
        proposer_payment: value - burn,
    }
}

/// Classical EMA over `recent_bids`, seeded with the first value. Returns
/// `(ema, burn_estimate)` where `burn_estimate = floor(ema * fraction)`.
pub fn estimate_smoothed_burn(recent_bids: &[Gwei], config: &MevBurnConfig) -> MevBurnResult<(f64, Gwei)> {
    let (first, rest) = recent_bids.split_first().ok_or(MevBurnError::EmptyBidHistory)?;

    let mut ema = *first as f64;
    for &bid in rest {
        ema = config.smoothing_factor * bid as f64 + (1.0 - config.smoothing_factor) * ema;
    }

    let burn_estimate = (ema * config.burn_fraction).floor() as Gwei;
    Ok((ema, burn_estimate))
}

/// Validates a claimed burn amount against the value it was computed from.
/// Passes if both the claimed and reference burns are zero; fails if the
/// reference is zero but the claim is non-zero; otherwise requires the
/// relative deviation to be within `config.tolerance`.
pub fn validate_burn_amount(claimed: Gwei, value: Gwei, config: &MevBurnConfig) -> MevBurnResult<()> {
    let computed = compute_mev_burn(value, config).burn;

    if computed == 0 && claimed == 0 {
        return Ok(());
    }
    if computed == 0 {
        return Err(MevBurnError::BurnAmountMismatch { claimed, computed });
    }

    let relative_diff = (claimed as f64 - computed as f64).abs() / computed as f64;
    if relative_diff <= config.tolerance {
        Ok(())
    } else {
        Err(MevBurnError::BurnAmountMismatch { claimed, computed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_split_invariant_holds() {
        let config = MevBurnConfig::default();
        for value in [0u64, 50, 100, 999, 1_000_000] {
            let split = compute_mev_burn(value, &config);
            assert_eq!(split.burn + split.proposer_payment, value);
        }
    }

    #[test]
    fn below_threshold_burns_nothing() {
        let config = MevBurnConfig::default();
        let split = compute_mev_burn(50, &config);
        assert_eq!(split.burn, 0);
        assert_eq!(split.proposer_payment, 50);
    }

    #[test]
    fn zero_fraction_burns_nothing() {
        let config = MevBurnConfig {
            burn_fraction: 0.0,
            ..MevBurnConfig::default()
        };
        let split = compute_mev_burn(10_000, &config);
        assert_eq!(split.burn, 0);
    }

    #[test]
    fn ema_seeds_with_first_value() {
        let config = MevBurnConfig::default();
        let (ema, _) = estimate_smoothed_burn(&[1_000], &config).unwrap();
        assert_eq!(ema, 1_000.0);
    }

    #[test]
    fn ema_rejects_empty_history() {
        let config = MevBurnConfig::default();
        assert_eq!(
            estimate_smoothed_burn(&[], &config),
            Err(MevBurnError::EmptyBidHistory)
        );
    }

    #[test]
    fn validate_burn_amount_passes_within_tolerance() {
        let config = MevBurnConfig::default();
        let computed = compute_mev_burn(10_000, &config).burn;
        assert!(validate_burn_amount(computed, 10_000, &config).is_ok());
    }

    #[test]
    fn validate_burn_amount_fails_outside_tolerance() {
        let config = MevBurnConfig::default();
        let computed = compute_mev_burn(10_000, &config).burn;
        assert!(validate_burn_amount(computed * 2, 10_000, &config).is_err());
    }

    #[test]
    fn validate_burn_amount_passes_when_both_zero() {
        let config = MevBurnConfig::default();
        assert!(validate_burn_amount(0, 10, &config).is_ok());
    }

    #[test]
    fn scenario_mev_burn_validation_within_and_outside_tolerance() {
        let config = MevBurnConfig::default();
        let split = compute_mev_burn(10_000, &config);
        assert_eq!(split.burn, 5_000);
        assert_eq!(split.proposer_payment, 5_000);

        let loose = MevBurnConfig {
            tolerance: 0.02,
            ..config
        };
        assert!(validate_burn_amount(5_050, 10_000, &loose).is_ok());

        let strict = MevBurnConfig {
            tolerance: 0.01,
            ..config
        };
        assert!(validate_burn_amount(6_000, 10_000, &strict).is_err());
    }
}
