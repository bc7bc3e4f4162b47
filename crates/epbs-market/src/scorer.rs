//! Composite bid scoring and deterministic tie-breaking.
//!
//! Reference: SPEC_FULL.md Section 4.4 - Bid scorer (for composite ranking)

use epbs_types::Hash;

use crate::error::{MarketError, MarketResult};

fn round12(value: f64) -> f64 {
    (value * 1e12).round() / 1e12
}

/// Weighted composite of normalized bid value, reputation, and delivery
/// reliability.
#[derive(Clone, Debug)]
pub struct BidScorer {
    max_value_for_norm: u64,
    w_value: f64,
    w_reputation: f64,
    w_reliability: f64,
}

impl BidScorer {
    /// Weights default to (0.60, 0.25, 0.15). Fails if
    /// `max_value_for_norm` is zero.
    pub fn new(max_value_for_norm: u64) -> MarketResult<Self> {
        Self::with_weights(max_value_for_norm, 0.60, 0.25, 0.15)
    }

    pub fn with_weights(
        max_value_for_norm: u64,
        w_value: f64,
        w_reputation: f64,
        w_reliability: f64,
    ) -> MarketResult<Self> {
        if max_value_for_norm == 0 {
            return Err(MarketError::InvalidConfig(
                "max_value_for_norm must be greater than zero".into(),
            ));
        }
        Ok(Self {
            max_value_for_norm,
            w_value,
            w_reputation,
            w_reliability,
        })
    }

    /// Composite score in `[0, 1]`, rounded to 12 decimal places.
    pub fn score(&self, bid_value: u64, reputation_score: f64, deliveries: u64, wins: u64) -> f64 {
        let norm_value = (bid_value as f64 / self.max_value_for_norm as f64).min(1.0);
        let norm_reputation = (reputation_score / 100.0).clamp(0.0, 1.0);
        let reliability = if wins == 0 {
            1.0
        } else {
            deliveries as f64 / wins as f64
        };

        round12(
            self.w_value * norm_value
                + self.w_reputation * norm_reputation
                + self.w_reliability * reliability,
        )
    }
}

/// [`BidScorer`] extended with normalized inclusion quality and a latency
/// penalty term, replacing the reliability term.
#[derive(Clone, Debug)]
pub struct BidScorerWithQuality {
    max_value_for_norm: u64,
    max_latency: f64,
    w_value: f64,
    w_reputation: f64,
    w_quality: f64,
    w_latency: f64,
}

impl BidScorerWithQuality {
    /// Weights default to (0.50, 0.20, 0.15, 0.15). Fails if
    /// `max_value_for_norm` or `max_latency` is zero.
    pub fn new(max_value_for_norm: u64, max_latency: f64) -> MarketResult<Self> {
        Self::with_weights(max_value_for_norm, max_latency, 0.50, 0.20, 0.15, 0.15)
    }

    pub fn with_weights(
        max_value_for_norm: u64,
        max_latency: f64,
        w_value: f64,
        w_reputation: f64,
        w_quality: f64,
        w_latency: f64,
    ) -> MarketResult<Self> {
        if max_value_for_norm == 0 {
            return Err(MarketError::InvalidConfig(
                "max_value_for_norm must be greater than zero".into(),
            ));
        }
        if max_latency <= 0.0 {
            return Err(MarketError::InvalidConfig(
                "max_latency must be greater than zero".into(),
            ));
        }
        Ok(Self {
            max_value_for_norm,
            max_latency,
            w_value,
            w_reputation,
            w_quality,
            w_latency,
        })
    }

    /// Composite score in `[0, 1]`, rounded to 12 decimal places.
    pub fn score(
        &self,
        bid_value: u64,
        reputation_score: f64,
        inclusion_quality: f64,
        latency: f64,
    ) -> f64 {
        let norm_value = (bid_value as f64 / self.max_value_for_norm as f64).min(1.0);
        let norm_reputation = (reputation_score / 100.0).clamp(0.0, 1.0);
        let norm_quality = inclusion_quality.clamp(0.0, 1.0);
        let latency_penalty = 1.0 - (latency / self.max_latency).min(1.0);

        round12(
            self.w_value * norm_value
                + self.w_reputation * norm_reputation
                + self.w_quality * norm_quality
                + self.w_latency * latency_penalty,
        )
    }
}

/// Picks the winner from a set of (bid hash, score) pairs: highest score
/// wins; ties break by lexicographically smaller bid hash.
pub fn select_best(scored: &[(Hash, f64)]) -> Option<Hash> {
    scored
        .iter()
        .max_by(|(hash_a, score_a), (hash_b, score_b)| {
            score_a
                .partial_cmp(score_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| hash_b.cmp(hash_a))
        })
        .map(|(hash, _)| *hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_max_value() {
        assert!(BidScorer::new(0).is_err());
    }

    #[test]
    fn score_clamps_value_above_max() {
        let scorer = BidScorer::new(1_000).unwrap();
        let capped = scorer.score(10_000, 100.0, 10, 10);
        let at_max = scorer.score(1_000, 100.0, 10, 10);
        assert_eq!(capped, at_max);
    }

    #[test]
    fn reliability_defaults_to_one_with_no_wins() {
        let scorer = BidScorer::new(1_000).unwrap();
        let score = scorer.score(0, 0.0, 0, 0);
        assert_eq!(score, 0.15);
    }

    #[test]
    fn quality_scorer_applies_latency_penalty() {
        let scorer = BidScorerWithQuality::new(1_000, 100.0).unwrap();
        let no_latency = scorer.score(500, 50.0, 1.0, 0.0);
        let full_latency = scorer.score(500, 50.0, 1.0, 100.0);
        assert!(no_latency > full_latency);
    }

    #[test]
    fn select_best_breaks_ties_by_smaller_hash() {
        let mut low = [0u8; 32];
        low[31] = 1;
        let mut high = [0u8; 32];
        high[31] = 2;

        let winner = select_best(&[(high, 0.5), (low, 0.5)]);
        assert_eq!(winner, Some(low));
    }

    #[test]
    fn select_best_prefers_higher_score() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let winner = select_best(&[(a, 0.4), (b, 0.9)]);
        assert_eq!(winner, Some(b));
    }
}
