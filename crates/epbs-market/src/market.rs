//! Builder registration, the market's own per-slot bid book, and winner
//! selection.
//!
//! Reference: SPEC_FULL.md Section 4.3 - Builder market & reputation

use std::collections::HashMap;

use epbs_types::{Address, BuilderBid, Gwei, Slot, ZERO_HASH};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MarketError, MarketResult};
use crate::types::{BuilderProfile, MarketConfig};

#[cfg(feature = "metrics")]
use crate::metrics;

/// A bid submitted to the market, attributed to its submitting address
/// (distinct from the protocol-level `builder_index` carried on
/// [`BuilderBid`] itself).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketBid {
    pub address: Address,
    pub bid: BuilderBid,
}

struct SlotAuction {
    bids: Vec<MarketBid>,
    finalized: bool,
}

struct State {
    profiles: HashMap<Address, BuilderProfile>,
    slots: HashMap<Slot, SlotAuction>,
}

/// Builder registry, reputation tracker, and per-slot market auction.
pub struct Market {
    config: MarketConfig,
    state: RwLock<State>,
}

impl Market {
    pub fn new(config: MarketConfig) -> MarketResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(State {
                profiles: HashMap::new(),
                slots: HashMap::new(),
            }),
        })
    }

    /// Idempotent: returns the existing profile if `address` is already
    /// registered.
    pub fn register_builder(&self, address: Address) -> BuilderProfile {
        let mut state = self.state.write();
        let profile = state
            .profiles
            .entry(address)
            .or_insert_with(|| BuilderProfile::new(address));
        #[cfg(feature = "metrics")]
        metrics::BUILDERS_REGISTERED.inc();
        profile.clone()
    }

    /// Structural and eligibility checks; does not mutate state.
    pub fn validate_bid(&self, market_bid: Option<&MarketBid>) -> MarketResult<()> {
        let market_bid = market_bid.ok_or(MarketError::NilBid)?;
        let bid = &market_bid.bid;

        if bid.block_hash == ZERO_HASH {
            return Err(MarketError::EmptyBlockHash);
        }
        if bid.parent_block_hash == ZERO_HASH {
            return Err(MarketError::EmptyParentBlockHash);
        }
        if bid.value == 0 {
            return Err(MarketError::ZeroBidValue);
        }
        if bid.slot == 0 {
            return Err(MarketError::ZeroSlot);
        }
        if bid.value < self.config.reserve_price {
            return Err(MarketError::BidBelowReserve {
                value: bid.value,
                reserve: self.config.reserve_price,
            });
        }

        let state = self.state.read();
        if let Some(profile) = state.profiles.get(&market_bid.address) {
            if profile.banned {
                return Err(MarketError::BuilderBanned);
            }
        }

        Ok(())
    }

    /// Validates and inserts `market_bid` into its slot's book, applying
    /// the capacity-bounded weakest-replacement rule once full.
    pub fn submit_bid(&self, market_bid: MarketBid) -> MarketResult<()> {
        self.validate_bid(Some(&market_bid))?;

        let mut state = self.state.write();
        let slot = market_bid.bid.slot;
        let auction = state.slots.entry(slot).or_insert_with(|| SlotAuction {
            bids: Vec::new(),
            finalized: false,
        });

        if auction.finalized {
            return Err(MarketError::SlotFinalized(slot));
        }

        if auction.bids.len() >= self.config.max_bids_per_slot {
            let weakest = auction.bids.last().map(|b| b.bid.value).unwrap_or(0);
            if market_bid.bid.value <= weakest {
                return Err(MarketError::BidBelowWeakest {
                    value: market_bid.bid.value,
                    weakest,
                });
            }
            auction.bids.pop();
        }

        let position = auction
            .bids
            .iter()
            .position(|existing| existing.bid.value < market_bid.bid.value)
            .unwrap_or(auction.bids.len());
        auction.bids.insert(position, market_bid.clone());

        let profile = state
            .profiles
            .entry(market_bid.address)
            .or_insert_with(|| BuilderProfile::new(market_bid.address));
        profile.bids_submitted += 1;
        profile.last_active_slot = slot;

        #[cfg(feature = "metrics")]
        metrics::BIDS_SUBMITTED.inc();

        Ok(())
    }

    /// Vickrey (second-price) winner selection: highest bidder wins, the
    /// clearing price equals the second-highest value, or the reserve
    /// price with exactly one bid. Finalizes the slot.
    pub fn select_winner(&self, slot: Slot) -> MarketResult<(MarketBid, Gwei)> {
        let mut state = self.state.write();
        let auction = state
            .slots
            .get_mut(&slot)
            .ok_or(MarketError::NoBidsForSlot(slot))?;

        if auction.bids.is_empty() {
            return Err(MarketError::NoBidsForSlot(slot));
        }

        let winner = auction.bids[0].clone();
        let clearing_price = if auction.bids.len() >= 2 {
            auction.bids[1].bid.value
        } else {
            self.config.reserve_price
        };
        auction.finalized = true;

        if let Some(profile) = state.profiles.get_mut(&winner.address) {
            profile.wins += 1;
        }

        debug!(slot, clearing_price, "market auction winner selected");
        Ok((winner, clearing_price))
    }

    /// Records an on-time delivery: resets the builder's consecutive-miss
    /// streak.
    pub fn record_delivery(&self, address: Address) -> MarketResult<()> {
        let mut state = self.state.write();
        let profile = state
            .profiles
            .get_mut(&address)
            .ok_or(MarketError::BuilderNotFound)?;
        profile.deliveries += 1;
        profile.consecutive_misses = 0;
        Ok(())
    }

    /// Records a missed delivery, banning the builder once the streak
    /// reaches the configured ceiling.
    pub fn record_miss(&self, address: Address) -> MarketResult<()> {
        let mut state = self.state.write();
        let profile = state
            .profiles
            .get_mut(&address)
            .ok_or(MarketError::BuilderNotFound)?;
        profile.misses += 1;
        profile.consecutive_misses += 1;

        if profile.consecutive_misses >= self.config.max_consecutive_misses && !profile.banned {
            profile.banned = true;
            warn!(
                ?address,
                streak = profile.consecutive_misses,
                "builder banned after consecutive misses"
            );
            #[cfg(feature = "metrics")]
            metrics::BUILDERS_BANNED.inc();
        }
        Ok(())
    }

    /// Clears a builder's ban flag and resets its miss streak.
    pub fn unban_builder(&self, address: Address) -> MarketResult<()> {
        let mut state = self.state.write();
        let profile = state
            .profiles
            .get_mut(&address)
            .ok_or(MarketError::BuilderNotFound)?;
        profile.banned = false;
        profile.consecutive_misses = 0;
        Ok(())
    }

    /// Recomputes and stores a builder's composite score.
    ///
    /// Reference: SPEC_FULL.md Section 4.3 - `ScoreBuilder`
    pub fn score_builder(&self, address: Address) -> MarketResult<f64> {
        let mut state = self.state.write();
        let profile = state
            .profiles
            .get_mut(&address)
            .ok_or(MarketError::BuilderNotFound)?;

        if profile.wins == 0 {
            return Ok(profile.score);
        }

        let delivery_rate = profile.deliveries as f64 / profile.wins as f64;
        let penalty = if profile.consecutive_misses > 0 {
            self.config.miss_penalty * 1.5_f64.powi(profile.consecutive_misses as i32 - 1)
        } else {
            0.0
        };

        let score = self.config.score_decay * profile.score
            + (1.0 - self.config.score_decay) * 100.0 * delivery_rate
            - penalty;
        profile.score = score.clamp(0.0, 100.0);
        Ok(profile.score)
    }

    /// Defensive copy of a builder's profile.
    pub fn get_profile(&self, address: Address) -> Option<BuilderProfile> {
        self.state.read().profiles.get(&address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> epbs_types::Hash {
        let mut h = [0u8; 32];
        h[0] = byte;
        h
    }

    fn market_bid(address: Address, slot: u64, value: u64) -> MarketBid {
        MarketBid {
            address,
            bid: BuilderBid {
                parent_block_hash: hash(1),
                parent_block_root: hash(2),
                block_hash: hash(3),
                prev_randao: hash(4),
                fee_recipient: address,
                gas_limit: 30_000_000,
                builder_index: 1,
                slot,
                value,
                execution_payment: 0,
                blob_kzg_commitments: vec![],
                blob_kzg_commitments_root: [0u8; 32],
                builder_pubkey: epbs_types::BlsPubkey::zero(),
            },
        }
    }

    #[test]
    fn register_builder_is_idempotent() {
        let market = Market::new(MarketConfig::default()).unwrap();
        let a = market.register_builder([1u8; 20]);
        let b = market.register_builder([1u8; 20]);
        assert_eq!(a, b);
    }

    #[test]
    fn vickrey_clearing_price_is_second_highest() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.submit_bid(market_bid([1u8; 20], 10, 500)).unwrap();
        market.submit_bid(market_bid([2u8; 20], 10, 900)).unwrap();
        market.submit_bid(market_bid([3u8; 20], 10, 700)).unwrap();

        let (winner, clearing_price) = market.select_winner(10).unwrap();
        assert_eq!(winner.address, [2u8; 20]);
        assert_eq!(clearing_price, 700);
    }

    #[test]
    fn single_bid_clears_at_reserve_price() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.submit_bid(market_bid([1u8; 20], 10, 500)).unwrap();
        let (_, clearing_price) = market.select_winner(10).unwrap();
        assert_eq!(clearing_price, 1);
    }

    #[test]
    fn submission_after_finalization_fails() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.submit_bid(market_bid([1u8; 20], 10, 500)).unwrap();
        market.select_winner(10).unwrap();
        assert_eq!(
            market.submit_bid(market_bid([2u8; 20], 10, 900)),
            Err(MarketError::SlotFinalized(10))
        );
    }

    #[test]
    fn bans_after_consecutive_misses() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.register_builder([1u8; 20]);
        for _ in 0..3 {
            market.record_miss([1u8; 20]).unwrap();
        }
        let profile = market.get_profile([1u8; 20]).unwrap();
        assert!(profile.banned);
        assert_eq!(profile.consecutive_misses, 3);

        market.unban_builder([1u8; 20]).unwrap();
        let profile = market.get_profile([1u8; 20]).unwrap();
        assert!(!profile.banned);
        assert_eq!(profile.consecutive_misses, 0);
    }

    #[test]
    fn banned_builder_cannot_bid() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.register_builder([1u8; 20]);
        for _ in 0..3 {
            market.record_miss([1u8; 20]).unwrap();
        }
        assert_eq!(
            market.submit_bid(market_bid([1u8; 20], 10, 500)),
            Err(MarketError::BuilderBanned)
        );
    }

    #[test]
    fn weakest_replacement_rejects_non_beating_bid() {
        let market = Market::new(MarketConfig {
            max_bids_per_slot: 2,
            ..MarketConfig::default()
        })
        .unwrap();
        market.submit_bid(market_bid([1u8; 20], 10, 500)).unwrap();
        market.submit_bid(market_bid([2u8; 20], 10, 400)).unwrap();

        assert_eq!(
            market.submit_bid(market_bid([3u8; 20], 10, 300)),
            Err(MarketError::BidBelowWeakest {
                value: 300,
                weakest: 400
            })
        );

        market.submit_bid(market_bid([4u8; 20], 10, 600)).unwrap();
    }

    #[test]
    fn score_builder_without_wins_is_unchanged() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.register_builder([1u8; 20]);
        assert_eq!(market.score_builder([1u8; 20]).unwrap(), 50.0);
    }

    #[test]
    fn score_builder_applies_miss_penalty() {
        let market = Market::new(MarketConfig::default()).unwrap();
        market.submit_bid(market_bid([1u8; 20], 10, 500)).unwrap();
        market.select_winner(10).unwrap();
        market.record_miss([1u8; 20]).unwrap();

        let score = market.score_builder([1u8; 20]).unwrap();
        assert!(score < 50.0);
    }

    #[test]
    fn scenario_vickrey_three_way_clears_at_second_highest() {
        let market = Market::new(MarketConfig::default()).unwrap();
        let (a, b, c) = ([0xAAu8; 20], [0xBBu8; 20], [0xCCu8; 20]);
        market.submit_bid(market_bid(a, 100, 3_000)).unwrap();
        market.submit_bid(market_bid(b, 100, 7_000)).unwrap();
        market.submit_bid(market_bid(c, 100, 5_000)).unwrap();

        let (winner, clearing_price) = market.select_winner(100).unwrap();
        assert_eq!(winner.address, b);
        assert_eq!(clearing_price, 5_000);
    }
}
