//! Explicit auction round state machine.
//!
//! Reference: SPEC_FULL.md Section 4.10 - Auction round engine

use std::collections::VecDeque;

use epbs_types::{BlsPubkey, Gwei, Slot, SignedBuilderBid};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuctionError, AuctionResult};
use crate::validators::{validate_builder_bid, BlsVerifier};

/// `RoundEngine` configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Maximum bids accepted into a single round before `SubmitBid` fails
    /// with [`AuctionError::RoundFull`].
    pub max_bids: usize,
    /// Capacity of the finalized-round history ring.
    pub history_capacity: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_bids: 256,
            history_capacity: 1024,
        }
    }
}

/// Explicit round lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Open,
    BiddingClosed,
    WinnerSelected,
    Finalized,
}

#[derive(Clone, Debug)]
struct Round {
    slot: Slot,
    state: RoundState,
    bids: Vec<SignedBuilderBid>,
    winning_bid: Option<SignedBuilderBid>,
}

/// An archived, finalized round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub slot: Slot,
    pub winning_bid: Option<SignedBuilderBid>,
    pub payload_delivered: bool,
}

/// A recorded delivery violation against a finalized round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub builder_pubkey: BlsPubkey,
    pub slot: Slot,
    pub bid_value: Gwei,
}

struct State {
    current: Option<Round>,
    history: VecDeque<HistoryEntry>,
    violations: VecDeque<ViolationRecord>,
}

/// Drives the single-round `Open -> BiddingClosed -> WinnerSelected ->
/// Finalized` state machine. Only one non-finalized round may exist at a
/// time.
pub struct RoundEngine {
    config: RoundConfig,
    state: RwLock<State>,
}

impl RoundEngine {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            config,
            state: RwLock::new(State {
                current: None,
                history: VecDeque::new(),
                violations: VecDeque::new(),
            }),
        }
    }

    /// Opens a new round for `slot`. Fails if a round is already in
    /// progress (i.e. not yet finalized out).
    pub fn open_auction(&self, slot: Slot) -> AuctionResult<()> {
        let mut state = self.state.write();
        if state.current.is_some() {
            return Err(AuctionError::NotOpen);
        }
        state.current = Some(Round {
            slot,
            state: RoundState::Open,
            bids: Vec::new(),
            winning_bid: None,
        });
        Ok(())
    }

    /// Submits a bid into the currently open round.
    pub fn submit_bid(&self, signed: SignedBuilderBid, verifier: &dyn BlsVerifier) -> AuctionResult<()> {
        validate_builder_bid(&signed, verifier)?;

        let mut state = self.state.write();
        let round = state.current.as_mut().ok_or(AuctionError::NoRoundOpen)?;

        if round.state != RoundState::Open {
            return Err(AuctionError::NotOpen);
        }
        if signed.message.slot != round.slot {
            return Err(AuctionError::RoundSlotMismatch {
                bid_slot: signed.message.slot,
                round_slot: round.slot,
            });
        }
        if round.bids.len() >= self.config.max_bids {
            return Err(AuctionError::RoundFull(self.config.max_bids));
        }

        let position = round
            .bids
            .iter()
            .position(|existing| existing.message.value < signed.message.value)
            .unwrap_or(round.bids.len());
        round.bids.insert(position, signed);

        Ok(())
    }

    /// Closes bidding: `Open -> BiddingClosed`.
    pub fn close_bidding(&self) -> AuctionResult<()> {
        let mut state = self.state.write();
        let round = state.current.as_mut().ok_or(AuctionError::NoRoundOpen)?;
        if round.state != RoundState::Open {
            return Err(AuctionError::NotOpen);
        }
        round.state = RoundState::BiddingClosed;
        Ok(())
    }

    /// Selects the highest-value bid as winner: `BiddingClosed ->
    /// WinnerSelected`. Ties break by earliest insertion, which the
    /// descending-insert order already preserves.
    pub fn select_winner(&self) -> AuctionResult<SignedBuilderBid> {
        let mut state = self.state.write();
        let round = state.current.as_mut().ok_or(AuctionError::NoRoundOpen)?;
        if round.state != RoundState::BiddingClosed {
            return Err(AuctionError::NotClosed);
        }
        let winner = round
            .bids
            .first()
            .cloned()
            .ok_or(AuctionError::NoBidsForSlot(round.slot))?;
        round.winning_bid = Some(winner.clone());
        round.state = RoundState::WinnerSelected;
        Ok(winner)
    }

    /// Finalizes the round: `WinnerSelected -> Finalized`, archiving into
    /// the bounded history ring and reopening the engine for a new round.
    pub fn finalize_auction(&self) -> AuctionResult<()> {
        let mut state = self.state.write();
        {
            let round = state.current.as_ref().ok_or(AuctionError::NoRoundOpen)?;
            if round.state != RoundState::WinnerSelected {
                return Err(AuctionError::WinnerNotSet);
            }
        }

        let round = state.current.take().expect("checked above");
        let entry = HistoryEntry {
            slot: round.slot,
            winning_bid: round.winning_bid,
            payload_delivered: true,
        };
        if state.history.len() == self.config.history_capacity {
            state.history.pop_front();
        }
        state.history.push_back(entry);
        Ok(())
    }

    /// Records a delivery violation, appending to the violation log and
    /// flipping the matching finalized round's `payload_delivered` flag to
    /// false.
    pub fn record_violation(&self, builder_pubkey: BlsPubkey, slot: Slot, bid_value: Gwei) {
        let mut state = self.state.write();

        if let Some(entry) = state.history.iter_mut().rev().find(|e| e.slot == slot) {
            entry.payload_delivered = false;
        } else {
            warn!(slot, "recorded violation for slot with no archived round");
        }

        if state.violations.len() == self.config.history_capacity {
            state.violations.pop_front();
        }
        state.violations.push_back(ViolationRecord {
            builder_pubkey,
            slot,
            bid_value,
        });
    }

    /// Current round state, if a round is open.
    pub fn current_state(&self) -> Option<RoundState> {
        self.state.read().current.as_ref().map(|r| r.state)
    }

    /// Defensive snapshot of the finalized-round history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().history.iter().cloned().collect()
    }

    /// Defensive snapshot of the violation log, oldest first.
    pub fn violations(&self) -> Vec<ViolationRecord> {
        self.state.read().violations.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::AlwaysValidVerifier;
    use epbs_types::{BlsSignature, BuilderBid};

    fn hash(byte: u8) -> epbs_types::Hash {
        let mut h = [0u8; 32];
        h[0] = byte;
        h
    }

    fn bid(slot: u64, builder_index: u64, value: u64) -> SignedBuilderBid {
        SignedBuilderBid::new(
            BuilderBid {
                parent_block_hash: hash(1),
                parent_block_root: hash(2),
                block_hash: hash(builder_index as u8 + 10),
                prev_randao: hash(4),
                fee_recipient: [0xAB; 20],
                gas_limit: 30_000_000,
                builder_index,
                slot,
                value,
                execution_payment: 0,
                blob_kzg_commitments: vec![],
                blob_kzg_commitments_root: [0u8; 32],
                builder_pubkey: BlsPubkey::zero(),
            },
            BlsSignature::zero(),
        )
    }

    #[test]
    fn full_lifecycle_selects_highest_bid() {
        let engine = RoundEngine::new(RoundConfig::default());
        engine.open_auction(10).unwrap();
        engine.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        engine.submit_bid(bid(10, 2, 300), &AlwaysValidVerifier).unwrap();
        engine.close_bidding().unwrap();

        let winner = engine.select_winner().unwrap();
        assert_eq!(winner.message.builder_index, 2);

        engine.finalize_auction().unwrap();
        assert_eq!(engine.current_state(), None);

        let history = engine.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].slot, 10);
        assert!(history[0].payload_delivered);
    }

    #[test]
    fn invalid_transitions_fail() {
        let engine = RoundEngine::new(RoundConfig::default());
        assert_eq!(engine.close_bidding(), Err(AuctionError::NoRoundOpen));

        engine.open_auction(10).unwrap();
        assert_eq!(engine.select_winner().unwrap_err(), AuctionError::NotClosed);
    }

    #[test]
    fn round_full_rejects_excess_bids() {
        let engine = RoundEngine::new(RoundConfig {
            max_bids: 1,
            history_capacity: 1024,
        });
        engine.open_auction(10).unwrap();
        engine.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        assert_eq!(
            engine.submit_bid(bid(10, 2, 200), &AlwaysValidVerifier),
            Err(AuctionError::RoundFull(1))
        );
    }

    #[test]
    fn submit_bid_rejects_slot_mismatch() {
        let engine = RoundEngine::new(RoundConfig::default());
        engine.open_auction(10).unwrap();
        assert_eq!(
            engine.submit_bid(bid(11, 1, 100), &AlwaysValidVerifier),
            Err(AuctionError::RoundSlotMismatch {
                bid_slot: 11,
                round_slot: 10
            })
        );
    }

    #[test]
    fn record_violation_flips_history_flag() {
        let engine = RoundEngine::new(RoundConfig::default());
        engine.open_auction(10).unwrap();
        engine.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        engine.close_bidding().unwrap();
        engine.select_winner().unwrap();
        engine.finalize_auction().unwrap();

        engine.record_violation(BlsPubkey::zero(), 10, 100);

        let history = engine.history();
        assert!(!history[0].payload_delivered);
        assert_eq!(engine.violations().len(), 1);
    }
}
