//! Per-slot bid book.
//!
//! Reference: SPEC_FULL.md Section 4.2 - Auction book (per-slot bid store)

use std::collections::HashMap;

use epbs_types::{Slot, SignedBuilderBid};
use parking_lot::RwLock;

use crate::error::{AuctionError, AuctionResult};
use crate::validators::{validate_builder_bid, BlsVerifier};

/// Ordered, per-slot store of signed bids.
///
/// Bids for a slot are kept in descending-value order; equal values
/// preserve insertion order. Readers never observe a partially-inserted
/// bid: all mutation happens under a single write-lock acquisition.
pub struct AuctionBook {
    slots: RwLock<HashMap<Slot, Vec<SignedBuilderBid>>>,
}

impl AuctionBook {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Validates and inserts `signed` into its slot's ordered list.
    /// Invalid bids do not change any state.
    pub fn submit_bid(&self, signed: SignedBuilderBid, verifier: &dyn BlsVerifier) -> AuctionResult<()> {
        validate_builder_bid(&signed, verifier)?;

        let mut slots = self.slots.write();
        let bids = slots.entry(signed.message.slot).or_default();

        let position = bids
            .iter()
            .position(|existing| existing.message.value < signed.message.value)
            .unwrap_or(bids.len());
        bids.insert(position, signed);

        Ok(())
    }

    /// Returns the highest-ordered bid for `slot`.
    pub fn get_winning_bid(&self, slot: Slot) -> AuctionResult<SignedBuilderBid> {
        self.slots
            .read()
            .get(&slot)
            .and_then(|bids| bids.first().cloned())
            .ok_or(AuctionError::NoBidsForSlot(slot))
    }

    /// Returns a defensive snapshot of all bids for `slot`, in book order.
    pub fn get_bids_for_slot(&self, slot: Slot) -> Vec<SignedBuilderBid> {
        self.slots
            .read()
            .get(&slot)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of bids currently stored for `slot`.
    pub fn bid_count(&self, slot: Slot) -> usize {
        self.slots.read().get(&slot).map(Vec::len).unwrap_or(0)
    }

    /// Drops all bids for `slot`.
    pub fn prune_slot(&self, slot: Slot) {
        self.slots.write().remove(&slot);
    }

    /// Drops all bids for every slot strictly before `slot`.
    pub fn prune_before(&self, slot: Slot) {
        self.slots.write().retain(|&s, _| s >= slot);
    }
}

impl Default for AuctionBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::AlwaysValidVerifier;
    use epbs_types::{BlsPubkey, BlsSignature, BuilderBid};

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
    fn empty_slot_has_no_winning_bid() {
        let book = AuctionBook::new();
        assert_eq!(book.get_winning_bid(1), Err(AuctionError::NoBidsForSlot(1)));
    }

    #[test]
    fn orders_bids_descending_by_value() {
        let book = AuctionBook::new();
        book.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        book.submit_bid(bid(10, 2, 300), &AlwaysValidVerifier).unwrap();
        book.submit_bid(bid(10, 3, 200), &AlwaysValidVerifier).unwrap();

        let bids = book.get_bids_for_slot(10);
        let values: Vec<u64> = bids.iter().map(|b| b.message.value).collect();
        assert_eq!(values, vec![300, 200, 100]);
        assert_eq!(book.get_winning_bid(10).unwrap().message.value, 300);
    }

    #[test]
    fn ties_preserve_insertion_order() {
        let book = AuctionBook::new();
        book.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        book.submit_bid(bid(10, 2, 100), &AlwaysValidVerifier).unwrap();
        book.submit_bid(bid(10, 3, 100), &AlwaysValidVerifier).unwrap();

        let bids = book.get_bids_for_slot(10);
        let builders: Vec<u64> = bids.iter().map(|b| b.message.builder_index).collect();
        assert_eq!(builders, vec![1, 2, 3]);
    }

    #[test]
    fn invalid_bid_does_not_change_state() {
        let book = AuctionBook::new();
        let mut invalid = bid(10, 1, 0);
        invalid.message.value = 0;
        assert!(book.submit_bid(invalid, &AlwaysValidVerifier).is_err());
        assert_eq!(book.bid_count(10), 0);
    }

    #[test]
    fn prune_before_drops_older_slots_only() {
        let book = AuctionBook::new();
        book.submit_bid(bid(5, 1, 100), &AlwaysValidVerifier).unwrap();
        book.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        book.prune_before(10);
        assert_eq!(book.bid_count(5), 0);
        assert_eq!(book.bid_count(10), 1);
    }

    #[test]
    fn defensive_snapshot_does_not_affect_internal_state() {
        let book = AuctionBook::new();
        book.submit_bid(bid(10, 1, 100), &AlwaysValidVerifier).unwrap();
        let mut snapshot = book.get_bids_for_slot(10);
        snapshot.clear();
        assert_eq!(book.bid_count(10), 1);
    }
}
