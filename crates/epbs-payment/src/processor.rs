//! Wei-denominated escrow, release, slashing, and refund operations.
//!
//! Reference: SPEC_FULL.md Section 4.9 - Payment processor (Wei-denominated)

use std::collections::{HashMap, VecDeque};

use epbs_crypto::basis_points_of;
use epbs_types::{Address, Gwei, Hash, Slot};
use parking_lot::RwLock;
use primitive_types::U256;
use tracing::warn;

use crate::error::{PaymentError, PaymentResult};
use crate::types::{gwei_to_wei, wei_to_gwei, PaymentConfig, PaymentRecord, PaymentState};

struct State {
    balances: HashMap<Address, U256>,
    escrows: HashMap<Slot, PaymentRecord>,
    archive: VecDeque<PaymentRecord>,
}

/// Wei-denominated escrow and settlement for a slot's winning bid.
pub struct PaymentProcessor {
    config: PaymentConfig,
    state: RwLock<State>,
}

impl PaymentProcessor {
    pub fn new(config: PaymentConfig) -> PaymentResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(State {
                balances: HashMap::new(),
                escrows: HashMap::new(),
                archive: VecDeque::new(),
            }),
        })
    }

    /// Credits `address`'s Wei balance. Bootstraps builder funds ahead of
    /// `Escrow`; not itself a spec-named operation.
    pub fn credit_builder(&self, address: Address, amount_wei: U256) {
        *self.state.write().balances.entry(address).or_insert_with(U256::zero) += amount_wei;
    }

    pub fn get_balance(&self, address: Address) -> U256 {
        self.state.read().balances.get(&address).copied().unwrap_or_default()
    }

    /// Moves `bid_value` Wei out of the builder's balance into a new,
    /// `Escrowed` record for `slot`.
    pub fn escrow(
        &self,
        slot: Slot,
        builder: Address,
        proposer: Address,
        bid_value: Gwei,
        bid_hash: Hash,
        payload_hash: Hash,
    ) -> PaymentResult<()> {
        if bid_value == 0 {
            return Err(PaymentError::ZeroBidValue);
        }

        let mut state = self.state.write();
        if state.escrows.contains_key(&slot) {
            return Err(PaymentError::DuplicateEscrow(slot));
        }

        let bid_value_wei = gwei_to_wei(bid_value);
        let balance = state.balances.entry(builder).or_insert_with(U256::zero);
        if *balance < bid_value_wei {
            return Err(PaymentError::InsufficientFunds {
                requested: bid_value_wei,
                available: *balance,
            });
        }
        *balance -= bid_value_wei;

        state.escrows.insert(
            slot,
            PaymentRecord {
                slot,
                builder_address: builder,
                proposer_address: proposer,
                bid_value_wei,
                payment_amount_wei: bid_value_wei,
                state: PaymentState::Escrowed,
                bid_hash,
                payload_hash,
                slash_gwei: 0,
                burn_gwei: 0,
                compensation_gwei: 0,
            },
        );
        Ok(())
    }

    /// Credits the proposer with the escrowed payment and marks the
    /// record `Released`.
    pub fn release_payment(&self, slot: Slot, delivered_payload_hash: Hash) -> PaymentResult<()> {
        let mut state = self.state.write();
        let record = state.escrows.get_mut(&slot).ok_or(PaymentError::NoEscrow(slot))?;

        if record.state != PaymentState::Escrowed {
            return Err(PaymentError::NotEscrowed(slot));
        }
        if delivered_payload_hash != record.payload_hash {
            return Err(PaymentError::PayloadHashMismatch);
        }

        let payment = record.payment_amount_wei;
        let proposer = record.proposer_address;
        record.state = PaymentState::Released;

        *state.balances.entry(proposer).or_insert_with(U256::zero) += payment;
        self.archive_record(&mut state, slot);
        Ok(())
    }

    /// Slashes the escrowed bid: splits into a burned portion and a
    /// proposer compensation, refunding any remainder to the builder.
    pub fn slash_builder(&self, slot: Slot) -> PaymentResult<()> {
        let mut state = self.state.write();
        let record = state.escrows.get_mut(&slot).ok_or(PaymentError::NoEscrow(slot))?;

        if record.state != PaymentState::Escrowed {
            return Err(PaymentError::NotEscrowed(slot));
        }

        let bid_value_gwei = wei_to_gwei(record.bid_value_wei);
        let slash_gwei = basis_points_of(bid_value_gwei, self.config.slash_fraction_bp);
        let burn_gwei = basis_points_of(slash_gwei, self.config.burn_fraction_bp);
        let compensation_gwei = slash_gwei - burn_gwei;
        let refund_gwei = bid_value_gwei - slash_gwei;

        record.slash_gwei = slash_gwei;
        record.burn_gwei = burn_gwei;
        record.compensation_gwei = compensation_gwei;
        record.state = PaymentState::Slashed;

        let proposer = record.proposer_address;
        let builder = record.builder_address;
        let slot_for_log = record.slot;

        *state.balances.entry(proposer).or_insert_with(U256::zero) += gwei_to_wei(compensation_gwei);
        if refund_gwei > 0 {
            *state.balances.entry(builder).or_insert_with(U256::zero) += gwei_to_wei(refund_gwei);
        }

        warn!(slot = slot_for_log, slash_gwei, burn_gwei, "builder payment slashed");
        self.archive_record(&mut state, slot);
        Ok(())
    }

    /// Returns the full escrowed bid to the builder once the settlement
    /// deadline has passed.
    pub fn refund_escrow(&self, slot: Slot, current_slot: Slot) -> PaymentResult<()> {
        let mut state = self.state.write();
        let record = state.escrows.get_mut(&slot).ok_or(PaymentError::NoEscrow(slot))?;

        if record.state != PaymentState::Escrowed {
            return Err(PaymentError::NotEscrowed(slot));
        }

        let required = record.slot + self.config.settlement_deadline;
        if current_slot < required {
            return Err(PaymentError::SettlementDeadlineNotReached {
                current: current_slot,
                required,
            });
        }

        let builder = record.builder_address;
        let bid_value_wei = record.bid_value_wei;
        record.state = PaymentState::Refunded;

        *state.balances.entry(builder).or_insert_with(U256::zero) += bid_value_wei;
        self.archive_record(&mut state, slot);
        Ok(())
    }

    fn archive_record(&self, state: &mut State, slot: Slot) {
        if let Some(record) = state.escrows.remove(&slot) {
            if state.archive.len() == self.config.max_archive_size {
                state.archive.pop_front();
            }
            state.archive.push_back(record);
        }
    }

    /// Defensive copy of the in-flight record for `slot`, if any.
    pub fn get_record(&self, slot: Slot) -> Option<PaymentRecord> {
        self.state.read().escrows.get(&slot).cloned()
    }

    /// Defensive snapshot of the archive, oldest first.
    pub fn archive(&self) -> Vec<PaymentRecord> {
        self.state.read().archive.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> Hash {
        let mut h = [0u8; 32];
        h[0] = byte;
        h
    }

    #[test]
    fn escrow_locks_funds_and_release_pays_proposer() {
        let processor = PaymentProcessor::new(PaymentConfig::default()).unwrap();
        let builder = [1u8; 20];
        let proposer = [2u8; 20];
        processor.credit_builder(builder, gwei_to_wei(1_000));

        processor.escrow(10, builder, proposer, 500, hash(1), hash(2)).unwrap();
        assert_eq!(processor.get_balance(builder), gwei_to_wei(500));

        processor.release_payment(10, hash(2)).unwrap();
        assert_eq!(processor.get_balance(proposer), gwei_to_wei(500));
        assert!(processor.get_record(10).is_none());
        assert_eq!(processor.archive().len(), 1);
    }

    #[test]
    fn release_rejects_payload_hash_mismatch() {
        let processor = PaymentProcessor::new(PaymentConfig::default()).unwrap();
        let builder = [1u8; 20];
        processor.credit_builder(builder, gwei_to_wei(1_000));
        processor.escrow(10, builder, [2u8; 20], 500, hash(1), hash(2)).unwrap();

        assert_eq!(
            processor.release_payment(10, hash(99)),
            Err(PaymentError::PayloadHashMismatch)
        );
    }

    #[test]
    fn escrow_fails_with_insufficient_funds() {
        let processor = PaymentProcessor::new(PaymentConfig::default()).unwrap();
        let builder = [1u8; 20];
        processor.credit_builder(builder, gwei_to_wei(100));
        assert!(matches!(
            processor.escrow(10, builder, [2u8; 20], 500, hash(1), hash(2)),
            Err(PaymentError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn slash_splits_between_burn_and_compensation_and_refunds_remainder() {
        let processor = PaymentProcessor::new(PaymentConfig::default()).unwrap();
        let builder = [1u8; 20];
        let proposer = [2u8; 20];
        processor.credit_builder(builder, gwei_to_wei(1_000));
        processor.escrow(10, builder, proposer, 1_000, hash(1), hash(2)).unwrap();

        processor.slash_builder(10).unwrap();

        let record = processor.archive().pop().unwrap();
        assert_eq!(record.slash_gwei, 500);
        assert_eq!(record.burn_gwei, 250);
        assert_eq!(record.compensation_gwei, 250);
        assert_eq!(processor.get_balance(proposer), gwei_to_wei(250));
        assert_eq!(processor.get_balance(builder), gwei_to_wei(500));
    }

    #[test]
    fn refund_requires_settlement_deadline() {
        let processor = PaymentProcessor::new(PaymentConfig::default()).unwrap();
        let builder = [1u8; 20];
        processor.credit_builder(builder, gwei_to_wei(1_000));
        processor.escrow(10, builder, [2u8; 20], 1_000, hash(1), hash(2)).unwrap();

        assert_eq!(
            processor.refund_escrow(10, 20),
            Err(PaymentError::SettlementDeadlineNotReached {
                current: 20,
                required: 42
            })
        );

        processor.refund_escrow(10, 42).unwrap();
        assert_eq!(processor.get_balance(builder), gwei_to_wei(1_000));
    }

    #[test]
    fn gwei_wei_round_trip_is_exact() {
        assert_eq!(wei_to_gwei(gwei_to_wei(12_345)), 12_345);
    }
}
