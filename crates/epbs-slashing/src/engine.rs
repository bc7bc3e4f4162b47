//! The slashing condition registry and record ring.
//!
//! Reference: SPEC_FULL.md Section 4.7 - Slashing engine

use std::collections::VecDeque;

use epbs_crypto::{basis_points_of, bid_hash, evidence_hash};
use epbs_types::{Address, BuilderBid, PayloadEnvelope, Slot};
use parking_lot::RwLock;
use tracing::warn;

use crate::condition::{ConditionType, Equivocation, InvalidPayload, NonDelivery, SlashingCondition, SlashingContext};
use crate::error::SlashingResult;
use crate::types::{SlashingConfig, SlashingRecord};

#[cfg(feature = "metrics")]
use crate::metrics;

/// Evaluates every registered [`SlashingCondition`] against a single
/// (bid, payload, builder) call, producing zero or more records.
pub struct SlashingEngine {
    config: SlashingConfig,
    conditions: Vec<Box<dyn SlashingCondition>>,
    records: RwLock<VecDeque<SlashingRecord>>,
}

impl SlashingEngine {
    /// Registers the three built-in conditions with `non_delivery_deadline`
    /// slots for the `NonDelivery` condition.
    pub fn new(config: SlashingConfig, non_delivery_deadline: Slot) -> SlashingResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            conditions: vec![
                Box::new(NonDelivery {
                    deadline_slots: non_delivery_deadline,
                }),
                Box::new(InvalidPayload),
                Box::new(Equivocation),
            ],
            records: RwLock::new(VecDeque::new()),
        })
    }

    /// Builds an engine with a caller-supplied condition set, for tests or
    /// deployments that want a non-default registry.
    pub fn with_conditions(config: SlashingConfig, conditions: Vec<Box<dyn SlashingCondition>>) -> SlashingResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            conditions,
            records: RwLock::new(VecDeque::new()),
        })
    }

    /// Runs every registered condition against `ctx`, appending one
    /// [`SlashingRecord`] per violation to the bounded ring.
    pub fn evaluate(
        &self,
        bid: &BuilderBid,
        payload: Option<&PayloadEnvelope>,
        other_bid: Option<&BuilderBid>,
        builder_address: Address,
        current_slot: Slot,
    ) -> Vec<SlashingRecord> {
        let ctx = SlashingContext {
            bid,
            payload,
            other_bid,
            current_slot,
        };

        let mut produced = Vec::new();
        let mut records = self.records.write();
        let capacity = self.config.record_ring_capacity;
        let bh = bid_hash(bid);

        for condition in &self.conditions {
            let (violated, reason) = condition.check(&ctx);
            if !violated {
                continue;
            }

            let condition_type = condition.condition_type();
            let bp = self.config.basis_points_for(condition_type);
            let penalty = basis_points_of(bid.value, bp);
            let record = SlashingRecord {
                builder_index: bid.builder_index,
                builder_address,
                slot: bid.slot,
                condition: condition_type,
                reason: reason.unwrap_or_default(),
                bid_value: bid.value,
                penalty,
                evidence_hash: evidence_hash(condition_type.tag(), bh, builder_address),
            };

            warn!(
                builder_index = record.builder_index,
                slot = record.slot,
                condition = ?record.condition,
                penalty = record.penalty,
                "slashing condition violated"
            );
            #[cfg(feature = "metrics")]
            metrics::record_for(condition_type);

            if records.len() == capacity {
                records.pop_front();
            }
            records.push_back(record.clone());
            produced.push(record);
        }

        produced
    }

    /// Defensive snapshot of every record, oldest first.
    pub fn records(&self) -> Vec<SlashingRecord> {
        self.records.read().iter().cloned().collect()
    }

    /// Defensive snapshot of records for one builder index.
    pub fn records_for_builder(&self, builder_index: u64) -> Vec<SlashingRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.builder_index == builder_index)
            .cloned()
            .collect()
    }

    /// Sum of `penalty` across every record for one builder index.
    pub fn cumulative_penalty(&self, builder_index: u64) -> u64 {
        self.records
            .read()
            .iter()
            .filter(|r| r.builder_index == builder_index)
            .map(|r| r.penalty)
            .sum()
    }
}
