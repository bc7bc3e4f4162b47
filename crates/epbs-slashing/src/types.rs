//! Configuration and record types for the slashing engine.
//!
//! Reference: SPEC_FULL.md Section 4.7 - Slashing engine

use epbs_types::{Address, Gwei, Hash, Slot};
use serde::{Deserialize, Serialize};

use crate::condition::ConditionType;
use crate::error::SlashingResult;

/// Penalty multipliers (basis points) per condition type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlashingConfig {
    pub non_delivery_bp: u64,
    pub invalid_payload_bp: u64,
    pub equivocation_bp: u64,
    pub record_ring_capacity: usize,
}

impl Default for SlashingConfig {
    fn default() -> Self {
        Self {
            non_delivery_bp: 20_000,
            invalid_payload_bp: 30_000,
            equivocation_bp: 50_000,
            record_ring_capacity: 1024,
        }
    }
}

impl SlashingConfig {
    pub fn validate(&self) -> SlashingResult<()> {
        Ok(())
    }

    pub(crate) fn basis_points_for(&self, condition: ConditionType) -> u64 {
        match condition {
            ConditionType::NonDelivery => self.non_delivery_bp,
            ConditionType::InvalidPayload => self.invalid_payload_bp,
            ConditionType::Equivocation => self.equivocation_bp,
        }
    }
}

/// A single recorded slashing violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashingRecord {
    pub builder_index: u64,
    pub builder_address: Address,
    pub slot: Slot,
    pub condition: ConditionType,
    pub reason: String,
    pub bid_value: Gwei,
    pub penalty: Gwei,
    pub evidence_hash: Hash,
}
