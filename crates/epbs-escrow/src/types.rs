//! Configuration and entry types for the collateral escrow.
//!
//! Reference: SPEC_FULL.md Section 4.5 - Collateral escrow

use epbs_types::{BuilderBid, BuilderIndex, Gwei, PayloadEnvelope, Slot};
use serde::{Deserialize, Serialize};

use crate::error::{EscrowError, EscrowResult};

/// Tunable parameters for [`crate::escrow::Escrow`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Capacity of the settlement-history ring. A value of zero selects
    /// the default.
    pub settlement_history_capacity: usize,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            settlement_history_capacity: 1024,
        }
    }
}

impl EscrowConfig {
    pub fn validate(&self) -> EscrowResult<()> {
        Ok(())
    }

    /// Effective ring capacity: a non-positive configured value selects
    /// the default of 1024.
    pub(crate) fn effective_history_capacity(&self) -> usize {
        if self.settlement_history_capacity == 0 {
            1024
        } else {
            self.settlement_history_capacity
        }
    }
}

/// A builder's available and locked Gwei balances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralAccount {
    pub available: Gwei,
    pub locked: Gwei,
}

/// Lifecycle state of an escrowed bid entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryState {
    Pending,
    Revealed,
    SettledSuccess,
    SettledSlashed,
}

impl EntryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, EntryState::SettledSuccess | EntryState::SettledSlashed)
    }
}

/// A single escrowed bid, tracked from `PlaceBid` through settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EscrowedEntry {
    pub bid: BuilderBid,
    pub builder_id: BuilderIndex,
    pub state: EntryState,
    pub payload: Option<PayloadEnvelope>,
}

impl EscrowedEntry {
    pub fn new(bid: BuilderBid, builder_id: BuilderIndex) -> Self {
        Self {
            bid,
            builder_id,
            state: EntryState::Pending,
            payload: None,
        }
    }
}

/// An archived settlement outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub slot: Slot,
    pub builder_id: BuilderIndex,
    pub outcome: EntryState,
    pub locked_amount: Gwei,
}

/// An audit entry produced by a direct `SlashBuilder` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashRecord {
    pub builder_id: BuilderIndex,
    pub amount_applied: Gwei,
    pub reason: String,
}

impl EscrowError {
    pub(crate) fn insufficient(requested: Gwei, available: Gwei) -> Self {
        EscrowError::InsufficientFunds {
            requested,
            available,
        }
    }
}
