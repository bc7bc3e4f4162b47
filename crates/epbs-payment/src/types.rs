//! Configuration, record, and Gwei/Wei conversion helpers for the payment
//! processor.
//!
//! Reference: SPEC_FULL.md Section 4.9 - Payment processor (Wei-denominated)

use epbs_types::{Address, Gwei, Hash, Slot, WEI_PER_GWEI};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, PaymentResult};

/// `gweiToWei(g) = g * 10^9`.
pub fn gwei_to_wei(gwei: Gwei) -> U256 {
    U256::from(gwei) * U256::from(WEI_PER_GWEI)
}

/// `weiToGwei(w) = w / 10^9`, truncating.
pub fn wei_to_gwei(wei: U256) -> Gwei {
    (wei / U256::from(WEI_PER_GWEI)).low_u64()
}

/// Tunable parameters for [`crate::processor::PaymentProcessor`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Slash fraction, in basis points, clamped to <= 10000.
    pub slash_fraction_bp: u64,
    /// Burn fraction of the slashed amount, in basis points, clamped to
    /// <= 10000.
    pub burn_fraction_bp: u64,
    /// Slots after escrow before `RefundEscrow` becomes callable.
    pub settlement_deadline: Slot,
    /// Capacity of the settled-record archive.
    pub max_archive_size: usize,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            slash_fraction_bp: 5_000,
            burn_fraction_bp: 5_000,
            settlement_deadline: 32,
            max_archive_size: 1024,
        }
    }
}

impl PaymentConfig {
    pub fn validate(&self) -> PaymentResult<()> {
        if self.slash_fraction_bp > 10_000 {
            return Err(PaymentError::InvalidConfig(
                "slash_fraction_bp must be <= 10000".into(),
            ));
        }
        if self.burn_fraction_bp > 10_000 {
            return Err(PaymentError::InvalidConfig(
                "burn_fraction_bp must be <= 10000".into(),
            ));
        }
        Ok(())
    }
}

/// Terminal or in-flight state of a [`PaymentRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    Pending,
    Escrowed,
    Released,
    Slashed,
    Refunded,
}

/// A single slot's Wei-denominated payment record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub slot: Slot,
    pub builder_address: Address,
    pub proposer_address: Address,
    pub bid_value_wei: U256,
    pub payment_amount_wei: U256,
    pub state: PaymentState,
    pub bid_hash: Hash,
    pub payload_hash: Hash,
    pub slash_gwei: Gwei,
    pub burn_gwei: Gwei,
    pub compensation_gwei: Gwei,
}
