//! Per-builder collateral accounts and the escrowed-bid lifecycle.
//!
//! Reference: SPEC_FULL.md Section 4.5

pub mod error;
pub mod escrow;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod types;

pub use error::{EscrowError, EscrowResult};
pub use escrow::Escrow;
pub use types::{CollateralAccount, EntryState, EscrowConfig, EscrowedEntry, SettlementResult, SlashRecord};
