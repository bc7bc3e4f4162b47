//! Pluggable slashing-condition registry and bounded violation record ring.
//!
//! Reference: SPEC_FULL.md Section 4.7

pub mod condition;
pub mod engine;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod types;

pub use condition::{ConditionType, Equivocation, InvalidPayload, NonDelivery, SlashingCondition, SlashingContext};
pub use engine::SlashingEngine;
pub use error::{SlashingError, SlashingResult};
pub use types::{SlashingConfig, SlashingRecord};
