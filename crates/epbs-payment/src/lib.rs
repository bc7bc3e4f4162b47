//! Wei-denominated escrow, release, slashing, and refund processing for the
//! winning builder bid of a slot.
//!
//! Reference: SPEC_FULL.md Section 4.9 - Payment processor (Wei-denominated)

pub mod error;
pub mod processor;
pub mod types;

pub use error::{PaymentError, PaymentResult};
pub use processor::PaymentProcessor;
pub use types::{gwei_to_wei, wei_to_gwei, PaymentConfig, PaymentRecord, PaymentState};
