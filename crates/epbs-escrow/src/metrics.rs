//! Prometheus counters for the collateral escrow, behind the `metrics`
//! feature.
//!
//! Reference: SPEC_FULL.md Section 10 - Ambient Stack (Metrics)

use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};

lazy_static! {
    pub static ref SETTLEMENTS: IntCounter = register_int_counter!(
        "epbs_escrow_settlements_total",
        "Total escrowed bids settled (success or slashed)"
    )
    .expect("metric registration");
}
