//! Prometheus counters for the builder market, behind the `metrics` feature.
//!
//! Reference: SPEC_FULL.md Section 10 - Ambient Stack (Metrics)

use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};

lazy_static! {
    pub static ref BUILDERS_REGISTERED: IntCounter = register_int_counter!(
        "epbs_market_builders_registered_total",
        "Total builders registered with the market"
    )
    .expect("metric registration");
    pub static ref BIDS_SUBMITTED: IntCounter = register_int_counter!(
        "epbs_market_bids_submitted_total",
        "Total bids accepted by the market's per-slot book"
    )
    .expect("metric registration");
    pub static ref BUILDERS_BANNED: IntCounter = register_int_counter!(
        "epbs_market_builders_banned_total",
        "Total builders auto-banned after consecutive misses"
    )
    .expect("metric registration");
}
