//! Prometheus counters for the slashing engine, behind the `metrics`
//! feature.
//!
//! Reference: SPEC_FULL.md Section 10 - Ambient Stack (Metrics)

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

use crate::condition::ConditionType;

lazy_static! {
    pub static ref RECORDS_BY_CONDITION: IntCounterVec = register_int_counter_vec!(
        "epbs_slashing_records_total",
        "Total slashing records produced, by condition type",
        &["condition"]
    )
    .expect("metric registration");
}

pub(crate) fn record_for(condition: ConditionType) {
    let label = match condition {
        ConditionType::NonDelivery => "non_delivery",
        ConditionType::InvalidPayload => "invalid_payload",
        ConditionType::Equivocation => "equivocation",
    };
    RECORDS_BY_CONDITION.with_label_values(&[label]).inc();
}
