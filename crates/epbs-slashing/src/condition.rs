//! Pluggable slashing conditions.
//!
//! Reference: SPEC_FULL.md Section 4.7 - Slashing engine

use epbs_types::{BuilderBid, PayloadEnvelope, Slot};
use serde::{Deserialize, Serialize};

/// The violated-condition discriminant, also used as the `EvidenceHash`
/// condition-type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionType {
    NonDelivery,
    InvalidPayload,
    Equivocation,
}

impl ConditionType {
    pub fn tag(self) -> u8 {
        match self {
            ConditionType::NonDelivery => 0,
            ConditionType::InvalidPayload => 1,
            ConditionType::Equivocation => 2,
        }
    }
}

/// Arguments available to a condition's `check`.
pub struct SlashingContext<'a> {
    pub bid: &'a BuilderBid,
    pub payload: Option<&'a PayloadEnvelope>,
    /// A second bid by the same builder for the same slot, if one is
    /// known, for equivocation evidence.
    pub other_bid: Option<&'a BuilderBid>,
    pub current_slot: Slot,
}

/// A pluggable violation detector.
pub trait SlashingCondition: Send + Sync {
    fn condition_type(&self) -> ConditionType;
    /// Returns `(violated, reason)`.
    fn check(&self, ctx: &SlashingContext) -> (bool, Option<String>);
}

/// Triggered when no payload has been delivered past the builder's
/// delivery deadline.
pub struct NonDelivery {
    pub deadline_slots: Slot,
}

impl SlashingCondition for NonDelivery {
    fn condition_type(&self) -> ConditionType {
        ConditionType::NonDelivery
    }

    fn check(&self, ctx: &SlashingContext) -> (bool, Option<String>) {
        if ctx.payload.is_none() && ctx.current_slot > ctx.bid.slot + self.deadline_slots {
            (true, Some("payload not delivered within deadline".into()))
        } else {
            (false, None)
        }
    }
}

/// Triggered when a delivered payload disagrees with the winning bid on
/// slot, builder index, or committed block hash.
pub struct InvalidPayload;

impl SlashingCondition for InvalidPayload {
    fn condition_type(&self) -> ConditionType {
        ConditionType::InvalidPayload
    }

    fn check(&self, ctx: &SlashingContext) -> (bool, Option<String>) {
        let Some(payload) = ctx.payload else {
            return (false, None);
        };
        if payload.slot != ctx.bid.slot {
            return (true, Some("payload slot does not match bid slot".into()));
        }
        if payload.builder_index != ctx.bid.builder_index {
            return (true, Some("payload builder index does not match bid".into()));
        }
        if payload.payload_root != ctx.bid.block_hash {
            return (true, Some("payload root does not match committed block hash".into()));
        }
        (false, None)
    }
}

/// Triggered when a second bid for the same slot from the same builder
/// commits to a different block hash.
pub struct Equivocation;

impl SlashingCondition for Equivocation {
    fn condition_type(&self) -> ConditionType {
        ConditionType::Equivocation
    }

    fn check(&self, ctx: &SlashingContext) -> (bool, Option<String>) {
        let Some(other) = ctx.other_bid else {
            return (false, None);
        };
        let violated = other.slot == ctx.bid.slot
            && other.builder_index == ctx.bid.builder_index
            && other.block_hash != ctx.bid.block_hash;
        if violated {
            (true, Some("builder equivocated with a conflicting bid".into()))
        } else {
            (false, None)
        }
    }
}
