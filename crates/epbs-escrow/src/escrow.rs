//! Per-builder collateral accounts and the escrowed-bid lifecycle.
//!
//! Reference: SPEC_FULL.md Section 4.5 - Collateral escrow

use std::collections::{HashMap, VecDeque};

use epbs_types::{BuilderBid, BuilderIndex, Gwei, PayloadEnvelope, Slot};
use parking_lot::RwLock;
use tracing::warn;

use crate::error::{EscrowError, EscrowResult};
use crate::types::{CollateralAccount, EntryState, EscrowConfig, EscrowedEntry, SettlementResult, SlashRecord};

#[cfg(feature = "metrics")]
use crate::metrics;

struct State {
    accounts: HashMap<BuilderIndex, CollateralAccount>,
    entries: HashMap<Slot, EscrowedEntry>,
    settlements: VecDeque<SettlementResult>,
    slash_audit: VecDeque<SlashRecord>,
}

/// Collateral escrow: per-builder balances and per-slot bid lifecycle.
pub struct Escrow {
    config: EscrowConfig,
    state: RwLock<State>,
}

impl Escrow {
    pub fn new(config: EscrowConfig) -> EscrowResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(State {
                accounts: HashMap::new(),
                entries: HashMap::new(),
                settlements: VecDeque::new(),
                slash_audit: VecDeque::new(),
            }),
        })
    }

    /// Credits `builder_id`'s available balance. `amount` must be > 0.
    pub fn deposit(&self, builder_id: BuilderIndex, amount: Gwei) -> EscrowResult<()> {
        if amount == 0 {
            return Err(EscrowError::ZeroDeposit);
        }
        let mut state = self.state.write();
        state.accounts.entry(builder_id).or_default().available += amount;
        Ok(())
    }

    /// Locks `bid.value` out of the builder's available balance and
    /// creates a `Pending` escrowed entry for `bid.slot`.
    pub fn place_bid(&self, builder_id: BuilderIndex, bid: BuilderBid) -> EscrowResult<()> {
        let mut state = self.state.write();

        if state.entries.contains_key(&bid.slot) {
            return Err(EscrowError::DuplicateBid(bid.slot));
        }

        let account = state.accounts.entry(builder_id).or_default();
        if account.available < bid.value {
            return Err(EscrowError::insufficient(bid.value, account.available));
        }
        account.available -= bid.value;
        account.locked += bid.value;

        let slot = bid.slot;
        state.entries.insert(slot, EscrowedEntry::new(bid, builder_id));
        Ok(())
    }

    /// Advances `slot`'s entry from `Pending` to `Revealed`, verifying the
    /// payload against the escrowed bid.
    pub fn reveal_payload(
        &self,
        slot: Slot,
        builder_id: BuilderIndex,
        payload: Option<PayloadEnvelope>,
    ) -> EscrowResult<()> {
        let payload = payload.ok_or(EscrowError::NilPayload)?;

        let mut state = self.state.write();
        let entry = state
            .entries
            .get_mut(&slot)
            .ok_or(EscrowError::NoActiveBid(slot))?;

        if entry.state != EntryState::Pending {
            return Err(EscrowError::NotPending(slot));
        }
        if payload.slot != entry.bid.slot {
            return Err(EscrowError::SlotMismatch {
                expected: entry.bid.slot,
                got: payload.slot,
            });
        }
        if payload.builder_index != entry.bid.builder_index {
            return Err(EscrowError::BuilderMismatch {
                expected: entry.bid.builder_index,
                got: payload.builder_index,
            });
        }
        if builder_id != entry.builder_id {
            return Err(EscrowError::BuilderMismatch {
                expected: entry.builder_id,
                got: builder_id,
            });
        }
        if payload.payload_root != entry.bid.block_hash {
            return Err(EscrowError::PayloadRootMismatch);
        }

        entry.payload = Some(payload);
        entry.state = EntryState::Revealed;
        Ok(())
    }

    /// Settles `slot`'s entry: releases collateral on a revealed entry,
    /// slashes (burns) collateral otherwise. Archives a [`SettlementResult`].
    pub fn settle_bid(&self, slot: Slot) -> EscrowResult<EntryState> {
        let mut state = self.state.write();
        let entry = state
            .entries
            .get_mut(&slot)
            .ok_or(EscrowError::NoActiveBid(slot))?;

        if entry.state.is_terminal() {
            return Err(EscrowError::AlreadySettled(slot));
        }

        let builder_id = entry.builder_id;
        let locked_amount = entry.bid.value;
        let outcome = if entry.state == EntryState::Revealed {
            entry.state = EntryState::SettledSuccess;
            EntryState::SettledSuccess
        } else {
            entry.state = EntryState::SettledSlashed;
            warn!(slot, builder_id, "settling undelivered bid as slashed");
            EntryState::SettledSlashed
        };

        if let Some(account) = state.accounts.get_mut(&builder_id) {
            match outcome {
                EntryState::SettledSuccess => {
                    account.locked -= locked_amount;
                    account.available += locked_amount;
                }
                EntryState::SettledSlashed => {
                    account.locked -= locked_amount;
                }
                _ => unreachable!(),
            }
        }

        let capacity = self.config.effective_history_capacity();
        if state.settlements.len() == capacity {
            state.settlements.pop_front();
        }
        state.settlements.push_back(SettlementResult {
            slot,
            builder_id,
            outcome,
            locked_amount,
        });

        #[cfg(feature = "metrics")]
        metrics::SETTLEMENTS.inc();

        Ok(outcome)
    }

    /// Removes `amount` from `builder_id`'s balance, available first then
    /// locked, never going negative. Records an audit entry.
    pub fn slash_builder(&self, builder_id: BuilderIndex, amount: Gwei, reason: &str) -> EscrowResult<()> {
        if amount == 0 {
            return Err(EscrowError::ZeroSlash);
        }

        let mut state = self.state.write();
        let account = state
            .accounts
            .get_mut(&builder_id)
            .ok_or(EscrowError::UnknownBuilder)?;

        let total = account.available + account.locked;
        if total == 0 {
            return Err(EscrowError::insufficient(amount, 0));
        }

        let from_available = amount.min(account.available);
        account.available -= from_available;
        let remainder = amount - from_available;
        let from_locked = remainder.min(account.locked);
        account.locked -= from_locked;
        let applied = from_available + from_locked;

        let capacity = self.config.effective_history_capacity();
        if state.slash_audit.len() == capacity {
            state.slash_audit.pop_front();
        }
        state.slash_audit.push_back(SlashRecord {
            builder_id,
            amount_applied: applied,
            reason: reason.to_string(),
        });

        warn!(builder_id, applied, reason, "builder collateral slashed");
        Ok(())
    }

    /// Moves `amount` out of `builder_id`'s available balance.
    pub fn withdraw_balance(&self, builder_id: BuilderIndex, amount: Gwei) -> EscrowResult<()> {
        if amount == 0 {
            return Err(EscrowError::ZeroWithdraw);
        }
        let mut state = self.state.write();
        let account = state
            .accounts
            .get_mut(&builder_id)
            .ok_or(EscrowError::UnknownBuilder)?;
        if account.available < amount {
            return Err(EscrowError::insufficient(amount, account.available));
        }
        account.available -= amount;
        Ok(())
    }

    pub fn get_balance(&self, builder_id: BuilderIndex) -> Gwei {
        self.state
            .read()
            .accounts
            .get(&builder_id)
            .map(|a| a.available)
            .unwrap_or(0)
    }

    pub fn get_locked_balance(&self, builder_id: BuilderIndex) -> Gwei {
        self.state
            .read()
            .accounts
            .get(&builder_id)
            .map(|a| a.locked)
            .unwrap_or(0)
    }

    pub fn get_bid_state(&self, slot: Slot) -> Option<EntryState> {
        self.state.read().entries.get(&slot).map(|e| e.state)
    }

    /// Defensive copy of the escrowed entry for `slot`.
    pub fn get_bid(&self, slot: Slot) -> Option<EscrowedEntry> {
        self.state.read().entries.get(&slot).cloned()
    }

    /// Count of entries in `Pending` or `Revealed` (non-terminal) state.
    pub fn active_bid_count(&self) -> usize {
        self.state
            .read()
            .entries
            .values()
            .filter(|e| !e.state.is_terminal())
            .count()
    }

    /// Most-recent `n` settlement results, newest last.
    pub fn settlement_history(&self, n: usize) -> Vec<SettlementResult> {
        let state = self.state.read();
        let len = state.settlements.len();
        let skip = len.saturating_sub(n);
        state.settlements.iter().skip(skip).cloned().collect()
    }

    /// Drops entries strictly before `slot` that are in a terminal state.
    /// Active (`Pending`/`Revealed`) entries are never pruned by this call.
    pub fn prune_before(&self, slot: Slot) {
        let mut state = self.state.write();
        state
            .entries
            .retain(|&s, entry| s >= slot || !entry.state.is_terminal());
    }
}
