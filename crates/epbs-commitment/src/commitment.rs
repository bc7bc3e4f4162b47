//! Commit-reveal engine: block-root commitments, reveal-window enforcement,
//! and non-reveal/mismatch penalties.
//!
//! Reference: SPEC_FULL.md Section 4.6 - Commitment-reveal

use std::collections::{HashMap, VecDeque};

use epbs_crypto::{basis_points_of, commitment_hash};
use epbs_types::{Address, BuilderIndex, Gwei, Hash, PayloadEnvelope, Slot};
use parking_lot::RwLock;
use tracing::warn;

use crate::error::{CommitmentError, CommitmentResult};
use crate::types::{BuilderCommitment, CommitmentConfig, PenaltyKind, PenaltyRecord};

struct State {
    commitments: HashMap<(Slot, BuilderIndex), BuilderCommitment>,
    chains: HashMap<Slot, Vec<BuilderIndex>>,
    penalties: VecDeque<PenaltyRecord>,
}

/// Stores commitments keyed by `(slot, builder index)` and enforces the
/// reveal-window protocol.
pub struct CommitmentEngine {
    config: CommitmentConfig,
    state: RwLock<State>,
}

impl CommitmentEngine {
    pub fn new(config: CommitmentConfig) -> CommitmentResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(State {
                commitments: HashMap::new(),
                chains: HashMap::new(),
                penalties: VecDeque::new(),
            }),
        })
    }

    /// Commits `builder_index` to `block_root` for `slot`. Refuses a
    /// duplicate (slot, builder) pair.
    pub fn commit(
        &self,
        slot: Slot,
        builder_index: BuilderIndex,
        builder_address: Address,
        bid_amount: Gwei,
        block_root: Hash,
    ) -> CommitmentResult<Hash> {
        let mut state = self.state.write();
        let key = (slot, builder_index);
        if state.commitments.contains_key(&key) {
            return Err(CommitmentError::DuplicateCommitment { slot, builder_index });
        }

        let hash = commitment_hash(block_root, builder_address, slot, builder_index, bid_amount);
        state.commitments.insert(
            key,
            BuilderCommitment {
                slot,
                builder_index,
                builder_address,
                bid_amount,
                commitment_hash: hash,
                block_root,
                revealed: false,
                revealed_at_slot: None,
            },
        );
        state.chains.entry(slot).or_default().push(builder_index);
        Ok(hash)
    }

    /// Verifies `payload` against its matching commitment and marks it
    /// revealed. On a root mismatch, appends a penalty record before
    /// returning the error.
    pub fn reveal(&self, payload: Option<PayloadEnvelope>, current_slot: Slot) -> CommitmentResult<()> {
        let payload = payload.ok_or(CommitmentError::NilPayload)?;

        let mut state = self.state.write();
        let key = (payload.slot, payload.builder_index);
        let commitment = state
            .commitments
            .get(&key)
            .cloned()
            .ok_or(CommitmentError::NoCommitment {
                slot: payload.slot,
                builder_index: payload.builder_index,
            })?;

        if commitment.revealed {
            return Err(CommitmentError::AlreadyRevealed {
                slot: commitment.slot,
                builder_index: commitment.builder_index,
            });
        }

        let deadline = commitment.slot + self.config.reveal_window.deadline_slots;
        if current_slot > deadline {
            return Err(CommitmentError::RevealExpired {
                slot: commitment.slot,
                builder_index: commitment.builder_index,
                current_slot,
                deadline_slot: deadline,
            });
        }

        if payload.payload_root != commitment.block_root {
            Self::push_penalty(
                &mut state.penalties,
                self.config.penalty_ring_capacity,
                PenaltyRecord {
                    slot: commitment.slot,
                    builder_index: commitment.builder_index,
                    builder_address: commitment.builder_address,
                    kind: PenaltyKind::Mismatch,
                    penalty: basis_points_of(commitment.bid_amount, self.config.mismatch_basis_points),
                },
            );
            return Err(CommitmentError::CommitmentMismatch {
                slot: commitment.slot,
                builder_index: commitment.builder_index,
            });
        }

        let entry = state.commitments.get_mut(&key).expect("checked above");
        entry.revealed = true;
        entry.revealed_at_slot = Some(current_slot);
        Ok(())
    }

    /// Penalizes and marks-revealed every commitment whose reveal window
    /// has expired without a reveal, to avoid double-penalizing on a
    /// later call.
    pub fn check_deadlines(&self, current_slot: Slot) {
        let mut state = self.state.write();
        let deadline_slots = self.config.reveal_window.deadline_slots;
        let capacity = self.config.penalty_ring_capacity;

        let expired: Vec<(Slot, BuilderIndex)> = state
            .commitments
            .values()
            .filter(|c| !c.revealed && current_slot > c.slot + deadline_slots)
            .map(|c| (c.slot, c.builder_index))
            .collect();

        for key in expired {
            let commitment = state.commitments.get(&key).cloned().expect("found above");
            Self::push_penalty(
                &mut state.penalties,
                capacity,
                PenaltyRecord {
                    slot: commitment.slot,
                    builder_index: commitment.builder_index,
                    builder_address: commitment.builder_address,
                    kind: PenaltyKind::NonReveal,
                    penalty: basis_points_of(commitment.bid_amount, self.config.non_reveal_basis_points),
                },
            );
            warn!(
                slot = commitment.slot,
                builder_index = commitment.builder_index,
                "commitment reveal window expired without a reveal"
            );
            let entry = state.commitments.get_mut(&key).expect("found above");
            entry.revealed = true;
        }
    }

    fn push_penalty(ring: &mut VecDeque<PenaltyRecord>, capacity: usize, record: PenaltyRecord) {
        if ring.len() == capacity {
            ring.pop_front();
        }
        ring.push_back(record);
    }

    /// Defensive snapshot of the penalty log, oldest first.
    pub fn penalties(&self) -> Vec<PenaltyRecord> {
        self.state.read().penalties.iter().cloned().collect()
    }

    /// Defensive snapshot of the append order of commitments for `slot`.
    pub fn chain_for_slot(&self, slot: Slot) -> Vec<BuilderIndex> {
        self.state.read().chains.get(&slot).cloned().unwrap_or_default()
    }

    /// Defensive copy of the commitment for `(slot, builder_index)`.
    pub fn get_commitment(&self, slot: Slot, builder_index: BuilderIndex) -> Option<BuilderCommitment> {
        self.state.read().commitments.get(&(slot, builder_index)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> Hash {
        let mut h = [0u8; 32];
        h[0] = byte;
        h
    }

    fn envelope(slot: u64, builder_index: u64, payload_root: Hash) -> PayloadEnvelope {
        PayloadEnvelope {
            payload_root,
            builder_index,
            beacon_block_root: hash(9),
            slot,
            state_root: hash(10),
            blob_kzg_commitments: vec![],
        }
    }

    #[test]
    fn duplicate_commit_rejected() {
        let engine = CommitmentEngine::new(CommitmentConfig::default()).unwrap();
        engine.commit(10, 1, [0xAA; 20], 500, hash(3)).unwrap();
        assert_eq!(
            engine.commit(10, 1, [0xAA; 20], 500, hash(3)),
            Err(CommitmentError::DuplicateCommitment {
                slot: 10,
                builder_index: 1
            })
        );
    }

    #[test]
    fn reveal_within_window_succeeds() {
        let engine = CommitmentEngine::new(CommitmentConfig::default()).unwrap();
        engine.commit(10, 1, [0xAA; 20], 500, hash(3)).unwrap();
        engine.reveal(Some(envelope(10, 1, hash(3))), 11).unwrap();

        let commitment = engine.get_commitment(10, 1).unwrap();
        assert!(commitment.revealed);
        assert_eq!(commitment.revealed_at_slot, Some(11));
    }

    #[test]
    fn reveal_past_deadline_fails() {
        let engine = CommitmentEngine::new(CommitmentConfig::default()).unwrap();
        engine.commit(10, 1, [0xAA; 20], 500, hash(3)).unwrap();
        assert_eq!(
            engine.reveal(Some(envelope(10, 1, hash(3))), 12),
            Err(CommitmentError::RevealExpired {
                slot: 10,
                builder_index: 1,
                current_slot: 12,
                deadline_slot: 11
            })
        );
    }

    #[test]
    fn reveal_mismatch_records_penalty_and_fails() {
        let engine = CommitmentEngine::new(CommitmentConfig::default()).unwrap();
        engine.commit(10, 1, [0xAA; 20], 500, hash(3)).unwrap();

        assert_eq!(
            engine.reveal(Some(envelope(10, 1, hash(99))), 11),
            Err(CommitmentError::CommitmentMismatch {
                slot: 10,
                builder_index: 1
            })
        );

        let penalties = engine.penalties();
        assert_eq!(penalties.len(), 1);
        assert_eq!(penalties[0].kind, PenaltyKind::Mismatch);
        assert_eq!(penalties[0].penalty, basis_points_of(500, 30_000));
    }

    #[test]
    fn check_deadlines_penalizes_and_marks_revealed_once() {
        let engine = CommitmentEngine::new(CommitmentConfig::default()).unwrap();
        engine.commit(10, 1, [0xAA; 20], 500, hash(3)).unwrap();

        engine.check_deadlines(12);
        engine.check_deadlines(13);

        assert_eq!(engine.penalties().len(), 1);
        assert!(engine.get_commitment(10, 1).unwrap().revealed);
    }

    #[test]
    fn chain_preserves_append_order() {
        let engine = CommitmentEngine::new(CommitmentConfig::default()).unwrap();
        engine.commit(10, 3, [0xAA; 20], 500, hash(3)).unwrap();
        engine.commit(10, 1, [0xBB; 20], 600, hash(4)).unwrap();
        assert_eq!(engine.chain_for_slot(10), vec![3, 1]);
    }

    #[test]
    fn scenario_commitment_deadline_emits_non_reveal_penalty() {
        let config = CommitmentConfig {
            reveal_window: RevealWindow { deadline_slots: 1 },
            ..CommitmentConfig::default()
        };
        let engine = CommitmentEngine::new(config).unwrap();
        engine.commit(10, 1, [0xAA; 20], 1_000, hash(3)).unwrap();

        assert_eq!(
            engine.reveal(Some(envelope(10, 1, hash(3))), 12),
            Err(CommitmentError::RevealExpired {
                slot: 10,
                builder_index: 1,
                current_slot: 12,
                deadline_slot: 11
            })
        );

        engine.check_deadlines(12);
        let penalties = engine.penalties();
        assert_eq!(penalties.len(), 1);
        assert_eq!(penalties[0].kind, PenaltyKind::NonReveal);
    }
}
