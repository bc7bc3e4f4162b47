//! # ePBS Hashing Contract
//!
//! Keccak-256 over canonical byte concatenations, used wherever commitment
//! and evidence hashes must agree bit-for-bit across independent
//! implementations.
//!
//! Reference: SPEC_FULL.md Section 6 - External Interfaces (Hashing contract)

use epbs_types::{Address, BuilderBid, BuilderIndex, Gwei, Hash, Slot};
use sha3::{Digest, Keccak256};

/// Keccak-256 over an arbitrary byte slice.
pub fn keccak256(bytes: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Minimum big-endian byte encoding of a `u64`: no fixed-width padding, and
/// the zero value encodes as an empty byte string.
///
/// This matches Go's `big.Int.Bytes()`, which is the wire contract this
/// hashing scheme is built to agree with.
pub fn min_be_bytes(value: u64) -> Vec<u8> {
    let full = value.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(idx) => full[idx..].to_vec(),
        None => Vec::new(),
    }
}

/// `BidHash`: Keccak-256 over the bid's canonical fields in fixed order.
///
/// Reference: SPEC_FULL.md Section 4.1 - Validators
pub fn bid_hash(bid: &BuilderBid) -> Hash {
    let mut buf = Vec::with_capacity(32 * 4 + 20 + 8 * 4);
    buf.extend_from_slice(&bid.parent_block_hash);
    buf.extend_from_slice(&bid.parent_block_root);
    buf.extend_from_slice(&bid.block_hash);
    buf.extend_from_slice(&bid.prev_randao);
    buf.extend_from_slice(&bid.fee_recipient);
    buf.extend_from_slice(&min_be_bytes(bid.gas_limit));
    buf.extend_from_slice(&min_be_bytes(bid.builder_index));
    buf.extend_from_slice(&min_be_bytes(bid.slot));
    buf.extend_from_slice(&min_be_bytes(bid.value));
    keccak256(&buf)
}

/// `CommitmentHash`: Keccak-256 over `blockRoot ∥ builderAddress ∥
/// ascii("{slot}:{builderIndex}:{bidAmount}")`.
///
/// Reference: SPEC_FULL.md Section 4.6 - Commitment-reveal
pub fn commitment_hash(
    block_root: Hash,
    builder_address: Address,
    slot: Slot,
    builder_index: BuilderIndex,
    bid_amount: Gwei,
) -> Hash {
    let mut buf = Vec::with_capacity(32 + 20 + 48);
    buf.extend_from_slice(&block_root);
    buf.extend_from_slice(&builder_address);
    buf.extend_from_slice(format!("{slot}:{builder_index}:{bid_amount}").as_bytes());
    keccak256(&buf)
}

/// `EvidenceHash`: Keccak-256 over `conditionType ∥ BidHash ∥ builderAddress`.
///
/// `condition_tag` is the caller-supplied single-byte discriminant for the
/// violated slashing condition.
///
/// Reference: SPEC_FULL.md Section 4.7 - Slashing engine
pub fn evidence_hash(condition_tag: u8, bid_hash: Hash, builder_address: Address) -> Hash {
    let mut buf = Vec::with_capacity(1 + 32 + 20);
    buf.push(condition_tag);
    buf.extend_from_slice(&bid_hash);
    buf.extend_from_slice(&builder_address);
    keccak256(&buf)
}

/// Exact basis-point split: `(amount * bp) / 10_000`, computed without
/// intermediate overflow for `amount` up to roughly `2^64 / bp`.
///
/// Reference: SPEC_FULL.md Section 4.6/4.7 - the split-arithmetic trick
pub fn basis_points_of(amount: u64, basis_points: u64) -> u64 {
    (amount / 10_000) * basis_points + ((amount % 10_000) * basis_points) / 10_000
}
