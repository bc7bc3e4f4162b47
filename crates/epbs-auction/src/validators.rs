//! Pure, stateless structural validators.
//!
//! Reference: SPEC_FULL.md Section 4.1 - Validators

use epbs_crypto::bid_hash;
use epbs_types::{
    BuilderBid, PayloadAttestationData, PayloadEnvelope, SignedBuilderBid, ZERO_HASH,
};

use crate::error::{AuctionError, AuctionResult};

/// BLS signature verification, injected by the caller.
///
/// Reference: SPEC_FULL.md Section 1 - Non-goals (key management is out of
/// scope; only this contract at the boundary is specified).
pub trait BlsVerifier: Send + Sync {
    /// Verify `signature` over `message` under `pubkey`.
    fn verify(&self, pubkey: &epbs_types::BlsPubkey, message: &[u8], signature: &epbs_types::BlsSignature) -> bool;
}

/// A verifier that always reports success. Test-only: production callers
/// must supply a real verifier, per the zero-pubkey/zero-signature bypass
/// rule in [`validate_builder_bid`].
#[derive(Default)]
pub struct AlwaysValidVerifier;

impl BlsVerifier for AlwaysValidVerifier {
    fn verify(&self, _pubkey: &epbs_types::BlsPubkey, _message: &[u8], _signature: &epbs_types::BlsSignature) -> bool {
        true
    }
}

/// Checks a [`BuilderBid`]'s structural well-formedness: non-zero block hash
/// and parent block hash, positive value and slot.
pub fn validate_bid_fields(bid: &BuilderBid) -> AuctionResult<()> {
    if bid.block_hash == ZERO_HASH {
        return Err(AuctionError::EmptyBlockHash);
    }
    if bid.parent_block_hash == ZERO_HASH {
        return Err(AuctionError::EmptyParentBlockHash);
    }
    if bid.value == 0 {
        return Err(AuctionError::ZeroBidValue);
    }
    if bid.slot == 0 {
        return Err(AuctionError::ZeroSlot);
    }
    Ok(())
}

/// Validates a signed builder bid: structural fields, then (unless both
/// pubkey and signature are the zero test sentinel) signature verification
/// against [`epbs_crypto::bid_hash`].
pub fn validate_builder_bid(
    signed: &SignedBuilderBid,
    verifier: &dyn BlsVerifier,
) -> AuctionResult<()> {
    validate_bid_fields(&signed.message)?;

    if signed.requires_signature_check() {
        let message = bid_hash(&signed.message);
        if !verifier.verify(&signed.message.builder_pubkey, &message, &signed.signature) {
            return Err(AuctionError::BlsInvalidSignature);
        }
    }

    Ok(())
}

/// Validates a [`PayloadEnvelope`]'s structural well-formedness.
pub fn validate_payload_envelope(env: &PayloadEnvelope) -> AuctionResult<()> {
    if env.payload_root == ZERO_HASH {
        return Err(AuctionError::EmptyPayloadRoot);
    }
    if env.beacon_block_root == ZERO_HASH {
        return Err(AuctionError::EmptyBeaconRoot);
    }
    if env.state_root == ZERO_HASH {
        return Err(AuctionError::EmptyStateRoot);
    }
    if env.slot == 0 {
        return Err(AuctionError::ZeroSlot);
    }
    Ok(())
}

/// Validates a [`PayloadAttestationData`]'s structural well-formedness.
pub fn validate_payload_attestation_data(data: &PayloadAttestationData) -> AuctionResult<()> {
    if data.beacon_block_root == ZERO_HASH {
        return Err(AuctionError::EmptyBeaconRoot);
    }
    if data.slot == 0 {
        return Err(AuctionError::ZeroSlot);
    }
    Ok(())
}

/// Checks that a bid and its matching payload envelope agree on slot and
/// builder index. Slot is checked before builder index.
pub fn validate_bid_envelope_consistency(
    bid: &BuilderBid,
    env: &PayloadEnvelope,
) -> AuctionResult<()> {
    if bid.slot != env.slot {
        return Err(AuctionError::SlotMismatch {
            bid_slot: bid.slot,
            payload_slot: env.slot,
        });
    }
    if bid.builder_index != env.builder_index {
        return Err(AuctionError::BuilderMismatch {
            bid_builder: bid.builder_index,
            payload_builder: env.builder_index,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use epbs_types::{BlsPubkey, BlsSignature};

    fn hash(byte: u8) -> epbs_types::Hash {
        let mut h = [0u8; 32];
        h[0] = byte;
        h
    }

    fn well_formed_bid() -> BuilderBid {
        BuilderBid {
            parent_block_hash: hash(1),
            parent_block_root: hash(2),
            block_hash: hash(3),
            prev_randao: hash(4),
            fee_recipient: [0xAB; 20],
            gas_limit: 30_000_000,
            builder_index: 7,
            slot: 100,
            value: 5_000,
            execution_payment: 0,
            blob_kzg_commitments: vec![],
            blob_kzg_commitments_root: [0u8; 32],
            builder_pubkey: BlsPubkey::zero(),
        }
    }

    #[test]
    fn rejects_zero_block_hash() {
        let mut bid = well_formed_bid();
        bid.block_hash = [0u8; 32];
        assert_eq!(validate_bid_fields(&bid), Err(AuctionError::EmptyBlockHash));
    }

    #[test]
    fn rejects_zero_value() {
        let mut bid = well_formed_bid();
        bid.value = 0;
        assert_eq!(validate_bid_fields(&bid), Err(AuctionError::ZeroBidValue));
    }

    #[test]
    fn zero_sentinel_signature_bypasses_verification() {
        let signed = SignedBuilderBid::new(well_formed_bid(), BlsSignature::zero());
        assert!(validate_builder_bid(&signed, &AlwaysValidVerifier).is_ok());
    }

    #[test]
    fn nonzero_pubkey_requires_verification() {
        let mut bid = well_formed_bid();
        bid.builder_pubkey = BlsPubkey([1u8; 48]);
        let signed = SignedBuilderBid::new(bid, BlsSignature([1u8; 96]));

        struct RejectAll;
        impl BlsVerifier for RejectAll {
            fn verify(&self, _: &BlsPubkey, _: &[u8], _: &BlsSignature) -> bool {
                false
            }
        }

        assert_eq!(
            validate_builder_bid(&signed, &RejectAll),
            Err(AuctionError::BlsInvalidSignature)
        );
    }

    #[test]
    fn consistency_checks_slot_before_builder() {
        let bid = well_formed_bid();
        let env = PayloadEnvelope {
            payload_root: bid.block_hash,
            builder_index: bid.builder_index + 1,
            beacon_block_root: hash(9),
            slot: bid.slot + 1,
            state_root: hash(10),
            blob_kzg_commitments: vec![],
        };

        match validate_bid_envelope_consistency(&bid, &env) {
            Err(AuctionError::SlotMismatch { .. }) => {}
            other => panic!("expected SlotMismatch, got {other:?}"),
        }
    }

    #[test]
    fn consistency_checks_builder_after_slot_matches() {
        let bid = well_formed_bid();
        let env = PayloadEnvelope {
            payload_root: bid.block_hash,
            builder_index: bid.builder_index + 1,
            beacon_block_root: hash(9),
            slot: bid.slot,
            state_root: hash(10),
            blob_kzg_commitments: vec![],
        };

        match validate_bid_envelope_consistency(&bid, &env) {
            Err(AuctionError::BuilderMismatch { .. }) => {}
            other => panic!("expected BuilderMismatch, got {other:?}"),
        }
    }
}
