// verifier.rs
use crate::address::{
    recover_address, EthAddress, RecoveryId, MESSAGE_HASH_LEN, SIGNATURE_LEN,
};
use crate::error::CounterError;

/// A claim that `claimed_address` signed `message_hash`.
///
/// Built for a single verification and dropped afterwards; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureProof {
    pub message_hash: [u8; MESSAGE_HASH_LEN],
    pub signature: [u8; SIGNATURE_LEN],
    pub recovery_id: RecoveryId,
    pub claimed_address: EthAddress,
}

impl SignatureProof {
    /// Build a proof from untrusted wire values, checking their shape.
    pub fn from_parts(
        message_hash: [u8; MESSAGE_HASH_LEN],
        signature: &[u8],
        recovery_id: u8,
        claimed_address: EthAddress,
    ) -> Result<Self, CounterError> {
        let signature: [u8; SIGNATURE_LEN] = signature
            .try_into()
            .map_err(|_| CounterError::MalformedSignature)?;
        let recovery_id = RecoveryId::try_from(recovery_id)?;

        Ok(Self {
            message_hash,
            signature,
            recovery_id,
            claimed_address,
        })
    }
}

/// Check that the proof's signature recovers to its claimed address and
/// return that address.
pub fn verify(proof: &SignatureProof) -> Result<EthAddress, CounterError> {
    let recovered = recover_address(&proof.message_hash, &proof.signature, proof.recovery_id)?;
    if recovered != proof.claimed_address {
        return Err(CounterError::AddressMismatch);
    }
    Ok(recovered)
}
