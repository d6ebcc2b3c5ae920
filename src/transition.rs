//! Verify-then-advance as one unit.
//!
//! Each function takes the evidence that a signature was checked, derives the
//! message from the counter's own nonce and only then touches the counter.
//! Any error returns before [`CounterState::increment`] writes, so the state
//! is either advanced by exactly one or left as it was.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::address::{EthAddress, SIGNATURE_LEN};
use crate::error::CounterError;
use crate::secp_instruction::SecpVerification;
use crate::state::{CounterAccount, CounterState};
use crate::verifier::{verify, SignatureProof};

/// Signature submitted together with an increment.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedIncrement {
    pub claimed_address: EthAddress,
    pub signature: [u8; SIGNATURE_LEN],
    pub recovery_id: u8,
}

/// Recover the signer of the current nonce and increment on its behalf.
pub fn apply_signed_increment<'a>(
    state: &'a mut CounterState,
    request: &SignedIncrement,
) -> Result<&'a CounterAccount, CounterError> {
    let proof = SignatureProof::from_parts(
        state.expected_message_hash()?,
        &request.signature,
        request.recovery_id,
        request.claimed_address,
    )?;
    let verified = verify(&proof)?;
    state.increment(&verified)
}

/// Increment on behalf of a signature the native secp256k1 program already
/// verified in the same transaction.
///
/// The precompile signs `keccak256(message)` itself, so the message it carries
/// must be exactly the current nonce. A signature over any other nonce is
/// treated like one from a stranger.
pub fn apply_precompile_increment<'a>(
    state: &'a mut CounterState,
    verification: &SecpVerification<'_>,
) -> Result<&'a CounterAccount, CounterError> {
    if verification.message != state.expected_message()? {
        return Err(CounterError::Unauthorized);
    }
    state.increment(&verification.eth_address)
}
