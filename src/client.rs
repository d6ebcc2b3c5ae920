//! Off-chain side of the protocol.
//!
//! The authority's key is always passed in explicitly; nothing here keeps
//! key material around between calls.

use libsecp256k1::{Message, PublicKey, SecretKey};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    secp256k1_program, system_program, sysvar,
};

use crate::address::{
    address_from_public_key, message_hash, nonce_message, EthAddress, RecoveryId,
    MESSAGE_HASH_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN,
};
use crate::error::CounterError;
use crate::instruction::ProgramInstruction;
use crate::secp_instruction;
use crate::state::find_counter_address;
use crate::transition::SignedIncrement;

/// Address a counter should be created with to be driven by `secret_key`.
pub fn signer_address(secret_key: &SecretKey) -> EthAddress {
    let serialized = PublicKey::from_secret_key(secret_key).serialize();
    let mut public_key = [0u8; PUBLIC_KEY_LEN];
    // Drop the 0x04 uncompressed tag.
    public_key.copy_from_slice(&serialized[1..]);
    address_from_public_key(&public_key)
}

/// Sign a prehashed message, returning `r || s` (low-s) and the recovery id.
pub fn sign_message_hash(
    secret_key: &SecretKey,
    message_hash: &[u8; MESSAGE_HASH_LEN],
) -> Result<([u8; SIGNATURE_LEN], RecoveryId), CounterError> {
    let (signature, recovery_id) = libsecp256k1::sign(&Message::parse(message_hash), secret_key);
    Ok((
        signature.serialize(),
        RecoveryId::try_from(recovery_id.serialize())?,
    ))
}

/// Authorize the increment that moves a counter away from `nonce`.
pub fn sign_nonce(secret_key: &SecretKey, nonce: u64) -> Result<SignedIncrement, CounterError> {
    let (signature, recovery_id) =
        sign_message_hash(secret_key, &message_hash(&nonce_message(nonce)))?;
    Ok(SignedIncrement {
        claimed_address: signer_address(secret_key),
        signature,
        recovery_id: recovery_id.to_u8(),
    })
}

pub fn create_instruction(
    program_id: &Pubkey,
    initializer: &Pubkey,
    signer_address: EthAddress,
) -> Result<Instruction, ProgramError> {
    let (counter, _bump) = find_counter_address(program_id, initializer);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*initializer, true),
            AccountMeta::new(counter, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: ProgramInstruction::Create { signer_address }.pack()?,
    })
}

/// Native secp256k1 instruction signing `nonce`, to be placed at
/// `instruction_index` in the transaction.
pub fn secp256k1_instruction(
    secret_key: &SecretKey,
    nonce: u64,
    instruction_index: u8,
) -> Result<Instruction, CounterError> {
    let message = nonce_message(nonce);
    let (signature, recovery_id) = sign_message_hash(secret_key, &message_hash(&message))?;
    let data = secp_instruction::encode(
        instruction_index,
        &signer_address(secret_key),
        &signature,
        recovery_id,
        &message,
    )?;
    Ok(Instruction {
        program_id: secp256k1_program::ID,
        accounts: vec![],
        data,
    })
}

/// Increment that must directly follow a [`secp256k1_instruction`].
pub fn increment_instruction(
    program_id: &Pubkey,
    counter: &Pubkey,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*counter, false),
            AccountMeta::new_readonly(sysvar::instructions::ID, false),
        ],
        data: ProgramInstruction::Increment.pack()?,
    })
}

/// Self-contained increment: the program recovers the signer itself.
pub fn increment_with_signature_instruction(
    program_id: &Pubkey,
    counter: &Pubkey,
    secret_key: &SecretKey,
    nonce: u64,
) -> Result<Instruction, ProgramError> {
    let request = sign_nonce(secret_key, nonce)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*counter, false)],
        data: ProgramInstruction::IncrementWithSignature(request).pack()?,
    })
}
