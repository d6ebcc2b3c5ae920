// error.rs
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Failures of signature verification and of counter transitions.
///
/// The discriminant is the custom program error code surfaced to clients,
/// so variants must only ever be appended.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CounterError {
    #[error("malformed signature or recovery id")]
    MalformedSignature = 0,

    #[error("signature does not recover to a public key")]
    InvalidSignature = 1,

    #[error("recovered address does not match the claimed address")]
    AddressMismatch = 2,

    #[error("proof address is not the counter's signer")]
    Unauthorized = 3,

    #[error("counter already initialized")]
    AlreadyInitialized = 4,

    #[error("counter not initialized")]
    NotInitialized = 5,

    #[error("counter overflow")]
    Overflow = 6,

    #[error("increment must follow a secp256k1 instruction")]
    InstructionAtWrongIndex = 7,

    #[error("invalid secp256k1 instruction")]
    InvalidSecpInstruction = 8,
}

impl From<CounterError> for ProgramError {
    fn from(e: CounterError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
