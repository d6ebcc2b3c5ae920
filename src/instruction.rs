// instruction.rs
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::program_error::ProgramError;

use crate::address::EthAddress;
use crate::transition::SignedIncrement;

pub const CREATE: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 0];
pub const INCREMENT: [u8; 8] = [1, 0, 0, 0, 0, 0, 0, 0];
pub const INCREMENT_WITH_SIGNATURE: [u8; 8] = [2, 0, 0, 0, 0, 0, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramInstruction {
    /// Accounts: `[signer, writable]` initializer, `[writable]` counter PDA, system program.
    Create { signer_address: EthAddress },
    /// Accounts: `[writable]` counter, instructions sysvar.
    ///
    /// Must directly follow a secp256k1 instruction signing the current nonce.
    Increment,
    /// Accounts: `[writable]` counter.
    IncrementWithSignature(SignedIncrement),
}

#[derive(BorshSerialize, BorshDeserialize)]
struct CreatePayload {
    signer_address: EthAddress,
}

impl ProgramInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        // Ensure the input has at least 8 bytes for the variant
        if input.len() < 8 {
            return Err(ProgramError::InvalidInstructionData);
        }

        let (ix_discriminator, rest) = input.split_at(8);

        Ok(match ix_discriminator {
            [0, 0, 0, 0, 0, 0, 0, 0] => {
                let payload = CreatePayload::try_from_slice(rest)?;
                Self::Create {
                    signer_address: payload.signer_address,
                }
            }
            [1, 0, 0, 0, 0, 0, 0, 0] => {
                if !rest.is_empty() {
                    return Err(ProgramError::InvalidInstructionData);
                }
                Self::Increment
            }
            [2, 0, 0, 0, 0, 0, 0, 0] => {
                Self::IncrementWithSignature(SignedIncrement::try_from_slice(rest)?)
            }
            _ => return Err(ProgramError::InvalidInstructionData),
        })
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        let (ix_discriminator, payload) = match self {
            Self::Create { signer_address } => (
                CREATE,
                borsh::to_vec(&CreatePayload {
                    signer_address: *signer_address,
                })?,
            ),
            Self::Increment => (INCREMENT, Vec::new()),
            Self::IncrementWithSignature(request) => {
                (INCREMENT_WITH_SIGNATURE, borsh::to_vec(request)?)
            }
        };

        let mut data = Vec::with_capacity(ix_discriminator.len() + payload.len());
        data.extend_from_slice(&ix_discriminator);
        data.extend_from_slice(&payload);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_each_instruction() {
        let create = ProgramInstruction::Create {
            signer_address: [9; 20],
        };
        let data = create.pack().unwrap();
        assert_eq!(data.len(), 8 + 20);
        assert_eq!(data[8..], [9; 20]);
        assert_eq!(ProgramInstruction::unpack(&data), Ok(create));

        assert_eq!(ProgramInstruction::Increment.pack(), Ok(INCREMENT.to_vec()));

        assert_eq!(
            ProgramInstruction::unpack(&INCREMENT),
            Ok(ProgramInstruction::Increment)
        );

        let signed = ProgramInstruction::IncrementWithSignature(SignedIncrement {
            claimed_address: [1; 20],
            signature: [2; 64],
            recovery_id: 1,
        });
        let data = signed.pack().unwrap();
        assert_eq!(data.len(), 8 + 20 + 64 + 1);
        assert_eq!(data[..8], INCREMENT_WITH_SIGNATURE);
        assert_eq!(data[8..28], [1; 20]);
        assert_eq!(data[28..92], [2; 64]);
        assert_eq!(data[92], 1);
        assert_eq!(ProgramInstruction::unpack(&data), Ok(signed));
    }

    #[test]
    fn rejects_bad_data() {
        assert_eq!(
            ProgramInstruction::unpack(&[0; 7]),
            Err(ProgramError::InvalidInstructionData)
        );
        assert_eq!(
            ProgramInstruction::unpack(&[3, 0, 0, 0, 0, 0, 0, 0]),
            Err(ProgramError::InvalidInstructionData)
        );
        assert_eq!(
            ProgramInstruction::unpack(&[1, 0, 0, 0, 0, 0, 0, 0, 1]),
            Err(ProgramError::InvalidInstructionData)
        );
        // Truncated signer address.
        let mut create = CREATE.to_vec();
        create.extend_from_slice(&[9; 19]);
        assert!(ProgramInstruction::unpack(&create).is_err());
    }
}
