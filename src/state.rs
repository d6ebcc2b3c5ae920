// state.rs
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::address::EthAddress;

pub const COUNTER_SEED: &[u8] = b"counter";

/// One counter per initializer: `[b"counter", initializer]`.
pub fn find_counter_address(program_id: &Pubkey, initializer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COUNTER_SEED, initializer.as_ref()], program_id)
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAccount {
    pub signer_address: EthAddress,
    pub nonce: u64,
    pub count: u64,
}

impl CounterAccount {
    /// Marks an initialized counter. Freshly allocated accounts are all zeroes.
    pub const DISCRIMINATOR: [u8; 8] = *b"sgnctr01";
    pub const SIZE: usize = 20 + 8 + 8;
    /// On-chain size: discriminator followed by the borsh encoded account.
    pub const LEN: usize = 8 + Self::SIZE;
}

/// Lifecycle of a counter: `Uninitialized -> Active`, no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    Uninitialized,
    Active(CounterAccount),
}

impl CounterState {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < CounterAccount::LEN {
            return Err(ProgramError::AccountDataTooSmall);
        }
        let (discriminator, mut rest) = data.split_at(8);

        if discriminator == [0u8; 8] {
            return Ok(Self::Uninitialized);
        }
        if discriminator != CounterAccount::DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        let account = CounterAccount::deserialize(&mut rest)?;
        Ok(Self::Active(account))
    }

    /// Write an `Active` counter into `data`. Uninitialized counters are
    /// never written back.
    pub fn pack(&self, data: &mut [u8]) -> Result<(), ProgramError> {
        let Self::Active(account) = self else {
            return Err(ProgramError::UninitializedAccount);
        };
        if data.len() < CounterAccount::LEN {
            return Err(ProgramError::AccountDataTooSmall);
        }
        let (discriminator, mut rest) = data.split_at_mut(8);
        discriminator.copy_from_slice(&CounterAccount::DISCRIMINATOR);
        account.serialize(&mut rest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> CounterState {
        CounterState::Active(CounterAccount {
            signer_address: [0xab; 20],
            nonce: 7,
            count: 7,
        })
    }

    #[test]
    fn zeroed_data_is_uninitialized() {
        let data = [0u8; CounterAccount::LEN];
        assert_eq!(CounterState::unpack(&data), Ok(CounterState::Uninitialized));
    }

    #[test]
    fn layout_is_discriminator_address_nonce_count() {
        let mut data = [0u8; CounterAccount::LEN];
        active().pack(&mut data).unwrap();

        assert_eq!(&data[..8], b"sgnctr01");
        assert_eq!(&data[8..28], &[0xab; 20]);
        assert_eq!(&data[28..36], &7u64.to_le_bytes());
        assert_eq!(&data[36..44], &7u64.to_le_bytes());
        assert_eq!(CounterState::unpack(&data), Ok(active()));
    }

    #[test]
    fn rejects_foreign_and_short_data() {
        let mut data = [0u8; CounterAccount::LEN];
        data[0] = 1;
        assert_eq!(
            CounterState::unpack(&data),
            Err(ProgramError::InvalidAccountData)
        );
        assert_eq!(
            CounterState::unpack(&data[..CounterAccount::LEN - 1]),
            Err(ProgramError::AccountDataTooSmall)
        );
    }

    #[test]
    fn uninitialized_is_not_packed() {
        let mut data = [0u8; CounterAccount::LEN];
        assert_eq!(
            CounterState::Uninitialized.pack(&mut data),
            Err(ProgramError::UninitializedAccount)
        );
        assert_eq!(data, [0u8; CounterAccount::LEN]);
    }
}
