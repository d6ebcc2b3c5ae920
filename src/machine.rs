//! Transitions of a counter.
//!
//! These functions trust their caller to have verified a signature over
//! [`CounterState::expected_message_hash`] and only check that the address it
//! recovered to is the counter's signer. Every check runs before the first
//! write, so a failed transition leaves the state exactly as it was.

use crate::address::{message_hash, nonce_message, EthAddress, MESSAGE_HASH_LEN};
use crate::error::CounterError;
use crate::state::{CounterAccount, CounterState};

impl CounterState {
    pub fn create(&mut self, signer_address: EthAddress) -> Result<&CounterAccount, CounterError> {
        if let Self::Active(_) = self {
            return Err(CounterError::AlreadyInitialized);
        }
        *self = Self::Active(CounterAccount {
            signer_address,
            nonce: 0,
            count: 0,
        });
        self.fetch()
    }

    /// Advance the counter on behalf of `proof_address`.
    pub fn increment(&mut self, proof_address: &EthAddress) -> Result<&CounterAccount, CounterError> {
        let Self::Active(account) = self else {
            return Err(CounterError::NotInitialized);
        };
        if *proof_address != account.signer_address {
            return Err(CounterError::Unauthorized);
        }

        let nonce = account.nonce.checked_add(1).ok_or(CounterError::Overflow)?;
        let count = account.count.checked_add(1).ok_or(CounterError::Overflow)?;
        account.nonce = nonce;
        account.count = count;

        Ok(account)
    }

    pub fn fetch(&self) -> Result<&CounterAccount, CounterError> {
        match self {
            Self::Active(account) => Ok(account),
            Self::Uninitialized => Err(CounterError::NotInitialized),
        }
    }

    /// The bytes the signer must sign to authorize the next increment.
    pub fn expected_message(&self) -> Result<[u8; 8], CounterError> {
        Ok(nonce_message(self.fetch()?.nonce))
    }

    pub fn expected_message_hash(&self) -> Result<[u8; MESSAGE_HASH_LEN], CounterError> {
        Ok(message_hash(&self.expected_message()?))
    }
}
