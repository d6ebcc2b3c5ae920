//! Data of the native secp256k1 verification instruction.
//!
//! The runtime checks every secp256k1 instruction of a transaction before any
//! program runs, so a program that finds one in the same transaction can rely
//! on the Ethereum address and message it declares. Layout:
//!
//! ```text
//! [0]      number of signatures
//! [1..12]  SecpSignatureOffsets (little-endian)
//! [12..]   eth_address (20) || signature (64) || recovery_id (1) || message
//! ```

use borsh::{BorshDeserialize, BorshSerialize};

use crate::address::{EthAddress, RecoveryId, ETH_ADDRESS_LEN, SIGNATURE_LEN};
use crate::error::CounterError;

pub const SIGNATURE_OFFSETS_SERIALIZED_SIZE: usize = 11;
pub const SIGNATURE_OFFSETS_START: usize = 1;
pub const DATA_START: usize = SIGNATURE_OFFSETS_START + SIGNATURE_OFFSETS_SERIALIZED_SIZE;

#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SecpSignatureOffsets {
    pub signature_offset: u16,
    pub signature_instruction_index: u8,
    pub eth_address_offset: u16,
    pub eth_address_instruction_index: u8,
    pub message_data_offset: u16,
    pub message_data_size: u16,
    pub message_instruction_index: u8,
}

/// The single signature a secp256k1 instruction vouches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecpVerification<'a> {
    pub eth_address: EthAddress,
    pub message: &'a [u8],
}

impl<'a> SecpVerification<'a> {
    /// Parse the data of the secp256k1 instruction found at `instruction_index`.
    ///
    /// Only one signature is accepted, and all offsets must point back into
    /// this same instruction; otherwise the address and message read here
    /// could differ from what the runtime actually verified.
    pub fn parse(data: &'a [u8], instruction_index: u8) -> Result<Self, CounterError> {
        if data.len() < DATA_START || data[0] != 1 {
            return Err(CounterError::InvalidSecpInstruction);
        }
        let offsets = SecpSignatureOffsets::try_from_slice(&data[SIGNATURE_OFFSETS_START..DATA_START])
            .map_err(|_| CounterError::InvalidSecpInstruction)?;

        if offsets.signature_instruction_index != instruction_index
            || offsets.eth_address_instruction_index != instruction_index
            || offsets.message_instruction_index != instruction_index
        {
            return Err(CounterError::InvalidSecpInstruction);
        }

        let eth_address: EthAddress = slice_at(data, offsets.eth_address_offset, ETH_ADDRESS_LEN)?
            .try_into()
            .map_err(|_| CounterError::InvalidSecpInstruction)?;
        let message = slice_at(
            data,
            offsets.message_data_offset,
            offsets.message_data_size as usize,
        )?;

        Ok(Self {
            eth_address,
            message,
        })
    }
}

fn slice_at(data: &[u8], offset: u16, len: usize) -> Result<&[u8], CounterError> {
    let start = offset as usize;
    let end = start
        .checked_add(len)
        .ok_or(CounterError::InvalidSecpInstruction)?;
    data.get(start..end)
        .ok_or(CounterError::InvalidSecpInstruction)
}

/// Encode a one-signature secp256k1 instruction that will sit at
/// `instruction_index` in its transaction.
pub fn encode(
    instruction_index: u8,
    eth_address: &EthAddress,
    signature: &[u8; SIGNATURE_LEN],
    recovery_id: RecoveryId,
    message: &[u8],
) -> Result<Vec<u8>, CounterError> {
    let eth_address_offset = DATA_START;
    let signature_offset = eth_address_offset + ETH_ADDRESS_LEN;
    let message_data_offset = signature_offset + SIGNATURE_LEN + 1;

    let offsets = SecpSignatureOffsets {
        signature_offset: to_u16(signature_offset)?,
        signature_instruction_index: instruction_index,
        eth_address_offset: to_u16(eth_address_offset)?,
        eth_address_instruction_index: instruction_index,
        message_data_offset: to_u16(message_data_offset)?,
        message_data_size: to_u16(message.len())?,
        message_instruction_index: instruction_index,
    };

    let mut data = Vec::with_capacity(message_data_offset + message.len());
    data.push(1);
    offsets
        .serialize(&mut data)
        .map_err(|_| CounterError::InvalidSecpInstruction)?;
    data.extend_from_slice(eth_address);
    data.extend_from_slice(signature);
    data.push(recovery_id.to_u8());
    data.extend_from_slice(message);
    Ok(data)
}

fn to_u16(value: usize) -> Result<u16, CounterError> {
    u16::try_from(value).map_err(|_| CounterError::InvalidSecpInstruction)
}
