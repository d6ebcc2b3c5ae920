//! Ethereum-style identities for secp256k1 keys.
//!
//! A counter stores the 20-byte address of its authority instead of the
//! public key. Signatures are tied back to that address by recovering the
//! public key from `(message_hash, signature, recovery_id)` and hashing it.

use solana_program::{keccak, secp256k1_recover::secp256k1_recover};

use crate::error::CounterError;

pub const ETH_ADDRESS_LEN: usize = 20;
pub const PUBLIC_KEY_LEN: usize = 64;
pub const SIGNATURE_LEN: usize = 64;
pub const MESSAGE_HASH_LEN: usize = 32;

pub type EthAddress = [u8; ETH_ADDRESS_LEN];

/// Half of the secp256k1 group order, big-endian. Signatures with a larger
/// `s` are the malleated twin of a canonical one and are refused.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Recovery id accepted at the address boundary.
///
/// Only `0` and `1` are valid. Ids `2`/`3` (x-coordinate overflow) and the
/// Ethereum `27`/`28` encoding are rejected instead of being mapped down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryId(u8);

impl RecoveryId {
    pub const MAX: u8 = 1;

    pub fn to_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = CounterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(CounterError::MalformedSignature);
        }
        Ok(Self(value))
    }
}

/// The message signed for a given nonce: `nonce` as 8 big-endian bytes.
pub fn nonce_message(nonce: u64) -> [u8; 8] {
    nonce.to_be_bytes()
}

/// Keccak-256, the digest the native secp256k1 program signs over.
pub fn message_hash(message: &[u8]) -> [u8; MESSAGE_HASH_LEN] {
    keccak::hash(message).to_bytes()
}

/// `keccak256(x || y)[12..]` of an uncompressed point without its `0x04` tag.
pub fn address_from_public_key(public_key: &[u8; PUBLIC_KEY_LEN]) -> EthAddress {
    let digest = keccak::hash(public_key).to_bytes();
    let mut address = [0u8; ETH_ADDRESS_LEN];
    address.copy_from_slice(&digest[MESSAGE_HASH_LEN - ETH_ADDRESS_LEN..]);
    address
}

/// Recover the address that produced `signature` (`r || s`) over `message_hash`.
pub fn recover_address(
    message_hash: &[u8; MESSAGE_HASH_LEN],
    signature: &[u8; SIGNATURE_LEN],
    recovery_id: RecoveryId,
) -> Result<EthAddress, CounterError> {
    let (r, s) = signature.split_at(32);
    if is_zero(r) || is_zero(s) || !is_low_s(s) {
        return Err(CounterError::InvalidSignature);
    }

    let public_key = secp256k1_recover(message_hash, recovery_id.to_u8(), signature)
        .map_err(|_| CounterError::InvalidSignature)?;

    Ok(address_from_public_key(&public_key.to_bytes()))
}

fn is_zero(scalar: &[u8]) -> bool {
    scalar.iter().all(|b| *b == 0)
}

// Big-endian byte strings of equal length compare like the integers they encode.
fn is_low_s(s: &[u8]) -> bool {
    s <= &SECP256K1_HALF_ORDER[..]
}
