#![allow(unexpected_cfgs)]

pub mod address; // secp256k1 public key / signature -> 20-byte address
pub mod error; // custom program errors
pub mod instruction; // instruction discriminators and payloads
pub mod machine; // counter transitions: create, increment, fetch
pub mod processor; // where instruction logics are processed
pub mod secp_instruction; // native secp256k1 instruction layout
pub mod state; // on-chain account / data structure
pub mod transition; // verification and increment as one unit
pub mod verifier; // signature proofs

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint; // where the Solana program process starts

#[cfg(not(target_os = "solana"))]
pub mod client; // off-chain signing and instruction builders
