#![allow(dead_code)]

use libsecp256k1::SecretKey;
use signed_counter::{
    processor::process_instruction,
    state::{find_counter_address, CounterAccount, CounterState},
};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::Signer,
    transaction::{Transaction, TransactionError},
};

pub const PROGRAM: Pubkey = Pubkey::new_from_array([7u8; 32]);

pub const AUTHORITY: u8 = 0x0a;
pub const STRANGER: u8 = 0x0b;

pub fn secret_key(seed: u8) -> SecretKey {
    let mut bytes = [0u8; 32];
    bytes[31] = seed;
    SecretKey::parse(&bytes).unwrap()
}

pub async fn start() -> ProgramTestContext {
    ProgramTest::new("signed_counter", PROGRAM, processor!(process_instruction))
        .start_with_context()
        .await
}

pub fn counter_pda(context: &ProgramTestContext) -> Pubkey {
    find_counter_address(&PROGRAM, &context.payer.pubkey()).0
}

pub async fn send(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
) -> Result<(), BanksClientError> {
    // A fresh blockhash keeps identical instruction lists from being deduplicated.
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &[&context.payer],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

pub async fn fetch(context: &mut ProgramTestContext, counter: Pubkey) -> CounterAccount {
    let account = context
        .banks_client
        .get_account(counter)
        .await
        .unwrap()
        .expect("counter account must exist");
    assert_eq!(account.owner, PROGRAM);
    assert_eq!(account.data.len(), CounterAccount::LEN);
    *CounterState::unpack(&account.data).unwrap().fetch().unwrap()
}

pub fn instruction_error(result: Result<(), BanksClientError>) -> (u8, InstructionError) {
    match result.unwrap_err().unwrap() {
        TransactionError::InstructionError(index, error) => (index, error),
        other => panic!("unexpected transaction error: {other:?}"),
    }
}

pub fn custom_error(result: Result<(), BanksClientError>) -> (u8, u32) {
    match instruction_error(result) {
        (index, InstructionError::Custom(code)) => (index, code),
        other => panic!("unexpected instruction error: {other:?}"),
    }
}
