// import crates / libraries
use crate::processor;
use solana_program::{
    account_info::AccountInfo, entrypoint, entrypoint::ProgramResult, msg, pubkey::Pubkey,
};

// declare and export the program's entrypoint
entrypoint!(process_instruction);

// program entrypoint's implementation
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    msg!(
        "process_instruction: Program {} is executed with {} account(s)",
        program_id,
        accounts.len()
    );
    processor::process_instruction(program_id, accounts, instruction_data).inspect_err(|e| {
        msg!("Program error: {}", e);
    })
}
