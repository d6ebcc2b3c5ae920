use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    secp256k1_program, system_instruction, system_program,
    sysvar::{instructions, rent::Rent, Sysvar},
};

use crate::{
    address::EthAddress,
    error::CounterError,
    instruction::ProgramInstruction,
    secp_instruction::SecpVerification,
    state::{find_counter_address, CounterAccount, CounterState, COUNTER_SEED},
    transition::{apply_precompile_increment, apply_signed_increment, SignedIncrement},
};

// program entrypoint's implementation
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    // Unpack instruction discriminator and instruction data
    let instruction = ProgramInstruction::unpack(instruction_data)?;

    // Call the corresponding function
    match instruction {
        // 0: Create
        ProgramInstruction::Create { signer_address } => {
            msg!("Instruction: Create");
            process_create(program_id, accounts, signer_address)
        }

        // 1: Increment
        ProgramInstruction::Increment => {
            msg!("Instruction: Increment");
            process_increment(program_id, accounts)
        }

        // 2: IncrementWithSignature
        ProgramInstruction::IncrementWithSignature(request) => {
            msg!("Instruction: IncrementWithSignature");
            process_increment_with_signature(program_id, accounts, &request)
        }
    }
}

pub fn process_create(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    signer_address: EthAddress,
) -> ProgramResult {
    // Iterating accounts
    let accounts_iter = &mut accounts.iter();
    let initializer_account = next_account_info(accounts_iter)?;
    let counter_account = next_account_info(accounts_iter)?;
    let system_program_account = next_account_info(accounts_iter)?;

    if !initializer_account.is_signer {
        msg!("Initializer {} should be the signer", initializer_account.key);
        return Err(ProgramError::MissingRequiredSignature);
    }
    if !system_program::check_id(system_program_account.key) {
        return Err(ProgramError::IncorrectProgramId);
    }

    // Check to ensure that you're using the right PDA
    let (counter_pda, bump_seed) = find_counter_address(program_id, initializer_account.key);
    if counter_pda != *counter_account.key {
        msg!("Invalid seeds for PDA");
        return Err(ProgramError::InvalidArgument);
    }

    let rent = Rent::get()?;
    let rent_lamports = rent.minimum_balance(CounterAccount::LEN);
    let bump = [bump_seed];
    let counter_seeds: &[&[u8]] = &[COUNTER_SEED, initializer_account.key.as_ref(), &bump];

    if counter_account.lamports() == 0 {
        // Allocate the counter account on first use
        msg!(
            "Allocating counter account {} with {} lamports",
            counter_pda,
            rent_lamports
        );
        invoke_signed(
            &system_instruction::create_account(
                initializer_account.key,
                counter_account.key,
                rent_lamports,
                CounterAccount::LEN as u64,
                program_id,
            ),
            &[
                initializer_account.clone(),
                counter_account.clone(),
                system_program_account.clone(),
            ],
            &[counter_seeds],
        )?;
    } else if system_program::check_id(counter_account.owner) {
        // The PDA was funded before it was created: top it up, then allocate and assign
        let top_up = rent_lamports.saturating_sub(counter_account.lamports());
        msg!(
            "Adopting prefunded counter account {} with {} extra lamports",
            counter_pda,
            top_up
        );
        if top_up > 0 {
            invoke(
                &system_instruction::transfer(
                    initializer_account.key,
                    counter_account.key,
                    top_up,
                ),
                &[
                    initializer_account.clone(),
                    counter_account.clone(),
                    system_program_account.clone(),
                ],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(counter_account.key, CounterAccount::LEN as u64),
            &[counter_account.clone(), system_program_account.clone()],
            &[counter_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(counter_account.key, program_id),
            &[counter_account.clone(), system_program_account.clone()],
            &[counter_seeds],
        )?;
    }
    check_counter_owner(program_id, counter_account)?;

    let mut state = CounterState::unpack(&counter_account.data.borrow())?;
    let counter = *state.create(signer_address)?;
    state.pack(&mut counter_account.data.borrow_mut()[..])?;
    msg!(
        "Counter {} created for signer {:?}",
        counter_account.key,
        counter.signer_address
    );

    Ok(())
}

pub fn process_increment(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    // Iterating accounts
    let accounts_iter = &mut accounts.iter();
    let counter_account = next_account_info(accounts_iter)?;
    let sysvar_instructions = next_account_info(accounts_iter)?;

    check_counter_owner(program_id, counter_account)?;

    // The secp256k1 instruction must come directly before this one
    let current_index = instructions::load_current_index_checked(sysvar_instructions)?;
    if current_index == 0 {
        return Err(CounterError::InstructionAtWrongIndex.into());
    }
    let secp_index = current_index - 1;
    let secp_ix = instructions::load_instruction_at_checked(secp_index as usize, sysvar_instructions)?;
    if secp_ix.program_id != secp256k1_program::ID {
        msg!("Instruction {} is not a secp256k1 instruction", secp_index);
        return Err(CounterError::InvalidSecpInstruction.into());
    }
    let secp_index =
        u8::try_from(secp_index).map_err(|_| CounterError::InvalidSecpInstruction)?;
    let verification = SecpVerification::parse(&secp_ix.data, secp_index)?;

    let mut state = CounterState::unpack(&counter_account.data.borrow())?;
    let counter = *apply_precompile_increment(&mut state, &verification)?;
    state.pack(&mut counter_account.data.borrow_mut()[..])?;
    log_counter(counter_account.key, &counter);

    Ok(())
}

pub fn process_increment_with_signature(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    request: &SignedIncrement,
) -> ProgramResult {
    // Iterating accounts
    let accounts_iter = &mut accounts.iter();
    let counter_account = next_account_info(accounts_iter)?;

    check_counter_owner(program_id, counter_account)?;

    let mut state = CounterState::unpack(&counter_account.data.borrow())?;
    let counter = *apply_signed_increment(&mut state, request)?;
    state.pack(&mut counter_account.data.borrow_mut()[..])?;
    log_counter(counter_account.key, &counter);

    Ok(())
}

fn check_counter_owner(program_id: &Pubkey, counter_account: &AccountInfo) -> ProgramResult {
    if counter_account.owner != program_id {
        msg!("Counter {} is not owned by this program", counter_account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    if !counter_account.is_writable {
        return Err(ProgramError::InvalidArgument);
    }
    Ok(())
}

fn log_counter(key: &Pubkey, counter: &CounterAccount) {
    msg!(
        "Counter {} nonce: {} count: {}",
        key,
        counter.nonce,
        counter.count
    );
}
