use signed_counter::{client, error::CounterError};
use solana_sdk::{instruction::InstructionError, signature::Signer};

mod utils;

#[tokio::test]
async fn increment_with_signature() {
    let mut context = utils::start().await;
    let authority_key = utils::secret_key(utils::AUTHORITY);
    let stranger_key = utils::secret_key(utils::STRANGER);
    let counter = utils::counter_pda(&context);
    let payer = context.payer.pubkey();

    let create_ix = client::create_instruction(
        &utils::PROGRAM,
        &payer,
        client::signer_address(&authority_key),
    )
    .unwrap();
    utils::send(&mut context, &[create_ix]).await.unwrap();

    let signed_zero =
        client::increment_with_signature_instruction(&utils::PROGRAM, &counter, &authority_key, 0)
            .unwrap();
    utils::send(&mut context, &[signed_zero.clone()])
        .await
        .unwrap();
    let account = utils::fetch(&mut context, counter).await;
    assert_eq!((account.nonce, account.count), (1, 1));

    // Replay: the program hashes nonce 1, so the signature recovers to some
    // other key.
    let (index, code) = utils::custom_error(utils::send(&mut context, &[signed_zero]).await);
    assert_eq!(index, 0);
    assert!(
        code == CounterError::AddressMismatch as u32
            || code == CounterError::InvalidSignature as u32
    );

    let foreign =
        client::increment_with_signature_instruction(&utils::PROGRAM, &counter, &stranger_key, 1)
            .unwrap();
    assert_eq!(
        utils::custom_error(utils::send(&mut context, &[foreign]).await),
        (0, CounterError::Unauthorized as u32)
    );
    let account = utils::fetch(&mut context, counter).await;
    assert_eq!((account.nonce, account.count), (1, 1));

    let signed_one =
        client::increment_with_signature_instruction(&utils::PROGRAM, &counter, &authority_key, 1)
            .unwrap();
    utils::send(&mut context, &[signed_one]).await.unwrap();
    let account = utils::fetch(&mut context, counter).await;
    assert_eq!((account.nonce, account.count), (2, 2));
}

#[tokio::test]
async fn increment_before_create_is_rejected() {
    let mut context = utils::start().await;
    let authority_key = utils::secret_key(utils::AUTHORITY);
    let counter = utils::counter_pda(&context);

    let signed_zero =
        client::increment_with_signature_instruction(&utils::PROGRAM, &counter, &authority_key, 0)
            .unwrap();
    let result = utils::send(&mut context, &[signed_zero]).await;
    // The PDA does not exist yet, so it is not owned by the program.
    assert_eq!(
        utils::instruction_error(result),
        (0, InstructionError::IncorrectProgramId)
    );
    assert!(context
        .banks_client
        .get_account(counter)
        .await
        .unwrap()
        .is_none());
}
