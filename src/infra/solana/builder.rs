//! Pure transaction builders for the mutating operations.
//!
//! Builders take fully resolved inputs, perform no I/O, and return the
//! partially signed transaction encoded as base64. The fee payer's signature
//! slot is left empty for the remote service to fill.

use base64::{Engine, prelude::BASE64_STANDARD};

use super::memo::kin_memo_instruction;
use super::programs::{
    AuthorityType, associated_token_address, create_associated_token_account, set_authority,
    transfer_checked,
};
use super::wire::{Instruction, Message, Transaction};
use crate::domain::{PublicKey, TransactionError, TransactionSigner, TransactionType};

/// Inputs for a create-account transaction.
pub struct CreateAccountTransaction<'a> {
    pub add_memo: bool,
    pub blockhash: &'a str,
    pub index: u32,
    pub fee_payer: &'a str,
    pub mint: &'a str,
    pub owner: &'a dyn TransactionSigner,
}

/// Inputs for a transfer transaction.
///
/// `amount` is in base units, already checked against `mint_decimals` with
/// [`parse_amount`].
pub struct MakeTransferTransaction<'a> {
    pub add_memo: bool,
    pub amount: u64,
    pub blockhash: &'a str,
    pub destination: &'a PublicKey,
    pub index: u32,
    pub mint_decimals: u8,
    pub fee_payer: &'a str,
    pub mint: &'a str,
    pub owner: &'a dyn TransactionSigner,
    pub sender_create: bool,
    pub transaction_type: TransactionType,
}

/// Output of a builder, ready to be placed in an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub transaction: Transaction,
    /// Base64 encoding of the serialized transaction.
    pub encoded: String,
}

/// Convert a decimal amount such as `"10.5"` into base units for a mint with
/// `decimals` digits of precision, without going through floating point.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, TransactionError> {
    let invalid = |message: &str| TransactionError::InvalidAmount {
        amount: amount.to_string(),
        message: message.to_string(),
    };

    let trimmed = amount.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("amount is empty"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("amount must be a non-negative decimal number"));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(invalid(&format!(
            "more than {decimals} fractional digits"
        )));
    }

    let digits = format!("{whole}{fraction:0<width$}", width = usize::from(decimals));
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<u64>()
        .map_err(|_| invalid("amount overflows u64 base units"))
}

fn app_index(index: u32) -> Result<u16, TransactionError> {
    u16::try_from(index)
        .map_err(|_| TransactionError::TooLarge(format!("app index {index} exceeds u16")))
}

fn finish(
    fee_payer: &PublicKey,
    instructions: &[Instruction],
    blockhash: &str,
    owner: &dyn TransactionSigner,
) -> Result<BuiltTransaction, TransactionError> {
    let message = Message::compile(fee_payer, instructions, blockhash)?;
    let mut transaction = Transaction::new_unsigned(message);
    transaction.partial_sign(owner)?;
    let encoded = BASE64_STANDARD.encode(transaction.serialize()?);
    Ok(BuiltTransaction {
        transaction,
        encoded,
    })
}

/// Build a transaction that creates the owner's token account for `mint`
/// and hands its close authority to the fee payer.
pub fn generate_create_account_transaction(
    input: &CreateAccountTransaction<'_>,
) -> Result<BuiltTransaction, TransactionError> {
    let mint = PublicKey::parse_field(input.mint, "mint")?;
    let fee_payer = PublicKey::parse_field(input.fee_payer, "fee_payer")?;
    let owner = input.owner.public_key();

    let owner_token_account = associated_token_address(&owner, &mint).ok_or_else(|| {
        TransactionError::InvalidPublicKey {
            field: "owner".to_string(),
            value: owner.to_string(),
        }
    })?;

    let mut instructions = Vec::with_capacity(3);
    if input.add_memo {
        instructions.push(kin_memo_instruction(
            TransactionType::None,
            app_index(input.index)?,
        ));
    }
    instructions.push(create_associated_token_account(
        &fee_payer,
        &owner_token_account,
        &owner,
        &mint,
    ));
    instructions.push(set_authority(
        &owner_token_account,
        &owner,
        AuthorityType::CloseAccount,
        &fee_payer,
    ));

    finish(&fee_payer, &instructions, input.blockhash, input.owner)
}

/// Build a transfer of `amount` from the owner's token account to the
/// destination's, optionally creating the destination account first.
pub fn generate_make_transfer_transaction(
    input: &MakeTransferTransaction<'_>,
) -> Result<BuiltTransaction, TransactionError> {
    let mint = PublicKey::parse_field(input.mint, "mint")?;
    let fee_payer = PublicKey::parse_field(input.fee_payer, "fee_payer")?;
    let destination = input.destination;
    let owner = input.owner.public_key();

    let derive = |account: &PublicKey, field: &str| {
        associated_token_address(account, &mint).ok_or_else(|| {
            TransactionError::InvalidPublicKey {
                field: field.to_string(),
                value: account.to_string(),
            }
        })
    };
    let owner_token_account = derive(&owner, "owner")?;
    let destination_token_account = derive(destination, "destination")?;

    let mut instructions = Vec::with_capacity(3);
    if input.add_memo {
        instructions.push(kin_memo_instruction(
            input.transaction_type,
            app_index(input.index)?,
        ));
    }
    if input.sender_create {
        instructions.push(create_associated_token_account(
            &fee_payer,
            &destination_token_account,
            destination,
            &mint,
        ));
    }
    instructions.push(transfer_checked(
        &owner_token_account,
        &mint,
        &destination_token_account,
        &owner,
        input.amount,
        input.mint_decimals,
    ));

    finish(&fee_payer, &instructions, input.blockhash, input.owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::solana::Keypair;
    use crate::infra::solana::programs::{
        ASSOCIATED_TOKEN_PROGRAM_ID, MEMO_PROGRAM_ID, TOKEN_PROGRAM_ID,
    };

    fn key(byte: u8) -> String {
        PublicKey::new([byte; 32]).to_string()
    }

    fn programs_of(built: &BuiltTransaction) -> Vec<PublicKey> {
        let message = &built.transaction.message;
        message
            .instructions
            .iter()
            .map(|ix| message.account_keys[usize::from(ix.program_id_index)])
            .collect()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10.5", 6).unwrap(), 10_500_000);
        assert_eq!(parse_amount("1", 5).unwrap(), 100_000);
        assert_eq!(parse_amount("0.00001", 5).unwrap(), 1);
        assert_eq!(parse_amount(".5", 1).unwrap(), 5);
        assert_eq!(parse_amount("0", 5).unwrap(), 0);
        assert_eq!(parse_amount("7", 0).unwrap(), 7);
    }

    #[test]
    fn test_parse_amount_rejects_invalid() {
        assert!(parse_amount("", 5).is_err());
        assert!(parse_amount(".", 5).is_err());
        assert!(parse_amount("-1", 5).is_err());
        assert!(parse_amount("1e5", 5).is_err());
        assert!(parse_amount("1.000001", 5).is_err());
        assert!(parse_amount("1.5", 0).is_err());
        assert!(parse_amount("184467440737095516160", 0).is_err());
    }

    #[test]
    fn test_create_account_without_memo() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let mint = key(2);
        let fee_payer = key(3);
        let blockhash = key(4);

        let built = generate_create_account_transaction(&CreateAccountTransaction {
            add_memo: false,
            blockhash: &blockhash,
            index: 1,
            fee_payer: &fee_payer,
            mint: &mint,
            owner: &owner,
        })
        .unwrap();

        assert_eq!(
            programs_of(&built),
            vec![ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID]
        );
        let message = &built.transaction.message;
        assert_eq!(message.account_keys[0].to_string(), fee_payer);
        assert_eq!(message.signer_keys()[1], owner.public_key());
        assert_eq!(built.transaction.signatures[0], [0u8; 64]);
        assert_ne!(built.transaction.signatures[1], [0u8; 64]);
        assert!(!built.encoded.is_empty());
    }

    #[test]
    fn test_create_account_with_memo() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let built = generate_create_account_transaction(&CreateAccountTransaction {
            add_memo: true,
            blockhash: &key(4),
            index: 1,
            fee_payer: &key(3),
            mint: &key(2),
            owner: &owner,
        })
        .unwrap();

        assert_eq!(programs_of(&built)[0], MEMO_PROGRAM_ID);
        assert_eq!(programs_of(&built).len(), 3);
    }

    #[test]
    fn test_create_account_rejects_malformed_mint() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let err = generate_create_account_transaction(&CreateAccountTransaction {
            add_memo: false,
            blockhash: &key(4),
            index: 1,
            fee_payer: &key(3),
            mint: "M1",
            owner: &owner,
        })
        .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidPublicKey { field, .. } if field == "mint"));
    }

    fn transfer<'a>(
        owner: &'a Keypair,
        keys: &'a [String; 3],
        destination: &'a PublicKey,
    ) -> MakeTransferTransaction<'a> {
        MakeTransferTransaction {
            add_memo: false,
            amount: 10_500_000,
            blockhash: &keys[0],
            destination,
            index: 1,
            mint_decimals: 6,
            fee_payer: &keys[1],
            mint: &keys[2],
            owner,
            sender_create: false,
            transaction_type: TransactionType::None,
        }
    }

    #[test]
    fn test_make_transfer_only_transfer_instruction() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let keys = [key(4), key(3), key(2)];
        let destination = PublicKey::new([5; 32]);
        let built =
            generate_make_transfer_transaction(&transfer(&owner, &keys, &destination)).unwrap();

        assert_eq!(programs_of(&built), vec![TOKEN_PROGRAM_ID]);
        let data = &built.transaction.message.instructions[0].data;
        assert_eq!(data[0], 12);
        assert_eq!(&data[1..9], &10_500_000u64.to_le_bytes());
        assert_eq!(data[9], 6);
    }

    #[test]
    fn test_make_transfer_bundles_account_creation() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let keys = [key(4), key(3), key(2)];
        let destination = PublicKey::new([5; 32]);
        let mut input = transfer(&owner, &keys, &destination);
        input.sender_create = true;
        input.add_memo = true;
        input.transaction_type = TransactionType::P2P;

        let built = generate_make_transfer_transaction(&input).unwrap();
        assert_eq!(
            programs_of(&built),
            vec![
                MEMO_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID
            ]
        );
    }

    #[test]
    fn test_make_transfer_rejects_malformed_fee_payer() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let keys = [key(4), "not-a-key".to_string(), key(2)];
        let destination = PublicKey::new([5; 32]);

        let err = generate_make_transfer_transaction(&transfer(&owner, &keys, &destination))
            .unwrap_err();
        assert!(
            matches!(err, TransactionError::InvalidPublicKey { field, .. } if field == "fee_payer")
        );
    }

    #[test]
    fn test_encoded_matches_serialized_bytes() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let keys = [key(4), key(3), key(2)];
        let destination = PublicKey::new([5; 32]);
        let built =
            generate_make_transfer_transaction(&transfer(&owner, &keys, &destination)).unwrap();

        let decoded = BASE64_STANDARD.decode(&built.encoded).unwrap();
        assert_eq!(decoded, built.transaction.serialize().unwrap());
    }
}
