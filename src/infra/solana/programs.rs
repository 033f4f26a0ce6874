//! Instructions for the on-chain programs the SDK talks to.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};

use super::wire::{AccountMeta, Instruction};
use crate::domain::PublicKey;

pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey::new([0u8; 32]);

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: PublicKey = PublicKey::new([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133, 237,
    95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: PublicKey = PublicKey::new([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153, 218,
    255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`
pub const MEMO_PROGRAM_ID: PublicKey = PublicKey::new([
    5, 74, 83, 90, 153, 41, 33, 6, 77, 36, 232, 113, 96, 218, 56, 124, 124, 53, 181, 221, 188, 146,
    187, 129, 228, 31, 168, 64, 65, 5, 68, 141,
]);

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// SPL token authority kinds handed over with `SetAuthority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthorityType {
    CloseAccount = 3,
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

/// Derive the first off-curve program address for `seeds`, with its bump.
#[must_use]
pub fn find_program_address(seeds: &[&[u8]], program_id: &PublicKey) -> Option<(PublicKey, u8)> {
    (0..=u8::MAX).rev().find_map(|bump| {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update([bump]);
        hasher.update(program_id.as_bytes());
        hasher.update(PDA_MARKER);
        let hash: [u8; 32] = hasher.finalize().into();
        (!is_on_curve(&hash)).then(|| (PublicKey::new(hash), bump))
    })
}

/// Token account address for `owner` under `mint`.
#[must_use]
pub fn associated_token_address(owner: &PublicKey, mint: &PublicKey) -> Option<PublicKey> {
    find_program_address(
        &[
            owner.as_bytes(),
            TOKEN_PROGRAM_ID.as_bytes(),
            mint.as_bytes(),
        ],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}

/// Create the associated token account of `owner`, paid for by `payer`.
#[must_use]
pub fn create_associated_token_account(
    payer: &PublicKey,
    associated_account: &PublicKey,
    owner: &PublicKey,
    mint: &PublicKey,
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(*associated_account, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: Vec::new(),
    }
}

/// Move `amount` base units from `source` to `destination`, checked against
/// the mint's precision.
#[must_use]
pub fn transfer_checked(
    source: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    owner: &PublicKey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let mut data = Vec::with_capacity(10);
    data.push(12);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*source, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::writable(*destination, false),
            AccountMeta::readonly(*owner, true),
        ],
        data,
    }
}

/// Hand `authority_type` over `account` to `new_authority`.
#[must_use]
pub fn set_authority(
    account: &PublicKey,
    current_authority: &PublicKey,
    authority_type: AuthorityType,
    new_authority: &PublicKey,
) -> Instruction {
    let mut data = Vec::with_capacity(35);
    data.push(6);
    data.push(authority_type as u8);
    data.push(1);
    data.extend_from_slice(new_authority.as_bytes());

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*account, false),
            AccountMeta::readonly(*current_authority, true),
        ],
        data,
    }
}

#[must_use]
pub fn memo(text: &str) -> Instruction {
    Instruction {
        program_id: MEMO_PROGRAM_ID,
        accounts: Vec::new(),
        data: text.as_bytes().to_vec(),
    }
}
