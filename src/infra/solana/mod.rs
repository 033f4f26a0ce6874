//! Local signing and serialization of ledger transactions.
//!
//! Keys, program instructions, the Kin memo and the legacy wire format, built
//! on `ed25519-dalek`, `bs58` and `sha2`.

pub mod builder;
pub mod memo;
pub mod programs;
pub mod signer;
pub mod wire;

pub use builder::{
    BuiltTransaction, CreateAccountTransaction, MakeTransferTransaction,
    generate_create_account_transaction, generate_make_transfer_transaction, parse_amount,
};
pub use programs::associated_token_address;
pub use signer::Keypair;
