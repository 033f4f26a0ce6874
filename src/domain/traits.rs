//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::{RemoteError, TransactionError};
use super::keys::PublicKey;
use super::types::{
    AccountInfo, AppConfig, BalanceResponse, CloseAccountRequest, Commitment,
    CreateAccountRequest, GetTransactionResponse, HistoryResponse, LatestBlockhashResponse,
    MakeTransferRequest, MinimumRentExemptionBalanceResponse, RequestAirdropRequest,
    RequestAirdropResponse, Transaction,
};

/// Remote Kinetic API.
///
/// Every call is scoped to the `(environment, index)` pair the implementation
/// was configured with. Implementations own transport concerns such as
/// identifying headers, timeouts and retries.
#[async_trait]
pub trait KineticApi: Send + Sync {
    /// Environment tag sent with every call.
    fn environment(&self) -> &str;

    /// Partition index sent with every call.
    fn index(&self) -> u32;

    /// Fetch the application descriptor
    async fn get_app_config(&self) -> Result<AppConfig, RemoteError>;

    /// Describe an account and the token accounts it owns
    async fn get_account_info(
        &self,
        account: &str,
        commitment: Commitment,
    ) -> Result<AccountInfo, RemoteError>;

    /// Get the balance of an owner account across mints
    async fn get_balance(
        &self,
        account: &str,
        commitment: Commitment,
    ) -> Result<BalanceResponse, RemoteError>;

    /// Get signature history of the owner's token accounts for a mint
    async fn get_history(
        &self,
        account: &str,
        mint: &str,
        commitment: Commitment,
    ) -> Result<Vec<HistoryResponse>, RemoteError>;

    /// List the token accounts an owner holds for a mint
    async fn get_token_accounts(
        &self,
        account: &str,
        mint: &str,
        commitment: Commitment,
    ) -> Result<Vec<String>, RemoteError>;

    /// Look up a transaction by signature
    async fn get_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
    ) -> Result<GetTransactionResponse, RemoteError>;

    /// Get a recent blockhash to anchor a new transaction
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhashResponse, RemoteError>;

    /// Get the lamports needed to keep an account of `data_length` bytes alive
    async fn get_minimum_rent_exemption_balance(
        &self,
        data_length: u64,
    ) -> Result<MinimumRentExemptionBalanceResponse, RemoteError>;

    /// Relay a signed create-account transaction
    async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<Transaction, RemoteError>;

    /// Ask the service to close an empty token account
    async fn close_account(&self, request: &CloseAccountRequest)
    -> Result<Transaction, RemoteError>;

    /// Relay a signed transfer transaction
    async fn make_transfer(&self, request: &MakeTransferRequest)
    -> Result<Transaction, RemoteError>;

    /// Request test tokens
    async fn request_airdrop(
        &self,
        request: &RequestAirdropRequest,
    ) -> Result<RequestAirdropResponse, RemoteError>;
}

/// Signing identity that authorizes locally built transactions.
///
/// Signing is synchronous so transaction builders stay free of I/O.
pub trait TransactionSigner: Send + Sync {
    fn public_key(&self) -> PublicKey;

    /// Sign a serialized message, returning the raw 64-byte signature.
    fn sign_message(&self, message: &[u8]) -> Result<[u8; 64], TransactionError>;
}
