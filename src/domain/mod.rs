//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod keys;
pub mod traits;
pub mod types;

pub use error::{ConfigError, RemoteError, SdkError, TransactionError, ValidationError};
pub use keys::PublicKey;
pub use traits::{KineticApi, TransactionSigner};
pub use types::{
    AccountId, AccountInfo, AppConfig, AppConfigApi, AppConfigApp, AppConfigCluster,
    AppConfigEnvironment, AppConfigMint, BalanceResponse, BalanceToken, CallOptions,
    CloseAccountRequest, Commitment, ConfirmedSignatureInfo, CreateAccountRequest,
    GetTransactionResponse, HistoryResponse, LatestBlockhashResponse, MakeTransferRequest,
    MinimumRentExemptionBalanceResponse, Precondition, RequestAirdropRequest,
    RequestAirdropResponse, SignatureStatus, TokenInfo, Transaction, TransactionErrorRecord,
    TransactionSignature, TransactionStatus, TransactionType, TransferRequest,
};
