use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Base58 account, mint or program identifier as exchanged with the API.
pub type AccountId = String;

/// Transaction signature returned by the ledger.
pub type TransactionSignature = String;

/// Finality guarantee requested for a read or write.
///
/// Variants are ordered by increasing durability, so
/// `Processed < Confirmed < Finalized`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    /// Level used when neither the call nor the client configures one.
    pub const FALLBACK: Commitment = Commitment::Confirmed;

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "Processed",
            Commitment::Confirmed => "Confirmed",
            Commitment::Finalized => "Finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(ConfigError::InvalidValue {
                key: "commitment".to_string(),
                message: format!("unknown commitment '{other}'"),
            }),
        }
    }
}

/// Kin transaction type encoded into the binary memo.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[default]
    None,
    Earn,
    Spend,
    P2P,
}

impl TransactionType {
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            TransactionType::None => 0,
            TransactionType::Earn => 1,
            TransactionType::Spend => 2,
            TransactionType::P2P => 3,
        }
    }
}

impl FromStr for TransactionType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TransactionType::None),
            "earn" => Ok(TransactionType::Earn),
            "spend" => Ok(TransactionType::Spend),
            "p2p" => Ok(TransactionType::P2P),
            other => Err(ConfigError::InvalidValue {
                key: "type".to_string(),
                message: format!("unknown transaction type '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Application descriptor
// ---------------------------------------------------------------------------

/// A token supported by the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigMint {
    pub public_key: AccountId,
    pub decimals: u8,
    pub fee_payer: AccountId,
    pub add_memo: bool,
    #[serde(default)]
    pub airdrop: bool,
    #[serde(default)]
    pub airdrop_amount: Option<u64>,
    #[serde(default)]
    pub airdrop_max: Option<u64>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub program_id: Option<AccountId>,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl AppConfigMint {
    pub fn new(public_key: impl Into<String>, decimals: u8, fee_payer: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            decimals,
            fee_payer: fee_payer.into(),
            add_memo: false,
            airdrop: false,
            airdrop_amount: None,
            airdrop_max: None,
            logo_url: None,
            name: None,
            program_id: None,
            symbol: None,
        }
    }

    #[must_use]
    pub fn with_memo(mut self, add_memo: bool) -> Self {
        self.add_memo = add_memo;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigApp {
    pub index: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigApi {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigCluster {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigEnvironment {
    pub name: String,
    #[serde(default)]
    pub explorer: Option<String>,
    #[serde(default)]
    pub cluster: AppConfigCluster,
}

/// Application descriptor served by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppConfigApp,
    #[serde(default)]
    pub api: AppConfigApi,
    #[serde(default)]
    pub environment: AppConfigEnvironment,
    /// Default mint used when a call names none.
    pub mint: AppConfigMint,
    pub mints: Vec<AppConfigMint>,
}

impl AppConfig {
    /// Builds a descriptor with the given default mint and supported mints.
    pub fn new(default_mint: AppConfigMint, mints: Vec<AppConfigMint>) -> Self {
        Self {
            app: AppConfigApp::default(),
            api: AppConfigApi::default(),
            environment: AppConfigEnvironment::default(),
            mint: default_mint,
            mints,
        }
    }

    /// Whether `account` is the identifier of one of the configured mints.
    #[must_use]
    pub fn is_mint(&self, account: &str) -> bool {
        self.mints.iter().any(|m| m.public_key == account)
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhashResponse {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// Recent blockhash a new transaction is anchored to.
///
/// Fetched fresh for every mutating call and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

impl From<LatestBlockhashResponse> for Precondition {
    fn from(r: LatestBlockhashResponse) -> Self {
        Self {
            blockhash: r.blockhash,
            last_valid_block_height: r.last_valid_block_height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MinimumRentExemptionBalanceResponse {
    pub lamports: u64,
}

// ---------------------------------------------------------------------------
// Per-call options
// ---------------------------------------------------------------------------

/// Optional inputs shared by the public operations.
///
/// Every `None` is resolved by the configuration resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub commitment: Option<Commitment>,
    pub mint: Option<AccountId>,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
}

impl CallOptions {
    #[must_use]
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    #[must_use]
    pub fn with_mint(mut self, mint: impl Into<String>) -> Self {
        self.mint = Some(mint.into());
        self
    }

    #[must_use]
    pub fn with_reference(
        mut self,
        reference_id: impl Into<String>,
        reference_type: impl Into<String>,
    ) -> Self {
        self.reference_id = Some(reference_id.into());
        self.reference_type = Some(reference_type.into());
        self
    }
}

/// Transfer-specific inputs for `make_transfer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Decimal amount in whole tokens, e.g. `"10.5"`.
    pub amount: String,
    /// Owner account of the recipient.
    pub destination: AccountId,
    /// Bundle creation of the destination token account, paid by the sender.
    pub sender_create: bool,
    pub transaction_type: TransactionType,
}

impl TransferRequest {
    pub fn new(amount: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            destination: destination.into(),
            sender_create: false,
            transaction_type: TransactionType::None,
        }
    }

    #[must_use]
    pub fn with_sender_create(mut self, sender_create: bool) -> Self {
        self.sender_create = sender_create;
        self
    }

    #[must_use]
    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }
}

// ---------------------------------------------------------------------------
// Outbound requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub commitment: Commitment,
    pub environment: String,
    pub index: u32,
    pub last_valid_block_height: u64,
    pub mint: AccountId,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    /// Base64 encoded, partially signed transaction.
    pub tx: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloseAccountRequest {
    pub account: AccountId,
    pub commitment: Commitment,
    pub environment: String,
    pub index: u32,
    pub mint: AccountId,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MakeTransferRequest {
    pub commitment: Commitment,
    pub environment: String,
    pub index: u32,
    pub last_valid_block_height: u64,
    pub mint: AccountId,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    /// Base64 encoded, partially signed transaction.
    pub tx: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestAirdropRequest {
    pub account: AccountId,
    pub amount: Option<String>,
    pub commitment: Commitment,
    pub environment: String,
    pub index: u32,
    pub mint: AccountId,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Processing status of a submitted transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Committed,
    Confirmed,
    Failed,
    Finalized,
    Processing,
}

/// Record the service keeps for every relayed transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub amount: Option<String>,
    pub decimals: Option<u8>,
    pub destination: Option<AccountId>,
    pub errors: Vec<TransactionErrorRecord>,
    pub explorer_url: Option<String>,
    pub fee_payer: Option<AccountId>,
    pub mint: Option<AccountId>,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub signature: Option<TransactionSignature>,
    pub source: Option<AccountId>,
    pub status: Option<TransactionStatus>,
    pub tx: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionErrorRecord {
    pub id: Option<String>,
    pub message: Option<String>,
    pub logs: Vec<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub instruction: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenInfo {
    pub account: AccountId,
    pub balance: Option<String>,
    pub close_authority: Option<AccountId>,
    pub decimals: u8,
    pub mint: AccountId,
    pub owner: Option<AccountId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInfo {
    pub account: AccountId,
    pub is_mint: bool,
    pub is_owner: bool,
    pub is_token_account: bool,
    pub owner: Option<AccountId>,
    pub program: Option<AccountId>,
    pub tokens: Vec<TokenInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceToken {
    pub account: AccountId,
    pub balance: String,
    pub mint: AccountId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceResponse {
    pub balance: String,
    pub mints: HashMap<AccountId, String>,
    pub tokens: Vec<BalanceToken>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfirmedSignatureInfo {
    pub signature: TransactionSignature,
    pub slot: u64,
    pub err: Option<serde_json::Value>,
    pub memo: Option<String>,
    pub block_time: Option<i64>,
    pub confirmation_status: Option<Commitment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryResponse {
    pub account: AccountId,
    pub history: Vec<ConfirmedSignatureInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmations: Option<u64>,
    pub err: Option<serde_json::Value>,
    pub confirmation_status: Option<Commitment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GetTransactionResponse {
    pub signature: TransactionSignature,
    pub status: Option<SignatureStatus>,
    pub transaction: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestAirdropResponse {
    pub signature: TransactionSignature,
}
