//! SDK error types with proper error chaining.

use thiserror::Error;

/// Failures reported by the remote Kinetic API collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Remote returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RemoteError {
    /// Whether retrying the same request later may succeed.
    ///
    /// Connection problems, timeouts, rate limiting and server-side errors are
    /// transient. Client errors, malformed responses and requests that could
    /// not be built are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Connection(_) | RemoteError::Timeout(_) => true,
            RemoteError::Status { status, .. } => *status == 429 || *status >= 500,
            RemoteError::InvalidResponse(_) | RemoteError::InvalidRequest(_) => false,
        }
    }
}

/// Failures raised while building, signing or serializing a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Invalid public key for '{field}': {value}")]
    InvalidPublicKey { field: String, value: String },
    #[error("Invalid blockhash: {0}")]
    InvalidBlockhash(String),
    #[error("Invalid amount '{amount}': {message}")]
    InvalidAmount { amount: String, message: String },
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Transaction too large: {0}")]
    TooLarge(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
    #[error("Validation failed: {0}")]
    Multiple(String),
}

/// Top-level error returned by every SDK operation.
///
/// Callers branch on the variant; the message text is for humans only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("App config not initialized, call get_app_config first")]
    ConfigNotInitialized,
    #[error("Mint not found: {0}")]
    MintNotFound(String),
    #[error("Transfers to a mint are not allowed: {0}")]
    TransferToMintDisallowed(String),
    #[error("Destination account doesn't exist: {0}")]
    DestinationAccountMissing(String),
    #[error("Remote request failed: {0}")]
    RemoteRequestFailed(#[from] RemoteError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SdkError {
    /// Whether the failure came from the transport and may clear on its own.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, SdkError::RemoteRequestFailed(e) if e.is_transient())
    }
}

impl From<validator::ValidationErrors> for SdkError {
    fn from(err: validator::ValidationErrors) -> Self {
        SdkError::Validation(ValidationError::Multiple(err.to_string()))
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::InvalidResponse(err.to_string())
    }
}
