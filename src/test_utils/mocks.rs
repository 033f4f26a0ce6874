//! In-memory Kinetic API for testing.
//!
//! The mock answers every route from fixtures, counts calls per operation,
//! records submitted requests and can be told to fail, either everywhere or
//! for a single operation.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{
    AccountInfo, AppConfig, AppConfigMint, BalanceResponse, CloseAccountRequest, Commitment,
    CreateAccountRequest, GetTransactionResponse, HistoryResponse, KineticApi,
    LatestBlockhashResponse, MakeTransferRequest, MinimumRentExemptionBalanceResponse, PublicKey,
    RemoteError, RequestAirdropRequest, RequestAirdropResponse, Transaction, TransactionStatus,
};

/// Deterministic base58 account id built from a single repeated byte.
#[must_use]
pub fn test_key(seed: u8) -> String {
    PublicKey::new([seed; 32]).to_string()
}

/// Default mint of [`sample_app_config`].
#[must_use]
pub fn default_mint() -> AppConfigMint {
    AppConfigMint::new(test_key(1), 5, test_key(2))
}

/// Second supported mint of [`sample_app_config`]; adds memos.
#[must_use]
pub fn memo_mint() -> AppConfigMint {
    AppConfigMint::new(test_key(3), 2, test_key(4)).with_memo(true)
}

/// Descriptor with [`default_mint`] as default and [`memo_mint`] as extra.
#[must_use]
pub fn sample_app_config() -> AppConfig {
    let mut config = AppConfig::new(default_mint(), vec![default_mint(), memo_mint()]);
    config.app.index = 1;
    config.app.name = "Test App".to_string();
    config
}

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, every operation fails.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Mock Kinetic API.
///
/// # Example
///
/// ```ignore
/// let api = MockKineticApi::new();
/// api.add_token_account(&destination, &mint, &token_account);
/// api.fail_on("make_transfer");
/// ```
pub struct MockKineticApi {
    environment: String,
    index: u32,
    config: MockConfig,
    failing: AtomicBool,
    failing_operations: Mutex<HashSet<&'static str>>,
    app_config: Mutex<AppConfig>,
    token_accounts: Mutex<HashMap<(String, String), Vec<String>>>,
    mints_requested: Mutex<Vec<(&'static str, String)>>,
    blockhash: LatestBlockhashResponse,
    call_count: AtomicU64,
    calls: Mutex<HashMap<&'static str, u64>>,
    create_requests: Mutex<Vec<CreateAccountRequest>>,
    close_requests: Mutex<Vec<CloseAccountRequest>>,
    transfer_requests: Mutex<Vec<MakeTransferRequest>>,
    airdrop_requests: Mutex<Vec<RequestAirdropRequest>>,
}

impl MockKineticApi {
    /// Mock scoped to `("devnet", 1)` serving [`sample_app_config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            environment: "devnet".to_string(),
            index: 1,
            failing: AtomicBool::new(config.should_fail),
            config,
            failing_operations: Mutex::new(HashSet::new()),
            app_config: Mutex::new(sample_app_config()),
            token_accounts: Mutex::new(HashMap::new()),
            mints_requested: Mutex::new(Vec::new()),
            blockhash: LatestBlockhashResponse {
                blockhash: test_key(9),
                last_valid_block_height: 1_000,
            },
            call_count: AtomicU64::new(0),
            calls: Mutex::new(HashMap::new()),
            create_requests: Mutex::new(Vec::new()),
            close_requests: Mutex::new(Vec::new()),
            transfer_requests: Mutex::new(Vec::new()),
            airdrop_requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock where every operation fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Make a single operation fail, by trait method name.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing_operations.lock().unwrap().insert(operation);
    }

    pub fn set_app_config(&self, config: AppConfig) {
        *self.app_config.lock().unwrap() = config;
    }

    /// Register a token account owned by `owner` for `mint`.
    pub fn add_token_account(&self, owner: &str, mint: &str, token_account: &str) {
        self.token_accounts
            .lock()
            .unwrap()
            .entry((owner.to_string(), mint.to_string()))
            .or_default()
            .push(token_account.to_string());
    }

    /// Mints passed to a mint-scoped read, in call order.
    pub fn mints_requested(&self, operation: &str) -> Vec<String> {
        self.mints_requested
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, mint)| mint.clone())
            .collect()
    }

    fn record_mint(&self, operation: &'static str, mint: &str) {
        self.mints_requested
            .lock()
            .unwrap()
            .push((operation, mint.to_string()));
    }

    /// Total number of calls across all operations.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Number of calls to one operation.
    pub fn calls(&self, operation: &str) -> u64 {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub fn app_config_calls(&self) -> u64 {
        self.calls("get_app_config")
    }

    pub fn blockhash_calls(&self) -> u64 {
        self.calls("get_latest_blockhash")
    }

    pub fn token_account_calls(&self) -> u64 {
        self.calls("get_token_accounts")
    }

    pub fn create_requests(&self) -> Vec<CreateAccountRequest> {
        self.create_requests.lock().unwrap().clone()
    }

    pub fn close_requests(&self) -> Vec<CloseAccountRequest> {
        self.close_requests.lock().unwrap().clone()
    }

    pub fn transfer_requests(&self) -> Vec<MakeTransferRequest> {
        self.transfer_requests.lock().unwrap().clone()
    }

    pub fn airdrop_requests(&self) -> Vec<RequestAirdropRequest> {
        self.airdrop_requests.lock().unwrap().clone()
    }

    /// Blockhash every precondition fetch returns.
    pub fn blockhash(&self) -> &LatestBlockhashResponse {
        &self.blockhash
    }

    async fn enter(&self, operation: &'static str) -> Result<(), RemoteError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        let fail = self.failing.load(Ordering::Relaxed)
            || self.failing_operations.lock().unwrap().contains(operation);
        if fail {
            let message = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| format!("Mock {operation} error"));
            return Err(RemoteError::Status {
                status: 500,
                message,
            });
        }
        Ok(())
    }
}

impl Default for MockKineticApi {
    fn default() -> Self {
        Self::new()
    }
}

fn submitted(mint: &str, tx: Option<&str>, reference_id: Option<&String>) -> Transaction {
    Transaction {
        mint: Some(mint.to_string()),
        reference_id: reference_id.cloned(),
        status: Some(TransactionStatus::Committed),
        signature: Some(format!("sig-{}", tx.map_or(0, str::len))),
        tx: tx.map(str::to_string),
        ..Transaction::default()
    }
}

#[async_trait]
impl KineticApi for MockKineticApi {
    fn environment(&self) -> &str {
        &self.environment
    }

    fn index(&self) -> u32 {
        self.index
    }

    async fn get_app_config(&self) -> Result<AppConfig, RemoteError> {
        self.enter("get_app_config").await?;
        Ok(self.app_config.lock().unwrap().clone())
    }

    async fn get_account_info(
        &self,
        account: &str,
        _commitment: Commitment,
    ) -> Result<AccountInfo, RemoteError> {
        self.enter("get_account_info").await?;
        Ok(AccountInfo {
            account: account.to_string(),
            is_owner: true,
            ..AccountInfo::default()
        })
    }

    async fn get_balance(
        &self,
        _account: &str,
        _commitment: Commitment,
    ) -> Result<BalanceResponse, RemoteError> {
        self.enter("get_balance").await?;
        Ok(BalanceResponse {
            balance: "0".to_string(),
            ..BalanceResponse::default()
        })
    }

    async fn get_history(
        &self,
        account: &str,
        mint: &str,
        _commitment: Commitment,
    ) -> Result<Vec<HistoryResponse>, RemoteError> {
        self.enter("get_history").await?;
        self.record_mint("get_history", mint);
        Ok(vec![HistoryResponse {
            account: account.to_string(),
            history: Vec::new(),
        }])
    }

    async fn get_token_accounts(
        &self,
        account: &str,
        mint: &str,
        _commitment: Commitment,
    ) -> Result<Vec<String>, RemoteError> {
        self.enter("get_token_accounts").await?;
        self.record_mint("get_token_accounts", mint);
        Ok(self
            .token_accounts
            .lock()
            .unwrap()
            .get(&(account.to_string(), mint.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_transaction(
        &self,
        signature: &str,
        _commitment: Commitment,
    ) -> Result<GetTransactionResponse, RemoteError> {
        self.enter("get_transaction").await?;
        Ok(GetTransactionResponse {
            signature: signature.to_string(),
            ..GetTransactionResponse::default()
        })
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhashResponse, RemoteError> {
        self.enter("get_latest_blockhash").await?;
        Ok(self.blockhash.clone())
    }

    async fn get_minimum_rent_exemption_balance(
        &self,
        data_length: u64,
    ) -> Result<MinimumRentExemptionBalanceResponse, RemoteError> {
        self.enter("get_minimum_rent_exemption_balance").await?;
        Ok(MinimumRentExemptionBalanceResponse {
            lamports: 890_880 + data_length * 6_960,
        })
    }

    async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<Transaction, RemoteError> {
        self.enter("create_account").await?;
        self.create_requests.lock().unwrap().push(request.clone());
        Ok(submitted(
            &request.mint,
            Some(&request.tx),
            request.reference_id.as_ref(),
        ))
    }

    async fn close_account(
        &self,
        request: &CloseAccountRequest,
    ) -> Result<Transaction, RemoteError> {
        self.enter("close_account").await?;
        self.close_requests.lock().unwrap().push(request.clone());
        Ok(submitted(&request.mint, None, request.reference_id.as_ref()))
    }

    async fn make_transfer(
        &self,
        request: &MakeTransferRequest,
    ) -> Result<Transaction, RemoteError> {
        self.enter("make_transfer").await?;
        self.transfer_requests.lock().unwrap().push(request.clone());
        Ok(submitted(
            &request.mint,
            Some(&request.tx),
            request.reference_id.as_ref(),
        ))
    }

    async fn request_airdrop(
        &self,
        request: &RequestAirdropRequest,
    ) -> Result<RequestAirdropResponse, RemoteError> {
        self.enter("request_airdrop").await?;
        self.airdrop_requests.lock().unwrap().push(request.clone());
        Ok(RequestAirdropResponse {
            signature: format!("airdrop-{}", request.account),
        })
    }
}
