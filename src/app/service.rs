//! Operation orchestrators.
//!
//! Every public operation of the SDK lives on [`KineticSdk`]. Mutating
//! operations run one linear pipeline: resolve configuration, fetch a
//! precondition when a transaction is built, build and sign, submit. A failure
//! at any stage aborts the call; nothing local changes except through
//! [`KineticSdk::get_app_config`].

use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::cache::AppConfigCache;
use super::precondition::PreconditionFetcher;
use super::resolver::{resolve_commitment, resolve_mint};
use crate::domain::{
    AccountInfo, AppConfig, BalanceResponse, CallOptions, CloseAccountRequest, Commitment,
    CreateAccountRequest, GetTransactionResponse, HistoryResponse, KineticApi,
    MakeTransferRequest, PublicKey, RequestAirdropRequest, RequestAirdropResponse, SdkError,
    Transaction, TransactionSigner, TransferRequest,
};
use crate::infra::config::SdkConfig;
use crate::infra::http::HttpKineticApi;
use crate::infra::solana::{
    CreateAccountTransaction, MakeTransferTransaction, generate_create_account_transaction,
    generate_make_transfer_transaction, parse_amount,
};

/// Client for one `(environment, index)` application.
///
/// # Example
///
/// ```ignore
/// let config = SdkConfig::new("devnet", "devnet", 1);
/// let sdk = KineticSdk::connect(&config).await?;
///
/// let owner = Keypair::generate();
/// sdk.create_account(&owner, &CallOptions::default()).await?;
///
/// let transfer = TransferRequest::new("10.5", destination).with_sender_create(true);
/// let tx = sdk.make_transfer(&owner, &transfer, &CallOptions::default()).await?;
/// ```
pub struct KineticSdk {
    api: Arc<dyn KineticApi>,
    cache: AppConfigCache,
    preconditions: PreconditionFetcher,
    default_commitment: Option<Commitment>,
}

impl KineticSdk {
    /// Build a client without fetching the app config.
    ///
    /// Mint-dependent operations fail with `ConfigNotInitialized` until
    /// [`get_app_config`](Self::get_app_config) succeeds.
    #[must_use]
    pub fn new(api: Arc<dyn KineticApi>, default_commitment: Option<Commitment>) -> Self {
        Self {
            preconditions: PreconditionFetcher::new(Arc::clone(&api)),
            api,
            cache: AppConfigCache::new(),
            default_commitment,
        }
    }

    /// Validate `config`, build a client on `api` and prime the app config.
    #[instrument(skip(config, api), fields(environment = %config.environment, index = config.index))]
    pub async fn setup(config: &SdkConfig, api: Arc<dyn KineticApi>) -> Result<Self, SdkError> {
        config.check()?;
        let sdk = Self::new(api, config.commitment);
        sdk.get_app_config().await?;
        info!("Kinetic SDK ready");
        Ok(sdk)
    }

    /// [`setup`](Self::setup) over HTTP.
    pub async fn connect(config: &SdkConfig) -> Result<Self, SdkError> {
        config.check()?;
        let api = HttpKineticApi::new(config)?;
        Self::setup(config, Arc::new(api)).await
    }

    /// Cached app config, without a remote call.
    pub fn app_config(&self) -> Result<Arc<AppConfig>, SdkError> {
        self.cache.get_cached()
    }

    fn commitment(&self, explicit: Option<Commitment>) -> Commitment {
        resolve_commitment(explicit, self.default_commitment)
    }

    /// Fetch the app config and replace the cached copy.
    pub async fn get_app_config(&self) -> Result<Arc<AppConfig>, SdkError> {
        self.cache.refresh(self.api.as_ref()).await
    }

    #[instrument(skip(self, options), fields(account = %account))]
    pub async fn close_account(
        &self,
        account: &str,
        options: &CallOptions,
    ) -> Result<Transaction, SdkError> {
        let commitment = self.commitment(options.commitment);
        let app_config = self.cache.get_cached()?;
        let mint = resolve_mint(&app_config, options.mint.as_deref())?;
        debug!(mint = %mint.public_key, %commitment, "Resolved close account");

        let request = CloseAccountRequest {
            account: account.to_string(),
            commitment,
            environment: self.api.environment().to_string(),
            index: self.api.index(),
            mint: mint.public_key.clone(),
            reference_id: options.reference_id.clone(),
            reference_type: options.reference_type.clone(),
        };
        let tx = self.api.close_account(&request).await?;
        info!(signature = ?tx.signature, "Close account submitted");
        Ok(tx)
    }

    #[instrument(skip(self, owner, options), fields(owner = %owner.public_key()))]
    pub async fn create_account(
        &self,
        owner: &dyn TransactionSigner,
        options: &CallOptions,
    ) -> Result<Transaction, SdkError> {
        let commitment = self.commitment(options.commitment);
        let app_config = self.cache.get_cached()?;
        let mint = resolve_mint(&app_config, options.mint.as_deref())?;
        debug!(mint = %mint.public_key, %commitment, "Resolved create account");

        let precondition = self.preconditions.fetch().await?;
        let built = generate_create_account_transaction(&CreateAccountTransaction {
            add_memo: mint.add_memo,
            blockhash: &precondition.blockhash,
            index: self.api.index(),
            fee_payer: &mint.fee_payer,
            mint: &mint.public_key,
            owner,
        })?;

        let request = CreateAccountRequest {
            commitment,
            environment: self.api.environment().to_string(),
            index: self.api.index(),
            last_valid_block_height: precondition.last_valid_block_height,
            mint: mint.public_key.clone(),
            reference_id: options.reference_id.clone(),
            reference_type: options.reference_type.clone(),
            tx: built.encoded,
        };
        let tx = self.api.create_account(&request).await?;
        info!(signature = ?tx.signature, "Create account submitted");
        Ok(tx)
    }

    #[instrument(skip(self))]
    pub async fn get_account_info(
        &self,
        account: &str,
        commitment: Option<Commitment>,
    ) -> Result<AccountInfo, SdkError> {
        let commitment = self.commitment(commitment);
        Ok(self.api.get_account_info(account, commitment).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_balance(
        &self,
        account: &str,
        commitment: Option<Commitment>,
    ) -> Result<BalanceResponse, SdkError> {
        let commitment = self.commitment(commitment);
        Ok(self.api.get_balance(account, commitment).await?)
    }

    /// Signature history of the account's token accounts for the resolved mint.
    #[instrument(skip(self, options))]
    pub async fn get_history(
        &self,
        account: &str,
        options: &CallOptions,
    ) -> Result<Vec<HistoryResponse>, SdkError> {
        let commitment = self.commitment(options.commitment);
        let app_config = self.cache.get_cached()?;
        let mint = resolve_mint(&app_config, options.mint.as_deref())?;
        Ok(self
            .api
            .get_history(account, &mint.public_key, commitment)
            .await?)
    }

    /// Token accounts `account` owns for the resolved mint.
    #[instrument(skip(self, options))]
    pub async fn get_token_accounts(
        &self,
        account: &str,
        options: &CallOptions,
    ) -> Result<Vec<String>, SdkError> {
        let commitment = self.commitment(options.commitment);
        let app_config = self.cache.get_cached()?;
        let mint = resolve_mint(&app_config, options.mint.as_deref())?;
        Ok(self
            .api
            .get_token_accounts(account, &mint.public_key, commitment)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_transaction(
        &self,
        signature: &str,
        commitment: Option<Commitment>,
    ) -> Result<GetTransactionResponse, SdkError> {
        let commitment = self.commitment(commitment);
        Ok(self.api.get_transaction(signature, commitment).await?)
    }

    /// Lamports an account of `data_length` bytes needs to be rent exempt.
    #[instrument(skip(self))]
    pub async fn get_minimum_rent_exemption_balance(
        &self,
        data_length: u64,
    ) -> Result<u64, SdkError> {
        let response = self
            .api
            .get_minimum_rent_exemption_balance(data_length)
            .await?;
        Ok(response.lamports)
    }

    /// Transfer `transfer.amount` of the resolved mint from `owner`.
    ///
    /// Destinations that are configured mints, malformed destinations and
    /// amounts the mint cannot represent are rejected before any remote call.
    /// A destination without a token account for the mint is rejected unless
    /// `sender_create` is set, in which case the account creation is bundled
    /// into the transfer. All checks finish before the precondition is fetched.
    #[instrument(
        skip(self, owner, transfer, options),
        fields(owner = %owner.public_key(), destination = %transfer.destination, amount = %transfer.amount)
    )]
    pub async fn make_transfer(
        &self,
        owner: &dyn TransactionSigner,
        transfer: &TransferRequest,
        options: &CallOptions,
    ) -> Result<Transaction, SdkError> {
        let commitment = self.commitment(options.commitment);
        let app_config = self.cache.get_cached()?;
        let mint = resolve_mint(&app_config, options.mint.as_deref())?;
        debug!(mint = %mint.public_key, %commitment, "Resolved transfer");

        if app_config.is_mint(&transfer.destination) {
            return Err(SdkError::TransferToMintDisallowed(
                transfer.destination.clone(),
            ));
        }
        let destination = PublicKey::parse_field(&transfer.destination, "destination")?;
        let amount = parse_amount(&transfer.amount, mint.decimals)?;

        let destination_accounts = self
            .api
            .get_token_accounts(&transfer.destination, &mint.public_key, commitment)
            .await?;
        let destination_exists = !destination_accounts.is_empty();
        if !destination_exists && !transfer.sender_create {
            return Err(SdkError::DestinationAccountMissing(
                transfer.destination.clone(),
            ));
        }

        let precondition = self.preconditions.fetch().await?;
        let built = generate_make_transfer_transaction(&MakeTransferTransaction {
            add_memo: mint.add_memo,
            amount,
            blockhash: &precondition.blockhash,
            destination: &destination,
            index: self.api.index(),
            mint_decimals: mint.decimals,
            fee_payer: &mint.fee_payer,
            mint: &mint.public_key,
            owner,
            sender_create: !destination_exists,
            transaction_type: transfer.transaction_type,
        })?;

        let request = MakeTransferRequest {
            commitment,
            environment: self.api.environment().to_string(),
            index: self.api.index(),
            last_valid_block_height: precondition.last_valid_block_height,
            mint: mint.public_key.clone(),
            reference_id: options.reference_id.clone(),
            reference_type: options.reference_type.clone(),
            tx: built.encoded,
        };
        let tx = self.api.make_transfer(&request).await?;
        info!(
            signature = ?tx.signature,
            sender_create = !destination_exists,
            "Transfer submitted"
        );
        Ok(tx)
    }

    /// Ask the service to airdrop `amount` of the resolved mint, or the
    /// mint's configured airdrop amount when `amount` is `None`.
    #[instrument(skip(self, options))]
    pub async fn request_airdrop(
        &self,
        account: &str,
        amount: Option<&str>,
        options: &CallOptions,
    ) -> Result<RequestAirdropResponse, SdkError> {
        let commitment = self.commitment(options.commitment);
        let app_config = self.cache.get_cached()?;
        let mint = resolve_mint(&app_config, options.mint.as_deref())?;

        let request = RequestAirdropRequest {
            account: account.to_string(),
            amount: amount.map(str::to_string),
            commitment,
            environment: self.api.environment().to_string(),
            index: self.api.index(),
            mint: mint.public_key.clone(),
        };
        let response = self.api.request_airdrop(&request).await?;
        info!(signature = %response.signature, "Airdrop requested");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PublicKey, TransactionError, TransactionType};
    use crate::infra::solana::Keypair;
    use crate::infra::solana::programs::{ASSOCIATED_TOKEN_PROGRAM_ID, MEMO_PROGRAM_ID};
    use crate::test_utils::{MockConfig, MockKineticApi, default_mint, memo_mint, test_key};
    use base64::{Engine, prelude::BASE64_STANDARD};

    fn owner() -> Keypair {
        Keypair::from_seed(&[42; 32])
    }

    fn sdk(api: &Arc<MockKineticApi>) -> KineticSdk {
        KineticSdk::new(api.clone(), None)
    }

    async fn primed(api: &Arc<MockKineticApi>) -> KineticSdk {
        let sdk = sdk(api);
        sdk.get_app_config().await.unwrap();
        sdk
    }

    fn tx_mentions(encoded: &str, program: &PublicKey) -> bool {
        let bytes = BASE64_STANDARD.decode(encoded).unwrap();
        bytes
            .windows(32)
            .any(|window| window == program.as_bytes().as_slice())
    }

    #[tokio::test]
    async fn test_uninitialized_config_blocks_mint_operations() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = sdk(&api);
        let opts = CallOptions::default();
        let transfer = TransferRequest::new("1", test_key(7));

        let results = [
            sdk.create_account(&owner(), &opts).await.map(|_| ()),
            sdk.make_transfer(&owner(), &transfer, &opts).await.map(|_| ()),
            sdk.close_account(&test_key(7), &opts).await.map(|_| ()),
            sdk.get_history(&test_key(7), &opts).await.map(|_| ()),
            sdk.get_token_accounts(&test_key(7), &opts).await.map(|_| ()),
            sdk.request_airdrop(&test_key(7), None, &opts).await.map(|_| ()),
        ];

        for result in results {
            assert_eq!(result.unwrap_err(), SdkError::ConfigNotInitialized);
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_reads_without_mint_work_before_config() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = sdk(&api);

        sdk.get_balance(&test_key(7), None).await.unwrap();
        sdk.get_account_info(&test_key(7), None).await.unwrap();
        sdk.get_transaction("sig", None).await.unwrap();
        assert_eq!(sdk.get_minimum_rent_exemption_balance(0).await.unwrap(), 890_880);
        assert_eq!(api.app_config_calls(), 0);
    }

    #[tokio::test]
    async fn test_setup_primes_cache() {
        let api = Arc::new(MockKineticApi::new());
        let config = SdkConfig::new("local", "devnet", 1).with_commitment(Commitment::Finalized);

        let sdk = KineticSdk::setup(&config, api.clone()).await.unwrap();

        assert_eq!(api.app_config_calls(), 1);
        assert_eq!(sdk.app_config().unwrap().mint, default_mint());
    }

    #[tokio::test]
    async fn test_setup_rejects_invalid_config() {
        let api = Arc::new(MockKineticApi::new());
        let config = SdkConfig::new("local", "", 1);

        assert!(matches!(
            KineticSdk::setup(&config, api.clone()).await,
            Err(SdkError::Validation(_))
        ));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_account_default_mint() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;

        let tx = sdk
            .create_account(&owner(), &CallOptions::default())
            .await
            .unwrap();

        let requests = api.create_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.mint, default_mint().public_key);
        assert_eq!(request.commitment, Commitment::Confirmed);
        assert_eq!(request.environment, "devnet");
        assert_eq!(request.index, 1);
        assert_eq!(
            request.last_valid_block_height,
            api.blockhash().last_valid_block_height
        );
        assert!(tx_mentions(&request.tx, &ASSOCIATED_TOKEN_PROGRAM_ID));
        assert!(!tx_mentions(&request.tx, &MEMO_PROGRAM_ID));
        assert_eq!(tx.mint, Some(default_mint().public_key));
        assert_eq!(api.blockhash_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_account_memo_mint() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let opts = CallOptions::default()
            .with_mint(memo_mint().public_key)
            .with_reference("42", "order");

        sdk.create_account(&owner(), &opts).await.unwrap();

        let request = &api.create_requests()[0];
        assert_eq!(request.mint, memo_mint().public_key);
        assert_eq!(request.reference_type.as_deref(), Some("order"));
        assert_eq!(request.reference_id.as_deref(), Some("42"));
        assert!(tx_mentions(&request.tx, &MEMO_PROGRAM_ID));
    }

    #[tokio::test]
    async fn test_create_account_unknown_mint() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let opts = CallOptions::default().with_mint(test_key(99));

        let err = sdk.create_account(&owner(), &opts).await.unwrap_err();

        assert_eq!(err, SdkError::MintNotFound(test_key(99)));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_precondition_fetched_per_call() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;

        sdk.create_account(&owner(), &CallOptions::default())
            .await
            .unwrap();
        sdk.create_account(&owner(), &CallOptions::default())
            .await
            .unwrap();

        assert_eq!(api.blockhash_calls(), 2);
    }

    #[tokio::test]
    async fn test_precondition_failure_aborts_before_submit() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        api.fail_on("get_latest_blockhash");

        let err = sdk
            .create_account(&owner(), &CallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::RemoteRequestFailed(_)));
        assert!(err.is_transient());
        assert!(api.create_requests().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_to_mint_disallowed() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;

        for destination in [default_mint().public_key, memo_mint().public_key] {
            for sender_create in [false, true] {
                let transfer =
                    TransferRequest::new("1", destination.clone()).with_sender_create(sender_create);
                let err = sdk
                    .make_transfer(&owner(), &transfer, &CallOptions::default())
                    .await
                    .unwrap_err();
                assert_eq!(err, SdkError::TransferToMintDisallowed(destination.clone()));
            }
        }
        assert_eq!(api.token_account_calls(), 0);
        assert_eq!(api.blockhash_calls(), 0);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transfer_missing_destination_account() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let transfer = TransferRequest::new("10.5", test_key(7));

        let err = sdk
            .make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err, SdkError::DestinationAccountMissing(test_key(7)));
        assert_eq!(api.token_account_calls(), 1);
        assert_eq!(api.blockhash_calls(), 0);
        assert!(api.transfer_requests().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_sender_create_bundles_account_creation() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let transfer = TransferRequest::new("10.5", test_key(7)).with_sender_create(true);

        sdk.make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap();

        let request = &api.transfer_requests()[0];
        assert_eq!(request.mint, default_mint().public_key);
        assert!(tx_mentions(&request.tx, &ASSOCIATED_TOKEN_PROGRAM_ID));
        assert_eq!(api.blockhash_calls(), 1);
    }

    #[tokio::test]
    async fn test_transfer_existing_destination_skips_creation() {
        let api = Arc::new(MockKineticApi::new());
        api.add_token_account(&test_key(7), &default_mint().public_key, &test_key(8));
        let sdk = primed(&api).await;
        let transfer = TransferRequest::new("3", test_key(7))
            .with_sender_create(true)
            .with_type(TransactionType::P2P);

        sdk.make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap();

        let request = &api.transfer_requests()[0];
        assert!(!tx_mentions(&request.tx, &ASSOCIATED_TOKEN_PROGRAM_ID));
        assert!(!tx_mentions(&request.tx, &MEMO_PROGRAM_ID));
    }

    #[tokio::test]
    async fn test_transfer_invalid_amount_is_not_submitted() {
        let api = Arc::new(MockKineticApi::new());
        api.add_token_account(&test_key(7), &default_mint().public_key, &test_key(8));
        let sdk = primed(&api).await;

        for amount in ["1.234567", "abc", "", "-5"] {
            let transfer = TransferRequest::new(amount, test_key(7));
            let err = sdk
                .make_transfer(&owner(), &transfer, &CallOptions::default())
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                SdkError::Transaction(TransactionError::InvalidAmount { .. })
            ));
        }
        assert_eq!(api.token_account_calls(), 0);
        assert_eq!(api.blockhash_calls(), 0);
        assert!(api.transfer_requests().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_malformed_destination_makes_no_lookups() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let transfer = TransferRequest::new("1", "not-a-key").with_sender_create(true);

        let err = sdk
            .make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SdkError::Transaction(TransactionError::InvalidPublicKey { field, .. }) if field == "destination"
        ));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transfer_looks_up_destination_for_resolved_mint() {
        let api = Arc::new(MockKineticApi::new());
        api.add_token_account(&test_key(7), &default_mint().public_key, &test_key(8));
        let sdk = primed(&api).await;
        let transfer = TransferRequest::new("1", test_key(7));

        let err = sdk
            .make_transfer(
                &owner(),
                &transfer,
                &CallOptions::default().with_mint(memo_mint().public_key),
            )
            .await
            .unwrap_err();

        assert_eq!(err, SdkError::DestinationAccountMissing(test_key(7)));
        assert_eq!(api.mints_requested("get_token_accounts"), vec![memo_mint().public_key]);
        assert_eq!(api.blockhash_calls(), 0);

        sdk.make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(api.transfer_requests()[0].mint, default_mint().public_key);
    }

    #[tokio::test]
    async fn test_mint_scoped_reads_send_resolved_mint() {
        let api = Arc::new(MockKineticApi::new());
        api.add_token_account(&test_key(7), &memo_mint().public_key, &test_key(8));
        let sdk = primed(&api).await;
        let explicit = CallOptions::default().with_mint(memo_mint().public_key);

        sdk.get_history(&test_key(7), &explicit).await.unwrap();
        sdk.get_history(&test_key(7), &CallOptions::default()).await.unwrap();
        let accounts = sdk.get_token_accounts(&test_key(7), &explicit).await.unwrap();
        let default_accounts = sdk
            .get_token_accounts(&test_key(7), &CallOptions::default())
            .await
            .unwrap();

        assert_eq!(accounts, vec![test_key(8)]);
        assert!(default_accounts.is_empty());
        assert_eq!(
            api.mints_requested("get_history"),
            vec![memo_mint().public_key, default_mint().public_key]
        );
        assert_eq!(
            api.mints_requested("get_token_accounts"),
            vec![memo_mint().public_key, default_mint().public_key]
        );
    }

    #[tokio::test]
    async fn test_concurrent_transfers_fetch_their_own_precondition() {
        let api = Arc::new(MockKineticApi::with_config(MockConfig::success().with_latency(20)));
        api.add_token_account(&test_key(7), &default_mint().public_key, &test_key(8));
        let sdk = primed(&api).await;
        let transfer = TransferRequest::new("1", test_key(7));
        let opts = CallOptions::default();
        let (first_owner, second_owner) = (owner(), Keypair::from_seed(&[43; 32]));

        let (first, second) = tokio::join!(
            sdk.make_transfer(&first_owner, &transfer, &opts),
            sdk.make_transfer(&second_owner, &transfer, &opts),
        );

        first.unwrap();
        second.unwrap();
        assert_eq!(api.blockhash_calls(), 2);
        assert_eq!(api.transfer_requests().len(), 2);
        assert_eq!(api.app_config_calls(), 1);
    }

    #[tokio::test]
    async fn test_connect_rejects_header_unsafe_environment() {
        let config = SdkConfig::new("devnet", "dev\nnet", 1);

        let err = KineticSdk::connect(&config).await.err().unwrap();

        assert!(matches!(err, SdkError::Validation(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_commitment_resolution_order() {
        let api = Arc::new(MockKineticApi::new());
        api.add_token_account(&test_key(7), &default_mint().public_key, &test_key(8));
        let sdk = KineticSdk::new(api.clone(), Some(Commitment::Finalized));
        sdk.get_app_config().await.unwrap();
        let transfer = TransferRequest::new("1", test_key(7));

        sdk.make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap();
        sdk.make_transfer(
            &owner(),
            &transfer,
            &CallOptions::default().with_commitment(Commitment::Processed),
        )
        .await
        .unwrap();

        let requests = api.transfer_requests();
        assert_eq!(requests[0].commitment, Commitment::Finalized);
        assert_eq!(requests[1].commitment, Commitment::Processed);
    }

    #[tokio::test]
    async fn test_close_account_request() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let opts = CallOptions::default().with_reference("7", "close");

        sdk.close_account(&test_key(7), &opts).await.unwrap();

        let request = &api.close_requests()[0];
        assert_eq!(request.account, test_key(7));
        assert_eq!(request.mint, default_mint().public_key);
        assert_eq!(request.reference_id.as_deref(), Some("7"));
        assert_eq!(api.blockhash_calls(), 0);
    }

    #[tokio::test]
    async fn test_request_airdrop_uses_resolved_mint() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        let opts = CallOptions::default().with_mint(memo_mint().public_key);

        let response = sdk
            .request_airdrop(&test_key(7), Some("100"), &opts)
            .await
            .unwrap();

        let request = &api.airdrop_requests()[0];
        assert_eq!(request.mint, memo_mint().public_key);
        assert_eq!(request.amount.as_deref(), Some("100"));
        assert_eq!(response.signature, format!("airdrop-{}", test_key(7)));
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces() {
        let api = Arc::new(MockKineticApi::new());
        let sdk = primed(&api).await;
        api.fail_on("make_transfer");
        api.add_token_account(&test_key(7), &default_mint().public_key, &test_key(8));
        let transfer = TransferRequest::new("1", test_key(7));

        let err = sdk
            .make_transfer(&owner(), &transfer, &CallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::RemoteRequestFailed(_)));
    }
}
