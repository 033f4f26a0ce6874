//! reqwest implementation of the Kinetic API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    AccountInfo, AppConfig, BalanceResponse, CloseAccountRequest, Commitment,
    CreateAccountRequest, GetTransactionResponse, HistoryResponse, KineticApi,
    LatestBlockhashResponse, MakeTransferRequest, MinimumRentExemptionBalanceResponse,
    RemoteError, RequestAirdropRequest, RequestAirdropResponse, Transaction,
};
use crate::infra::config::SdkConfig;

pub const HEADER_ENVIRONMENT: &str = "kinetic-environment";
pub const HEADER_INDEX: &str = "kinetic-index";
pub const HEADER_USER_AGENT: &str = "kinetic-user-agent";

/// Client identity sent with every call, `<product>@<version>`.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION"));

/// Kinetic API over HTTP
#[derive(Debug)]
pub struct HttpKineticApi {
    http_client: Client,
    base_url: Url,
    environment: String,
    index: u32,
    max_retries: u32,
    retry_delay: Duration,
}

fn identity_headers(environment: &str, index: u32) -> Result<HeaderMap, RemoteError> {
    let mut headers = HeaderMap::new();
    let environment = HeaderValue::from_str(environment).map_err(|e| {
        RemoteError::InvalidRequest(format!("invalid environment header: {e}"))
    })?;
    headers.insert(HEADER_ENVIRONMENT, environment);
    headers.insert(HEADER_INDEX, HeaderValue::from(index));
    headers.insert(HEADER_USER_AGENT, HeaderValue::from_static(USER_AGENT));
    Ok(headers)
}

fn map_transport_error(e: &reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout(e.to_string())
    } else if e.is_decode() {
        RemoteError::InvalidResponse(e.to_string())
    } else {
        RemoteError::Connection(e.to_string())
    }
}

/// Pull a human readable message out of an error body.
///
/// The service answers `{"message": "..."}` or `{"message": ["...", "..."]}`.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            _ => body.to_string(),
        },
        _ => body.to_string(),
    }
}

impl HttpKineticApi {
    /// Create a client for the `(environment, index)` in `config`
    pub fn new(config: &SdkConfig) -> Result<Self, RemoteError> {
        let base_url = Url::parse(&config.endpoint).map_err(|e| {
            RemoteError::InvalidRequest(format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidRequest(format!(
                "endpoint '{}' cannot carry a path",
                config.endpoint
            )));
        }
        let http_client = Client::builder()
            .timeout(config.timeout)
            .default_headers(identity_headers(&config.environment, config.index)?)
            .build()
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        info!(
            endpoint = %config.endpoint,
            environment = %config.environment,
            index = config.index,
            "Created Kinetic API client"
        );
        Ok(Self {
            http_client,
            base_url,
            environment: config.environment.clone(),
            index: config.index,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    /// Endpoint URL with `segments` appended, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `route` followed by the `/{environment}/{index}` scope, then `rest`.
    fn scoped_url(&self, route: &[&str], rest: &[&str]) -> Url {
        let index = self.index.to_string();
        let scope = [self.environment.as_str(), index.as_str()];
        let segments: Vec<&str> = route.iter().chain(&scope).chain(rest).copied().collect();
        self.url(&segments)
    }

    /// Idempotent read, retried on transient failures
    async fn get<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<R, RemoteError> {
        let mut attempt = 0;
        loop {
            let request = self.http_client.get(url.clone()).query(query);
            match self.execute(operation, request).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, operation, "Kinetic API call failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Submission; never retried so a signed transaction is relayed at most once per call.
    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        operation: &'static str,
        route: &[&str],
        body: &B,
    ) -> Result<R, RemoteError> {
        let request = self.http_client.post(self.url(route)).json(body);
        self.execute(operation, request).await
    }

    /// Execute a single call
    async fn execute<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<R, RemoteError> {
        metrics::counter!("kinetic_remote_requests_total", "operation" => operation).increment(1);

        let result = async {
            let response = request.send().await.map_err(|e| map_transport_error(&e))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| map_transport_error(&e))?;

            if !status.is_success() {
                return Err(RemoteError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }

            debug!(operation, status = status.as_u16(), "Kinetic API call succeeded");
            serde_json::from_str::<R>(&body).map_err(RemoteError::from)
        }
        .await;

        if result.is_err() {
            metrics::counter!("kinetic_remote_failures_total", "operation" => operation)
                .increment(1);
        }
        result
    }
}

#[async_trait]
impl KineticApi for HttpKineticApi {
    fn environment(&self) -> &str {
        &self.environment
    }

    fn index(&self) -> u32 {
        self.index
    }

    #[instrument(skip(self))]
    async fn get_app_config(&self) -> Result<AppConfig, RemoteError> {
        let url = self.scoped_url(&["api", "app"], &["config"]);
        self.get("get_app_config", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_account_info(
        &self,
        account: &str,
        commitment: Commitment,
    ) -> Result<AccountInfo, RemoteError> {
        let commitment = commitment.to_string();
        let url = self.scoped_url(&["api", "account", "info"], &[account, &commitment]);
        self.get("get_account_info", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_balance(
        &self,
        account: &str,
        commitment: Commitment,
    ) -> Result<BalanceResponse, RemoteError> {
        let commitment = commitment.to_string();
        let url = self.scoped_url(&["api", "account", "balance"], &[account, &commitment]);
        self.get("get_balance", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_history(
        &self,
        account: &str,
        mint: &str,
        commitment: Commitment,
    ) -> Result<Vec<HistoryResponse>, RemoteError> {
        let commitment = commitment.to_string();
        let url = self.scoped_url(
            &["api", "account", "history"],
            &[account, mint, &commitment],
        );
        self.get("get_history", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_token_accounts(
        &self,
        account: &str,
        mint: &str,
        commitment: Commitment,
    ) -> Result<Vec<String>, RemoteError> {
        let commitment = commitment.to_string();
        let url = self.scoped_url(
            &["api", "account", "token-accounts"],
            &[account, mint, &commitment],
        );
        self.get("get_token_accounts", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
    ) -> Result<GetTransactionResponse, RemoteError> {
        let commitment = commitment.to_string();
        let url = self.scoped_url(
            &["api", "transaction", "transaction"],
            &[signature, &commitment],
        );
        self.get("get_transaction", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhashResponse, RemoteError> {
        let url = self.scoped_url(&["api", "transaction", "latest-blockhash"], &[]);
        self.get("get_latest_blockhash", url, &[]).await
    }

    #[instrument(skip(self))]
    async fn get_minimum_rent_exemption_balance(
        &self,
        data_length: u64,
    ) -> Result<MinimumRentExemptionBalanceResponse, RemoteError> {
        let url = self.scoped_url(
            &["api", "transaction", "minimum-rent-exemption-balance"],
            &[],
        );
        self.get(
            "get_minimum_rent_exemption_balance",
            url,
            &[("dataLength", data_length.to_string())],
        )
        .await
    }

    #[instrument(skip(self, request), fields(mint = %request.mint))]
    async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<Transaction, RemoteError> {
        self.post("create_account", &["api", "account", "create"], request)
            .await
    }

    #[instrument(skip(self, request), fields(account = %request.account))]
    async fn close_account(
        &self,
        request: &CloseAccountRequest,
    ) -> Result<Transaction, RemoteError> {
        self.post("close_account", &["api", "account", "close"], request)
            .await
    }

    #[instrument(skip(self, request), fields(mint = %request.mint))]
    async fn make_transfer(
        &self,
        request: &MakeTransferRequest,
    ) -> Result<Transaction, RemoteError> {
        self.post("make_transfer", &["api", "transaction", "make-transfer"], request)
            .await
    }

    #[instrument(skip(self, request), fields(account = %request.account))]
    async fn request_airdrop(
        &self,
        request: &RequestAirdropRequest,
    ) -> Result<RequestAirdropResponse, RemoteError> {
        self.post("request_airdrop", &["api", "airdrop"], request)
            .await
    }
}
