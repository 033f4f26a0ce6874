//! Client configuration (environment variables + defaults).

use std::env;
use std::time::Duration;

use reqwest::header::HeaderValue;
use validator::Validate;

use crate::domain::{Commitment, ConfigError, SdkError, ValidationError};

/// Validated settings for one `(environment, index)` client.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SdkConfig {
    #[validate(length(min = 1))]
    pub endpoint: String,
    #[validate(length(min = 1))]
    pub environment: String,
    #[validate(range(min = 1))]
    pub index: u32,
    /// Client-wide default commitment, used when a call names none.
    pub commitment: Option<Commitment>,
    pub timeout: Duration,
    /// Retries for idempotent reads. Submissions are never retried.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

/// Expand the endpoint shorthands the hosted service publishes.
#[must_use]
pub fn resolve_endpoint(endpoint: &str) -> String {
    match endpoint {
        "devnet" => "https://sandbox.kinetic.host".to_string(),
        "mainnet" => "https://app.kinetic.host".to_string(),
        "local" => "http://localhost:3000".to_string(),
        other => other.trim_end_matches('/').to_string(),
    }
}

impl SdkConfig {
    pub fn new(endpoint: &str, environment: impl Into<String>, index: u32) -> Self {
        Self {
            endpoint: resolve_endpoint(endpoint),
            environment: environment.into(),
            index,
            commitment: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }

    #[must_use]
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Load from `KINETIC_ENDPOINT`, `KINETIC_ENVIRONMENT`, `KINETIC_INDEX`
    /// and the optional `KINETIC_COMMITMENT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required =
            |key: &str| env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()));

        let endpoint = required("KINETIC_ENDPOINT")?;
        let environment = required("KINETIC_ENVIRONMENT")?;
        let index = required("KINETIC_INDEX")?
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "KINETIC_INDEX".to_string(),
                message: e.to_string(),
            })?;

        let mut config = Self::new(&endpoint, environment, index);
        if let Ok(commitment) = env::var("KINETIC_COMMITMENT") {
            config.commitment = Some(commitment.parse()?);
        }
        Ok(config)
    }

    /// Check field constraints, that the endpoint is an http(s) URL and that
    /// the environment can be sent as a header.
    pub fn check(&self) -> Result<(), SdkError> {
        self.validate()?;
        if HeaderValue::from_str(&self.environment).is_err() {
            return Err(ValidationError::InvalidField {
                field: "environment".to_string(),
                message: format!("{:?} is not a valid header value", self.environment),
            }
            .into());
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ValidationError::InvalidField {
                field: "endpoint".to_string(),
                message: format!("'{}' is not an http(s) URL", self.endpoint),
            }
            .into());
        }
        Ok(())
    }
}
