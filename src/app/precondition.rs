//! Fresh blockhash for every transaction.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::{KineticApi, Precondition, SdkError};

/// Fetches a [`Precondition`] from the remote service.
///
/// Nothing is cached: each call is one remote request, so every built
/// transaction anchors to a blockhash obtained just before it.
#[derive(Clone)]
pub struct PreconditionFetcher {
    api: Arc<dyn KineticApi>,
}

impl PreconditionFetcher {
    pub fn new(api: Arc<dyn KineticApi>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Precondition, SdkError> {
        let latest = self.api.get_latest_blockhash().await?;
        debug!(
            blockhash = %latest.blockhash,
            last_valid_block_height = latest.last_valid_block_height,
            "Fetched precondition"
        );
        Ok(latest.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockKineticApi;

    #[tokio::test]
    async fn test_fetch_is_never_cached() {
        let api = Arc::new(MockKineticApi::new());
        let fetcher = PreconditionFetcher::new(api.clone());

        let first = fetcher.fetch().await.unwrap();
        let second = fetcher.fetch().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.blockhash, api.blockhash().blockhash);
        assert_eq!(api.blockhash_calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_remote_error() {
        let api = Arc::new(MockKineticApi::new());
        api.fail_on("get_latest_blockhash");
        let fetcher = PreconditionFetcher::new(api);

        assert!(matches!(
            fetcher.fetch().await,
            Err(SdkError::RemoteRequestFailed(_))
        ));
    }
}
