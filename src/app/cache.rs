//! Cached application descriptor.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, instrument};

use crate::domain::{AppConfig, KineticApi, SdkError};

/// Holds the most recently fetched [`AppConfig`].
///
/// Never fetches on its own: the cache is empty until `refresh` succeeds and
/// only changes on later `refresh` calls. Readers get a shared snapshot; a
/// refresh swaps the whole value under the write lock, so concurrent
/// refreshes resolve to the last writer.
#[derive(Default)]
pub struct AppConfigCache {
    current: RwLock<Option<Arc<AppConfig>>>,
}

impl AppConfigCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the descriptor and replace the cached value.
    ///
    /// A failed fetch leaves the previous value untouched.
    #[instrument(skip(self, api))]
    pub async fn refresh(&self, api: &dyn KineticApi) -> Result<Arc<AppConfig>, SdkError> {
        let config = Arc::new(api.get_app_config().await?);
        info!(
            mint = %config.mint.public_key,
            mints = config.mints.len(),
            "App config refreshed"
        );
        self.store(Arc::clone(&config));
        Ok(config)
    }

    /// Current snapshot, or `ConfigNotInitialized` before the first refresh.
    pub fn get_cached(&self) -> Result<Arc<AppConfig>, SdkError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SdkError::ConfigNotInitialized)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.get_cached().is_ok()
    }

    fn store(&self, config: Arc<AppConfig>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    }
}
