use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    client::{FetchResult, WeatherClient},
    config::Config,
    error::ConfigError,
    model::Coordinates,
    store::WeatherInfoStore,
    url::ApiUrlBuilder,
};

/// Owns the store and the cancellation scope for one screen's lifetime.
///
/// Ending the session (or dropping it) cancels every fetch still in flight;
/// those resolve to `FetchError::Cancelled` and publish nothing.
#[derive(Debug)]
pub struct WeatherSession {
    client: WeatherClient,
    store: Arc<WeatherInfoStore>,
    cancel: CancellationToken,
}

impl WeatherSession {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_store(config, WeatherInfoStore::new())
    }

    pub fn with_store(config: &Config, store: Arc<WeatherInfoStore>) -> Result<Self, ConfigError> {
        let cancel = CancellationToken::new();
        let client = WeatherClient::new(config, Arc::clone(&store), cancel.child_token())?;
        Ok(Self {
            client,
            store,
            cancel,
        })
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<WeatherInfoStore> {
        &self.store
    }

    pub fn urls(&self) -> &ApiUrlBuilder {
        self.client.urls()
    }

    pub async fn fetch_weather(&self, coords: Coordinates) -> FetchResult {
        self.client.fetch_weather(coords).await
    }

    /// Token that fires when the session ends, for tasks tied to its lifetime.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn end(&self) {
        if !self.cancel.is_cancelled() {
            debug!("ending weather session");
            self.cancel.cancel();
        }
    }

    pub fn is_ended(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for WeatherSession {
    fn drop(&mut self) {
        self.end();
    }
}
