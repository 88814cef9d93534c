//! HTTP client for the One Call endpoint.

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::{
    config::Config,
    error::{ConfigError, FetchError, NetworkError, truncate_body},
    model::{Coordinates, WeatherInfo},
    parser,
    store::WeatherInfoStore,
    url::ApiUrlBuilder,
};

pub type FetchResult = Result<Arc<WeatherInfo>, FetchError>;

/// Source of weather documents for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, coords: Coordinates) -> FetchResult;
}

/// Coordinates rounded to two decimals (roughly 1 km), used to share requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordKey(i64, i64);

impl From<Coordinates> for CoordKey {
    fn from(coords: Coordinates) -> Self {
        Self(
            (coords.latitude() * 100.0).round() as i64,
            (coords.longitude() * 100.0).round() as i64,
        )
    }
}

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct Inner {
    http: Client,
    urls: ApiUrlBuilder,
    store: Arc<WeatherInfoStore>,
    permits: Semaphore,
    timeout: Duration,
    cancel: CancellationToken,
    dedup: bool,
    next_fetch: AtomicU64,
    in_flight: Mutex<HashMap<CoordKey, (u64, SharedFetch)>>,
}

impl Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner")
            .field("urls", &self.urls)
            .field("store", &self.store)
            .field("available_permits", &self.permits.available_permits())
            .field("timeout", &self.timeout)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("dedup", &self.dedup)
            .field("in_flight", &self.in_flight.lock().len())
            .finish()
    }
}

/// Fetches, parses and publishes weather for a location.
///
/// Each call issues its own request unless `dedup_in_flight` is set, in which
/// case callers asking for the same rounded coordinates while a request is
/// running share its result. A successful result is published to the store
/// before it is returned; failures leave the store untouched. No retries.
///
/// The configured timeout covers the whole call, including time spent waiting
/// for a free slot under `max_concurrent_requests`.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    inner: Arc<Inner>,
}

impl WeatherClient {
    /// Fails fast on invalid configuration; no request is issued.
    pub fn new(
        config: &Config,
        store: Arc<WeatherInfoStore>,
        cancel: CancellationToken,
    ) -> Result<Self, ConfigError> {
        let urls = ApiUrlBuilder::new(config)?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                urls,
                store,
                permits: Semaphore::new(config.max_concurrent_requests),
                timeout,
                cancel,
                dedup: config.dedup_in_flight,
                next_fetch: AtomicU64::new(0),
                in_flight: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub fn urls(&self) -> &ApiUrlBuilder {
        &self.inner.urls
    }

    pub fn store(&self) -> &Arc<WeatherInfoStore> {
        &self.inner.store
    }

    /// Number of distinct requests currently shared between callers.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.lock().len()
    }

    #[instrument(skip_all, fields(lat = %coords.latitude(), lon = %coords.longitude()))]
    pub async fn fetch_weather(&self, coords: Coordinates) -> FetchResult {
        if !self.inner.dedup {
            return fetch_once(Arc::clone(&self.inner), coords).await;
        }

        let key = CoordKey::from(coords);
        let shared = {
            let mut in_flight = self.inner.in_flight.lock();
            match in_flight.get(&key) {
                Some((_, existing)) => {
                    debug!("joining in-flight request");
                    existing.clone()
                }
                None => {
                    let id = self.inner.next_fetch.fetch_add(1, Ordering::Relaxed);
                    let fut = spawn_shared(Arc::clone(&self.inner), key, id, coords);
                    in_flight.insert(key, (id, fut.clone()));
                    fut
                }
            }
        };

        shared.await
    }
}

/// Run a shared fetch as its own task. The task finishes and clears its map
/// entry even if every caller waiting on it has been dropped.
fn spawn_shared(inner: Arc<Inner>, key: CoordKey, id: u64, coords: Coordinates) -> SharedFetch {
    let task = tokio::spawn(
        async move {
            let result = fetch_once(Arc::clone(&inner), coords).await;
            let mut in_flight = inner.in_flight.lock();
            if in_flight.get(&key).is_some_and(|(current, _)| *current == id) {
                in_flight.remove(&key);
            }
            result
        }
        .in_current_span(),
    );

    async move { task.await.unwrap_or(Err(FetchError::Cancelled)) }
        .boxed()
        .shared()
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn fetch_weather(&self, coords: Coordinates) -> FetchResult {
        WeatherClient::fetch_weather(self, coords).await
    }
}

async fn fetch_once(inner: Arc<Inner>, coords: Coordinates) -> FetchResult {
    let result = tokio::select! {
        biased;
        _ = inner.cancel.cancelled() => Err(FetchError::Cancelled),
        result = tokio::time::timeout(inner.timeout, request(&inner, coords)) => {
            result.unwrap_or_else(|_| {
                Err(NetworkError::Timeout("no response within the configured timeout".into()).into())
            })
        }
    };

    match &result {
        Ok(info) => {
            inner.store.publish(Arc::clone(info));
            info!(
                hourly = info.hourly.len(),
                daily = info.daily.len(),
                "published weather update"
            );
        }
        Err(FetchError::Cancelled) => warn!("weather request cancelled"),
        Err(e) => warn!(error = %e, "weather request failed"),
    }

    result
}

async fn request(inner: &Inner, coords: Coordinates) -> FetchResult {
    let _permit = inner
        .permits
        .acquire()
        .await
        .map_err(|_| FetchError::Cancelled)?;

    let url = inner.urls.build_weather_url(coords);
    debug!(url = %inner.urls.redacted_weather_url(coords), "fetching weather");

    let response = inner
        .http
        .get(url)
        .send()
        .await
        .map_err(NetworkError::from)?;

    let status = response.status();
    let body = response.text().await.map_err(NetworkError::from)?;

    if !status.is_success() {
        return Err(NetworkError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        }
        .into());
    }

    let info = parser::parse(&body)?;
    Ok(Arc::new(info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_key_rounds_to_two_decimals() {
        let a = Coordinates::new(23.8103, 90.4125).expect("valid");
        let b = Coordinates::new(23.8149, 90.4091).expect("valid");
        let c = Coordinates::new(23.8200, 90.4125).expect("valid");

        assert_eq!(CoordKey::from(a), CoordKey::from(b));
        assert_ne!(CoordKey::from(a), CoordKey::from(c));
    }

    #[test]
    fn new_fails_fast_without_api_key() {
        let err = WeatherClient::new(
            &Config::default(),
            WeatherInfoStore::new(),
            CancellationToken::new(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits_without_touching_store() {
        let store = WeatherInfoStore::new();
        let cancel = CancellationToken::new();
        let client = WeatherClient::new(
            &Config {
                // Nothing listens here; the cancellation must win before any connect attempt.
                base_url: "http://127.0.0.1:9/onecall".into(),
                ..Config::with_api_key("KEY")
            },
            Arc::clone(&store),
            cancel.clone(),
        )
        .expect("valid config");

        cancel.cancel();
        let err = client
            .fetch_weather(Coordinates::new(1.0, 1.0).expect("valid"))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Cancelled);
        assert!(store.latest().is_none());
    }
}
