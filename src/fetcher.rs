//! Cached row fetching from the production data API
//!
//! [`DataFetcher`] ties the cache, the remote client and the notifier together.
//! A fetch never fails from the caller's point of view: every problem ends in an
//! empty row list, with the cause logged and, for remote failures, a user warning
//! queued and the cache entry invalidated.

use serde_json::{Map, Value};

use crate::api::{build_url, RemoteClient};
use crate::cache::CacheStore;
use crate::config::EndpointConfig;
use crate::notify::{Notifier, FETCH_WARNING};

/// One record from the API result set
pub type RawRow = Map<String, Value>;

/// Prefix shared by every cache key this crate writes
pub const CACHE_KEY_PREFIX: &str = "api_interface.";

/// Lifetime of a cached listing: one day
pub const CACHE_TTL_SECS: u64 = 86_400;

/// Field of the response body holding the rows
pub const RESULT_SET_FIELD: &str = "resultSet1";

const CONFIG_MISSING_MESSAGE: &str = "The config settings for the API could not be found. \
Check the settings file for this site and ensure the API_INTERFACE_* environment variables are set.";

/// A cacheable listing exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Logical identifier, used to derive the cache key
    pub key: &'static str,
    /// API path of the listing
    pub path: &'static str,
}

impl Resource {
    pub const fn new(key: &'static str, path: &'static str) -> Self {
        Self { key, path }
    }

    /// Cache key for this resource, `api_interface.<key>`
    pub fn cache_key(&self) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, self.key)
    }
}

/// Whether a decoded body counts as empty
///
/// Null, `false`, zero, and empty strings, arrays or objects are all empty.
pub fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Pulls the `resultSet1` rows out of a response body
///
/// Returns `None` when the field is missing or not an array. Elements that are
/// not JSON objects are skipped.
pub fn extract_result_set(body: Value) -> Option<Vec<RawRow>> {
    let Value::Object(mut fields) = body else {
        return None;
    };
    match fields.remove(RESULT_SET_FIELD)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Orchestrates cache lookup, remote fetch and cache population
#[derive(Debug)]
pub struct DataFetcher<R, C, N> {
    config: EndpointConfig,
    client: R,
    cache: C,
    notifier: N,
}

impl<R, C, N> DataFetcher<R, C, N>
where
    R: RemoteClient,
    C: CacheStore,
    N: Notifier,
{
    pub fn new(config: EndpointConfig, client: R, cache: C, notifier: N) -> Self {
        Self {
            config,
            client,
            cache,
            notifier,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Fetches the `resultSet1` rows of a resource
    pub async fn fetch_rows(&self, resource: &Resource) -> Vec<RawRow> {
        self.fetch_rows_with(resource, extract_result_set).await
    }

    /// Fetches a resource, turning the response body into rows with `extract`
    ///
    /// Rows are cached for [`CACHE_TTL_SECS`] only when `extract` yields a list.
    pub async fn fetch_rows_with<F>(&self, resource: &Resource, extract: F) -> Vec<RawRow>
    where
        F: FnOnce(Value) -> Option<Vec<RawRow>>,
    {
        let cache_key = resource.cache_key();

        if let Some(rows) = self.cache.get(&cache_key) {
            tracing::debug!(key = %cache_key, rows = rows.len(), "cache hit");
            return rows;
        }
        tracing::debug!(key = %cache_key, "cache miss");

        let (Some(credentials), Some(endpoint)) = (self.config.credentials(), self.config.endpoint())
        else {
            self.notifier.log_error(CONFIG_MISSING_MESSAGE);
            return Vec::new();
        };

        let url = build_url(&endpoint, resource.path);

        let body = match self.client.fetch(&url, &credentials).await {
            Ok(body) => body,
            Err(failure) => {
                self.notifier.log_error(&format!(
                    "API request failed with status {}: {}",
                    failure.status_code(),
                    failure.message()
                ));
                self.notifier.warn_user(FETCH_WARNING);

                if let Err(e) = self.cache.invalidate(&cache_key) {
                    tracing::warn!(key = %cache_key, error = %e, "failed to invalidate cache entry");
                }
                return Vec::new();
            }
        };

        if is_empty_body(&body) {
            tracing::debug!(resource = resource.key, "empty response body");
            return Vec::new();
        }

        let Some(rows) = extract(body) else {
            tracing::debug!(resource = resource.key, "response body has no row list");
            return Vec::new();
        };

        if let Err(e) = self.cache.set(&cache_key, &rows, CACHE_TTL_SECS) {
            tracing::warn!(key = %cache_key, error = %e, "failed to write cache entry");
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteFailure;
    use crate::cache::MemoryCache;
    use crate::config::Credentials;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const RESOURCE: Resource = Resource::new("country_details", "/production_data/country_details");

    struct StubClient {
        response: Result<Value, RemoteFailure>,
        calls: AtomicUsize,
        last_url: Mutex<Option<String>>,
    }

    impl StubClient {
        fn new(response: Result<Value, RemoteFailure>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                last_url: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl RemoteClient for StubClient {
        async fn fetch(&self, url: &str, _credentials: &Credentials) -> Result<Value, RemoteFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(url.to_string());
            self.response.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        errors: Mutex<Vec<String>>,
        warnings: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn log_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }

        fn warn_user(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }

    fn configured() -> EndpointConfig {
        EndpointConfig {
            basic_auth: Some("user:pw".to_string()),
            host: Some("api.example.org".to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            timeout_secs: None,
        }
    }

    fn fetcher(
        config: EndpointConfig,
        response: Result<Value, RemoteFailure>,
    ) -> DataFetcher<StubClient, MemoryCache, RecordingNotifier> {
        DataFetcher::new(
            config,
            StubClient::new(response),
            MemoryCache::new(),
            RecordingNotifier::default(),
        )
    }

    fn row(value: Value) -> RawRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_cache_key_is_prefixed() {
        assert_eq!(RESOURCE.cache_key(), "api_interface.country_details");
    }

    #[test]
    fn test_is_empty_body() {
        assert!(is_empty_body(&Value::Null));
        assert!(is_empty_body(&json!({})));
        assert!(is_empty_body(&json!([])));
        assert!(is_empty_body(&json!("")));
        assert!(is_empty_body(&json!(0)));
        assert!(is_empty_body(&json!(false)));
        assert!(!is_empty_body(&json!({"resultSet1": []})));
    }

    #[test]
    fn test_extract_result_set_skips_non_objects() {
        let rows = extract_result_set(json!({"resultSet1": [{"a": 1}, 3, "x", {"b": 2}]})).unwrap();
        assert_eq!(rows, vec![row(json!({"a": 1})), row(json!({"b": 2}))]);
    }

    #[test]
    fn test_extract_result_set_rejects_other_shapes() {
        assert!(extract_result_set(json!({"other": []})).is_none());
        assert!(extract_result_set(json!({"resultSet1": {"a": 1}})).is_none());
        assert!(extract_result_set(json!([1, 2])).is_none());
    }

    #[tokio::test]
    async fn test_success_populates_cache_and_builds_url() {
        let f = fetcher(
            configured(),
            Ok(json!({"resultSet1": [{"countryCode": "FR", "countryName": "France"}]})),
        );

        let rows = f.fetch_rows(&RESOURCE).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(f.cache().get("api_interface.country_details"), Some(rows));
        assert_eq!(
            f.client.last_url.lock().unwrap().as_deref(),
            Some("https://user:pw@api.example.org/production_data/country_details")
        );
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote() {
        let f = fetcher(configured(), Ok(json!({"resultSet1": [{"countryCode": "FR"}]})));

        let first = f.fetch_rows(&RESOURCE).await;
        let second = f.fetch_rows(&RESOURCE).await;

        assert_eq!(first, second);
        assert_eq!(f.client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_config_makes_no_call() {
        let mut config = configured();
        config.client_secret = None;
        let f = fetcher(config, Ok(json!({"resultSet1": [{"countryCode": "FR"}]})));

        let rows = f.fetch_rows(&RESOURCE).await;

        assert!(rows.is_empty());
        assert_eq!(f.client.calls.load(Ordering::SeqCst), 0);
        assert!(f.cache().is_empty());
        assert_eq!(f.notifier().errors.lock().unwrap().len(), 1);
        assert!(f.notifier().warnings.lock().unwrap().is_empty(), "no user warning for config errors");
    }

    /// Memory cache that records invalidated keys
    #[derive(Default)]
    struct TrackingCache {
        inner: MemoryCache,
        invalidated: Mutex<Vec<String>>,
    }

    impl CacheStore for TrackingCache {
        fn get(&self, key: &str) -> Option<Vec<RawRow>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, payload: &[RawRow], ttl_secs: u64) -> Result<(), crate::cache::CacheError> {
            self.inner.set(key, payload, ttl_secs)
        }

        fn invalidate(&self, key: &str) -> Result<(), crate::cache::CacheError> {
            self.invalidated.lock().unwrap().push(key.to_string());
            self.inner.invalidate(key)
        }
    }

    #[tokio::test]
    async fn test_failure_warns_and_invalidates() {
        let f = DataFetcher::new(
            configured(),
            StubClient::new(Err(RemoteFailure::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            })),
            TrackingCache::default(),
            RecordingNotifier::default(),
        );

        let rows = f.fetch_rows(&RESOURCE).await;

        assert!(rows.is_empty());
        assert_eq!(
            f.cache().invalidated.lock().unwrap().as_slice(),
            ["api_interface.country_details"]
        );
        assert!(f.cache().inner.is_empty());
        let errors = f.notifier().errors.lock().unwrap();
        assert_eq!(errors.as_slice(), ["API request failed with status 500: Internal Server Error"]);
        assert_eq!(f.notifier().warnings.lock().unwrap().as_slice(), [FETCH_WARNING]);
    }

    #[tokio::test]
    async fn test_empty_body_is_not_cached() {
        let f = fetcher(configured(), Ok(json!({})));

        assert!(f.fetch_rows(&RESOURCE).await.is_empty());
        assert!(f.cache().is_empty());
        assert!(f.notifier().warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_cached() {
        let f = fetcher(configured(), Ok(json!({"unexpected": true})));

        assert!(f.fetch_rows(&RESOURCE).await.is_empty());
        assert!(f.cache().is_empty());
    }

    #[tokio::test]
    async fn test_custom_extraction() {
        let f = fetcher(configured(), Ok(json!({"items": [{"code": "X"}]})));

        let rows = f
            .fetch_rows_with(&RESOURCE, |body| {
                serde_json::from_value(body.get("items")?.clone()).ok()
            })
            .await;

        assert_eq!(rows, vec![row(json!({"code": "X"}))]);
    }
}
