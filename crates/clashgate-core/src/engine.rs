//! Request execution core shared by [`crate::Client`] and [`crate::BlockingClient`].
//!
//! A logical call is driven as an explicit state machine:
//!
//! ```text
//! begin ──▶ Cached(object)                       (GET hit, no network)
//!   │
//!   ▼
//! Call ──request()──▶ transport ──advance()──▶ Step::Done(object)
//!   ▲                                            Step::Fail(ApiError)
//!   └──────────── sleep(delay) ◀───────────────  Step::Retry(delay)
//! ```
//!
//! The only suspension point is the retry sleep, which the caller performs
//! with its own blocking or async primitive.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http_client::{HttpAuth, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::retry::{Attempts, RetryConfig, RetryReason};

/// A decoded JSON object, the unit the engine returns and caches.
pub type JsonObject = Map<String, Value>;

const REDACTED: &str = "***";

/// Flat query parameters. Keys are kept sorted, values may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, Vec<String>>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar parameter, replacing earlier values for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), vec![value.to_string()]);
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a sequence parameter, sent as repeated `key=value` pairs.
    pub fn insert_all<I, T>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let values = values.into_iter().map(|value| value.to_string()).collect();
        self.0.insert(key.into(), values);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expanded `(key, value)` pairs in key order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| (key.clone(), value.clone()))
            })
            .collect()
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let encoded = self
            .pairs()
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        f.write_str(&encoded)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Deterministic identity of a request: method, path and sorted query.
pub fn cache_key(method: HttpMethod, path: &str, params: Option<&Params>) -> String {
    match params {
        Some(params) if !params.is_empty() => format!("{method} {path}?{params}"),
        _ => format!("{method} {path}"),
    }
}

/// Copy of `headers` that is safe to log: the credential is replaced while a
/// recognized `Bearer` scheme prefix is kept.
pub fn redact_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                let redacted = if value.to_ascii_lowercase().starts_with("bearer ") {
                    format!("Bearer {REDACTED}")
                } else {
                    String::from(REDACTED)
                };
                (name.clone(), redacted)
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

/// Parse a `Retry-After` value given in seconds.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    let seconds = value?.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

fn error_payload(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

/// How a logical call starts.
#[derive(Debug)]
pub enum Begin {
    /// Served from the read cache; the network is not touched.
    Cached(JsonObject),
    Network(Call),
}

/// What to do after one transport attempt.
#[derive(Debug)]
pub enum Step {
    Done(JsonObject),
    Retry(Duration),
    Fail(ApiError),
}

/// In-flight state of a single logical call.
#[derive(Debug)]
pub struct Call {
    method: HttpMethod,
    path: String,
    params: Option<Params>,
    key: String,
    url: String,
    attempts: Attempts,
}

impl Call {
    /// 1-based number of the attempt about to be sent.
    pub fn attempt_number(&self) -> u32 {
        self.attempts.current() + 1
    }

    fn fail(&self, error: ApiError) -> Step {
        Step::Fail(error.with_request(self.method.as_str(), self.url.clone()))
    }
}

/// Shared request engine state: endpoint, credentials, retry budget, cache.
#[derive(Debug)]
pub struct Engine {
    base_url: String,
    timeout: Duration,
    auth: HttpAuth,
    headers: BTreeMap<String, String>,
    retry: RetryConfig,
    cache: Arc<TtlCache<JsonObject>>,
}

impl Engine {
    pub fn new(config: &ClientConfig) -> Self {
        let cache = TtlCache::new(config.cache_enabled, config.cache_ttl);
        Self::with_cache(config, Arc::new(cache))
    }

    /// Build an engine around an existing cache, e.g. one driven by a test clock.
    pub fn with_cache(config: &ClientConfig, cache: Arc<TtlCache<JsonObject>>) -> Self {
        let headers = BTreeMap::from([(
            String::from("accept"),
            String::from("application/json"),
        )]);

        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout: config.timeout,
            auth: HttpAuth::BearerToken(config.token().to_owned()),
            headers,
            retry: config.retry_config(),
            cache,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &Arc<TtlCache<JsonObject>> {
        &self.cache
    }

    /// Start a call. GET requests are answered from the cache when possible.
    pub fn begin(&self, method: HttpMethod, path: &str, params: Option<Params>) -> Begin {
        let key = cache_key(method, path, params.as_ref());
        if method == HttpMethod::Get {
            if let Some(cached) = self.cache.get(&key) {
                tracing::debug!(key = %key, "cache hit");
                return Begin::Cached(cached);
            }
        }

        Begin::Network(Call {
            method,
            path: path.to_owned(),
            url: format!("{}{}", self.base_url, path),
            params: params.filter(|params| !params.is_empty()),
            key,
            attempts: Attempts::new(self.retry),
        })
    }

    /// Transport request for the attempt in flight. Logs the attempt.
    pub fn request(&self, call: &Call) -> HttpRequest {
        let request = HttpRequest::new(call.method, call.url.clone())
            .with_headers(&self.headers)
            .with_auth(&self.auth)
            .with_query(call.params.as_ref().map(Params::pairs).unwrap_or_default())
            .with_timeout(self.timeout);

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                attempt = call.attempt_number(),
                method = %call.method,
                url = %call.url,
                path = %call.path,
                params = ?call.params.as_ref().map(Params::pairs),
                headers = ?redact_headers(&request.headers),
                "request attempt"
            );
        }

        request
    }

    /// Classify one transport outcome and decide the next step.
    pub fn advance(&self, call: &mut Call, outcome: Result<HttpResponse, HttpError>) -> Step {
        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                if error.retryable() {
                    if let Some(delay) = call.attempts.retry(RetryReason::Transport) {
                        return self.schedule(call, delay, error.message());
                    }
                }
                return call.fail(
                    ApiError::api("Request failed")
                        .with_payload(Value::String(error.message().to_owned())),
                );
            }
        };

        match response.status {
            200 | 204 => match parse_object(&response) {
                Ok(object) => {
                    if call.method == HttpMethod::Get {
                        self.cache.set(call.key.clone(), object.clone(), None);
                    }
                    Step::Done(object)
                }
                Err(error) => call.fail(error),
            },
            401 | 403 => call.fail(
                ApiError::unauthorized(response.status).with_payload(error_payload(&response.body)),
            ),
            404 => call.fail(ApiError::not_found().with_payload(error_payload(&response.body))),
            429 => {
                let retry_after = parse_retry_after(response.header("retry-after"));
                match call.attempts.retry(RetryReason::RateLimited { retry_after }) {
                    Some(delay) => self.schedule(call, delay, "rate limited"),
                    None => call.fail(
                        ApiError::rate_limited(retry_after)
                            .with_payload(error_payload(&response.body)),
                    ),
                }
            }
            status @ 500..=599 => match call.attempts.retry(RetryReason::ServerError) {
                Some(delay) => self.schedule(call, delay, "server error"),
                None => call.fail(
                    ApiError::server_error(status).with_payload(error_payload(&response.body)),
                ),
            },
            status => call.fail(
                ApiError::api("API error")
                    .with_status(status)
                    .with_payload(error_payload(&response.body)),
            ),
        }
    }

    fn schedule(&self, call: &Call, delay: Duration, reason: &str) -> Step {
        tracing::warn!(
            method = %call.method,
            url = %call.url,
            next_attempt = call.attempt_number(),
            delay_ms = delay.as_millis() as u64,
            reason,
            "retrying request"
        );
        Step::Retry(delay)
    }
}

fn parse_object(response: &HttpResponse) -> Result<JsonObject, ApiError> {
    if response.status == 204 {
        return Ok(JsonObject::new());
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|_| {
        ApiError::api("Invalid JSON response")
            .with_status(response.status)
            .with_payload(Value::String(response.body.clone()))
    })?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(ApiError::api("Expected JSON object")
            .with_status(response.status)
            .with_payload(other)),
    }
}
