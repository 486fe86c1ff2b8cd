//! Shared fixtures for the behavior tests: a scripted transport and
//! client constructors wired to a recording sleeper.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clashgate_core::{
    BlockingClient, BlockingHttpClient, Client, ClientConfig, HttpClient, HttpError, HttpRequest,
    HttpResponse, JsonObject, RecordingSleep, TtlCache,
};
use serde_json::Value;

pub type Scripted = Result<HttpResponse, HttpError>;

/// Replays a fixed sequence of transport outcomes and records every request.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new<I>(script: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Scripted>,
    {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn next(&self, request: HttpRequest) -> Scripted {
        self.requests.lock().expect("requests lock").push(request);
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::non_retryable("script exhausted")))
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Scripted> + Send + 'a>> {
        let outcome = self.next(request);
        Box::pin(async move { outcome })
    }
}

impl BlockingHttpClient for ScriptedHttpClient {
    fn execute(&self, request: HttpRequest) -> Scripted {
        self.next(request)
    }
}

/// A response with a JSON body.
pub fn json(status: u16, body: Value) -> Scripted {
    Ok(HttpResponse::new(status, body.to_string()))
}

pub fn status(status: u16) -> Scripted {
    Ok(HttpResponse::new(status, ""))
}

pub fn rate_limited(retry_after: &str) -> Scripted {
    Ok(HttpResponse::new(429, r#"{"reason":"requestThrottled"}"#)
        .with_header("Retry-After", retry_after))
}

pub fn transport_error(message: &str) -> Scripted {
    Err(HttpError::new(message))
}

/// Config with a 1s..8s backoff so expected delays are whole seconds.
pub fn config(max_retries: u32) -> ClientConfig {
    ClientConfig::new("test-token")
        .expect("valid token")
        .with_max_retries(max_retries)
        .with_backoff(Duration::from_secs(1), Duration::from_secs(8))
}

pub fn async_client(
    config: ClientConfig,
    http: &Arc<ScriptedHttpClient>,
) -> (Client, RecordingSleep) {
    let sleeper = RecordingSleep::new();
    let transport: Arc<dyn HttpClient> = http.clone();
    let client = Client::builder(config)
        .http_client(transport)
        .sleeper(Arc::new(sleeper.clone()))
        .build()
        .expect("client builds");
    (client, sleeper)
}

pub fn async_client_with_cache(
    config: ClientConfig,
    http: &Arc<ScriptedHttpClient>,
    cache: Arc<TtlCache<JsonObject>>,
) -> Client {
    let transport: Arc<dyn HttpClient> = http.clone();
    Client::builder(config)
        .http_client(transport)
        .sleeper(Arc::new(RecordingSleep::new()))
        .cache(cache)
        .build()
        .expect("client builds")
}

pub fn blocking_client(
    config: ClientConfig,
    http: &Arc<ScriptedHttpClient>,
) -> (BlockingClient, RecordingSleep) {
    let sleeper = RecordingSleep::new();
    let transport: Arc<dyn BlockingHttpClient> = http.clone();
    let client = BlockingClient::builder(config)
        .http_client(transport)
        .sleeper(Arc::new(sleeper.clone()))
        .build()
        .expect("client builds");
    (client, sleeper)
}

pub fn secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
